//! JVM class file support for jproxy
//!
//! This crate decodes the parts of a `.class` file the proxy generator
//! reflects over: access flags, the class hierarchy, method names and
//! descriptors, and the `InnerClasses` table. It also provides a small
//! encoder for building fixture class files.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod access;
pub mod class;
pub mod constants;
pub mod descriptor;
pub mod encoder;

pub use access::{AccessFlags, ClassKind};
pub use class::{ClassFile, ClassFileBuilder, ClassFileError, InnerClass, MemberInfo};
pub use constants::{Constant, ConstantPool};
pub use descriptor::{BaseType, DescriptorError, FieldType, MethodDescriptor, ReturnType};
pub use encoder::{ClassReader, ClassWriter, DecodeError};
