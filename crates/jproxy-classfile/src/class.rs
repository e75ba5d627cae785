//! Class file structure (JVMS §4.1)
//!
//! [`ClassFile::decode`] resolves every name through the constant pool up
//! front, so callers only ever see strings. Attributes other than
//! `InnerClasses` are skipped; method bodies are never inspected.

use crate::access::{AccessFlags, ClassKind};
use crate::constants::ConstantPool;
use crate::encoder::{ClassReader, ClassWriter, DecodeError};
use thiserror::Error;

/// Magic number for class files
pub const MAGIC: u32 = 0xCAFE_BABE;

/// Oldest major version accepted (JDK 1.1)
pub const MIN_MAJOR_VERSION: u16 = 45;

/// Major version written by [`ClassFileBuilder`] (Java 8)
pub const BUILDER_MAJOR_VERSION: u16 = 52;

const INNER_CLASSES: &str = "InnerClasses";

/// Class file decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassFileError {
    /// Decode error
    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    /// Invalid magic number
    #[error("Invalid magic number: expected 0xCAFEBABE, got {0:#010x}")]
    InvalidMagic(u32),

    /// Unsupported version
    #[error("Unsupported class file version: {0} (minimum: {MIN_MAJOR_VERSION})")]
    UnsupportedVersion(u16),

    /// Unknown constant pool tag
    #[error("Unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag {
        /// Tag byte
        tag: u8,
        /// Pool index
        index: u16,
    },

    /// Constant pool index of the wrong kind or out of range
    #[error("Constant pool index {index} is not a valid {expected} entry")]
    BadConstantIndex {
        /// Pool index
        index: u16,
        /// Expected entry kind
        expected: &'static str,
    },
}

/// A field or method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Access flags
    pub access: AccessFlags,
    /// Simple name
    pub name: String,
    /// Raw descriptor
    pub descriptor: String,
}

/// One row of the `InnerClasses` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    /// Internal name of the nested class
    pub inner_class: String,
    /// Internal name of the enclosing class, absent for local/anonymous classes
    pub outer_class: Option<String>,
    /// Source simple name, absent for anonymous classes
    pub inner_name: Option<String>,
    /// Access flags as declared in source
    pub access: AccessFlags,
}

/// A decoded class file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    /// Minor version
    pub minor_version: u16,
    /// Major version
    pub major_version: u16,
    /// Class access flags
    pub access: AccessFlags,
    /// Internal name of this class (`com/acme/Sized`)
    pub this_class: String,
    /// Internal name of the superclass (`None` only for `java/lang/Object`)
    pub super_class: Option<String>,
    /// Direct superinterfaces in declaration order
    pub interfaces: Vec<String>,
    /// Declared fields
    pub fields: Vec<MemberInfo>,
    /// Declared methods in declaration order
    pub methods: Vec<MemberInfo>,
    /// `InnerClasses` rows
    pub inner_classes: Vec<InnerClass>,
}

impl ClassFile {
    /// Decode a class file
    pub fn decode(data: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = ClassReader::new(data);

        let magic = reader.read_u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::InvalidMagic(magic));
        }
        let minor_version = reader.read_u16()?;
        let major_version = reader.read_u16()?;
        if major_version < MIN_MAJOR_VERSION {
            return Err(ClassFileError::UnsupportedVersion(major_version));
        }

        let pool = ConstantPool::decode(&mut reader)?;

        let access = AccessFlags(reader.read_u16()?);
        let this_class = pool.class_name(reader.read_u16()?)?.to_string();
        let super_class = pool
            .optional_class_name(reader.read_u16()?)?
            .map(str::to_string);

        let interface_count = reader.read_u16()? as usize;
        let mut interfaces = Vec::with_capacity(interface_count);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.read_u16()?)?.to_string());
        }

        let fields = decode_members(&mut reader, &pool)?;
        let methods = decode_members(&mut reader, &pool)?;

        let mut inner_classes = Vec::new();
        let attribute_count = reader.read_u16()?;
        for _ in 0..attribute_count {
            let name = pool.utf8(reader.read_u16()?)?;
            let length = reader.read_u32()? as usize;
            if name == INNER_CLASSES {
                let body = reader.read_bytes(length)?;
                inner_classes = decode_inner_classes(body, &pool)?;
            } else {
                reader.skip(length)?;
            }
        }

        Ok(Self {
            minor_version,
            major_version,
            access,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            inner_classes,
        })
    }

    /// Shape declared by the access flags
    pub fn kind(&self) -> ClassKind {
        ClassKind::from_flags(self.access)
    }

    /// The `InnerClasses` row describing this class itself, if it is nested
    pub fn own_inner_class(&self) -> Option<&InnerClass> {
        self.inner_classes
            .iter()
            .find(|row| row.inner_class == self.this_class)
    }

    /// Find a declared method by name
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberInfo> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

fn decode_members(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<MemberInfo>, ClassFileError> {
    let count = reader.read_u16()? as usize;
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let access = AccessFlags(reader.read_u16()?);
        let name = pool.utf8(reader.read_u16()?)?.to_string();
        let descriptor = pool.utf8(reader.read_u16()?)?.to_string();
        let attribute_count = reader.read_u16()?;
        for _ in 0..attribute_count {
            reader.skip(2)?;
            let length = reader.read_u32()? as usize;
            reader.skip(length)?;
        }
        members.push(MemberInfo {
            access,
            name,
            descriptor,
        });
    }
    Ok(members)
}

fn decode_inner_classes(
    body: &[u8],
    pool: &ConstantPool,
) -> Result<Vec<InnerClass>, ClassFileError> {
    let mut reader = ClassReader::new(body);
    let count = reader.read_u16()? as usize;
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let inner_class = pool.class_name(reader.read_u16()?)?.to_string();
        let outer_class = pool
            .optional_class_name(reader.read_u16()?)?
            .map(str::to_string);
        let inner_name = pool.optional_utf8(reader.read_u16()?)?.map(str::to_string);
        let access = AccessFlags(reader.read_u16()?);
        rows.push(InnerClass {
            inner_class,
            outer_class,
            inner_name,
            access,
        });
    }
    Ok(rows)
}

/// Builds minimal, attribute-free class files
///
/// Used to produce test fixtures and sample archives without a Java
/// compiler. Methods carry no `Code` attribute, so only interfaces and
/// abstract members are loadable by a real JVM; the reflector does not care.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    access: AccessFlags,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    methods: Vec<MemberInfo>,
    inner_classes: Vec<InnerClass>,
}

impl ClassFileBuilder {
    /// Start a class file with explicit flags; superclass defaults to `java/lang/Object`
    pub fn new(this_class: &str, access: AccessFlags) -> Self {
        Self {
            access,
            this_class: this_class.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    /// A public interface
    pub fn interface(this_class: &str) -> Self {
        Self::new(
            this_class,
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
        )
    }

    /// A public concrete class
    pub fn class(this_class: &str) -> Self {
        Self::new(this_class, AccessFlags::PUBLIC | AccessFlags::SUPER)
    }

    /// Override the superclass
    pub fn super_class(mut self, super_class: Option<&str>) -> Self {
        self.super_class = super_class.map(str::to_string);
        self
    }

    /// Add a direct superinterface
    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Add an abstract public method
    pub fn abstract_method(self, name: &str, descriptor: &str) -> Self {
        self.method(AccessFlags::PUBLIC | AccessFlags::ABSTRACT, name, descriptor)
    }

    /// Add a public static method
    pub fn static_method(self, name: &str, descriptor: &str) -> Self {
        self.method(AccessFlags::PUBLIC | AccessFlags::STATIC, name, descriptor)
    }

    /// Add a method with explicit flags
    pub fn method(mut self, access: AccessFlags, name: &str, descriptor: &str) -> Self {
        self.methods.push(MemberInfo {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
        self
    }

    /// Record this class as a member of `outer` named `simple_name`
    pub fn nested_in(mut self, outer: &str, simple_name: &str) -> Self {
        self.inner_classes.push(InnerClass {
            inner_class: self.this_class.clone(),
            outer_class: Some(outer.to_string()),
            inner_name: Some(simple_name.to_string()),
            access: AccessFlags::PUBLIC | AccessFlags::STATIC,
        });
        self
    }

    /// Encode to class file bytes
    pub fn build(&self) -> Vec<u8> {
        let mut pool = ConstantPool::new();
        let this_index = pool.add_class(&self.this_class);
        let super_index = self
            .super_class
            .as_deref()
            .map_or(0, |name| pool.add_class(name));
        let interface_indices: Vec<u16> =
            self.interfaces.iter().map(|name| pool.add_class(name)).collect();
        let method_indices: Vec<(u16, u16)> = self
            .methods
            .iter()
            .map(|m| (pool.add_utf8(&m.name), pool.add_utf8(&m.descriptor)))
            .collect();
        let inner_rows: Vec<[u16; 4]> = self
            .inner_classes
            .iter()
            .map(|row| {
                [
                    pool.add_class(&row.inner_class),
                    row.outer_class.as_deref().map_or(0, |n| pool.add_class(n)),
                    row.inner_name.as_deref().map_or(0, |n| pool.add_utf8(n)),
                    row.access.bits(),
                ]
            })
            .collect();
        let inner_attr_name = if inner_rows.is_empty() {
            None
        } else {
            Some(pool.add_utf8(INNER_CLASSES))
        };

        let mut writer = ClassWriter::with_capacity(256);
        writer.emit_u32(MAGIC);
        writer.emit_u16(0);
        writer.emit_u16(BUILDER_MAJOR_VERSION);
        pool.encode(&mut writer);
        writer.emit_u16(self.access.bits());
        writer.emit_u16(this_index);
        writer.emit_u16(super_index);
        writer.emit_u16(interface_indices.len() as u16);
        for index in interface_indices {
            writer.emit_u16(index);
        }
        writer.emit_u16(0); // fields
        writer.emit_u16(self.methods.len() as u16);
        for (method, (name, descriptor)) in self.methods.iter().zip(method_indices) {
            writer.emit_u16(method.access.bits());
            writer.emit_u16(name);
            writer.emit_u16(descriptor);
            writer.emit_u16(0);
        }
        match inner_attr_name {
            Some(name) => {
                writer.emit_u16(1);
                writer.emit_u16(name);
                let length_at = writer.offset();
                writer.emit_u32(0);
                writer.emit_u16(inner_rows.len() as u16);
                for row in &inner_rows {
                    for value in row {
                        writer.emit_u16(*value);
                    }
                }
                let length = writer.offset() - length_at - 4;
                writer.patch_u32(length_at, length as u32);
            }
            None => writer.emit_u16(0),
        }
        writer.into_bytes()
    }
}
