//! Reflective proxy generator
//!
//! Reads a JVM interface from compiled class files and emits the Java
//! source of a class that implements it by forwarding every call, through
//! reflection, to an opaque delegate object.

#![warn(missing_docs)]

pub mod bridge;
pub mod classpath;
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod reflector;
pub mod resolver;
pub mod surface;
pub mod types;

pub use bridge::BridgeVerifier;
pub use classpath::{discover_host_entries, ClassPath, ClassPathEntry, HOST_CLASSPATH_ENV};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
pub use emit::{LookupKeys, MethodBodyEmitter, ProxyClassSpec, ProxySourceEmitter};
pub use error::{BridgeOperation, GenerateError, LoadError};
pub use generator::{GenerationResult, Generator, GeneratorOptions, MethodOrder};
pub use reflector::InterfaceReflector;
pub use resolver::{LoadingStrategy, ResolvedType, TypeResolver};
pub use surface::CoreSurface;
pub use types::{JavaType, LoadingContext, MethodSignature, PackageName, TypeDescriptor};
