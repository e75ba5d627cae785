//! Proxy generation pipeline
//!
//! resolve → reflect → (sort) → (verify bridges) → emit. Any failure aborts
//! the run; a [`GenerationResult`] is only produced for complete output.

use crate::bridge::BridgeVerifier;
use crate::classpath::ClassPath;
use crate::emit::{LookupKeys, ProxyClassSpec, ProxySourceEmitter};
use crate::error::GenerateError;
use crate::reflector::InterfaceReflector;
use crate::resolver::{LoadingStrategy, TypeResolver};
use crate::surface::CoreSurface;
use crate::types::PackageName;
use std::path::{Path, PathBuf};

/// Order of methods in the generated class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodOrder {
    /// Class file declaration order, superinterfaces after the target
    #[default]
    Declared,
    /// By name, then by parameter type names
    Sorted,
}

/// Knobs for one generation run
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Package clause of the generated class
    pub package: PackageName,
    /// Host class path entries, searched in order
    pub host_classpath: Vec<PathBuf>,
    /// Packages the generated code may name directly
    pub surface: CoreSurface,
    /// Class literals used for primitive lookup keys
    pub lookup_keys: LookupKeys,
    /// Method emission order
    pub method_order: MethodOrder,
    /// Check foreign types for their bridge methods before emitting
    pub verify_bridges: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            package: PackageName::None,
            host_classpath: Vec::new(),
            surface: CoreSurface::default(),
            lookup_keys: LookupKeys::default(),
            method_order: MethodOrder::default(),
            verify_bridges: true,
        }
    }
}

/// Generates the proxy class for one interface
#[derive(Debug, Clone)]
pub struct Generator {
    class_name: String,
    strategy: LoadingStrategy,
    options: GeneratorOptions,
}

impl Generator {
    /// Load `class_name` from the host class path
    pub fn new(class_name: impl Into<String>, options: GeneratorOptions) -> Self {
        Self {
            class_name: class_name.into(),
            strategy: LoadingStrategy::HostDefault,
            options,
        }
    }

    /// Load `class_name` from the host class path, then `archive`
    pub fn with_archive(
        archive: impl Into<PathBuf>,
        class_name: impl Into<String>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            strategy: LoadingStrategy::ExternalArchive(archive.into()),
            options,
        }
    }

    /// Requested type name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Loading strategy for the target
    pub fn strategy(&self) -> &LoadingStrategy {
        &self.strategy
    }

    /// Run the pipeline
    pub fn generate(&self) -> Result<GenerationResult, GenerateError> {
        let host = ClassPath::open_lenient(&self.options.host_classpath);
        let resolver = TypeResolver::new(host, self.strategy.clone())?;

        let target = resolver.resolve(&self.class_name)?;
        let mut methods = InterfaceReflector::new(&resolver).reflect(&target)?;

        if self.options.method_order == MethodOrder::Sorted {
            methods.sort_by_cached_key(|m| m.sort_key());
        }
        if self.options.verify_bridges {
            BridgeVerifier::new(&resolver, &self.options.surface).verify(&methods)?;
        }

        let spec = ProxyClassSpec {
            package: self.options.package.clone(),
            class_name: ProxyClassSpec::proxy_name(&target.descriptor.simple_name),
            interface_name: target.descriptor.canonical_name.clone(),
            methods,
        };
        let class_body =
            ProxySourceEmitter::new(&self.options.surface, self.options.lookup_keys).emit(&spec);

        tracing::info!(
            interface = %spec.interface_name,
            proxy = %spec.class_name,
            methods = spec.methods.len(),
            "generated proxy"
        );
        Ok(GenerationResult {
            class_name: spec.class_name,
            class_body,
        })
    }
}

/// Name and source of a generated proxy class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    class_name: String,
    class_body: String,
}

impl GenerationResult {
    /// Proxy class name, e.g. `ProxySized`
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Complete Java source
    pub fn class_body(&self) -> &str {
        &self.class_body
    }

    /// `<dir>/<ProxyName>.java`
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.java", self.class_name))
    }

    /// Take the name and body apart
    pub fn into_parts(self) -> (String, String) {
        (self.class_name, self.class_body)
    }
}
