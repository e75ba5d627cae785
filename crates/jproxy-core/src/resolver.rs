//! Type resolution through a loading strategy
//!
//! `ExternalArchive` mirrors a child class loader over the host loader:
//! the host class path is consulted first, then the archive.

use crate::classpath::{ClassPath, ClassPathEntry};
use crate::error::LoadError;
use crate::types::{JavaType, LoadingContext, TypeDescriptor};
use jproxy_classfile::ClassFile;
use std::path::{Path, PathBuf};

/// How the target type is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingStrategy {
    /// Host class path only
    HostDefault,
    /// Host class path, then the given jar/zip/directory
    ExternalArchive(PathBuf),
}

/// A type read from a class file
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// Identity and provenance
    pub descriptor: TypeDescriptor,
    /// Decoded class file
    pub class: ClassFile,
}

/// Loads class files for binary names
#[derive(Debug)]
pub struct TypeResolver {
    host: ClassPath,
    archive: Option<ClassPathEntry>,
    strategy: LoadingStrategy,
}

impl TypeResolver {
    /// Build a resolver; an `ExternalArchive` is opened immediately so an
    /// unreadable path fails before any lookup
    pub fn new(host: ClassPath, strategy: LoadingStrategy) -> Result<Self, LoadError> {
        let archive = match &strategy {
            LoadingStrategy::HostDefault => None,
            LoadingStrategy::ExternalArchive(path) => Some(open_archive(path)?),
        };
        Ok(Self {
            host,
            archive,
            strategy,
        })
    }

    /// Strategy this resolver was built with
    pub fn strategy(&self) -> &LoadingStrategy {
        &self.strategy
    }

    /// Resolve a type name to its class file
    ///
    /// Accepts binary names (`java.util.Map$Entry`) and, when no class
    /// matches literally, canonical names of member types
    /// (`java.util.Map.Entry`).
    pub fn resolve(&self, type_name: &str) -> Result<ResolvedType, LoadError> {
        let type_name = type_name.trim();
        if type_name.is_empty() || type_name.contains('/') {
            return Err(LoadError::TypeNotFound {
                name: type_name.to_string(),
            });
        }

        for candidate in binary_name_candidates(type_name) {
            if let Some((context, bytes)) = self.find(&candidate)? {
                let class = ClassFile::decode(&bytes).map_err(|source| LoadError::Malformed {
                    name: candidate.clone(),
                    source,
                })?;
                let descriptor = describe(&class, context);
                tracing::debug!(
                    name = %descriptor.canonical_name,
                    context = %descriptor.context.as_ref().map_or_else(String::new, |c| c.to_string()),
                    kind = ?descriptor.kind,
                    "resolved type"
                );
                return Ok(ResolvedType { descriptor, class });
            }
        }
        Err(LoadError::TypeNotFound {
            name: type_name.to_string(),
        })
    }

    fn find(&self, binary_name: &str) -> Result<Option<(LoadingContext, Vec<u8>)>, LoadError> {
        if let Some((_, bytes)) = self.host.find(binary_name)? {
            return Ok(Some((LoadingContext::Host, bytes)));
        }
        if let Some(archive) = &self.archive {
            if let Some(bytes) = archive.read_class(binary_name)? {
                return Ok(Some((
                    LoadingContext::Archive(archive.path().to_path_buf()),
                    bytes,
                )));
            }
        }
        Ok(None)
    }
}

fn open_archive(path: &Path) -> Result<ClassPathEntry, LoadError> {
    if !path.exists() {
        return Err(LoadError::ArchiveUnreadable {
            path: path.to_path_buf(),
            reason: "no such file or directory".to_string(),
        });
    }
    ClassPathEntry::open(path)
}

/// The literal name first, then each trailing `.` turned into `$`
/// (`a.B.C.D` → `a.B.C$D` → `a.B$C$D` → `a$B$C$D`)
fn binary_name_candidates(name: &str) -> Vec<String> {
    let mut candidates = vec![name.to_string()];
    let mut current = name.to_string();
    while let Some(dot) = current.rfind('.') {
        current.replace_range(dot..=dot, "$");
        candidates.push(current.clone());
    }
    candidates
}

fn describe(class: &ClassFile, context: LoadingContext) -> TypeDescriptor {
    let binary = class.this_class.replace('/', ".");
    let ty = JavaType::Reference(binary.clone());
    let (canonical_name, simple_name) = match class.own_inner_class() {
        Some(row) => match (&row.outer_class, &row.inner_name) {
            (Some(outer), Some(inner)) => {
                let outer = JavaType::Reference(outer.replace('/', ".")).canonical_name();
                (format!("{outer}.{inner}"), inner.clone())
            }
            // Local classes have a simple name but no canonical name
            (None, Some(inner)) => (ty.canonical_name(), inner.clone()),
            _ => (binary.clone(), String::new()),
        },
        None => {
            let simple = binary.rsplit('.').next().unwrap_or(&binary).to_string();
            (ty.canonical_name(), simple)
        }
    };
    TypeDescriptor {
        ty,
        canonical_name,
        simple_name,
        kind: Some(class.kind()),
        context: Some(context),
    }
}
