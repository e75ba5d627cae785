//! Class path entries: directories of `.class` files and jar/zip archives
//!
//! A binary name `a.b.Outer$Inner` is looked up as `a/b/Outer$Inner.class`.
//! `.jmod` archives are read with their `classes/` prefix, so a JDK's
//! `jmods/java.base.jmod` can serve as the host's core runtime surface.

use crate::error::LoadError;
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Environment variable holding extra host class path entries
pub const HOST_CLASSPATH_ENV: &str = "JPROXY_HOST_CLASSPATH";

/// One searchable location
pub enum ClassPathEntry {
    /// Directory laid out by package
    Directory(PathBuf),
    /// Opened jar, zip or jmod
    Archive {
        /// Path on disk
        path: PathBuf,
        /// Entry name prefix (`classes/` for jmods)
        prefix: &'static str,
        /// Open archive; lookups need `&mut`
        archive: RefCell<ZipArchive<BufReader<File>>>,
    },
}

impl std::fmt::Debug for ClassPathEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassPathEntry::Directory(path) => f.debug_tuple("Directory").field(path).finish(),
            ClassPathEntry::Archive { path, .. } => f.debug_tuple("Archive").field(path).finish(),
        }
    }
}

impl ClassPathEntry {
    /// Open a directory or archive
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        if path.is_dir() {
            return Ok(ClassPathEntry::Directory(path.to_path_buf()));
        }
        let unreadable = |reason: String| LoadError::ArchiveUnreadable {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| unreadable(e.to_string()))?;
        let prefix = match path.extension().and_then(|ext| ext.to_str()) {
            Some("jmod") => "classes/",
            _ => "",
        };
        Ok(ClassPathEntry::Archive {
            path: path.to_path_buf(),
            prefix,
            archive: RefCell::new(archive),
        })
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        match self {
            ClassPathEntry::Directory(path) => path,
            ClassPathEntry::Archive { path, .. } => path,
        }
    }

    /// Read the class file for a binary name, `Ok(None)` when absent
    pub fn read_class(&self, binary_name: &str) -> Result<Option<Vec<u8>>, LoadError> {
        let relative = format!("{}.class", binary_name.replace('.', "/"));
        match self {
            ClassPathEntry::Directory(dir) => {
                let file = dir.join(&relative);
                match std::fs::read(&file) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(LoadError::Io { path: file, source }),
                }
            }
            ClassPathEntry::Archive {
                path,
                prefix,
                archive,
            } => {
                let unreadable = |reason: String| LoadError::ArchiveUnreadable {
                    path: path.clone(),
                    reason,
                };
                let mut archive = archive.borrow_mut();
                let mut entry = match archive.by_name(&format!("{prefix}{relative}")) {
                    Ok(entry) => entry,
                    Err(ZipError::FileNotFound) => return Ok(None),
                    Err(e) => return Err(unreadable(e.to_string())),
                };
                let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| unreadable(e.to_string()))?;
                Ok(Some(bytes))
            }
        }
    }
}

/// Largest up-front allocation made on an archive's declared entry size
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Archives can declare any uncompressed size; reading grows past the hint
fn capacity_hint(declared: u64) -> usize {
    declared.min(MAX_PREALLOCATION) as usize
}

/// Ordered list of entries, searched first to last
#[derive(Debug, Default)]
pub struct ClassPath {
    entries: Vec<ClassPathEntry>,
}

impl ClassPath {
    /// Empty class path
    pub fn new() -> Self {
        Self::default()
    }

    /// Open every path; missing host entries are skipped with a warning,
    /// as the JVM does for its class path
    pub fn open_lenient(paths: &[PathBuf]) -> Self {
        let mut class_path = Self::new();
        for path in paths {
            if !path.exists() {
                tracing::warn!(path = %path.display(), "skipping missing class path entry");
                continue;
            }
            match ClassPathEntry::open(path) {
                Ok(entry) => class_path.push(entry),
                Err(err) => tracing::warn!(error = %err, "skipping unreadable class path entry"),
            }
        }
        class_path
    }

    /// Append an entry
    pub fn push(&mut self, entry: ClassPathEntry) {
        self.entries.push(entry);
    }

    /// Entries in search order
    pub fn entries(&self) -> &[ClassPathEntry] {
        &self.entries
    }

    /// Find the first entry providing the class
    pub fn find(&self, binary_name: &str) -> Result<Option<(&ClassPathEntry, Vec<u8>)>, LoadError> {
        for entry in &self.entries {
            if let Some(bytes) = entry.read_class(binary_name)? {
                return Ok(Some((entry, bytes)));
            }
        }
        Ok(None)
    }
}

/// Host class path entries discovered from the environment
///
/// `JPROXY_HOST_CLASSPATH` entries come first, then the running JDK's core
/// classes: `$JAVA_HOME/jre/lib/rt.jar` or `$JAVA_HOME/lib/rt.jar` on
/// Java 8, `$JAVA_HOME/jmods/java.base.jmod` on later releases.
pub fn discover_host_entries() -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::env::var_os(HOST_CLASSPATH_ENV)
        .map(|value| std::env::split_paths(&value).collect())
        .unwrap_or_default();

    if let Some(java_home) = std::env::var_os("JAVA_HOME").map(PathBuf::from) {
        let candidates = [
            java_home.join("jre/lib/rt.jar"),
            java_home.join("lib/rt.jar"),
            java_home.join("jmods/java.base.jmod"),
        ];
        entries.extend(candidates.into_iter().filter(|p| p.is_file()));
    }
    entries
}
