//! Persists generated source

use std::path::Path;

/// Write `body` to `path`, creating the parent directory if needed
pub fn persist(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)
}
