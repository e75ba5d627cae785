//! Generator configuration (jproxy.toml)

use crate::classpath::discover_host_entries;
use crate::emit::LookupKeys;
use crate::generator::{GeneratorOptions, MethodOrder};
use crate::surface::CoreSurface;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "jproxy.toml";

/// Errors that can occur while loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Contents of `jproxy.toml`; every section is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Host class path
    #[serde(default)]
    pub host: HostConfig,
    /// Core runtime surface
    #[serde(default)]
    pub core: CoreConfig,
    /// Reflective lookup keys
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Bridge verification
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Output shape
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[host]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Extra entries, searched before discovered JDK classes
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
    /// Add `JPROXY_HOST_CLASSPATH` and `$JAVA_HOME` entries
    #[serde(default = "default_true")]
    pub discover: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            classpath: Vec::new(),
            discover: true,
        }
    }
}

/// `[core]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Package prefixes treated as core
    #[serde(default = "default_core_packages")]
    pub packages: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            packages: default_core_packages(),
        }
    }
}

/// `[lookup]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LookupConfig {
    /// `"boxed"` or `"primitive"`
    #[serde(default)]
    pub primitive_keys: LookupKeys,
}

/// `[bridge]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// Fail when a foreign type lacks its bridge methods
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { verify: true }
    }
}

/// `[output]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Sort methods by name and parameter types
    #[serde(default)]
    pub sort_methods: bool,
}

fn default_true() -> bool {
    true
}

fn default_core_packages() -> Vec<String> {
    CoreSurface::DEFAULT_PACKAGES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Config {
    /// Load a config file; relative class path entries are resolved against
    /// the file's directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            for entry in &mut config.host.classpath {
                if entry.is_relative() {
                    *entry = base.join(&*entry);
                }
            }
        }
        Ok(config)
    }

    /// Parse config text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Explicit path if given, else `jproxy.toml` in `dir` if present, else
    /// defaults
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let implicit = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "using config file");
            Self::from_file(&implicit)
        } else {
            Ok(Self::default())
        }
    }

    /// Generator options described by this config
    pub fn generator_options(&self) -> GeneratorOptions {
        let mut host_classpath = self.host.classpath.clone();
        if self.host.discover {
            host_classpath.extend(discover_host_entries());
        }
        GeneratorOptions {
            host_classpath,
            surface: CoreSurface::new(&self.core.packages),
            lookup_keys: self.lookup.primitive_keys,
            method_order: if self.output.sort_methods {
                MethodOrder::Sorted
            } else {
                MethodOrder::Declared
            },
            verify_bridges: self.bridge.verify,
            ..GeneratorOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.host.discover);
        assert!(config.bridge.verify);
        assert_eq!(config.core.packages, vec!["java.", "javax."]);
        assert_eq!(config.lookup.primitive_keys, LookupKeys::Boxed);
    }

    #[test]
    fn parse_full_config() {
        let config = Config::parse(
            r#"
[host]
classpath = ["/opt/lib/api.jar"]
discover = false

[core]
packages = ["java", "org.example.shared"]

[lookup]
primitive_keys = "primitive"

[bridge]
verify = false

[output]
sort_methods = true
"#,
        )
        .unwrap();

        let options = config.generator_options();
        assert_eq!(options.host_classpath, vec![PathBuf::from("/opt/lib/api.jar")]);
        assert_eq!(options.surface.prefixes(), ["java.", "org.example.shared."]);
        assert_eq!(options.lookup_keys, LookupKeys::Primitive);
        assert_eq!(options.method_order, MethodOrder::Sorted);
        assert!(!options.verify_bridges);
    }

    #[test]
    fn unknown_lookup_keys_are_rejected() {
        let err = Config::parse("[lookup]\nprimitive_keys = \"wrapped\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn relative_classpath_is_resolved_against_config_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[host]\nclasspath = [\"lib/api.jar\"]\n").unwrap();

        let config = Config::locate(None, temp.path()).unwrap();
        assert_eq!(config.host.classpath, vec![temp.path().join("lib/api.jar")]);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(matches!(
            Config::locate(Some(&missing), temp.path()),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(Config::locate(None, temp.path()).unwrap(), Config::default());
    }
}
