//! Generation errors
//!
//! Every error here aborts a generation run; there is no partial output.

use jproxy_classfile::{ClassFileError, ClassKind};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a type through a loading strategy
#[derive(Debug, Error)]
pub enum LoadError {
    /// No class path entry provides the type
    #[error("Type not found: {name}")]
    TypeNotFound {
        /// Binary name that was requested
        name: String,
    },

    /// The archive could not be opened or read
    #[error("Cannot read archive {}: {reason}", .path.display())]
    ArchiveUnreadable {
        /// Archive path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// I/O failure while reading a class file from a directory
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The class file exists but could not be decoded
    #[error("Malformed class file for {name}: {source}")]
    Malformed {
        /// Binary name being loaded
        name: String,
        /// Decoder error
        #[source]
        source: ClassFileError,
    },

    /// A method descriptor inside a loaded class could not be parsed
    #[error("Malformed descriptor {descriptor} in {owner}")]
    BadDescriptor {
        /// Declaring type
        owner: String,
        /// Raw descriptor
        descriptor: String,
    },
}

/// Which half of the bridging capability a foreign type is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOperation {
    /// `static toDelegateForm(T)`: used for foreign parameters
    ToDelegateForm,
    /// `static T fromDelegateForm(Object)`: used for foreign return values
    FromDelegateForm,
}

impl std::fmt::Display for BridgeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeOperation::ToDelegateForm => write!(f, "toDelegateForm"),
            BridgeOperation::FromDelegateForm => write!(f, "fromDelegateForm"),
        }
    }
}

/// Errors that abort proxy generation
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Target or a type it depends on could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Target type is not an interface
    #[error("Unsupported shape: {name} is {} {kind}, only interfaces can be proxied", article(.kind))]
    UnsupportedShape {
        /// Canonical name of the target
        name: String,
        /// Shape observed in the class file
        kind: ClassKind,
    },

    /// A foreign type does not expose the bridging operation it needs
    #[error("Foreign type {type_name} has no static {operation} method for {usage}")]
    MissingBridge {
        /// Canonical name of the foreign type
        type_name: String,
        /// Missing operation
        operation: BridgeOperation,
        /// Where the type is used, e.g. `parameter 0 of add`
        usage: String,
    },
}

fn article(kind: &ClassKind) -> &'static str {
    match kind {
        ClassKind::Interface | ClassKind::Annotation | ClassKind::Enum => "an",
        ClassKind::Class | ClassKind::Module => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_shape_message() {
        let err = GenerateError::UnsupportedShape {
            name: "com.acme.Point".into(),
            kind: ClassKind::Class,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported shape: com.acme.Point is a class, only interfaces can be proxied"
        );
        let err = GenerateError::UnsupportedShape {
            name: "com.acme.Color".into(),
            kind: ClassKind::Enum,
        };
        assert!(err.to_string().contains("is an enum"));
    }

    #[test]
    fn load_error_is_transparent() {
        let err = GenerateError::from(LoadError::TypeNotFound {
            name: "com.acme.Missing".into(),
        });
        assert_eq!(err.to_string(), "Type not found: com.acme.Missing");
    }
}
