//! Access and property flags for classes, members and inner classes

use std::fmt;

/// A `u2` access flag mask as stored in the class file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFlags(pub u16);

impl AccessFlags {
    /// Declared `public`
    pub const PUBLIC: AccessFlags = AccessFlags(0x0001);
    /// Declared `private`
    pub const PRIVATE: AccessFlags = AccessFlags(0x0002);
    /// Declared `protected`
    pub const PROTECTED: AccessFlags = AccessFlags(0x0004);
    /// Declared `static`
    pub const STATIC: AccessFlags = AccessFlags(0x0008);
    /// Declared `final`
    pub const FINAL: AccessFlags = AccessFlags(0x0010);
    /// `ACC_SUPER` on classes, `synchronized` on methods
    pub const SUPER: AccessFlags = AccessFlags(0x0020);
    /// Bridge method generated by the compiler
    pub const BRIDGE: AccessFlags = AccessFlags(0x0040);
    /// Variable arity method
    pub const VARARGS: AccessFlags = AccessFlags(0x0080);
    /// Declared `native`
    pub const NATIVE: AccessFlags = AccessFlags(0x0100);
    /// Is an interface
    pub const INTERFACE: AccessFlags = AccessFlags(0x0200);
    /// Declared `abstract`
    pub const ABSTRACT: AccessFlags = AccessFlags(0x0400);
    /// Declared `strictfp`
    pub const STRICT: AccessFlags = AccessFlags(0x0800);
    /// Not present in source
    pub const SYNTHETIC: AccessFlags = AccessFlags(0x1000);
    /// Is an annotation type
    pub const ANNOTATION: AccessFlags = AccessFlags(0x2000);
    /// Is an enum class
    pub const ENUM: AccessFlags = AccessFlags(0x4000);
    /// Is a module descriptor
    pub const MODULE: AccessFlags = AccessFlags(0x8000);

    /// Raw bit mask
    pub fn bits(self) -> u16 {
        self.0
    }

    /// True when every bit of `other` is set
    pub fn contains(self, other: AccessFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for AccessFlags {
    type Output = AccessFlags;

    fn bitor(self, rhs: AccessFlags) -> AccessFlags {
        AccessFlags(self.0 | rhs.0)
    }
}

/// The shape a class file declares, derived from its access flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Ordinary or abstract class
    Class,
    /// Interface
    Interface,
    /// Annotation interface (`@interface`)
    Annotation,
    /// Enum class
    Enum,
    /// `module-info`
    Module,
}

impl ClassKind {
    /// Classify a class file by its access flags
    pub fn from_flags(flags: AccessFlags) -> Self {
        if flags.contains(AccessFlags::MODULE) {
            ClassKind::Module
        } else if flags.contains(AccessFlags::ANNOTATION) {
            ClassKind::Annotation
        } else if flags.contains(AccessFlags::INTERFACE) {
            ClassKind::Interface
        } else if flags.contains(AccessFlags::ENUM) {
            ClassKind::Enum
        } else {
            ClassKind::Class
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Class => write!(f, "class"),
            ClassKind::Interface => write!(f, "interface"),
            ClassKind::Annotation => write!(f, "annotation"),
            ClassKind::Enum => write!(f, "enum"),
            ClassKind::Module => write!(f, "module"),
        }
    }
}
