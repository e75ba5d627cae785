//! Core runtime surface: which types generated code may name directly

use crate::types::JavaType;

/// Packages treated as always resolvable by the delegate's loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSurface {
    prefixes: Vec<String>,
}

impl CoreSurface {
    /// Default surface: the JDK's `java.` and `javax.` packages
    pub const DEFAULT_PACKAGES: [&'static str; 2] = ["java.", "javax."];

    /// Build from package names or prefixes; `java` and `java.` are equivalent
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = packages
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| if p.ends_with('.') { p } else { format!("{p}.") })
            .collect();
        Self { prefixes }
    }

    /// Normalised prefixes, each ending in `.`
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Primitives and `void` are always core; arrays follow their element type
    pub fn is_core(&self, ty: &JavaType) -> bool {
        match ty.element() {
            JavaType::Void | JavaType::Primitive(_) => true,
            JavaType::Reference(name) => self.prefixes.iter().any(|p| name.starts_with(p.as_str())),
            JavaType::Array(_) => false,
        }
    }

    /// Inverse of [`CoreSurface::is_core`]
    pub fn is_foreign(&self, ty: &JavaType) -> bool {
        !self.is_core(ty)
    }
}

impl Default for CoreSurface {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PACKAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jproxy_classfile::BaseType;

    fn reference(name: &str) -> JavaType {
        JavaType::Reference(name.to_string())
    }

    #[test]
    fn default_surface() {
        let surface = CoreSurface::default();
        assert!(surface.is_core(&reference("java.lang.String")));
        assert!(surface.is_core(&reference("javax.swing.Action")));
        assert!(surface.is_core(&JavaType::Primitive(BaseType::Int)));
        assert!(surface.is_core(&JavaType::Void));
        assert!(surface.is_foreign(&reference("com.acme.Point")));
        // `javafx` is not `java.`
        assert!(surface.is_foreign(&reference("javafx.scene.Node")));
    }

    #[test]
    fn arrays_follow_element() {
        let surface = CoreSurface::default();
        let ints = JavaType::Array(Box::new(JavaType::Primitive(BaseType::Int)));
        let points = JavaType::Array(Box::new(reference("com.acme.Point")));
        assert!(surface.is_core(&ints));
        assert!(surface.is_foreign(&points));
    }

    #[test]
    fn configured_prefixes_are_normalised() {
        let surface = CoreSurface::new(["java", " com.acme. ", ""]);
        assert_eq!(surface.prefixes(), &["java.".to_string(), "com.acme.".to_string()]);
        assert!(surface.is_core(&reference("com.acme.Point")));
        assert!(surface.is_foreign(&reference("javax.swing.Action")));
    }
}
