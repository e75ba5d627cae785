//! Proxy class header, fields and constructor

use super::{LookupKeys, MethodBodyEmitter, SourceBuilder};
use crate::surface::CoreSurface;
use crate::types::{MethodSignature, PackageName};

/// Everything needed to render one proxy class
#[derive(Debug, Clone)]
pub struct ProxyClassSpec {
    /// Package clause, or none
    pub package: PackageName,
    /// `Proxy` + simple name of the interface
    pub class_name: String,
    /// Canonical name of the implemented interface
    pub interface_name: String,
    /// Methods in emission order
    pub methods: Vec<MethodSignature>,
}

impl ProxyClassSpec {
    /// Derived proxy class name for an interface simple name
    pub fn proxy_name(simple_name: &str) -> String {
        format!("Proxy{simple_name}")
    }
}

/// Renders a [`ProxyClassSpec`] to Java source
pub struct ProxySourceEmitter<'a> {
    methods: MethodBodyEmitter<'a>,
}

impl<'a> ProxySourceEmitter<'a> {
    /// Create an emitter
    pub fn new(surface: &'a CoreSurface, lookup_keys: LookupKeys) -> Self {
        Self {
            methods: MethodBodyEmitter::new(surface, lookup_keys),
        }
    }

    /// Full source text of the proxy class
    pub fn emit(&self, spec: &ProxyClassSpec) -> String {
        let mut out = SourceBuilder::new();

        if let PackageName::Named(package) = &spec.package {
            out.line(0, &format!("package {package};"));
        }
        out.line(0, "import java.lang.reflect.Method;");
        out.blank();

        out.line(
            0,
            &format!(
                "public class {} implements {} {{",
                spec.class_name, spec.interface_name
            ),
        );
        out.line(1, "private final Object handle;");
        out.line(1, "private final ClassLoader loader;");
        out.blank();
        out.line(1, &format!("public {}(Object handle) {{", spec.class_name));
        out.line(2, "this.handle = handle;");
        out.line(2, "this.loader = handle.getClass().getClassLoader();");
        out.line(1, "}");

        for method in &spec.methods {
            out.blank();
            self.methods.emit(&mut out, method);
        }
        out.line(0, "}");
        out.finish()
    }
}
