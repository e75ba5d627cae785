//! Forwarding method bodies
//!
//! Every generated method performs a reflective lookup on the delegate's
//! runtime class, marshals its arguments, invokes, and converts the result.
//! Foreign types are resolved through the delegate's own loader and cross
//! the boundary through their `toDelegateForm`/`fromDelegateForm` bridge.

use super::{LookupKeys, SourceBuilder, ValueNames};
use crate::surface::CoreSurface;
use crate::types::{JavaType, MethodSignature};

/// Emits one `@Override` method per signature
pub struct MethodBodyEmitter<'a> {
    surface: &'a CoreSurface,
    lookup_keys: LookupKeys,
}

impl<'a> MethodBodyEmitter<'a> {
    /// Create an emitter classifying types against `surface`
    pub fn new(surface: &'a CoreSurface, lookup_keys: LookupKeys) -> Self {
        Self {
            surface,
            lookup_keys,
        }
    }

    /// Append the complete method to `out`
    pub fn emit(&self, out: &mut SourceBuilder, method: &MethodSignature) {
        let mut values = ValueNames::new();
        let names = values.take(method.params.len());

        let declared_params = method
            .params
            .iter()
            .zip(&names)
            .map(|(param, name)| format!("{} {}", param.canonical_name, name))
            .collect::<Vec<_>>()
            .join(", ");

        out.line(1, "@Override");
        out.line(
            1,
            &format!(
                "public {} {}({}) {{",
                method.ret.canonical_name, method.name, declared_params
            ),
        );
        out.line(2, "try {");
        out.line(3, &self.lookup(method));
        out.line(3, &self.invocation(method, &names));
        if let Some(ret) = self.result(&method.ret.ty) {
            out.line(3, &ret);
        }
        out.line(2, "} catch (Exception e) {");
        out.line(3, "e.printStackTrace();");
        out.line(3, "throw new RuntimeException(e);");
        out.line(2, "}");
        out.line(1, "}");
    }

    fn lookup(&self, method: &MethodSignature) -> String {
        if method.params.is_empty() {
            return format!("Method m = handle.getClass().getMethod(\"{}\");", method.name);
        }
        let keys = method
            .params
            .iter()
            .map(|param| self.lookup_literal(&param.ty))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Method m = handle.getClass().getMethod(\"{}\", {});",
            method.name, keys
        )
    }

    /// Expression evaluating to the `Class` used as a lookup key
    pub fn lookup_literal(&self, ty: &JavaType) -> String {
        match ty {
            JavaType::Primitive(base) => match self.lookup_keys {
                LookupKeys::Boxed => format!("{}.class", base.boxed()),
                LookupKeys::Primitive => format!("{}.class", base.keyword()),
            },
            _ if self.surface.is_core(ty) => format!("{}.class", ty.canonical_name()),
            JavaType::Array(_) => {
                format!("Class.forName(\"{}\", false, loader)", ty.binary_name())
            }
            _ => format!("loader.loadClass(\"{}\")", ty.binary_name()),
        }
    }

    fn invocation(&self, method: &MethodSignature, names: &[String]) -> String {
        let target = if method.ret.is_void() {
            String::new()
        } else {
            "Object result = ".to_string()
        };
        if names.is_empty() {
            return format!("{target}m.invoke(handle);");
        }
        let args = method
            .params
            .iter()
            .zip(names)
            .map(|(param, name)| self.argument(&param.ty, name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{target}m.invoke(handle, {args});")
    }

    /// Argument expression passed to `invoke`
    pub fn argument(&self, ty: &JavaType, name: &str) -> String {
        if self.surface.is_core(ty) {
            name.to_string()
        } else {
            format!("{}.toDelegateForm({})", ty.element().canonical_name(), name)
        }
    }

    /// `return` statement, `None` for `void`
    pub fn result(&self, ty: &JavaType) -> Option<String> {
        match ty {
            JavaType::Void => None,
            JavaType::Primitive(base) => Some(format!("return ({}) result;", base.boxed())),
            _ if self.surface.is_core(ty) => {
                Some(format!("return ({}) result;", ty.canonical_name()))
            }
            _ => Some(format!(
                "return {}.fromDelegateForm(result);",
                ty.element().canonical_name()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;
    use jproxy_classfile::BaseType;

    fn signature(name: &str, params: Vec<JavaType>, ret: JavaType) -> MethodSignature {
        MethodSignature {
            name: name.to_string(),
            params: params.into_iter().map(TypeDescriptor::unloaded).collect(),
            ret: TypeDescriptor::unloaded(ret),
            declared_by: "t.Api".to_string(),
        }
    }

    fn point() -> JavaType {
        JavaType::Reference("com.acme.Point".to_string())
    }

    #[test]
    fn zero_argument_method() {
        let surface = CoreSurface::default();
        let emitter = MethodBodyEmitter::new(&surface, LookupKeys::Boxed);
        let mut out = SourceBuilder::new();
        emitter.emit(
            &mut out,
            &signature("size", vec![], JavaType::Primitive(BaseType::Int)),
        );
        let expected = [
            "    @Override",
            "    public int size() {",
            "        try {",
            "            Method m = handle.getClass().getMethod(\"size\");",
            "            Object result = m.invoke(handle);",
            "            return (java.lang.Integer) result;",
            "        } catch (Exception e) {",
            "            e.printStackTrace();",
            "            throw new RuntimeException(e);",
            "        }",
            "    }",
        ];
        assert_eq!(out.finish(), format!("{}\n", expected.join("\n")));
    }

    #[test]
    fn foreign_types_are_bridged() {
        let surface = CoreSurface::default();
        let emitter = MethodBodyEmitter::new(&surface, LookupKeys::Boxed);
        let mut out = SourceBuilder::new();
        emitter.emit(
            &mut out,
            &signature(
                "move",
                vec![point(), JavaType::Primitive(BaseType::Double)],
                point(),
            ),
        );
        let text = out.finish();
        assert!(text.contains("public com.acme.Point move(com.acme.Point val0, double val1) {"));
        assert!(text.contains(
            "getMethod(\"move\", loader.loadClass(\"com.acme.Point\"), java.lang.Double.class);"
        ));
        assert!(text.contains(
            "Object result = m.invoke(handle, com.acme.Point.toDelegateForm(val0), val1);"
        ));
        assert!(text.contains("return com.acme.Point.fromDelegateForm(result);"));
    }

    #[test]
    fn void_method_has_no_return() {
        let surface = CoreSurface::default();
        let emitter = MethodBodyEmitter::new(&surface, LookupKeys::Boxed);
        let mut out = SourceBuilder::new();
        emitter.emit(
            &mut out,
            &signature(
                "log",
                vec![JavaType::Reference("java.lang.String".into())],
                JavaType::Void,
            ),
        );
        let text = out.finish();
        assert!(text.contains("public void log(java.lang.String val0) {"));
        assert!(text.contains("getMethod(\"log\", java.lang.String.class);"));
        assert!(text.contains("            m.invoke(handle, val0);\n"));
        assert!(!text.contains("return"));
    }

    #[test]
    fn lookup_literals() {
        let surface = CoreSurface::default();
        let boxed = MethodBodyEmitter::new(&surface, LookupKeys::Boxed);
        let primitive = MethodBodyEmitter::new(&surface, LookupKeys::Primitive);
        let long = JavaType::Primitive(BaseType::Long);
        let bytes = JavaType::Array(Box::new(JavaType::Primitive(BaseType::Byte)));
        let points = JavaType::Array(Box::new(point()));
        let entry = JavaType::Reference("java.util.Map$Entry".into());

        assert_eq!(boxed.lookup_literal(&long), "java.lang.Long.class");
        assert_eq!(primitive.lookup_literal(&long), "long.class");
        assert_eq!(boxed.lookup_literal(&bytes), "byte[].class");
        assert_eq!(boxed.lookup_literal(&entry), "java.util.Map.Entry.class");
        assert_eq!(
            boxed.lookup_literal(&points),
            "Class.forName(\"[Lcom.acme.Point;\", false, loader)"
        );
    }

    #[test]
    fn results_per_type() {
        let surface = CoreSurface::default();
        let emitter = MethodBodyEmitter::new(&surface, LookupKeys::Boxed);
        let strings = JavaType::Array(Box::new(JavaType::Reference("java.lang.String".into())));
        assert_eq!(
            emitter.result(&JavaType::Primitive(BaseType::Boolean)).unwrap(),
            "return (java.lang.Boolean) result;"
        );
        assert_eq!(
            emitter.result(&strings).unwrap(),
            "return (java.lang.String[]) result;"
        );
        assert_eq!(
            emitter.result(&JavaType::Array(Box::new(point()))).unwrap(),
            "return com.acme.Point.fromDelegateForm(result);"
        );
        assert_eq!(emitter.result(&JavaType::Void), None);
        assert_eq!(emitter.argument(&point(), "val3"), "com.acme.Point.toDelegateForm(val3)");
    }
}
