//! Type descriptors and method signatures seen by the generator

use jproxy_classfile::{BaseType, ClassKind, FieldType, ReturnType};
use std::fmt;
use std::path::PathBuf;

/// Where a loaded type came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadingContext {
    /// The host class path
    Host,
    /// The caller-supplied archive
    Archive(PathBuf),
}

impl fmt::Display for LoadingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingContext::Host => write!(f, "host"),
            LoadingContext::Archive(path) => write!(f, "archive {}", path.display()),
        }
    }
}

/// An erased Java type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    /// `void` (return position only)
    Void,
    /// Primitive
    Primitive(BaseType),
    /// Class or interface by binary name (`java.util.Map$Entry`)
    Reference(String),
    /// Array of the component type
    Array(Box<JavaType>),
}

impl JavaType {
    /// Convert a descriptor field type
    pub fn from_field_type(ty: &FieldType) -> Self {
        match ty {
            FieldType::Base(base) => JavaType::Primitive(*base),
            FieldType::Object(internal) => JavaType::Reference(internal.replace('/', ".")),
            FieldType::Array(component) => {
                JavaType::Array(Box::new(JavaType::from_field_type(component)))
            }
        }
    }

    /// Convert a descriptor return type
    pub fn from_return_type(ty: &ReturnType) -> Self {
        match ty {
            ReturnType::Void => JavaType::Void,
            ReturnType::Value(field) => JavaType::from_field_type(field),
        }
    }

    /// Innermost non-array type
    pub fn element(&self) -> &JavaType {
        match self {
            JavaType::Array(component) => component.element(),
            other => other,
        }
    }

    /// Array depth
    pub fn dimensions(&self) -> usize {
        match self {
            JavaType::Array(component) => 1 + component.dimensions(),
            _ => 0,
        }
    }

    /// Name understood by `ClassLoader.loadClass` / `Class.forName`
    ///
    /// Arrays use the JVM form (`[Lcom.acme.Point;`).
    pub fn binary_name(&self) -> String {
        match self {
            JavaType::Void => "void".to_string(),
            JavaType::Primitive(base) => base.keyword().to_string(),
            JavaType::Reference(name) => name.clone(),
            JavaType::Array(_) => {
                let mut out = "[".repeat(self.dimensions());
                match self.element() {
                    JavaType::Primitive(base) => out.push(base.tag()),
                    JavaType::Reference(name) => {
                        out.push('L');
                        out.push_str(name);
                        out.push(';');
                    }
                    JavaType::Void | JavaType::Array(_) => {}
                }
                out
            }
        }
    }

    /// Name as written in Java source (`java.util.Map.Entry`, `int[]`)
    pub fn canonical_name(&self) -> String {
        match self {
            JavaType::Void => "void".to_string(),
            JavaType::Primitive(base) => base.keyword().to_string(),
            JavaType::Reference(name) => canonical_from_binary(name),
            JavaType::Array(component) => format!("{}[]", component.canonical_name()),
        }
    }

    /// JVM descriptor (`I`, `Ljava/lang/String;`, `[J`, `V`)
    pub fn descriptor(&self) -> String {
        match self {
            JavaType::Void => "V".to_string(),
            JavaType::Primitive(base) => base.tag().to_string(),
            JavaType::Reference(name) => format!("L{};", name.replace('.', "/")),
            JavaType::Array(component) => format!("[{}", component.descriptor()),
        }
    }

    /// True for `void`
    pub fn is_void(&self) -> bool {
        matches!(self, JavaType::Void)
    }

    /// True for primitives (not `void`, not arrays)
    pub fn is_primitive(&self) -> bool {
        matches!(self, JavaType::Primitive(_))
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Nested member types use `$` in binary names; source uses `.`.
///
/// Segments after a `$` that start with a digit belong to local or
/// anonymous classes, which have no canonical name; the binary name is
/// kept for those.
fn canonical_from_binary(binary: &str) -> String {
    let mut segments = binary.split('$');
    let mut out = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        let nested_member = segment
            .chars()
            .next()
            .is_some_and(|c| !c.is_ascii_digit());
        out.push(if nested_member { '.' } else { '$' });
        out.push_str(segment);
    }
    out
}

/// Resolved identity of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Erased type
    pub ty: JavaType,
    /// Source name, e.g. `com.acme.Outer.Listener`
    pub canonical_name: String,
    /// Simple name, e.g. `Listener`
    pub simple_name: String,
    /// Declared shape, known only for types read from a class file
    pub kind: Option<ClassKind>,
    /// Strategy entry that produced the class file, if one was read
    pub context: Option<LoadingContext>,
}

impl TypeDescriptor {
    /// Describe a type from a descriptor without loading it
    pub fn unloaded(ty: JavaType) -> Self {
        let canonical_name = ty.canonical_name();
        let simple_name = simple_name_of(&canonical_name).to_string();
        Self {
            ty,
            canonical_name,
            simple_name,
            kind: None,
            context: None,
        }
    }

    /// True when the type was read and declares an interface
    pub fn is_interface(&self) -> bool {
        self.kind == Some(ClassKind::Interface)
    }

    /// True for primitive types
    pub fn is_primitive(&self) -> bool {
        self.ty.is_primitive()
    }

    /// True for `void`
    pub fn is_void(&self) -> bool {
        self.ty.is_void()
    }
}

fn simple_name_of(canonical: &str) -> &str {
    let base = canonical.trim_end_matches("[]");
    let start = base.rfind('.').map_or(0, |dot| dot + 1);
    &canonical[start..]
}

/// A method on the proxied interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Parameter types in order
    pub params: Vec<TypeDescriptor>,
    /// Return type
    pub ret: TypeDescriptor,
    /// Canonical name of the interface that declares it
    pub declared_by: String,
}

impl MethodSignature {
    /// Ordering key used when methods are sorted
    pub fn sort_key(&self) -> (String, Vec<String>) {
        (
            self.name.clone(),
            self.params.iter().map(|p| p.canonical_name.clone()).collect(),
        )
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret.canonical_name, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.canonical_name)?;
        }
        f.write_str(")")
    }
}

/// Package clause of the generated class
///
/// `None` omits the clause entirely; `Named("")` is an explicitly empty
/// package and is emitted as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PackageName {
    /// No package clause
    #[default]
    None,
    /// `package <name>;`
    Named(String),
}

impl PackageName {
    /// Wrap an optional CLI/config value
    pub fn from_option(value: Option<String>) -> Self {
        value.map_or(PackageName::None, PackageName::Named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_and_anonymous_canonical_names() {
        let entry = JavaType::Reference("java.util.Map$Entry".into());
        assert_eq!(entry.canonical_name(), "java.util.Map.Entry");
        assert_eq!(entry.binary_name(), "java.util.Map$Entry");

        let anon = JavaType::Reference("com.acme.Outer$1".into());
        assert_eq!(anon.canonical_name(), "com.acme.Outer$1");
    }

    #[test]
    fn array_names() {
        let ints = JavaType::from_field_type(&FieldType::parse("[[I").unwrap());
        assert_eq!(ints.canonical_name(), "int[][]");
        assert_eq!(ints.binary_name(), "[[I");

        let points = JavaType::from_field_type(&FieldType::parse("[Lcom/acme/Point;").unwrap());
        assert_eq!(points.canonical_name(), "com.acme.Point[]");
        assert_eq!(points.binary_name(), "[Lcom.acme.Point;");
        assert_eq!(points.element(), &JavaType::Reference("com.acme.Point".into()));
        assert_eq!(points.descriptor(), "[Lcom/acme/Point;");
        assert_eq!(JavaType::Void.descriptor(), "V");
    }

    #[test]
    fn unloaded_descriptor_names() {
        let desc = TypeDescriptor::unloaded(JavaType::Reference("com.acme.Point".into()));
        assert_eq!(desc.simple_name, "Point");
        assert_eq!(desc.kind, None);
        assert!(!desc.is_interface());

        let arr = TypeDescriptor::unloaded(JavaType::Array(Box::new(JavaType::Reference(
            "com.acme.Point".into(),
        ))));
        assert_eq!(arr.simple_name, "Point[]");

        let int = TypeDescriptor::unloaded(JavaType::Primitive(BaseType::Int));
        assert_eq!(int.simple_name, "int");
        assert!(int.is_primitive());
    }

    #[test]
    fn package_sentinel_differs_from_empty() {
        assert_eq!(PackageName::from_option(None), PackageName::None);
        assert_eq!(
            PackageName::from_option(Some(String::new())),
            PackageName::Named(String::new())
        );
        assert_ne!(PackageName::None, PackageName::Named(String::new()));
    }

    #[test]
    fn signature_display() {
        let sig = MethodSignature {
            name: "add".into(),
            params: vec![
                TypeDescriptor::unloaded(JavaType::Primitive(BaseType::Int)),
                TypeDescriptor::unloaded(JavaType::Primitive(BaseType::Int)),
            ],
            ret: TypeDescriptor::unloaded(JavaType::Primitive(BaseType::Int)),
            declared_by: "com.acme.Adder".into(),
        };
        assert_eq!(sig.to_string(), "int add(int, int)");
    }
}
