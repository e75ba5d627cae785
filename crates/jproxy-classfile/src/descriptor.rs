//! Field and method descriptors (JVMS §4.3)
//!
//! Descriptors are the erased type strings stored in the constant pool,
//! e.g. `(ILjava/lang/String;[J)V`. Object types keep their internal
//! (slash separated) name; conversion to source names happens in the
//! generator, which knows about nested classes.

use std::fmt;
use thiserror::Error;

/// Errors produced while parsing a descriptor
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// Descriptor ended in the middle of a type
    #[error("Truncated descriptor: {0}")]
    Truncated(String),

    /// Character that cannot start a type
    #[error("Unexpected character {found:?} at offset {offset} in descriptor {descriptor}")]
    UnexpectedChar {
        /// Full descriptor text
        descriptor: String,
        /// Offending character
        found: char,
        /// Byte offset
        offset: usize,
    },

    /// Trailing characters after a complete descriptor
    #[error("Trailing characters in descriptor: {0}")]
    Trailing(String),
}

/// JVM primitive (base) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
}

impl BaseType {
    fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    /// Descriptor character
    pub fn tag(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    /// Java source keyword
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }

    /// Canonical name of the wrapper class
    pub fn boxed(self) -> &'static str {
        match self {
            BaseType::Byte => "java.lang.Byte",
            BaseType::Char => "java.lang.Character",
            BaseType::Double => "java.lang.Double",
            BaseType::Float => "java.lang.Float",
            BaseType::Int => "java.lang.Integer",
            BaseType::Long => "java.lang.Long",
            BaseType::Short => "java.lang.Short",
            BaseType::Boolean => "java.lang.Boolean",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A field type: primitive, object or array
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Primitive
    Base(BaseType),
    /// Object type by internal name (`java/lang/String`)
    Object(String),
    /// Array of the component type
    Array(Box<FieldType>),
}

impl FieldType {
    /// Parse a complete field descriptor
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut cursor = Cursor::new(descriptor);
        let ty = cursor.field_type()?;
        cursor.finish()?;
        Ok(ty)
    }

    /// Innermost non-array type
    pub fn element(&self) -> &FieldType {
        match self {
            FieldType::Array(component) => component.element(),
            other => other,
        }
    }

    /// Number of array dimensions (0 for non-arrays)
    pub fn dimensions(&self) -> usize {
        match self {
            FieldType::Array(component) => 1 + component.dimensions(),
            _ => 0,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{}", base.tag()),
            FieldType::Object(name) => write!(f, "L{};", name),
            FieldType::Array(component) => write!(f, "[{}", component),
        }
    }
}

/// Method return type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// `V`
    Void,
    /// Any field type
    Value(FieldType),
}

/// A parsed method descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub params: Vec<FieldType>,
    /// Return type
    pub ret: ReturnType,
}

impl MethodDescriptor {
    /// Parse a complete method descriptor
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut cursor = Cursor::new(descriptor);
        cursor.expect(b'(')?;
        let mut params = Vec::new();
        while cursor.peek()? != b')' {
            params.push(cursor.field_type()?);
        }
        cursor.expect(b')')?;
        let ret = if cursor.peek()? == b'V' {
            cursor.bump();
            ReturnType::Void
        } else {
            ReturnType::Value(cursor.field_type()?)
        };
        cursor.finish()?;
        Ok(Self { params, ret })
    }

    /// The parameter part only, e.g. `(ILjava/lang/String;)`
    pub fn params_descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.to_string());
        }
        out.push(')');
        out
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.params_descriptor())?;
        match &self.ret {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Value(ty) => write!(f, "{}", ty),
        }
    }
}

struct Cursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn peek(&self) -> Result<u8, DescriptorError> {
        self.text
            .as_bytes()
            .get(self.position)
            .copied()
            .ok_or_else(|| DescriptorError::Truncated(self.text.to_string()))
    }

    fn bump(&mut self) {
        self.position += 1;
    }

    fn unexpected(&self) -> DescriptorError {
        let found = self.text[self.position..].chars().next().unwrap_or('\0');
        DescriptorError::UnexpectedChar {
            descriptor: self.text.to_string(),
            found,
            offset: self.position,
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), DescriptorError> {
        if self.peek()? != byte {
            return Err(self.unexpected());
        }
        self.bump();
        Ok(())
    }

    fn field_type(&mut self) -> Result<FieldType, DescriptorError> {
        let tag = self.peek()?;
        if let Some(base) = BaseType::from_tag(tag) {
            self.bump();
            return Ok(FieldType::Base(base));
        }
        match tag {
            b'L' => {
                self.bump();
                let rest = &self.text[self.position..];
                let end = rest
                    .find(';')
                    .ok_or_else(|| DescriptorError::Truncated(self.text.to_string()))?;
                if end == 0 {
                    return Err(self.unexpected());
                }
                let name = rest[..end].to_string();
                self.position += end + 1;
                Ok(FieldType::Object(name))
            }
            b'[' => {
                self.bump();
                Ok(FieldType::Array(Box::new(self.field_type()?)))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn finish(&self) -> Result<(), DescriptorError> {
        if self.position == self.text.len() {
            Ok(())
        } else {
            Err(DescriptorError::Trailing(self.text.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_method_descriptor() {
        let desc = MethodDescriptor::parse("(ILjava/lang/String;[[J)Ljava/util/List;").unwrap();
        assert_eq!(
            desc.params,
            vec![
                FieldType::Base(BaseType::Int),
                FieldType::Object("java/lang/String".into()),
                FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Base(
                    BaseType::Long
                ))))),
            ]
        );
        assert_eq!(
            desc.ret,
            ReturnType::Value(FieldType::Object("java/util/List".into()))
        );
        assert_eq!(desc.to_string(), "(ILjava/lang/String;[[J)Ljava/util/List;");
        assert_eq!(desc.params_descriptor(), "(ILjava/lang/String;[[J)");
    }

    #[test]
    fn unterminated_class_name_is_truncated() {
        assert!(matches!(
            MethodDescriptor::parse("(ILjava/lang/String"),
            Err(DescriptorError::Truncated(_))
        ));
    }

    #[test]
    fn parses_void_no_args() {
        let desc = MethodDescriptor::parse("()V").unwrap();
        assert!(desc.params.is_empty());
        assert_eq!(desc.ret, ReturnType::Void);
    }

    #[test]
    fn void_is_not_a_parameter_type() {
        let err = MethodDescriptor::parse("(V)V").unwrap_err();
        assert_eq!(
            err,
            DescriptorError::UnexpectedChar {
                descriptor: "(V)V".into(),
                found: 'V',
                offset: 1
            }
        );
    }

    #[test]
    fn rejects_trailing_and_empty_class_name() {
        assert!(matches!(
            MethodDescriptor::parse("()VX"),
            Err(DescriptorError::Trailing(_))
        ));
        assert!(matches!(
            FieldType::parse("L;"),
            Err(DescriptorError::UnexpectedChar { offset: 1, .. })
        ));
    }

    #[test]
    fn array_element_and_dimensions() {
        let ty = FieldType::parse("[[Lcom/acme/Point;").unwrap();
        assert_eq!(ty.dimensions(), 2);
        assert_eq!(ty.element(), &FieldType::Object("com/acme/Point".into()));
        assert_eq!(FieldType::Base(BaseType::Int).dimensions(), 0);
    }

    #[test]
    fn base_type_names() {
        assert_eq!(BaseType::Char.keyword(), "char");
        assert_eq!(BaseType::Char.boxed(), "java.lang.Character");
        assert_eq!(BaseType::Boolean.tag(), 'Z');
    }
}
