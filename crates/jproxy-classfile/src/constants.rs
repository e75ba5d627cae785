//! Constant pool
//!
//! Only the entry kinds the reflector needs are kept with their payload
//! (`Utf8` and `Class`). Every other tag is sized and skipped so that
//! indices stay aligned; `Long`/`Double` take two slots.

use crate::class::ClassFileError;
use crate::encoder::{encode_modified_utf8, ClassReader, ClassWriter};

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

/// A single constant pool slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// Slot 0 and the upper half of `Long`/`Double`
    Unusable,
    /// `CONSTANT_Utf8`
    Utf8(String),
    /// `CONSTANT_Class` pointing at a `Utf8` internal name
    Class(u16),
    /// Any entry kind not needed for reflection, by tag
    Other(u8),
}

/// Indexed constant pool (index 0 is never valid)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            entries: vec![Constant::Unusable],
        }
    }

    /// `constant_pool_count` as written in the class file
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Look up a raw entry
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(index as usize)
    }

    /// Resolve a `Utf8` entry
    pub fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index) {
            Some(Constant::Utf8(text)) => Ok(text),
            _ => Err(ClassFileError::BadConstantIndex {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Resolve a `Class` entry to its internal name
    pub fn class_name(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            _ => Err(ClassFileError::BadConstantIndex {
                index,
                expected: "Class",
            }),
        }
    }

    /// Resolve an optional `Class` entry (index 0 means absent)
    pub fn optional_class_name(&self, index: u16) -> Result<Option<&str>, ClassFileError> {
        if index == 0 {
            Ok(None)
        } else {
            self.class_name(index).map(Some)
        }
    }

    /// Resolve an optional `Utf8` entry (index 0 means absent)
    pub fn optional_utf8(&self, index: u16) -> Result<Option<&str>, ClassFileError> {
        if index == 0 {
            Ok(None)
        } else {
            self.utf8(index).map(Some)
        }
    }

    /// Intern a `Utf8` entry, returning its index
    pub fn add_utf8(&mut self, text: &str) -> u16 {
        let existing = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Constant::Utf8(t) if t == text));
        match existing {
            Some(index) => index as u16,
            None => self.push(Constant::Utf8(text.to_string())),
        }
    }

    /// Intern a `Class` entry for an internal name, returning its index
    pub fn add_class(&mut self, internal_name: &str) -> u16 {
        let name_index = self.add_utf8(internal_name);
        let existing = self
            .entries
            .iter()
            .position(|entry| *entry == Constant::Class(name_index));
        match existing {
            Some(index) => index as u16,
            None => self.push(Constant::Class(name_index)),
        }
    }

    fn push(&mut self, constant: Constant) -> u16 {
        self.entries.push(constant);
        (self.entries.len() - 1) as u16
    }

    /// Decode the pool starting at `constant_pool_count`
    pub fn decode(reader: &mut ClassReader<'_>) -> Result<Self, ClassFileError> {
        let count = reader.read_u16()? as usize;
        let mut pool = Self {
            entries: Vec::with_capacity(count.max(1)),
        };
        pool.entries.push(Constant::Unusable);

        while pool.entries.len() < count {
            let index = pool.entries.len() as u16;
            let tag = reader.read_u8()?;
            match tag {
                TAG_UTF8 => {
                    let text = reader.read_modified_utf8()?;
                    pool.entries.push(Constant::Utf8(text));
                }
                TAG_CLASS => {
                    let name_index = reader.read_u16()?;
                    pool.entries.push(Constant::Class(name_index));
                }
                TAG_LONG | TAG_DOUBLE => {
                    reader.skip(8)?;
                    pool.entries.push(Constant::Other(tag));
                    pool.entries.push(Constant::Unusable);
                }
                TAG_INTEGER | TAG_FLOAT | TAG_FIELDREF | TAG_METHODREF
                | TAG_INTERFACE_METHODREF | TAG_NAME_AND_TYPE | TAG_DYNAMIC
                | TAG_INVOKE_DYNAMIC => {
                    reader.skip(4)?;
                    pool.entries.push(Constant::Other(tag));
                }
                TAG_METHOD_HANDLE => {
                    reader.skip(3)?;
                    pool.entries.push(Constant::Other(tag));
                }
                TAG_STRING | TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                    reader.skip(2)?;
                    pool.entries.push(Constant::Other(tag));
                }
                _ => return Err(ClassFileError::UnknownConstantTag { tag, index }),
            }
        }

        if pool.entries.len() != count {
            // A Long/Double occupied the final slot and overflowed the count
            return Err(ClassFileError::BadConstantIndex {
                index: count as u16,
                expected: "pool entry within constant_pool_count",
            });
        }
        Ok(pool)
    }

    /// Encode the pool, including `constant_pool_count`
    ///
    /// Only `Utf8` and `Class` entries can be encoded; the builder never
    /// creates anything else.
    pub fn encode(&self, writer: &mut ClassWriter) {
        writer.emit_u16(self.entries.len() as u16);
        for entry in &self.entries[1..] {
            match entry {
                Constant::Utf8(text) => {
                    let bytes = encode_modified_utf8(text);
                    writer.emit_u8(TAG_UTF8);
                    writer.emit_u16(bytes.len() as u16);
                    writer.emit_bytes(&bytes);
                }
                Constant::Class(name_index) => {
                    writer.emit_u8(TAG_CLASS);
                    writer.emit_u16(*name_index);
                }
                Constant::Unusable | Constant::Other(_) => {}
            }
        }
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_reuses_entries() {
        let mut pool = ConstantPool::new();
        let a = pool.add_class("com/acme/Sized");
        let b = pool.add_class("com/acme/Sized");
        let utf = pool.add_utf8("com/acme/Sized");
        assert_eq!(a, b);
        assert_eq!(pool.class_name(a).unwrap(), "com/acme/Sized");
        assert_eq!(pool.utf8(utf).unwrap(), "com/acme/Sized");
        assert_eq!(pool.count(), 3);
    }

    #[test]
    fn wrong_kind_is_reported() {
        let mut pool = ConstantPool::new();
        let utf = pool.add_utf8("size");
        assert!(matches!(
            pool.class_name(utf),
            Err(ClassFileError::BadConstantIndex { expected: "Class", .. })
        ));
        assert!(pool.utf8(0).is_err());
        assert_eq!(pool.optional_class_name(0).unwrap(), None);
    }

    #[test]
    fn decode_skips_wide_and_unused_entries() {
        let mut writer = ClassWriter::new();
        writer.emit_u16(6); // entries 1..=5
        writer.emit_u8(TAG_LONG); // slots 1 and 2
        writer.emit_bytes(&[0; 8]);
        writer.emit_u8(TAG_METHOD_HANDLE); // slot 3
        writer.emit_bytes(&[1, 0, 4]);
        writer.emit_u8(TAG_UTF8); // slot 4
        writer.emit_u16(3);
        writer.emit_bytes(b"Foo");
        writer.emit_u8(TAG_CLASS); // slot 5
        writer.emit_u16(4);

        let bytes = writer.into_bytes();
        let mut reader = ClassReader::new(&bytes);
        let pool = ConstantPool::decode(&mut reader).unwrap();
        assert_eq!(pool.get(2), Some(&Constant::Unusable));
        assert_eq!(pool.get(3), Some(&Constant::Other(TAG_METHOD_HANDLE)));
        assert_eq!(pool.class_name(5).unwrap(), "Foo");
        assert!(!reader.has_more());
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        let bytes = [0x00, 0x02, 0x63];
        let mut reader = ClassReader::new(&bytes);
        assert!(matches!(
            ConstantPool::decode(&mut reader),
            Err(ClassFileError::UnknownConstantTag { tag: 0x63, index: 1 })
        ));
    }
}
