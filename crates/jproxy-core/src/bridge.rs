//! Bridging capability checks for foreign types
//!
//! A foreign parameter of type `T` (element type `E`) needs a static
//! `E.toDelegateForm(T)`; a foreign return type `T` needs
//! `static T E.fromDelegateForm(Object)`. Both are looked up on the class
//! file of `E` before any source is emitted.
//!
//! Limitation: Java overloads cannot differ only by return type, so `E` can
//! declare only one `fromDelegateForm(Object)`. An interface returning both
//! `E` and `E[]` therefore cannot be bridged, and verification reports the
//! second of the two as missing. `toDelegateForm` has no such limit, since
//! `toDelegateForm(E)` and `toDelegateForm(E[])` are distinct overloads.

use crate::error::{BridgeOperation, GenerateError};
use crate::resolver::TypeResolver;
use crate::surface::CoreSurface;
use crate::types::{JavaType, MethodSignature};
use jproxy_classfile::{AccessFlags, ClassFile, MethodDescriptor, ReturnType};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

const OBJECT_DESCRIPTOR: &str = "Ljava/lang/Object;";

/// Verifies that every foreign type in a method list can be bridged
pub struct BridgeVerifier<'a> {
    resolver: &'a TypeResolver,
    surface: &'a CoreSurface,
}

impl<'a> BridgeVerifier<'a> {
    /// Foreign element types are loaded through `resolver`
    pub fn new(resolver: &'a TypeResolver, surface: &'a CoreSurface) -> Self {
        Self { resolver, surface }
    }

    /// Fail on the first missing bridge operation
    pub fn verify(&self, methods: &[MethodSignature]) -> Result<(), GenerateError> {
        let mut loaded: FxHashMap<String, ClassFile> = FxHashMap::default();

        for method in methods {
            for (index, param) in method.params.iter().enumerate() {
                if self.surface.is_foreign(&param.ty) {
                    let usage = format!("parameter {} of {}", index, method.name);
                    self.require(&mut loaded, &param.ty, BridgeOperation::ToDelegateForm, usage)?;
                }
            }
            if self.surface.is_foreign(&method.ret.ty) {
                let usage = format!("the return value of {}", method.name);
                self.require(
                    &mut loaded,
                    &method.ret.ty,
                    BridgeOperation::FromDelegateForm,
                    usage,
                )?;
            }
        }
        Ok(())
    }

    fn require(
        &self,
        loaded: &mut FxHashMap<String, ClassFile>,
        ty: &JavaType,
        operation: BridgeOperation,
        usage: String,
    ) -> Result<(), GenerateError> {
        let class = match loaded.entry(ty.element().binary_name()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let class = self.resolver.resolve(entry.key())?.class;
                entry.insert(class)
            }
        };

        let descriptor = ty.descriptor();
        let found = class
            .methods_named(&operation.to_string())
            .filter(|m| m.access.contains(AccessFlags::STATIC))
            .filter_map(|m| MethodDescriptor::parse(&m.descriptor).ok())
            .any(|d| matches_operation(&d, operation, &descriptor));

        if found {
            tracing::debug!(ty = %ty, %operation, "bridge verified");
            Ok(())
        } else {
            Err(GenerateError::MissingBridge {
                type_name: ty.element().canonical_name(),
                operation,
                usage,
            })
        }
    }
}

fn matches_operation(desc: &MethodDescriptor, operation: BridgeOperation, ty: &str) -> bool {
    if desc.params.len() != 1 {
        return false;
    }
    match operation {
        BridgeOperation::ToDelegateForm => desc.params[0].to_string() == ty,
        BridgeOperation::FromDelegateForm => {
            desc.params[0].to_string() == OBJECT_DESCRIPTOR
                && matches!(&desc.ret, ReturnType::Value(ret) if ret.to_string() == ty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_shapes() {
        let to = MethodDescriptor::parse("(Lcom/acme/Point;)Ljava/lang/Object;").unwrap();
        let from = MethodDescriptor::parse("(Ljava/lang/Object;)Lcom/acme/Point;").unwrap();
        let point = "Lcom/acme/Point;";

        assert!(matches_operation(&to, BridgeOperation::ToDelegateForm, point));
        assert!(!matches_operation(&to, BridgeOperation::FromDelegateForm, point));
        assert!(matches_operation(&from, BridgeOperation::FromDelegateForm, point));
        assert!(!matches_operation(&from, BridgeOperation::ToDelegateForm, point));

        let two = MethodDescriptor::parse("(Lcom/acme/Point;I)V").unwrap();
        assert!(!matches_operation(&two, BridgeOperation::ToDelegateForm, point));
    }

    #[test]
    fn array_bridges_match_the_array_descriptor() {
        let from = MethodDescriptor::parse("(Ljava/lang/Object;)[Lcom/acme/Point;").unwrap();
        assert!(matches_operation(
            &from,
            BridgeOperation::FromDelegateForm,
            "[Lcom/acme/Point;"
        ));
        assert!(!matches_operation(
            &from,
            BridgeOperation::FromDelegateForm,
            "Lcom/acme/Point;"
        ));
    }

    #[test]
    fn array_and_scalar_parameters_use_separate_overloads() {
        let scalar = MethodDescriptor::parse("(Lcom/acme/Point;)Ljava/lang/Object;").unwrap();
        let array = MethodDescriptor::parse("([Lcom/acme/Point;)Ljava/lang/Object;").unwrap();
        assert!(matches_operation(&scalar, BridgeOperation::ToDelegateForm, "Lcom/acme/Point;"));
        assert!(!matches_operation(&scalar, BridgeOperation::ToDelegateForm, "[Lcom/acme/Point;"));
        assert!(matches_operation(&array, BridgeOperation::ToDelegateForm, "[Lcom/acme/Point;"));
    }
}
