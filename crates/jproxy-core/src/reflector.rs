//! Interface method enumeration
//!
//! Walks the target interface and then its superinterfaces depth first,
//! in `interfaces` table order, collecting every public instance method.
//! A (name, parameter descriptor) pair is reported once. When two
//! interfaces declare it with different return types, the declaration whose
//! return type is a subtype of the other's wins, so the emitted method
//! overrides every inherited declaration.

use crate::error::{GenerateError, LoadError};
use crate::resolver::{ResolvedType, TypeResolver};
use crate::types::{JavaType, MethodSignature, TypeDescriptor};
use jproxy_classfile::{AccessFlags, ClassFile, ClassKind, MethodDescriptor};
use rustc_hash::{FxHashMap, FxHashSet};

/// Enumerates the method surface of an interface
pub struct InterfaceReflector<'a> {
    resolver: &'a TypeResolver,
}

impl<'a> InterfaceReflector<'a> {
    /// Superinterfaces are loaded through `resolver`
    pub fn new(resolver: &'a TypeResolver) -> Self {
        Self { resolver }
    }

    /// Method signatures of `target`, which must be an interface
    pub fn reflect(&self, target: &ResolvedType) -> Result<Vec<MethodSignature>, GenerateError> {
        let kind = target.class.kind();
        if kind != ClassKind::Interface {
            return Err(GenerateError::UnsupportedShape {
                name: target.descriptor.canonical_name.clone(),
                kind,
            });
        }

        let mut walk = Walk::default();
        walk.visited.insert(target.class.this_class.clone());
        self.collect(&target.class, &target.descriptor.canonical_name, &mut walk)?;
        Ok(walk.methods)
    }

    fn collect(
        &self,
        class: &ClassFile,
        declared_by: &str,
        walk: &mut Walk,
    ) -> Result<(), GenerateError> {
        for method in &class.methods {
            if !is_proxied(method.access, &method.name) {
                continue;
            }
            let descriptor = MethodDescriptor::parse(&method.descriptor).map_err(|_| {
                LoadError::BadDescriptor {
                    owner: declared_by.to_string(),
                    descriptor: method.descriptor.clone(),
                }
            })?;
            let signature = MethodSignature {
                name: method.name.clone(),
                params: descriptor
                    .params
                    .iter()
                    .map(|p| TypeDescriptor::unloaded(JavaType::from_field_type(p)))
                    .collect(),
                ret: TypeDescriptor::unloaded(JavaType::from_return_type(&descriptor.ret)),
                declared_by: declared_by.to_string(),
            };
            let key = (method.name.clone(), descriptor.params_descriptor());
            match walk.seen.get(&key) {
                Some(&index) => {
                    let existing = &walk.methods[index].ret.ty;
                    if existing != &signature.ret.ty
                        && self.is_subtype(&signature.ret.ty, existing)
                    {
                        tracing::debug!(method = %method.name, declared_by, "narrower return type replaces inherited declaration");
                        walk.methods[index] = signature;
                    }
                }
                None => {
                    tracing::debug!(method = %method.name, descriptor = %method.descriptor, declared_by, "reflected method");
                    walk.seen.insert(key, walk.methods.len());
                    walk.methods.push(signature);
                }
            }
        }

        for parent in &class.interfaces {
            if !walk.visited.insert(parent.clone()) {
                continue;
            }
            let resolved = self.resolver.resolve(&parent.replace('/', "."))?;
            self.collect(&resolved.class, &resolved.descriptor.canonical_name, walk)?;
        }
        Ok(())
    }

    /// Reference widening between return types
    ///
    /// A type that cannot be loaded is not known to be a subtype of anything
    /// but `java.lang.Object`.
    fn is_subtype(&self, sub: &JavaType, sup: &JavaType) -> bool {
        if sub == sup {
            return true;
        }
        match (sub, sup) {
            (JavaType::Reference(_) | JavaType::Array(_), JavaType::Reference(name)) => {
                name == "java.lang.Object"
                    || matches!(sub, JavaType::Reference(sub) if self.extends(sub, name, &mut FxHashSet::default()))
            }
            (JavaType::Array(sub), JavaType::Array(sup)) => {
                !sub.is_primitive() && !sup.is_primitive() && self.is_subtype(sub, sup)
            }
            _ => false,
        }
    }

    fn extends(&self, sub: &str, sup: &str, visited: &mut FxHashSet<String>) -> bool {
        if !visited.insert(sub.to_string()) {
            return false;
        }
        let class = match self.resolver.resolve(sub) {
            Ok(resolved) => resolved.class,
            Err(err) => {
                tracing::debug!(ty = sub, error = %err, "cannot load return type for subtype check");
                return false;
            }
        };
        class
            .super_class
            .iter()
            .chain(&class.interfaces)
            .map(|parent| parent.replace('/', "."))
            .any(|parent| parent == sup || self.extends(&parent, sup, visited))
    }
}

#[derive(Default)]
struct Walk {
    methods: Vec<MethodSignature>,
    seen: FxHashMap<(String, String), usize>,
    visited: FxHashSet<String>,
}

fn is_proxied(access: AccessFlags, name: &str) -> bool {
    access.contains(AccessFlags::PUBLIC)
        && !access.contains(AccessFlags::STATIC)
        && !access.contains(AccessFlags::SYNTHETIC)
        && !access.contains(AccessFlags::BRIDGE)
        && !name.starts_with('<')
}
