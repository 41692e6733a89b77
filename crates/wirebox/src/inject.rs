//! Injectable trait and injection-point descriptors
//!
//! The injection pass does not reflect over struct layouts at runtime.
//! Each registered service instead describes its annotated fields once,
//! as a list of [`InjectionPoint`]s: a lookup key paired with a settable
//! slot reference. `#[derive(Injectable)]` builds that list from the
//! `#[inject]` field annotations; hand-written impls are equally valid.

use std::any::Any;
use std::sync::Arc;

/// A value whose annotated fields can be resolved from a registry.
///
/// Implemented via `#[derive(Injectable)]` on structs whose annotated
/// fields are [`Dep<T>`](crate::Dep) slots:
///
/// ```
/// use wirebox::{Dep, Injectable};
///
/// #[derive(Default, Injectable)]
/// struct Server {
///     // resolved from the binding named "listen_addr"
///     #[inject("listen_addr")]
///     addr: Dep<String>,
///     // resolved from the binding keyed by the target type name
///     #[inject]
///     limits: Dep<u32>,
///     // fields without the annotation are left alone
///     retries: usize,
/// }
/// ```
///
/// Types with no annotated fields still implement the trait (the derive
/// emits an empty list); registering them just makes them resolvable by
/// other services.
pub trait Injectable: Send + Sync {
    /// Injection points declared by this value, in field order.
    fn injection_points(&self) -> Vec<InjectionPoint<'_>>;
}

/// One annotated field: a lookup key plus the slot it resolves into.
pub struct InjectionPoint<'a> {
    key: Option<&'static str>,
    slot: &'a dyn InjectSlot,
}

impl<'a> InjectionPoint<'a> {
    /// A point resolved from an explicitly named binding.
    pub fn named(key: &'static str, slot: &'a dyn InjectSlot) -> Self {
        Self {
            key: Some(key),
            slot,
        }
    }

    /// A point resolved from the binding keyed by the slot's target type.
    pub fn by_type(slot: &'a dyn InjectSlot) -> Self {
        Self { key: None, slot }
    }

    /// The registry key this point resolves from.
    pub fn key(&self) -> &'static str {
        self.key.unwrap_or_else(|| self.slot.target_type_name())
    }

    pub(crate) fn slot(&self) -> &dyn InjectSlot {
        self.slot
    }
}

/// A settable field reference the injection pass can assign into.
///
/// Implemented by [`Dep<T>`](crate::Dep); the trait exists so injection
/// points can be stored and walked without knowing the target type.
pub trait InjectSlot: Send + Sync {
    /// Fully-qualified name of the type the slot accepts; doubles as the
    /// default lookup key for unnamed annotations.
    fn target_type_name(&self) -> &'static str;

    /// Try to store `value`. Hands the value back when its concrete type
    /// does not match the slot's target type.
    fn fill(
        &self,
        value: Arc<dyn Any + Send + Sync>,
    ) -> std::result::Result<(), Arc<dyn Any + Send + Sync>>;
}
