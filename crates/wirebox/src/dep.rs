//! `Dep<T>` - typed injection slot
//!
//! A `Dep<T>` is the field type that receives a dependency during an
//! injection pass. It wraps the current resolution in an `RwLock`, so the
//! pass can assign through a shared reference and a later pass can replace
//! the handle when the registry binding was re-bound in between.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::inject::InjectSlot;

/// An injection slot holding at most one shared handle to a `T`.
///
/// Unresolved slots read as `None`; that is the zero value a field keeps
/// when its dependency is missing from the registry.
pub struct Dep<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> Dep<T> {
    /// Create an empty, unresolved slot.
    pub fn empty() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Current resolution, if the slot has been filled.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether an injection pass has resolved this slot.
    pub fn is_resolved(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn store(&self, value: Arc<T>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }
}

impl<T> Default for Dep<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// Manual impl: cloning a slot snapshots the current handle and must not
// require `T: Clone`.
impl<T> Clone for Dep<T> {
    fn clone(&self) -> Self {
        Self {
            slot: RwLock::new(self.get()),
        }
    }
}

impl<T> fmt::Debug for Dep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_resolved() {
            "resolved"
        } else {
            "empty"
        };
        write!(f, "Dep<{}>({state})", std::any::type_name::<T>())
    }
}

impl<T: Any + Send + Sync> InjectSlot for Dep<T> {
    fn target_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn fill(
        &self,
        value: Arc<dyn Any + Send + Sync>,
    ) -> std::result::Result<(), Arc<dyn Any + Send + Sync>> {
        let typed = value.downcast::<T>()?;
        self.store(typed);
        Ok(())
    }
}
