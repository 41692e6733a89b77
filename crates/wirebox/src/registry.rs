//! Keyed service registry and the injection pass
//!
//! ## Locking
//!
//! One reader/writer lock guards the whole key-to-binding map. Readers
//! (`get`, `service*`, `services*`, introspection) share the lock; writers
//! (`set`, `apply*`, `inject`) take it exclusively. `inject` holds the
//! exclusive lock for its entire scan-and-assign pass, so a pass never
//! interleaves with concurrent registration. Internal helpers operate on an
//! already-held guard; no call path acquires the lock twice.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::inject::Injectable;

/// One key's association with a stored value.
struct Binding {
    /// The shared handle placed in the registry. Never copied; lifetime is
    /// the longest-lived holder, not the registry.
    value: Arc<dyn Any + Send + Sync>,
    /// Concrete type stored under the key, captured at registration for
    /// mismatch diagnostics.
    type_name: &'static str,
    /// Present for bindings registered through `apply*`; these are the
    /// values the injection pass scans.
    injectable: Option<Arc<dyn Injectable>>,
}

/// Process-local service registry.
///
/// Stores shared values under string keys and fills the annotated fields
/// of registered services by looking those keys up. The registry is an
/// explicit instance: construct one and thread it through startup code
/// rather than reaching for a global.
///
/// ```
/// use std::sync::Arc;
/// use wirebox::Registry;
///
/// let registry = Registry::new();
/// registry.set("greeting", Arc::new("hello".to_string()));
/// let greeting = registry.get::<String>("greeting").unwrap();
/// assert_eq!(*greeting, "hello");
/// ```
pub struct Registry {
    bindings: RwLock<HashMap<String, Binding>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
        }
    }

    // ========================================================================
    // Keyed store
    // ========================================================================

    /// Create or replace the binding under `key`.
    ///
    /// A later `set` with the same key silently replaces the prior binding;
    /// holders of the old handle keep it alive. Values bound this way carry
    /// no injection points and are skipped by the injection pass — register
    /// services through [`apply`](Self::apply) or
    /// [`apply_with_name`](Self::apply_with_name) instead.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        let mut bindings = self.write_bindings();
        bindings.insert(
            key.into(),
            Binding {
                value,
                type_name: std::any::type_name::<T>(),
                injectable: None,
            },
        );
    }

    /// Typed lookup of the binding under `key`.
    ///
    /// Returns [`Error::NotFound`] when the key is absent and
    /// [`Error::TypeMismatch`] when the binding holds a different concrete
    /// type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        let bindings = self.read_bindings();
        let binding = bindings.get(key).ok_or_else(|| Error::not_found(key))?;
        Arc::clone(&binding.value).downcast::<T>().map_err(|_| {
            Error::type_mismatch(key, std::any::type_name::<T>(), binding.type_name)
        })
    }

    /// Untyped lookup; absence is the only failure.
    pub fn get_any(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.read_bindings().get(key).map(|b| Arc::clone(&b.value))
    }

    // ========================================================================
    // Registration dispatch
    // ========================================================================

    /// Register `service` under its fully-qualified type name.
    ///
    /// One canonical instance per type: a second `apply` of the same type
    /// replaces the first.
    pub fn apply<T: Injectable + Any>(&self, service: Arc<T>) {
        let mut bindings = self.write_bindings();
        Self::insert_service(&mut bindings, std::any::type_name::<T>().to_string(), service);
    }

    /// Register `service` under a caller-supplied name.
    ///
    /// Disambiguates multiple instances of the same type; annotated fields
    /// reach a named instance via `#[inject("name")]`.
    pub fn apply_with_name<T: Injectable + Any>(&self, name: impl Into<String>, service: Arc<T>) {
        let mut bindings = self.write_bindings();
        Self::insert_service(&mut bindings, name.into(), service);
    }

    /// [`apply`](Self::apply) followed by a full injection pass, under a
    /// single exclusive lock acquisition.
    pub fn register_service<T: Injectable + Any>(&self, service: Arc<T>) {
        let mut bindings = self.write_bindings();
        Self::insert_service(&mut bindings, std::any::type_name::<T>().to_string(), service);
        Self::run_pass(&bindings);
    }

    /// [`apply_with_name`](Self::apply_with_name) followed by a full
    /// injection pass, under a single exclusive lock acquisition.
    pub fn register_service_with_name<T: Injectable + Any>(
        &self,
        name: impl Into<String>,
        service: Arc<T>,
    ) {
        let mut bindings = self.write_bindings();
        Self::insert_service(&mut bindings, name.into(), service);
        Self::run_pass(&bindings);
    }

    // ========================================================================
    // Injection pass
    // ========================================================================

    /// Resolve the annotated fields of every registered service from the
    /// registry's current contents.
    ///
    /// A single, non-recursive, one-level pass: resolved values are not
    /// themselves re-scanned within the same call (they are scanned as
    /// registered entries in their own right). Missing dependencies are
    /// logged and the field keeps its unresolved state; the pass never
    /// fails. Re-running the pass is idempotent when nothing was
    /// re-registered in between, re-attempts previously missing
    /// dependencies, and picks up replaced bindings.
    pub fn inject(&self) {
        let bindings = self.write_bindings();
        Self::run_pass(&bindings);
    }

    fn run_pass(bindings: &HashMap<String, Binding>) {
        for (owner, binding) in bindings {
            let Some(injectable) = &binding.injectable else {
                continue;
            };
            for point in injectable.injection_points() {
                let key = point.key();
                let Some(dependency) = bindings.get(key) else {
                    warn!(dependency = key, owner = %owner, "dependency not found during injection");
                    continue;
                };
                if point.slot().fill(Arc::clone(&dependency.value)).is_err() {
                    error!(
                        dependency = key,
                        owner = %owner,
                        expected = point.slot().target_type_name(),
                        found = dependency.type_name,
                        "type mismatch during injection; field left unresolved"
                    );
                } else {
                    debug!(dependency = key, owner = %owner, "dependency resolved");
                }
            }
        }
    }

    // ========================================================================
    // Retrieval surface
    // ========================================================================

    /// Dereferenced copy of the service bound under `name`.
    ///
    /// Clones the pointee, so the caller cannot reach shared registry state
    /// through the returned value.
    pub fn service_by_name<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T> {
        self.get::<T>(name).map(|service| T::clone(&service))
    }

    /// Shared handle to the service bound under `name`.
    pub fn service_ptr_by_name<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.get::<T>(name)
    }

    /// Dereferenced copy of the canonical instance of `T`, keyed by its
    /// fully-qualified type name (the counterpart of [`apply`](Self::apply)).
    pub fn service<T: Any + Send + Sync + Clone>(&self) -> Result<T> {
        self.service_by_name(std::any::type_name::<T>())
    }

    /// Handles of every binding whose key starts with `prefix`, in
    /// unspecified order.
    pub fn services_by_prefix(&self, prefix: &str) -> Vec<Arc<dyn Any + Send + Sync>> {
        self.read_bindings()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, binding)| Arc::clone(&binding.value))
            .collect()
    }

    /// Handles of every binding, in unspecified order.
    pub fn services(&self) -> Vec<Arc<dyn Any + Send + Sync>> {
        self.read_bindings()
            .values()
            .map(|binding| Arc::clone(&binding.value))
            .collect()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// All binding keys, in unspecified order.
    pub fn keys(&self) -> Vec<String> {
        self.read_bindings().keys().cloned().collect()
    }

    /// Whether a binding exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.read_bindings().contains_key(key)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.read_bindings().len()
    }

    /// Whether the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.read_bindings().is_empty()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn insert_service<T: Injectable + Any>(
        bindings: &mut HashMap<String, Binding>,
        key: String,
        service: Arc<T>,
    ) {
        let injectable: Arc<dyn Injectable> = Arc::clone(&service) as Arc<dyn Injectable>;
        bindings.insert(
            key,
            Binding {
                value: service,
                type_name: std::any::type_name::<T>(),
                injectable: Some(injectable),
            },
        );
    }

    // A panicking writer cannot leave the map half-mutated, so poisoning is
    // absorbed rather than propagated.
    fn read_bindings(&self) -> RwLockReadGuard<'_, HashMap<String, Binding>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bindings(&self) -> RwLockWriteGuard<'_, HashMap<String, Binding>> {
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
