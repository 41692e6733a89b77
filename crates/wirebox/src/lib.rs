//! Process-local service registry with annotation-driven field injection
//!
//! wirebox is an in-memory indirection layer used during process startup to
//! wire components together: callers place shared values into a [`Registry`]
//! under string keys, then trigger an injection pass that fills the
//! annotated fields of every registered service from those keys.
//!
//! ## Architecture Overview
//!
//! ```text
//! set("stu_name", Arc<String>) ─┐
//! apply(Arc<Stu>)              ─┤→ Registry (RwLock<HashMap<key, Binding>>)
//! apply(Arc<Person>)           ─┘        ↓ inject()
//!                               InjectionPoint { key, slot } per #[inject]
//!                                        ↓
//!                               Dep<T> slots resolved to shared handles
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use wirebox::{Dep, Injectable, Registry};
//!
//! #[derive(Clone, Default, Injectable)]
//! struct Greeter {
//!     #[inject("greeting")]
//!     greeting: Dep<String>,
//! }
//!
//! let registry = Registry::new();
//! registry.set("greeting", Arc::new("hello".to_string()));
//! registry.apply(Arc::new(Greeter::default()));
//! registry.inject();
//!
//! let greeter: Greeter = registry.service::<Greeter>().unwrap();
//! assert_eq!(*greeter.greeting.get().unwrap(), "hello");
//! ```
//!
//! ## Key Principles
//!
//! - **Explicit instance**: no process-wide singleton; a `Registry` is
//!   constructed and threaded through startup code.
//! - **Descriptors over reflection**: services declare their annotated
//!   fields once as injection points; the pass walks descriptors, never
//!   struct layouts.
//! - **Recoverable lookups**: typed accessors return [`Error`] values; only
//!   missing dependencies during a pass degrade to a logged diagnostic.
//! - **Shared by reference**: bindings hold `Arc` handles, never copies;
//!   the registry and every other holder share ownership.

pub mod dep;
pub mod error;
pub mod inject;
pub mod registry;

pub use dep::Dep;
pub use error::{Error, Result};
pub use inject::{InjectSlot, Injectable, InjectionPoint};
pub use registry::Registry;

// Derive macro for the trait of the same name.
pub use wirebox_derive::Injectable;
