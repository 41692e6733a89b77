//! Error handling types

use thiserror::Error;

/// Result type alias for registry operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for registry lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No binding exists under the requested key
    #[error("no binding named `{key}` in the registry")]
    NotFound {
        /// The key that was looked up
        key: String,
    },

    /// A binding exists but holds a different concrete type
    #[error("binding `{key}` holds a `{found}`, not a `{expected}`")]
    TypeMismatch {
        /// The key that was looked up
        key: String,
        /// The type the caller asked for
        expected: &'static str,
        /// The type actually stored under the key
        found: &'static str,
    },
}

impl Error {
    /// Create a [`Error::NotFound`] for the given key
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a [`Error::TypeMismatch`] for the given key
    pub fn type_mismatch(
        key: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found,
        }
    }
}
