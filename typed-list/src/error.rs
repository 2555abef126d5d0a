//! List operation errors.

use overload::{DispatchError, SignatureError};
use thiserror::Error;

/// Errors raised by list operations.
///
/// Every variant is a synchronous caller contract violation; the list has
/// no fallible I/O, so nothing here is retried or silently recovered.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListError {
    /// A value failed an element-type, argument, or conversion check.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The declared type name.
        expected: String,
        /// The offending value's type name.
        actual: String,
    },

    /// An index or computed range endpoint fell outside the list.
    #[error("index {index} out of bounds, list length is {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// A mutating name was accessed through a read-only view.
    #[error("cannot access `{name}` on a read-only list")]
    ReadOnlyViolation { name: String },

    /// A non-numeric, non-recognized property write on a list.
    #[error("cannot set property `{name}` on a list")]
    InvalidProperty { name: String },

    /// A call shape no registered overload fits.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A malformed overload registration.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl ListError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ListError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
