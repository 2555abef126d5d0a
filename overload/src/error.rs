//! Registration and dispatch errors.

use std::fmt;

use thiserror::Error;

/// Registration-time errors.
///
/// These indicate programmer mistakes in how an overload set was declared
/// and are not expected at steady state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// A signature with an identical descriptor sequence already exists
    /// for this operation.
    #[error("duplicate signature {signature} registered for `{operation}`")]
    DuplicateSignature {
        /// The operation the signature was registered on.
        operation: String,
        /// Rendered form of the conflicting signature.
        signature: String,
    },

    /// A descriptor sequence that cannot form a valid signature.
    #[error("invalid signature: {reason}")]
    InvalidSignature {
        /// What made the sequence invalid.
        reason: String,
    },

    /// A second fallback was registered for the same operation.
    #[error("fallback already defined for `{operation}`")]
    FallbackAlreadyDefined {
        /// The operation that already has a fallback.
        operation: String,
    },
}

/// Call-time dispatch failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The operation has no registered signatures and no fallback.
    #[error("no overloads registered for `{operation}`")]
    NoOverload {
        /// The operation that was called.
        operation: String,
    },

    /// No registered signature fits the call shape.
    #[error("no overload of `{operation}` matches {arity} argument(s)")]
    NoMatchingOverload {
        /// The operation that was called.
        operation: String,
        /// The call's argument count.
        arity: usize,
        /// One entry per arity-compatible candidate, describing the first
        /// position where the call failed to match it.
        candidates: Vec<CandidateMismatch>,
    },
}

impl DispatchError {
    /// Multi-line report including per-candidate mismatch detail.
    pub fn report(&self) -> String {
        match self {
            DispatchError::NoOverload { .. } => self.to_string(),
            DispatchError::NoMatchingOverload { candidates, .. } => {
                let mut out = self.to_string();
                for candidate in candidates {
                    out.push_str("\n  - ");
                    out.push_str(&candidate.to_string());
                }
                out
            }
        }
    }
}

/// The first mismatching parameter of one arity-compatible candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMismatch {
    /// Rendered form of the candidate signature.
    pub signature: String,
    /// Position of the first parameter the call failed to satisfy.
    pub position: usize,
    /// Declared descriptor name at that position.
    pub expected: String,
    /// Type name of the argument actually supplied.
    pub actual: String,
}

impl fmt::Display for CandidateMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {} at position {}, got {}",
            self.signature, self.expected, self.position, self.actual
        )
    }
}
