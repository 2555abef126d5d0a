//! Overload registration and dispatch.

use tracing::trace;

use crate::error::{CandidateMismatch, DispatchError, SignatureError};
use crate::signature::{Descriptor, Operand, Signature};

/// The overloads of one named operation.
///
/// Holds (signature, handler) pairs in registration order plus at most one
/// any-arity fallback handler. The handler type `H` is opaque to the set;
/// hosts typically use function pointers or boxed closures.
#[derive(Debug)]
pub struct OverloadSet<D, H> {
    /// Operation name, used only for diagnostics.
    operation: String,
    entries: Vec<(Signature<D>, H)>,
    fallback: Option<H>,
}

impl<D: Descriptor, H> OverloadSet<D, H> {
    /// Create an empty set for the named operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            entries: Vec::new(),
            fallback: None,
        }
    }

    /// The operation this set dispatches for.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Number of registered signatures (the fallback does not count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no signatures are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register an overload.
    ///
    /// Fails with [`SignatureError::DuplicateSignature`] if a signature of
    /// identical shape already exists for this operation. Returns `&mut
    /// Self` so registrations chain with `?`.
    pub fn register(
        &mut self,
        signature: Signature<D>,
        handler: H,
    ) -> Result<&mut Self, SignatureError> {
        if let Some((existing, _)) = self.entries.iter().find(|(s, _)| s.shape_eq(&signature)) {
            return Err(SignatureError::DuplicateSignature {
                operation: self.operation.clone(),
                signature: existing.to_string(),
            });
        }
        self.entries.push((signature, handler));
        Ok(self)
    }

    /// Register the any-arity fallback handler.
    ///
    /// At most one fallback may exist per operation.
    pub fn register_fallback(&mut self, handler: H) -> Result<&mut Self, SignatureError> {
        if self.fallback.is_some() {
            return Err(SignatureError::FallbackAlreadyDefined {
                operation: self.operation.clone(),
            });
        }
        self.fallback = Some(handler);
        Ok(self)
    }

    /// Resolve a call shape to a handler.
    ///
    /// Candidates are attempted in registration order and the first fully
    /// matching one is selected; registration order therefore encodes
    /// overload priority. With no signatures registered at all, the
    /// fallback is used directly or resolution fails with
    /// [`DispatchError::NoOverload`]. With signatures but no match, the
    /// fallback is used if present, else resolution fails with
    /// [`DispatchError::NoMatchingOverload`] carrying per-candidate
    /// mismatch detail.
    pub fn resolve<V: Operand<D>>(&self, args: &[V]) -> Result<&H, DispatchError> {
        if self.entries.is_empty() {
            return self.fallback.as_ref().ok_or_else(|| DispatchError::NoOverload {
                operation: self.operation.clone(),
            });
        }

        for (index, (signature, handler)) in self.entries.iter().enumerate() {
            if signature.matches(args) {
                trace!(operation = %self.operation, overload = index, "overload resolved");
                return Ok(handler);
            }
        }

        if let Some(fallback) = &self.fallback {
            trace!(operation = %self.operation, "no signature matched, using fallback");
            return Ok(fallback);
        }

        Err(DispatchError::NoMatchingOverload {
            operation: self.operation.clone(),
            arity: args.len(),
            candidates: self.mismatches(args),
        })
    }

    /// First-mismatch detail for every arity-compatible candidate.
    fn mismatches<V: Operand<D>>(&self, args: &[V]) -> Vec<CandidateMismatch> {
        self.entries
            .iter()
            .filter(|(signature, _)| signature.accepts_arity(args.len()))
            .filter_map(|(signature, _)| {
                signature
                    .first_mismatch(args)
                    .map(|(position, desc)| CandidateMismatch {
                        signature: signature.to_string(),
                        position,
                        expected: desc.display_name(),
                        actual: args[position].type_name(),
                    })
            })
            .collect()
    }
}
