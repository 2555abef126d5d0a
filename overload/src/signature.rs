//! Overload signatures and the traits they are built from.

use std::fmt;

use crate::error::SignatureError;

/// One declared parameter kind in an overload signature.
///
/// The resolver only needs four things from a descriptor: whether it is the
/// rest-marker, whether it is a recognized kind at all, shape equality for
/// duplicate detection, and a name for diagnostics. Everything else about
/// what a descriptor means lives with the host's [`Operand`] implementation.
pub trait Descriptor: Clone + fmt::Debug {
    /// Whether this descriptor is the rest-marker.
    ///
    /// The rest-marker satisfies any number of trailing arguments of any
    /// type and is only valid in the final parameter position.
    fn is_rest(&self) -> bool;

    /// Whether this descriptor is a recognized kind.
    ///
    /// Unrecognized descriptors are rejected at registration time rather
    /// than silently never matching.
    fn is_recognized(&self) -> bool;

    /// Shape equality, used for duplicate-signature detection.
    fn shape_eq(&self, other: &Self) -> bool;

    /// The name used in diagnostics.
    fn display_name(&self) -> String;
}

/// A runtime value that can be checked against a descriptor.
pub trait Operand<D: Descriptor> {
    /// Whether this value satisfies the descriptor.
    fn satisfies(&self, desc: &D) -> bool;

    /// The value's type name, for mismatch diagnostics.
    fn type_name(&self) -> String;
}

/// An ordered sequence of descriptors describing one overload's formal
/// parameters.
///
/// Immutable once constructed; [`Signature::new`] validates rest-marker
/// placement and descriptor kinds up front.
#[derive(Debug, Clone)]
pub struct Signature<D> {
    params: Vec<D>,
}

impl<D: Descriptor> Signature<D> {
    /// Build a signature, validating every descriptor.
    ///
    /// Fails with [`SignatureError::InvalidSignature`] if a rest-marker
    /// appears anywhere but the final position, or if a descriptor is not
    /// a recognized kind.
    pub fn new(params: Vec<D>) -> Result<Self, SignatureError> {
        for (position, desc) in params.iter().enumerate() {
            if !desc.is_recognized() {
                return Err(SignatureError::InvalidSignature {
                    reason: format!(
                        "unrecognized descriptor `{}` at position {}",
                        desc.display_name(),
                        position
                    ),
                });
            }
            if desc.is_rest() && position + 1 != params.len() {
                return Err(SignatureError::InvalidSignature {
                    reason: format!(
                        "rest-marker at position {} must be the final parameter",
                        position
                    ),
                });
            }
        }
        Ok(Self { params })
    }

    /// The declared parameter descriptors.
    pub fn params(&self) -> &[D] {
        &self.params
    }

    /// Whether the final descriptor is the rest-marker.
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|d| d.is_rest())
    }

    /// Number of fixed (non-rest) parameters.
    pub fn fixed_len(&self) -> usize {
        if self.is_variadic() {
            self.params.len() - 1
        } else {
            self.params.len()
        }
    }

    /// Whether a call with `arity` arguments is shape-compatible.
    ///
    /// Fixed signatures require an exact arity match; variadic signatures
    /// accept any arity at or above their fixed-prefix length. A signature
    /// whose first descriptor is defined and non-rest therefore never
    /// accepts a zero-argument call.
    pub fn accepts_arity(&self, arity: usize) -> bool {
        if self.is_variadic() {
            arity >= self.fixed_len()
        } else {
            arity == self.params.len()
        }
    }

    /// Shape equality: identical length and descriptor sequence.
    pub fn shape_eq(&self, other: &Self) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.shape_eq(b))
    }

    /// Whether every positional argument satisfies its descriptor.
    ///
    /// Trailing positions covered by the rest-marker always match.
    pub fn matches<V: Operand<D>>(&self, args: &[V]) -> bool {
        if !self.accepts_arity(args.len()) {
            return false;
        }
        args.iter()
            .take(self.fixed_len())
            .zip(&self.params)
            .all(|(arg, desc)| arg.satisfies(desc))
    }

    /// The first mismatching position for an arity-compatible call.
    ///
    /// Returns `None` when every fixed position is satisfied.
    pub fn first_mismatch<'a, V: Operand<D>>(&'a self, args: &[V]) -> Option<(usize, &'a D)> {
        args.iter()
            .take(self.fixed_len())
            .zip(&self.params)
            .position(|(arg, desc)| !arg.satisfies(desc))
            .map(|position| (position, &self.params[position]))
    }
}

impl<D: Descriptor> fmt::Display for Signature<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, desc) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", desc.display_name())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::tests::{Kind, Tok};

    #[test]
    fn test_rest_must_be_last() {
        let err = Signature::new(vec![Kind::Rest, Kind::Int]).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidSignature { .. }));

        // Rest in final position is fine
        assert!(Signature::new(vec![Kind::Int, Kind::Rest]).is_ok());
        assert!(Signature::new(vec![Kind::Rest]).is_ok());
    }

    #[test]
    fn test_unrecognized_descriptor_rejected() {
        let err = Signature::new(vec![Kind::Bogus]).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidSignature { .. }));
    }

    #[test]
    fn test_arity_acceptance() {
        let fixed = Signature::new(vec![Kind::Int, Kind::Text]).unwrap();
        assert!(fixed.accepts_arity(2));
        assert!(!fixed.accepts_arity(1));
        assert!(!fixed.accepts_arity(3));

        let variadic = Signature::new(vec![Kind::Int, Kind::Rest]).unwrap();
        assert!(variadic.accepts_arity(1));
        assert!(variadic.accepts_arity(5));
        assert!(!variadic.accepts_arity(0));

        // A bare rest signature accepts everything, including zero args
        let rest_only = Signature::new(vec![Kind::Rest]).unwrap();
        assert!(rest_only.accepts_arity(0));
        assert!(rest_only.accepts_arity(9));
    }

    #[test]
    fn test_rest_satisfies_trailing_positions() {
        let sig = Signature::new(vec![Kind::Int, Kind::Rest]).unwrap();
        assert!(sig.matches(&[Tok::Int(1), Tok::Text("a".into()), Tok::Int(2)]));
        assert!(sig.matches(&[Tok::Int(1)]));
        assert!(!sig.matches(&[Tok::Text("a".into())]));
    }

    #[test]
    fn test_shape_equality() {
        let a = Signature::new(vec![Kind::Int, Kind::Text]).unwrap();
        let b = Signature::new(vec![Kind::Int, Kind::Text]).unwrap();
        let c = Signature::new(vec![Kind::Text, Kind::Int]).unwrap();
        assert!(a.shape_eq(&b));
        assert!(!a.shape_eq(&c));
    }

    #[test]
    fn test_display() {
        let sig = Signature::new(vec![Kind::Int, Kind::Rest]).unwrap();
        assert_eq!(sig.to_string(), "(Int, ...)");
    }
}
