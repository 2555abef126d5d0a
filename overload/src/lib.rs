//! Runtime overload resolution by argument type and arity.
//!
//! This crate implements the dispatch machinery behind operations that have
//! several implementations distinguished only by the runtime shape of their
//! arguments. An [`OverloadSet`] is scoped to one named operation; callers
//! register (signature, handler) pairs plus at most one any-arity fallback,
//! and [`OverloadSet::resolve`] picks a handler per call.
//!
//! # Algorithm Overview
//!
//! 1. **Collect candidates**: signatures whose length equals the call's
//!    arity, or whose final descriptor is the rest-marker (these accept any
//!    arity at or above their fixed-prefix length)
//! 2. **Match in order**: the first candidate, in registration order, whose
//!    descriptors are all satisfied by the corresponding arguments wins
//! 3. **Fall back**: if nothing matches, the fallback handler is used when
//!    one is registered, otherwise resolution fails with the call's arity
//!    and per-candidate mismatch detail
//!
//! Resolution is deliberately first-match rather than best-match:
//! registration order encodes overload priority.
//!
//! The crate carries no value model of its own. It is generic over two
//! traits so any host can plug in its own types:
//!
//! - [`Descriptor`]: one declared parameter kind in a signature
//! - [`Operand`]: a runtime value checkable against a descriptor
//!
//! # Example
//!
//! ```ignore
//! use overload::{OverloadSet, Signature};
//!
//! let mut set = OverloadSet::new("describe");
//! set.register(Signature::new(vec![Kind::Int])?, "an int")?;
//! set.register(Signature::new(vec![Kind::Text])?, "some text")?;
//!
//! let handler = set.resolve(&[Tok::Int(42)])?;
//! assert_eq!(*handler, "an int");
//! ```

mod error;
mod set;
mod signature;

pub use error::{CandidateMismatch, DispatchError, SignatureError};
pub use set::OverloadSet;
pub use signature::{Descriptor, Operand, Signature};
