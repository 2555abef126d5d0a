//! Runtime-type-checked ordered container over a dynamic value model.
//!
//! # Algorithm Overview
//!
//! 1. A [`List`] is created with an element-type descriptor ([`TypeDesc`])
//!    that is fixed for the container's lifetime.
//! 2. Every insertion and assignment path re-checks the incoming [`Value`]
//!    against that descriptor; violations fail with
//!    [`ListError::TypeMismatch`] before any mutation happens.
//! 3. Static Rust methods cover the full operation surface; a dynamic
//!    invocation surface ([`List::invoke`]) additionally routes
//!    string-named calls through per-method overload sets built with the
//!    `overload` crate, resolving by registration order.
//! 4. [`List::as_read_only`] wraps the same backing store in a live view
//!    that rejects the mutating subset by name.
//! 5. [`ListType::of`] memoizes generic instantiations so `List::ty(T)`
//!    returns the identical handle for equal `T` within a thread.
//!
//! The crate is single-threaded by design: values and lists are `Rc`-based
//! handles with identity semantics, matching the reference model they
//! emulate.

mod descriptor;
mod error;
mod list;
mod value;

pub use descriptor::{PrimitiveTy, TypeDesc};
pub use error::ListError;
pub use list::{List, ListIter, ListType, ReadOnlyList, READ_ONLY_DENY_LIST};
pub use value::{Class, Object, Symbol, Value};
