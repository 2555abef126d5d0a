//! Memoized generic instantiations.
//!
//! `List::ty(T)` plays the role of writing `List<T>` in a generic
//! language: it returns a [`ListType`] handle that constructs and
//! recognizes lists of that element type. Handles are memoized for the
//! life of the thread, so equal element types always resolve to the
//! identical handle and handle equality doubles as instantiation
//! equality.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::descriptor::{PrimitiveTy, TypeDesc};
use crate::error::ListError;
use crate::list::List;
use crate::value::{Class, Value};

/// Cache key over element-type descriptors.
///
/// Class identities key by pointer and the key keeps the class alive, so
/// a dropped-and-reallocated class can never collide with a cached entry.
#[derive(PartialEq, Eq, Hash)]
enum TypeKey {
    Primitive(PrimitiveTy),
    Class(Class),
    List(Option<Box<TypeKey>>),
}

impl TypeKey {
    fn for_desc(desc: &TypeDesc) -> Option<TypeKey> {
        match desc {
            TypeDesc::Primitive(tag) => Some(TypeKey::Primitive(*tag)),
            TypeDesc::Class(class) => Some(TypeKey::Class(class.clone())),
            TypeDesc::List { elem: None } => Some(TypeKey::List(None)),
            TypeDesc::List { elem: Some(t) } => {
                Some(TypeKey::List(Some(Box::new(TypeKey::for_desc(t)?))))
            }
            _ => None,
        }
    }
}

thread_local! {
    static CACHE: RefCell<FxHashMap<TypeKey, ListType>> = RefCell::new(FxHashMap::default());
}

/// A memoized `List<T>` instantiation.
///
/// Compares by handle identity; [`ListType::of`] guarantees equal element
/// types share one handle per thread.
#[derive(Clone)]
pub struct ListType {
    inner: Rc<TypeDesc>,
}

impl ListType {
    /// The instantiation handle for `List<elem_ty>`.
    ///
    /// Fails with [`ListError::TypeMismatch`] if the descriptor cannot be
    /// an element type. Repeated calls with equal descriptors return the
    /// identical handle for the life of the thread.
    pub fn of(elem_ty: TypeDesc) -> Result<ListType, ListError> {
        let key = TypeKey::for_desc(&elem_ty).ok_or_else(|| {
            ListError::type_mismatch("an element type", elem_ty.display_name())
        })?;
        CACHE.with(|cache| {
            let mut cache = cache.borrow_mut();
            if let Some(handle) = cache.get(&key) {
                return Ok(handle.clone());
            }
            trace!(elem = %elem_ty.display_name(), "memoized new list instantiation");
            let handle = ListType {
                inner: Rc::new(elem_ty),
            };
            cache.insert(key, handle.clone());
            Ok(handle)
        })
    }

    /// The instantiation's element type.
    pub fn elem_ty(&self) -> &TypeDesc {
        &self.inner
    }

    /// The descriptor recognizing lists of this instantiation.
    pub fn descriptor(&self) -> TypeDesc {
        TypeDesc::list_of((*self.inner).clone())
    }

    /// An empty list of this instantiation.
    pub fn new_list(&self) -> List {
        List::from_parts((*self.inner).clone(), Vec::new())
    }

    /// Overloaded construction with the element type pre-bound; the
    /// argument shapes are those of [`List::construct`] minus the leading
    /// type.
    pub fn instantiate(&self, args: &[Value]) -> Result<List, ListError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(Value::Type((*self.inner).clone()));
        full.extend_from_slice(args);
        List::construct(&full)
    }

    /// Whether `value` is a list of exactly this element type.
    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::List(list) if list.inner_type() == *self.inner)
    }
}

/// Handle identity; equal element types share one handle per thread.
impl PartialEq for ListType {
    fn eq(&self, other: &ListType) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ListType {}

impl std::fmt::Debug for ListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListType<{}>", self.inner.display_name())
    }
}
