//! The typed list container.
//!
//! A [`List`] owns an element-type descriptor fixed at construction and an
//! ordered backing store. Every insertion and assignment point re-checks
//! the element type; the descriptor itself never changes.
//!
//! `List` is a shared handle (`Rc` internally): `Clone` aliases the same
//! backing store, mirroring reference semantics of the value model. A deep
//! copy is an explicit operation, [`List::deep_clone`].
//!
//! The container is single-threaded and fully synchronous. Callbacks
//! (predicates, comparators, converters) run with no borrow held, so a
//! re-entrant callback observes the live list and cannot cause memory
//! unsafety; structural mutation during iteration is documented as
//! unsupported usage with implementation-defined results.

mod instantiate;
mod invoke;
mod view;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::descriptor::TypeDesc;
use crate::error::ListError;
use crate::value::Value;

pub use instantiate::ListType;
pub use view::{ReadOnlyList, READ_ONLY_DENY_LIST};

pub(crate) use invoke::MethodTable;

struct Shared {
    /// The generic parameter: fixed at construction, never changes.
    elem_ty: TypeDesc,
    items: RefCell<Vec<Value>>,
    /// Per-method overload sets, built on first dynamic invocation.
    methods: RefCell<Option<Rc<MethodTable>>>,
}

/// A runtime-type-checked ordered container.
#[derive(Clone)]
pub struct List {
    shared: Rc<Shared>,
}

impl List {
    /// Create an empty list of the given element type.
    ///
    /// Fails with [`ListError::TypeMismatch`] if the descriptor cannot be
    /// an element type (wildcard, null, rest-marker, alternatives), at any
    /// nesting depth.
    pub fn new(elem_ty: TypeDesc) -> Result<List, ListError> {
        if !elem_ty.is_element_type() || !elem_ty.is_well_formed() {
            return Err(ListError::type_mismatch(
                "an element type",
                elem_ty.display_name(),
            ));
        }
        Ok(List::from_parts(elem_ty, Vec::new()))
    }

    /// Create a list from a sequence, validating every element through the
    /// `add` path.
    pub fn from_values(
        elem_ty: TypeDesc,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<List, ListError> {
        let list = List::new(elem_ty)?;
        for value in values {
            list.add(value)?;
        }
        Ok(list)
    }

    /// Create a list of `count` elements pre-filled with the element
    /// type's canonical default.
    pub fn with_len(elem_ty: TypeDesc, count: usize) -> Result<List, ListError> {
        let list = List::new(elem_ty)?;
        {
            let mut items = list.shared.items.borrow_mut();
            for _ in 0..count {
                items.push(list.shared.elem_ty.default_element());
            }
        }
        Ok(list)
    }

    /// The memoized generic-instantiation handle for `elem_ty`.
    ///
    /// See [`ListType::of`].
    pub fn ty(elem_ty: TypeDesc) -> Result<ListType, ListError> {
        ListType::of(elem_ty)
    }

    /// Internal constructor for element sequences already known to satisfy
    /// `elem_ty`.
    pub(crate) fn from_parts(elem_ty: TypeDesc, items: Vec<Value>) -> List {
        List {
            shared: Rc::new(Shared {
                elem_ty,
                items: RefCell::new(items),
                methods: RefCell::new(None),
            }),
        }
    }

    /// The element-type descriptor (the container's generic parameter).
    pub fn inner_type(&self) -> TypeDesc {
        self.shared.elem_ty.clone()
    }

    pub fn len(&self) -> usize {
        self.shared.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.items.borrow().is_empty()
    }

    fn check_element(&self, value: &Value) -> Result<(), ListError> {
        let elem_ty = &self.shared.elem_ty;
        if elem_ty.matches(value) || (value.is_null() && elem_ty.accepts_null_element()) {
            Ok(())
        } else {
            Err(ListError::type_mismatch(
                elem_ty.display_name(),
                value.type_name(),
            ))
        }
    }

    fn bounds_check(&self, index: i64) -> Result<(), ListError> {
        let len = self.len();
        if index < 0 || index >= len as i64 {
            return Err(ListError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    // ============================================================
    // Mutating operations
    // ============================================================

    /// Append an element.
    pub fn add(&self, item: Value) -> Result<(), ListError> {
        self.check_element(&item)?;
        self.shared.items.borrow_mut().push(item);
        Ok(())
    }

    /// Append every element of a sequence in order.
    ///
    /// The first failing element aborts with its error; elements already
    /// appended stay appended (no rollback).
    pub fn add_range(&self, items: impl IntoIterator<Item = Value>) -> Result<(), ListError> {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    /// Insert at `index`, shifting later elements right.
    ///
    /// `index == len()` appends.
    pub fn insert(&self, index: usize, item: Value) -> Result<(), ListError> {
        let len = self.len();
        if index > len {
            return Err(ListError::IndexOutOfRange {
                index: index as i64,
                len,
            });
        }
        self.check_element(&item)?;
        self.shared.items.borrow_mut().insert(index, item);
        Ok(())
    }

    /// Insert every element of a sequence starting at `index`, advancing
    /// the insertion point so source order is preserved.
    pub fn insert_range(
        &self,
        index: usize,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<(), ListError> {
        let mut at = index;
        for item in items {
            self.insert(at, item)?;
            at += 1;
        }
        Ok(())
    }

    /// Remove the first occurrence of `item` by equality. Returns whether
    /// an occurrence was found.
    pub fn remove(&self, item: &Value) -> bool {
        let mut items = self.shared.items.borrow_mut();
        match items.iter().position(|v| v == item) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return the element at `index`.
    pub fn remove_at(&self, index: usize) -> Result<Value, ListError> {
        self.bounds_check(index as i64)?;
        Ok(self.shared.items.borrow_mut().remove(index))
    }

    /// Remove every element the predicate holds for, returning the count.
    ///
    /// Scans from the tail so indices of not-yet-visited elements remain
    /// stable while elements are removed.
    pub fn remove_all(&self, mut predicate: impl FnMut(&Value) -> bool) -> usize {
        let mut removed = 0;
        let mut index = self.len();
        while index > 0 {
            index -= 1;
            let item = self.shared.items.borrow().get(index).cloned();
            let Some(item) = item else { continue };
            if predicate(&item) {
                let mut items = self.shared.items.borrow_mut();
                if index < items.len() {
                    items.remove(index);
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Remove `count` elements starting at `index`.
    ///
    /// Both `index` and `index + count - 1` must be in bounds.
    pub fn remove_range(&self, index: usize, count: usize) -> Result<(), ListError> {
        self.bounds_check(index as i64)?;
        self.bounds_check(index as i64 + count as i64 - 1)?;
        self.shared.items.borrow_mut().drain(index..index + count);
        Ok(())
    }

    /// Drop all elements. The element type is unchanged.
    pub fn clear(&self) {
        self.shared.items.borrow_mut().clear();
    }

    /// Reverse the whole list in place.
    pub fn reverse(&self) {
        self.shared.items.borrow_mut().reverse();
    }

    /// Reverse `count` elements starting at `index` in place.
    pub fn reverse_range(&self, index: usize, count: usize) -> Result<(), ListError> {
        self.bounds_check(index as i64)?;
        self.bounds_check(index as i64 + count as i64 - 1)?;
        self.shared.items.borrow_mut()[index..index + count].reverse();
        Ok(())
    }

    /// Sort in place by natural value ordering (stable).
    pub fn sort(&self) {
        self.shared
            .items
            .borrow_mut()
            .sort_by(|a, b| a.natural_cmp(b));
    }

    /// Sort in place with a caller-supplied strict total order (stable).
    ///
    /// The store is detached while the comparator runs; a re-entrant
    /// callback observes an empty list.
    pub fn sort_by(&self, mut compare: impl FnMut(&Value, &Value) -> Ordering) {
        let mut items = std::mem::take(&mut *self.shared.items.borrow_mut());
        items.sort_by(|a, b| compare(a, b));
        *self.shared.items.borrow_mut() = items;
    }

    // ============================================================
    // Indexer
    // ============================================================

    /// The element at `index`, or `None` past the end.
    ///
    /// Reads are bounds-free by convention; writes are not. See [`List::set`].
    pub fn get(&self, index: usize) -> Option<Value> {
        self.shared.items.borrow().get(index).cloned()
    }

    /// Replace the element at `index` in place.
    ///
    /// Fails with [`ListError::IndexOutOfRange`] at or past the current
    /// end (the indexer never grows the list) and with
    /// [`ListError::TypeMismatch`] on an element-type violation.
    pub fn set(&self, index: usize, value: Value) -> Result<(), ListError> {
        self.bounds_check(index as i64)?;
        self.check_element(&value)?;
        self.shared.items.borrow_mut()[index] = value;
        Ok(())
    }

    /// String-keyed property read: non-negative integer-literal keys
    /// resolve through [`List::get`], `"length"` resolves to the element
    /// count, anything else to `None`.
    pub fn get_item(&self, key: &str) -> Option<Value> {
        if let Some(index) = parse_index(key) {
            return self.get(index);
        }
        if key == "length" {
            return Some(Value::Number(self.len() as f64));
        }
        None
    }

    /// String-keyed property write: non-negative integer-literal keys
    /// resolve through [`List::set`]; any other key fails with
    /// [`ListError::InvalidProperty`].
    pub fn set_item(&self, key: &str, value: Value) -> Result<(), ListError> {
        match parse_index(key) {
            Some(index) => self.set(index, value),
            // Digits that overflow the index space are still a numeric
            // key, just unreachably far out of range.
            None if is_numeric_key(key) => Err(ListError::IndexOutOfRange {
                index: i64::MAX,
                len: self.len(),
            }),
            None => Err(ListError::InvalidProperty {
                name: key.to_string(),
            }),
        }
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn contains(&self, item: &Value) -> bool {
        self.shared.items.borrow().iter().any(|v| v == item)
    }

    /// Index of the first occurrence, or -1.
    pub fn index_of(&self, item: &Value) -> i64 {
        self.shared
            .items
            .borrow()
            .iter()
            .position(|v| v == item)
            .map_or(-1, |i| i as i64)
    }

    /// Index of the last occurrence, or -1.
    pub fn last_index_of(&self, item: &Value) -> i64 {
        self.shared
            .items
            .borrow()
            .iter()
            .rposition(|v| v == item)
            .map_or(-1, |i| i as i64)
    }

    /// The first element the predicate holds for.
    pub fn find(&self, mut predicate: impl FnMut(&Value) -> bool) -> Option<Value> {
        let mut index = 0;
        while let Some(item) = self.get(index) {
            if predicate(&item) {
                return Some(item);
            }
            index += 1;
        }
        None
    }

    /// Index of the first element the predicate holds for, or -1.
    pub fn find_index(&self, mut predicate: impl FnMut(&Value) -> bool) -> i64 {
        let mut index = 0;
        while let Some(item) = self.get(index) {
            if predicate(&item) {
                return index as i64;
            }
            index += 1;
        }
        -1
    }

    /// The last element the predicate holds for, scanning from the tail.
    pub fn find_last(&self, mut predicate: impl FnMut(&Value) -> bool) -> Option<Value> {
        let mut index = self.len();
        while index > 0 {
            index -= 1;
            let Some(item) = self.get(index) else { continue };
            if predicate(&item) {
                return Some(item);
            }
        }
        None
    }

    /// Index of the last element the predicate holds for, or -1.
    pub fn find_last_index(&self, mut predicate: impl FnMut(&Value) -> bool) -> i64 {
        let mut index = self.len();
        while index > 0 {
            index -= 1;
            let Some(item) = self.get(index) else { continue };
            if predicate(&item) {
                return index as i64;
            }
        }
        -1
    }

    /// Whether the predicate holds for any element.
    pub fn exists(&self, predicate: impl FnMut(&Value) -> bool) -> bool {
        self.find_index(predicate) != -1
    }

    /// Whether the predicate holds for every element. Vacuously true on an
    /// empty list.
    pub fn true_for_all(&self, mut predicate: impl FnMut(&Value) -> bool) -> bool {
        let mut index = 0;
        while let Some(item) = self.get(index) {
            if !predicate(&item) {
                return false;
            }
            index += 1;
        }
        true
    }

    /// Apply `action` to every element in index order.
    pub fn for_each(&self, mut action: impl FnMut(&Value)) {
        let mut index = 0;
        while let Some(item) = self.get(index) {
            action(&item);
            index += 1;
        }
    }

    /// Half-open shallow copy into a new list sharing this element type.
    ///
    /// Negative indices count from the end; out-of-range endpoints clamp.
    pub fn slice(&self, start: i64, end: i64) -> List {
        let items = self.shared.items.borrow();
        let len = items.len();
        let start = clamp_index(start, len);
        let end = clamp_index(end, len);
        let range = if start < end { &items[start..end] } else { &[] };
        List::from_parts(self.shared.elem_ty.clone(), range.to_vec())
    }

    /// A new list holding this list's elements followed by `other`'s, all
    /// validated against this list's element type.
    pub fn concat(&self, other: &List) -> Result<List, ListError> {
        let result = List::from_parts(self.shared.elem_ty.clone(), self.to_vec());
        for item in other.iter() {
            result.add(item)?;
        }
        Ok(result)
    }

    /// A distinct list with the same element type and shallow-copied
    /// elements.
    ///
    /// `Clone` on `List` aliases the backing store; this does not.
    pub fn deep_clone(&self) -> List {
        List::from_parts(self.shared.elem_ty.clone(), self.to_vec())
    }

    /// Copy every element into `dst` starting at position 0.
    pub fn copy_to(&self, dst: &mut Vec<Value>) {
        self.copy_to_at(dst, 0);
    }

    /// Copy every element into `dst` starting at `at`, growing `dst` with
    /// nulls if needed.
    pub fn copy_to_at(&self, dst: &mut Vec<Value>, at: usize) {
        let items = self.shared.items.borrow();
        for (i, item) in items.iter().enumerate() {
            write_at(dst, at + i, item.clone());
        }
    }

    /// Copy the first `count` positions into `dst` starting at `at`;
    /// positions past the end copy as null.
    pub fn copy_range_to(&self, dst: &mut Vec<Value>, at: usize, count: usize) {
        let items = self.shared.items.borrow();
        for i in 0..count {
            let item = items.get(i).cloned().unwrap_or(Value::Null);
            write_at(dst, at + i, item);
        }
    }

    /// A fresh snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.shared.items.borrow().clone()
    }

    /// Map every element through `converter` into a new list of
    /// `target_ty`, validating each result.
    pub fn convert_all(
        &self,
        target_ty: TypeDesc,
        mut converter: impl FnMut(&Value) -> Value,
    ) -> Result<List, ListError> {
        let result = List::new(target_ty)?;
        for item in self.to_vec() {
            result.add(converter(&item))?;
        }
        Ok(result)
    }

    /// A new list of the same element type holding every element the
    /// predicate holds for, preserving order.
    pub fn find_all(&self, mut predicate: impl FnMut(&Value) -> bool) -> List {
        let result = List::from_parts(self.shared.elem_ty.clone(), Vec::new());
        let mut index = 0;
        while let Some(item) = self.get(index) {
            if predicate(&item) {
                result.shared.items.borrow_mut().push(item);
            }
            index += 1;
        }
        result
    }

    /// Join element renderings with `separator`. Null elements render
    /// empty (array join convention).
    pub fn join(&self, separator: &str) -> String {
        let items = self.shared.items.borrow();
        let rendered: Vec<String> = items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        rendered.join(separator)
    }

    /// A fresh, lazy, restartable cursor over current elements in index
    /// order. No snapshot isolation.
    pub fn iter(&self) -> ListIter {
        ListIter {
            list: self.clone(),
            index: 0,
        }
    }

    /// A live read-only view over this same container. Not a copy:
    /// mutations through other handles stay visible through the view.
    pub fn as_read_only(&self) -> ReadOnlyList {
        ReadOnlyList::new(self.clone())
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join(","))
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List<{}> ", self.shared.elem_ty.display_name())?;
        f.debug_list()
            .entries(self.shared.items.borrow().iter())
            .finish()
    }
}

/// Handle identity, mirroring reference equality of the value model.
impl PartialEq for List {
    fn eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for List {}

impl IntoIterator for &List {
    type Item = Value;
    type IntoIter = ListIter;

    fn into_iter(self) -> ListIter {
        self.iter()
    }
}

/// Cursor over a list's elements in index order.
pub struct ListIter {
    list: List,
    index: usize,
}

impl Iterator for ListIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let item = self.list.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

/// Non-negative integer-literal property keys (`"0"`, `"1"`, ...).
fn parse_index(key: &str) -> Option<usize> {
    if !is_numeric_key(key) {
        return None;
    }
    key.parse().ok()
}

fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a possibly-negative index against `len`, clamped to `[0, len]`.
fn clamp_index(index: i64, len: usize) -> usize {
    if index < 0 {
        (len as i64 + index).max(0) as usize
    } else {
        (index as usize).min(len)
    }
}

fn write_at(dst: &mut Vec<Value>, index: usize, value: Value) {
    if index < dst.len() {
        dst[index] = value;
    } else {
        dst.resize(index, Value::Null);
        dst.push(value);
    }
}
