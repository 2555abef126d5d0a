//! Live read-only views.
//!
//! A [`ReadOnlyList`] wraps a list handle and re-exposes its non-mutating
//! surface. It is a view, not a copy: mutations made through other handles
//! to the same list stay visible. Mutation attempts through the view fail
//! with [`ListError::ReadOnlyViolation`], gated by name before overload
//! resolution runs.

use std::cmp::Ordering;
use std::fmt;

use crate::descriptor::TypeDesc;
use crate::error::ListError;
use crate::list::{List, ListIter};
use crate::value::Value;

/// Operation names a read-only view refuses, checked before dispatch.
pub const READ_ONLY_DENY_LIST: &[&str] = &[
    "add",
    "add_range",
    "insert",
    "insert_range",
    "remove",
    "remove_at",
    "remove_all",
    "remove_range",
    "clear",
    "reverse",
    "sort",
    "as_read_only",
];

/// A live read-only view over a [`List`].
#[derive(Clone)]
pub struct ReadOnlyList {
    list: List,
}

impl ReadOnlyList {
    pub(crate) fn new(list: List) -> ReadOnlyList {
        ReadOnlyList { list }
    }

    pub fn inner_type(&self) -> TypeDesc {
        self.list.inner_type()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Invoke an operation by name, refusing mutating names.
    ///
    /// The deny check happens before overload resolution: a denied name
    /// fails with [`ListError::ReadOnlyViolation`] even when its arguments
    /// would not have matched any overload.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ListError> {
        if READ_ONLY_DENY_LIST.contains(&name) {
            return Err(ListError::ReadOnlyViolation {
                name: name.to_string(),
            });
        }
        self.list.invoke(name, args)
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.list.get(index)
    }

    /// Indexer writes always fail on a view.
    pub fn set(&self, _index: usize, _value: Value) -> Result<(), ListError> {
        Err(ListError::ReadOnlyViolation {
            name: "set".to_string(),
        })
    }

    pub fn get_item(&self, key: &str) -> Option<Value> {
        self.list.get_item(key)
    }

    /// Property writes always fail on a view.
    pub fn set_item(&self, key: &str, _value: Value) -> Result<(), ListError> {
        Err(ListError::ReadOnlyViolation {
            name: key.to_string(),
        })
    }

    pub fn contains(&self, item: &Value) -> bool {
        self.list.contains(item)
    }

    pub fn index_of(&self, item: &Value) -> i64 {
        self.list.index_of(item)
    }

    pub fn last_index_of(&self, item: &Value) -> i64 {
        self.list.last_index_of(item)
    }

    pub fn find(&self, predicate: impl FnMut(&Value) -> bool) -> Option<Value> {
        self.list.find(predicate)
    }

    pub fn find_index(&self, predicate: impl FnMut(&Value) -> bool) -> i64 {
        self.list.find_index(predicate)
    }

    pub fn find_last(&self, predicate: impl FnMut(&Value) -> bool) -> Option<Value> {
        self.list.find_last(predicate)
    }

    pub fn find_last_index(&self, predicate: impl FnMut(&Value) -> bool) -> i64 {
        self.list.find_last_index(predicate)
    }

    pub fn exists(&self, predicate: impl FnMut(&Value) -> bool) -> bool {
        self.list.exists(predicate)
    }

    pub fn true_for_all(&self, predicate: impl FnMut(&Value) -> bool) -> bool {
        self.list.true_for_all(predicate)
    }

    pub fn for_each(&self, action: impl FnMut(&Value)) {
        self.list.for_each(action)
    }

    /// Derived containers are fresh mutable lists, not views.
    pub fn find_all(&self, predicate: impl FnMut(&Value) -> bool) -> List {
        self.list.find_all(predicate)
    }

    pub fn slice(&self, start: i64, end: i64) -> List {
        self.list.slice(start, end)
    }

    pub fn concat(&self, other: &List) -> Result<List, ListError> {
        self.list.concat(other)
    }

    pub fn convert_all(
        &self,
        target_ty: TypeDesc,
        converter: impl FnMut(&Value) -> Value,
    ) -> Result<List, ListError> {
        self.list.convert_all(target_ty, converter)
    }

    pub fn deep_clone(&self) -> List {
        self.list.deep_clone()
    }

    pub fn copy_to(&self, dst: &mut Vec<Value>) {
        self.list.copy_to(dst)
    }

    pub fn copy_to_at(&self, dst: &mut Vec<Value>, at: usize) {
        self.list.copy_to_at(dst, at)
    }

    pub fn copy_range_to(&self, dst: &mut Vec<Value>, at: usize, count: usize) {
        self.list.copy_range_to(dst, at, count)
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.list.to_vec()
    }

    /// Non-mutating sort: the ordered elements land in a fresh list.
    pub fn sorted(&self) -> List {
        let sorted = self.list.deep_clone();
        sorted.sort();
        sorted
    }

    /// Non-mutating comparator sort into a fresh list.
    pub fn sorted_by(&self, compare: impl FnMut(&Value, &Value) -> Ordering) -> List {
        let sorted = self.list.deep_clone();
        sorted.sort_by(compare);
        sorted
    }

    pub fn join(&self, separator: &str) -> String {
        self.list.join(separator)
    }

    pub fn iter(&self) -> ListIter {
        self.list.iter()
    }
}

impl fmt::Display for ReadOnlyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.list, f)
    }
}

impl fmt::Debug for ReadOnlyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReadOnly")?;
        fmt::Debug::fmt(&self.list, f)
    }
}

impl IntoIterator for &ReadOnlyList {
    type Item = Value;
    type IntoIter = ListIter;

    fn into_iter(self) -> ListIter {
        self.iter()
    }
}
