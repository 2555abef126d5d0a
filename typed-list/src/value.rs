//! The dynamic value model.
//!
//! [`Value`] is the operand type every list element and every dispatched
//! argument is expressed in. Reference kinds (`Object`, `List`) have
//! identity semantics: cloning a value clones a handle, and equality
//! compares identity, not contents. Primitive kinds compare by value.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::descriptor::{PrimitiveTy, TypeDesc};
use crate::list::List;

/// A dynamically-typed runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null value. Matches only the `null` descriptor, plus element
    /// slots of reference element types.
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    Str(Rc<str>),
    Symbol(Symbol),
    /// An instance of a runtime [`Class`].
    Object(Object),
    /// A list handle; carries its element type as its generic tag.
    List(List),
    /// A type descriptor used as a value (class-as-value).
    Type(TypeDesc),
}

impl Value {
    /// Build a string value.
    pub fn str(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The primitive tag of this value, if it is a primitive.
    pub(crate) fn primitive_tag(&self) -> Option<PrimitiveTy> {
        match self {
            Value::Bool(_) => Some(PrimitiveTy::Boolean),
            Value::Number(_) => Some(PrimitiveTy::Number),
            Value::BigInt(_) => Some(PrimitiveTy::BigInt),
            Value::Str(_) => Some(PrimitiveTy::String),
            Value::Symbol(_) => Some(PrimitiveTy::Symbol),
            _ => None,
        }
    }

    /// The value's type name for diagnostics.
    ///
    /// Generic instantiations carry their element-type suffix recursively,
    /// e.g. `List<List<Number>>`.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "Boolean".to_string(),
            Value::Number(_) => "Number".to_string(),
            Value::BigInt(_) => "BigInt".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Symbol(_) => "Symbol".to_string(),
            Value::Object(obj) => obj.class().display_name(),
            Value::List(list) => format!("List<{}>", list.inner_type().display_name()),
            Value::Type(desc) => desc.display_name(),
        }
    }

    /// Natural ordering across values, used by the comparator-less sort.
    ///
    /// Values of the same kind order by value where one exists (numbers,
    /// strings, booleans, big integers); other kinds compare equal among
    /// themselves so a stable sort leaves them in place. Values of
    /// different kinds order by a fixed kind rank.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::BigInt(a), Value::BigInt(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::BigInt(_) => 3,
            Value::Str(_) => 4,
            Value::Symbol(_) => 5,
            Value::Object(_) => 6,
            Value::List(_) => 7,
            Value::Type(_) => 8,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::BigInt(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Object(obj) => write!(f, "[object {}]", obj.class().display_name()),
            Value::List(list) => write!(f, "{list}"),
            Value::Type(desc) => write!(f, "{}", desc.display_name()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::str(s)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Value {
        Value::List(list)
    }
}

thread_local! {
    static NEXT_SYMBOL_ID: Cell<u64> = const { Cell::new(0) };
}

/// A unique symbol value.
///
/// Every call to [`Symbol::new`] produces a distinct symbol; the optional
/// description is purely cosmetic and plays no part in equality.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Rc<str>>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Symbol {
        let id = NEXT_SYMBOL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        Symbol {
            id,
            description: description.map(Rc::from),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "Symbol({desc})"),
            None => write!(f, "Symbol()"),
        }
    }
}

/// A runtime class: a named type identity with single-parent inheritance.
///
/// Classes compare and hash by identity; two classes with the same name
/// are still distinct types.
#[derive(Debug, Clone)]
pub struct Class {
    inner: Rc<ClassInner>,
}

#[derive(Debug)]
struct ClassInner {
    name: String,
    parent: Option<Class>,
}

impl Class {
    /// Define a new root class.
    pub fn new(name: impl Into<String>) -> Class {
        Class {
            inner: Rc::new(ClassInner {
                name: name.into(),
                parent: None,
            }),
        }
    }

    /// Define a class inheriting from `self`.
    pub fn subclass(&self, name: impl Into<String>) -> Class {
        Class {
            inner: Rc::new(ClassInner {
                name: name.into(),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.inner.parent.as_ref()
    }

    /// The diagnostic name; unnamed classes render as `(anonymous)`.
    pub fn display_name(&self) -> String {
        if self.inner.name.is_empty() {
            "(anonymous)".to_string()
        } else {
            self.inner.name.clone()
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create an instance of this class.
    pub fn instantiate(&self) -> Object {
        Object::new(self)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Class) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Class {}

impl std::hash::Hash for Class {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.inner).hash(state);
    }
}

/// An instance of a runtime [`Class`], with identity semantics.
#[derive(Debug, Clone)]
pub struct Object {
    inner: Rc<ObjectInner>,
}

#[derive(Debug)]
struct ObjectInner {
    class: Class,
}

impl Object {
    pub fn new(class: &Class) -> Object {
        Object {
            inner: Rc::new(ObjectInner {
                class: class.clone(),
            }),
        }
    }

    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Instance-of check, walking the inheritance chain.
    pub fn is_instance_of(&self, class: &Class) -> bool {
        let mut current = Some(&self.inner.class);
        while let Some(c) = current {
            if c.ptr_eq(class) {
                return true;
            }
            current = c.parent();
        }
        false
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Object {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_equality() {
        assert_eq!(Value::from(3), Value::from(3.0));
        assert_ne!(Value::from(3), Value::from(4));
        assert_eq!(Value::from("abc"), Value::str("abc"));
        assert_ne!(Value::from("abc"), Value::from(3));
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Null, Value::from(false));
    }

    #[test]
    fn test_nan_is_never_equal() {
        assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::new(Some("s"));
        let b = Symbol::new(Some("s"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_object_identity() {
        let animal = Class::new("Animal");
        let a = animal.instantiate();
        let b = animal.instantiate();
        assert_ne!(Value::Object(a.clone()), Value::Object(b));
        assert_eq!(Value::Object(a.clone()), Value::Object(a));
    }

    #[test]
    fn test_instance_of_walks_parents() {
        let animal = Class::new("Animal");
        let cat = animal.subclass("Cat");
        let other = Class::new("Animal");

        let kitty = cat.instantiate();
        assert!(kitty.is_instance_of(&cat));
        assert!(kitty.is_instance_of(&animal));
        // Same name, different identity
        assert!(!kitty.is_instance_of(&other));
    }

    #[test]
    fn test_natural_ordering() {
        let mut values = vec![Value::from("b"), Value::from(2), Value::from("a"), Value::from(1)];
        values.sort_by(|a, b| a.natural_cmp(b));
        assert_eq!(
            values,
            vec![Value::from(1), Value::from(2), Value::from("a"), Value::from("b")]
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(1).type_name(), "Number");
        assert_eq!(Value::from("x").type_name(), "String");
        assert_eq!(Value::from(true).type_name(), "Boolean");
        assert_eq!(Value::BigInt(1).type_name(), "BigInt");

        let cls = Class::new("Point");
        assert_eq!(Value::Object(cls.instantiate()).type_name(), "Point");
        let anon = Class::new("");
        assert_eq!(Value::Object(anon.instantiate()).type_name(), "(anonymous)");
    }
}
