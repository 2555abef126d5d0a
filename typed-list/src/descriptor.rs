//! Type descriptors and the type matcher.
//!
//! A [`TypeDesc`] is the declared/allowed type for a parameter position or
//! for a list's contents. Matching a runtime [`Value`] against a descriptor
//! is a pure predicate ([`TypeDesc::matches`]); descriptors are immutable
//! once registered in a signature or bound as an element type.

use std::rc::Rc;

use crate::value::{Class, Value};

/// A primitive type tag with a canonical wrapper name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTy {
    Number,
    String,
    Boolean,
    Symbol,
    BigInt,
}

impl PrimitiveTy {
    /// The canonical wrapper name used in diagnostics.
    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveTy::Number => "Number",
            PrimitiveTy::String => "String",
            PrimitiveTy::Boolean => "Boolean",
            PrimitiveTy::Symbol => "Symbol",
            PrimitiveTy::BigInt => "BigInt",
        }
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// The wildcard `*`: matches any non-null value.
    Any,
    /// Matches only the null value.
    Null,
    /// The rest-marker `...`: matches anything, only valid as the final
    /// parameter of a signature.
    Rest,
    /// Matches any type-descriptor value. This is how signatures say
    /// "a type goes here", e.g. the first parameter of the list
    /// constructor.
    Meta,
    /// A primitive type tag.
    Primitive(PrimitiveTy),
    /// A concrete class identity.
    Class(Class),
    /// Ordered alternatives with OR-semantics.
    OneOf(Rc<[TypeDesc]>),
    /// A generic list descriptor. `elem: None` matches any list;
    /// `Some(t)` matches only lists whose tagged element type equals `t`.
    List { elem: Option<Box<TypeDesc>> },
}

impl TypeDesc {
    pub const NUMBER: TypeDesc = TypeDesc::Primitive(PrimitiveTy::Number);
    pub const STRING: TypeDesc = TypeDesc::Primitive(PrimitiveTy::String);
    pub const BOOLEAN: TypeDesc = TypeDesc::Primitive(PrimitiveTy::Boolean);
    pub const SYMBOL: TypeDesc = TypeDesc::Primitive(PrimitiveTy::Symbol);
    pub const BIG_INT: TypeDesc = TypeDesc::Primitive(PrimitiveTy::BigInt);

    /// An ordered alternative set.
    pub fn one_of(alternatives: impl IntoIterator<Item = TypeDesc>) -> TypeDesc {
        TypeDesc::OneOf(alternatives.into_iter().collect())
    }

    /// The descriptor for `List<elem>`.
    pub fn list_of(elem: TypeDesc) -> TypeDesc {
        TypeDesc::List {
            elem: Some(Box::new(elem)),
        }
    }

    /// The descriptor matching any list regardless of element type.
    pub fn any_list() -> TypeDesc {
        TypeDesc::List { elem: None }
    }

    /// Whether `value` satisfies this descriptor.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeDesc::OneOf(alternatives) => alternatives.iter().any(|d| d.matches(value)),
            TypeDesc::Any => !value.is_null(),
            TypeDesc::Rest => true,
            TypeDesc::Null => value.is_null(),
            TypeDesc::Meta => matches!(value, Value::Type(_)),
            TypeDesc::Primitive(tag) => value.primitive_tag() == Some(*tag),
            TypeDesc::List { elem } => match value {
                Value::List(list) => match elem {
                    None => true,
                    // Generic tag equality: List<Number> only admits lists
                    // whose element type is Number.
                    Some(t) => list.inner_type() == **t,
                },
                // Class-as-value: the descriptor itself passed as a value.
                Value::Type(desc) => self == desc,
                _ => false,
            },
            TypeDesc::Class(class) => match value {
                Value::Object(obj) => obj.is_instance_of(class),
                // Class-as-value equality.
                Value::Type(TypeDesc::Class(other)) => class.ptr_eq(other),
                _ => false,
            },
        }
    }

    /// The name used in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            TypeDesc::Any => "(any)".to_string(),
            TypeDesc::Null => "null".to_string(),
            TypeDesc::Rest => "...".to_string(),
            TypeDesc::Meta => "Type".to_string(),
            TypeDesc::Primitive(tag) => tag.wrapper_name().to_string(),
            TypeDesc::Class(class) => class.display_name(),
            TypeDesc::OneOf(alternatives) => {
                let names: Vec<String> =
                    alternatives.iter().map(TypeDesc::display_name).collect();
                format!("({})", names.join(" | "))
            }
            TypeDesc::List { elem: None } => "List".to_string(),
            TypeDesc::List { elem: Some(t) } => format!("List<{}>", t.display_name()),
        }
    }

    /// Whether this descriptor can be a list's element type.
    pub(crate) fn is_element_type(&self) -> bool {
        matches!(
            self,
            TypeDesc::Primitive(_) | TypeDesc::Class(_) | TypeDesc::List { .. }
        )
    }

    /// Reference element types additionally admit null elements.
    pub(crate) fn accepts_null_element(&self) -> bool {
        matches!(self, TypeDesc::Class(_) | TypeDesc::List { .. })
    }

    /// The canonical default used by the count-fill constructor.
    pub(crate) fn default_element(&self) -> Value {
        match self {
            TypeDesc::Primitive(PrimitiveTy::Number) => Value::Number(0.0),
            TypeDesc::Primitive(PrimitiveTy::String) => Value::str(""),
            TypeDesc::Primitive(PrimitiveTy::Boolean) => Value::Bool(false),
            TypeDesc::Primitive(PrimitiveTy::BigInt) => Value::BigInt(0),
            TypeDesc::Primitive(PrimitiveTy::Symbol) => {
                Value::Symbol(crate::value::Symbol::new(None))
            }
            _ => Value::Null,
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        match self {
            TypeDesc::OneOf(alternatives) => {
                !alternatives.is_empty()
                    && alternatives
                        .iter()
                        .all(|d| !d.is_rest_marker() && d.is_well_formed())
            }
            TypeDesc::List { elem: Some(t) } => t.is_element_type() && t.is_well_formed(),
            _ => true,
        }
    }

    fn is_rest_marker(&self) -> bool {
        matches!(self, TypeDesc::Rest)
    }
}

impl overload::Descriptor for TypeDesc {
    fn is_rest(&self) -> bool {
        self.is_rest_marker()
    }

    fn is_recognized(&self) -> bool {
        self.is_well_formed()
    }

    fn shape_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn display_name(&self) -> String {
        TypeDesc::display_name(self)
    }
}

impl overload::Operand<TypeDesc> for Value {
    fn satisfies(&self, desc: &TypeDesc) -> bool {
        desc.matches(self)
    }

    fn type_name(&self) -> String {
        Value::type_name(self)
    }
}
