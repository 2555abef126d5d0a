//! Dynamic invocation surface.
//!
//! Every list exposes its operations a second way: by string name with a
//! slice of [`Value`] arguments, routed through per-method
//! [`OverloadSet`]s. The sets are specialized to the list's element type
//! (an `add` on a `List<Number>` only admits numbers) and are built once
//! per list, on first dynamic call.
//!
//! Construction itself is overloaded the same way: [`List::construct`]
//! resolves `(type)`, `(type, list)` and `(type, count)` shapes through a
//! process-wide set.

use std::rc::Rc;

use indexmap::IndexMap;
use overload::{DispatchError, OverloadSet, Signature, SignatureError};
use tracing::debug;

use crate::descriptor::TypeDesc;
use crate::error::ListError;
use crate::list::List;
use crate::value::Value;

type Handler = Rc<dyn Fn(&List, &[Value]) -> Result<Value, ListError>>;

type ConstructFn = fn(&[Value]) -> Result<List, ListError>;

thread_local! {
    static CONSTRUCT: Result<OverloadSet<TypeDesc, ConstructFn>, SignatureError> =
        build_construct_set();
}

fn build_construct_set() -> Result<OverloadSet<TypeDesc, ConstructFn>, SignatureError> {
    let mut set = OverloadSet::new("List");
    set.register(
        Signature::new(vec![TypeDesc::Meta])?,
        construct_empty as ConstructFn,
    )?
    .register(
        Signature::new(vec![TypeDesc::Meta, TypeDesc::any_list()])?,
        construct_copy,
    )?
    .register(
        Signature::new(vec![TypeDesc::Meta, TypeDesc::NUMBER])?,
        construct_filled,
    )?;
    Ok(set)
}

fn construct_empty(args: &[Value]) -> Result<List, ListError> {
    List::new(elem_ty_arg(args.first())?)
}

fn construct_copy(args: &[Value]) -> Result<List, ListError> {
    let list = List::new(elem_ty_arg(args.first())?)?;
    if let Some(Value::List(src)) = args.get(1) {
        list.add_range(src.iter())?;
    }
    Ok(list)
}

fn construct_filled(args: &[Value]) -> Result<List, ListError> {
    let elem_ty = elem_ty_arg(args.first())?;
    let count = count_arg(args.get(1))?;
    List::with_len(elem_ty, count)
}

impl List {
    /// Overloaded construction: `(type)` for an empty list, `(type, list)`
    /// to copy another list's elements through validation, `(type, count)`
    /// for a default-filled list.
    pub fn construct(args: &[Value]) -> Result<List, ListError> {
        CONSTRUCT.with(|set| {
            let set = set.as_ref().map_err(|e| ListError::Signature(e.clone()))?;
            let handler = *set.resolve(args)?;
            handler(args)
        })
    }

    /// Invoke an operation by name with dynamically-typed arguments.
    ///
    /// Closure-taking operations (predicates, comparators, converters)
    /// have no dynamic rendition; use their static methods.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ListError> {
        let table = self.method_table()?;
        table.invoke(self, name, args)
    }

    fn method_table(&self) -> Result<Rc<MethodTable>, ListError> {
        if let Some(table) = self.shared.methods.borrow().as_ref() {
            return Ok(table.clone());
        }
        let table = Rc::new(MethodTable::build(&self.shared.elem_ty)?);
        *self.shared.methods.borrow_mut() = Some(table.clone());
        Ok(table)
    }
}

/// Per-method overload sets for one element type, built once per list.
pub(crate) struct MethodTable {
    methods: IndexMap<&'static str, OverloadSet<TypeDesc, Handler>>,
}

impl MethodTable {
    fn build(elem_ty: &TypeDesc) -> Result<MethodTable, SignatureError> {
        // Element-typed parameter slots additionally admit null when the
        // element type is a reference type, mirroring the add/set paths.
        let elem = if elem_ty.accepts_null_element() {
            TypeDesc::one_of([elem_ty.clone(), TypeDesc::Null])
        } else {
            elem_ty.clone()
        };
        let num = TypeDesc::NUMBER;

        let mut methods: IndexMap<&'static str, OverloadSet<TypeDesc, Handler>> = IndexMap::new();

        method(&mut methods, "add").register(
            sig(vec![elem.clone()])?,
            on(|list, args| {
                list.add(arg(args, 0))?;
                Ok(Value::Null)
            }),
        )?;

        // A single list argument copies its elements; any other argument
        // sequence is appended element-wise.
        method(&mut methods, "add_range")
            .register(
                sig(vec![TypeDesc::any_list()])?,
                on(|list, args| {
                    if let Value::List(src) = arg(args, 0) {
                        list.add_range(src.iter())?;
                    }
                    Ok(Value::Null)
                }),
            )?
            .register(
                sig(vec![TypeDesc::Rest])?,
                on(|list, args| {
                    list.add_range(args.iter().cloned())?;
                    Ok(Value::Null)
                }),
            )?;

        method(&mut methods, "insert").register(
            sig(vec![num.clone(), elem.clone()])?,
            on(|list, args| {
                let index = index_arg(&arg(args, 0), list.len())?;
                list.insert(index, arg(args, 1))?;
                Ok(Value::Null)
            }),
        )?;

        method(&mut methods, "insert_range")
            .register(
                sig(vec![num.clone(), TypeDesc::any_list()])?,
                on(|list, args| {
                    let index = index_arg(&arg(args, 0), list.len())?;
                    if let Value::List(src) = arg(args, 1) {
                        list.insert_range(index, src.iter())?;
                    }
                    Ok(Value::Null)
                }),
            )?
            .register(
                sig(vec![num.clone(), TypeDesc::Rest])?,
                on(|list, args| {
                    let index = index_arg(&arg(args, 0), list.len())?;
                    list.insert_range(index, args.iter().skip(1).cloned())?;
                    Ok(Value::Null)
                }),
            )?;

        method(&mut methods, "remove").register(
            sig(vec![elem.clone()])?,
            on(|list, args| Ok(Value::Bool(list.remove(&arg(args, 0))))),
        )?;

        method(&mut methods, "remove_at").register(
            sig(vec![num.clone()])?,
            on(|list, args| {
                let index = index_arg(&arg(args, 0), list.len())?;
                list.remove_at(index)
            }),
        )?;

        method(&mut methods, "remove_range").register(
            sig(vec![num.clone(), num.clone()])?,
            on(|list, args| {
                let index = index_arg(&arg(args, 0), list.len())?;
                let count = count_arg(args.get(1))?;
                list.remove_range(index, count)?;
                Ok(Value::Null)
            }),
        )?;

        method(&mut methods, "clear").register(
            sig(vec![])?,
            on(|list, _| {
                list.clear();
                Ok(Value::Null)
            }),
        )?;

        method(&mut methods, "reverse")
            .register(
                sig(vec![])?,
                on(|list, _| {
                    list.reverse();
                    Ok(Value::Null)
                }),
            )?
            .register(
                sig(vec![num.clone(), num.clone()])?,
                on(|list, args| {
                    let index = index_arg(&arg(args, 0), list.len())?;
                    let count = count_arg(args.get(1))?;
                    list.reverse_range(index, count)?;
                    Ok(Value::Null)
                }),
            )?;

        method(&mut methods, "sort").register(
            sig(vec![])?,
            on(|list, _| {
                list.sort();
                Ok(Value::Null)
            }),
        )?;

        method(&mut methods, "contains").register(
            sig(vec![elem.clone()])?,
            on(|list, args| Ok(Value::Bool(list.contains(&arg(args, 0))))),
        )?;

        method(&mut methods, "index_of").register(
            sig(vec![elem.clone()])?,
            on(|list, args| Ok(Value::Number(list.index_of(&arg(args, 0)) as f64))),
        )?;

        method(&mut methods, "last_index_of").register(
            sig(vec![elem.clone()])?,
            on(|list, args| Ok(Value::Number(list.last_index_of(&arg(args, 0)) as f64))),
        )?;

        method(&mut methods, "slice")
            .register(
                sig(vec![])?,
                on(|list, _| Ok(Value::List(list.slice(0, list.len() as i64)))),
            )?
            .register(
                sig(vec![num.clone()])?,
                on(|list, args| {
                    let start = offset_arg(&arg(args, 0))?;
                    Ok(Value::List(list.slice(start, list.len() as i64)))
                }),
            )?
            .register(
                sig(vec![num.clone(), num.clone()])?,
                on(|list, args| {
                    let start = offset_arg(&arg(args, 0))?;
                    let end = offset_arg(&arg(args, 1))?;
                    Ok(Value::List(list.slice(start, end)))
                }),
            )?;

        method(&mut methods, "concat").register(
            sig(vec![TypeDesc::any_list()])?,
            on(|list, args| {
                if let Value::List(other) = arg(args, 0) {
                    Ok(Value::List(list.concat(&other)?))
                } else {
                    Ok(Value::Null)
                }
            }),
        )?;

        method(&mut methods, "clone").register(
            sig(vec![])?,
            on(|list, _| Ok(Value::List(list.deep_clone()))),
        )?;

        method(&mut methods, "join")
            .register(sig(vec![])?, on(|list, _| Ok(Value::str(list.join(",")))))?
            .register(
                sig(vec![TypeDesc::STRING])?,
                on(|list, args| {
                    let separator = match arg(args, 0) {
                        Value::Str(s) => s,
                        _ => Rc::from(","),
                    };
                    Ok(Value::str(list.join(&separator)))
                }),
            )?;

        // Rendering never depends on the call shape, so the whole method
        // is one any-arity fallback.
        method(&mut methods, "to_string").register_fallback(on(|list, _| Ok(Value::str(list.to_string()))))?;

        method(&mut methods, "inner_type").register(
            sig(vec![])?,
            on(|list, _| Ok(Value::Type(list.inner_type()))),
        )?;

        debug!(
            elem = %elem_ty.display_name(),
            methods = methods.len(),
            "built dynamic method table"
        );
        Ok(MethodTable { methods })
    }

    fn invoke(&self, list: &List, name: &str, args: &[Value]) -> Result<Value, ListError> {
        let set = self
            .methods
            .get(name)
            .ok_or_else(|| DispatchError::NoOverload {
                operation: name.to_string(),
            })?;
        let handler = set.resolve(args)?.clone();
        handler(list, args)
    }
}

fn method<'a>(
    methods: &'a mut IndexMap<&'static str, OverloadSet<TypeDesc, Handler>>,
    name: &'static str,
) -> &'a mut OverloadSet<TypeDesc, Handler> {
    methods.entry(name).or_insert_with(|| OverloadSet::new(name))
}

fn sig(params: Vec<TypeDesc>) -> Result<Signature<TypeDesc>, SignatureError> {
    Signature::new(params)
}

fn on(f: impl Fn(&List, &[Value]) -> Result<Value, ListError> + 'static) -> Handler {
    Rc::new(f)
}

/// Positional argument fetch; the signature has already guaranteed the
/// position exists, so a miss degrades to null rather than panicking.
fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

fn elem_ty_arg(arg: Option<&Value>) -> Result<TypeDesc, ListError> {
    match arg {
        Some(Value::Type(desc)) => Ok(desc.clone()),
        Some(other) => Err(ListError::type_mismatch("a type", other.type_name())),
        None => Err(ListError::type_mismatch("a type", "nothing")),
    }
}

/// A dynamic number used as a list index: finite, integral, non-negative.
fn index_arg(value: &Value, len: usize) -> Result<usize, ListError> {
    let n = integral_arg(value, "an integer index")?;
    if n < 0 {
        return Err(ListError::IndexOutOfRange { index: n, len });
    }
    Ok(n as usize)
}

/// A dynamic number used as a count: finite, integral, non-negative.
fn count_arg(value: Option<&Value>) -> Result<usize, ListError> {
    let expected = "a non-negative integer count";
    let Some(value) = value else {
        return Err(ListError::type_mismatch(expected, "nothing"));
    };
    let n = integral_arg(value, expected)?;
    if n < 0 {
        return Err(ListError::type_mismatch(expected, value.to_string()));
    }
    Ok(n as usize)
}

/// A dynamic number used as a slice offset; negatives count from the end.
fn offset_arg(value: &Value) -> Result<i64, ListError> {
    integral_arg(value, "an integer offset")
}

fn integral_arg(value: &Value, expected: &str) -> Result<i64, ListError> {
    match value {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(*n as i64),
        Value::Number(n) => Err(ListError::type_mismatch(expected, n.to_string())),
        other => Err(ListError::type_mismatch(expected, other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_list(values: &[i32]) -> List {
        let list = List::new(TypeDesc::NUMBER).unwrap();
        for v in values {
            list.add(Value::from(*v)).unwrap();
        }
        list
    }

    // ============================================================
    // Construction Dispatch
    // ============================================================

    #[test]
    fn test_construct_empty() {
        let list = List::construct(&[Value::Type(TypeDesc::NUMBER)]).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.inner_type(), TypeDesc::NUMBER);
    }

    #[test]
    fn test_construct_copy_validates_elements() {
        let src = number_list(&[1, 2]);
        let copy =
            List::construct(&[Value::Type(TypeDesc::NUMBER), Value::List(src.clone())]).unwrap();
        assert_eq!(copy.to_vec(), src.to_vec());
        assert_ne!(copy, src);

        // Copying into an incompatible element type fails element-wise
        let err =
            List::construct(&[Value::Type(TypeDesc::STRING), Value::List(src)]).unwrap_err();
        assert!(matches!(err, ListError::TypeMismatch { .. }));
    }

    #[test]
    fn test_construct_filled() {
        let list =
            List::construct(&[Value::Type(TypeDesc::STRING), Value::from(3)]).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), Some(Value::str("")));
    }

    #[test]
    fn test_construct_rejects_bad_count() {
        let err =
            List::construct(&[Value::Type(TypeDesc::NUMBER), Value::from(-1)]).unwrap_err();
        assert!(matches!(err, ListError::TypeMismatch { .. }));

        let err =
            List::construct(&[Value::Type(TypeDesc::NUMBER), Value::from(1.5)]).unwrap_err();
        assert!(matches!(err, ListError::TypeMismatch { .. }));
    }

    #[test]
    fn test_construct_unmatched_shape() {
        let err = List::construct(&[Value::from(1)]).unwrap_err();
        assert!(matches!(
            err,
            ListError::Dispatch(DispatchError::NoMatchingOverload { .. })
        ));
    }

    // ============================================================
    // Method Dispatch
    // ============================================================

    #[test]
    fn test_invoke_add_enforces_element_type() {
        let list = number_list(&[]);
        list.invoke("add", &[Value::from(1)]).unwrap();
        assert_eq!(list.to_vec(), vec![Value::from(1)]);

        let err = list.invoke("add", &[Value::from("x")]).unwrap_err();
        match err {
            ListError::Dispatch(DispatchError::NoMatchingOverload {
                operation,
                arity,
                candidates,
            }) => {
                assert_eq!(operation, "add");
                assert_eq!(arity, 1);
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].expected, "Number");
                assert_eq!(candidates[0].actual, "String");
            }
            other => panic!("expected NoMatchingOverload, got {other:?}"),
        }
    }

    #[test]
    fn test_invoke_add_range_overloads() {
        let list = number_list(&[]);

        // List argument: elements are copied
        let src = number_list(&[1, 2]);
        list.invoke("add_range", &[Value::List(src)]).unwrap();
        // Rest argument sequence: appended element-wise
        list.invoke("add_range", &[Value::from(3), Value::from(4)])
            .unwrap();
        assert_eq!(
            list.to_vec(),
            vec![Value::from(1), Value::from(2), Value::from(3), Value::from(4)]
        );
    }

    #[test]
    fn test_invoke_insert_and_remove() {
        let list = number_list(&[1, 3]);
        list.invoke("insert", &[Value::from(1), Value::from(2)])
            .unwrap();
        assert_eq!(
            list.to_vec(),
            vec![Value::from(1), Value::from(2), Value::from(3)]
        );

        let removed = list.invoke("remove", &[Value::from(2)]).unwrap();
        assert_eq!(removed, Value::Bool(true));
        let removed = list.invoke("remove_at", &[Value::from(0)]).unwrap();
        assert_eq!(removed, Value::from(1));
        assert_eq!(list.to_vec(), vec![Value::from(3)]);
    }

    #[test]
    fn test_invoke_reverse_overloads() {
        let list = number_list(&[1, 2, 3, 4, 5]);
        list.invoke("reverse", &[Value::from(1), Value::from(3)])
            .unwrap();
        assert_eq!(
            list.to_vec(),
            vec![
                Value::from(1),
                Value::from(4),
                Value::from(3),
                Value::from(2),
                Value::from(5)
            ]
        );
        list.invoke("reverse", &[]).unwrap();
        assert_eq!(list.get(0), Some(Value::from(5)));
    }

    #[test]
    fn test_invoke_queries() {
        let list = number_list(&[1, 2, 2]);
        assert_eq!(
            list.invoke("contains", &[Value::from(2)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            list.invoke("index_of", &[Value::from(2)]).unwrap(),
            Value::from(1)
        );
        assert_eq!(
            list.invoke("last_index_of", &[Value::from(2)]).unwrap(),
            Value::from(2)
        );
        assert_eq!(
            list.invoke("index_of", &[Value::from(9)]).unwrap(),
            Value::from(-1)
        );
    }

    #[test]
    fn test_invoke_slice_and_clone() {
        let list = number_list(&[1, 2, 3]);
        let sliced = list.invoke("slice", &[Value::from(1)]).unwrap();
        let Value::List(sliced) = sliced else {
            panic!("expected a list");
        };
        assert_eq!(sliced.to_vec(), vec![Value::from(2), Value::from(3)]);

        let cloned = list.invoke("clone", &[]).unwrap();
        let Value::List(cloned) = cloned else {
            panic!("expected a list");
        };
        assert_eq!(cloned.to_vec(), list.to_vec());
        assert_ne!(cloned, list);
    }

    #[test]
    fn test_invoke_join_overloads() {
        let list = number_list(&[1, 2]);
        assert_eq!(list.invoke("join", &[]).unwrap(), Value::str("1,2"));
        assert_eq!(
            list.invoke("join", &[Value::from("-")]).unwrap(),
            Value::str("1-2")
        );
    }

    #[test]
    fn test_to_string_is_any_arity_fallback() {
        let list = number_list(&[1, 2]);
        assert_eq!(list.invoke("to_string", &[]).unwrap(), Value::str("1,2"));
        // Arguments are ignored rather than rejected
        assert_eq!(
            list.invoke("to_string", &[Value::from(9), Value::from("x")])
                .unwrap(),
            Value::str("1,2")
        );
    }

    #[test]
    fn test_invoke_unknown_method() {
        let list = number_list(&[]);
        let err = list.invoke("transmogrify", &[]).unwrap_err();
        assert!(matches!(
            err,
            ListError::Dispatch(DispatchError::NoOverload { .. })
        ));
    }

    #[test]
    fn test_invoke_rejects_fractional_index() {
        let list = number_list(&[1, 2]);
        let err = list
            .invoke("remove_at", &[Value::from(0.5)])
            .unwrap_err();
        assert_eq!(err, ListError::type_mismatch("an integer index", "0.5"));
    }

    #[test]
    fn test_element_slot_admits_null_for_reference_types() {
        let lists = List::new(TypeDesc::list_of(TypeDesc::NUMBER)).unwrap();
        lists.invoke("add", &[Value::Null]).unwrap();
        assert_eq!(lists.get(0), Some(Value::Null));

        // Primitive element slots stay null-free
        let nums = number_list(&[]);
        assert!(nums.invoke("add", &[Value::Null]).is_err());
    }
}
