//! End-to-end exercises of the dynamic invocation surface.

use overload::DispatchError;
use pretty_assertions::assert_eq;
use typed_list::{List, ListError, TypeDesc, Value};

fn number_list(values: &[i32]) -> List {
    List::from_values(TypeDesc::NUMBER, values.iter().map(|v| Value::from(*v))).unwrap()
}

#[test]
fn constructor_shapes() {
    let ty = Value::Type(TypeDesc::NUMBER);

    let empty = List::construct(std::slice::from_ref(&ty)).unwrap();
    assert!(empty.is_empty());

    let filled = List::construct(&[ty.clone(), Value::from(3)]).unwrap();
    assert_eq!(filled.to_vec(), vec![Value::from(0); 3]);

    let copied = List::construct(&[ty, Value::List(filled.clone())]).unwrap();
    assert_eq!(copied.to_vec(), filled.to_vec());
    assert_ne!(copied, filled);
}

#[test]
fn constructor_rejects_unknown_shapes() {
    let err = List::construct(&[]).unwrap_err();
    assert!(matches!(
        err,
        ListError::Dispatch(DispatchError::NoMatchingOverload { .. })
    ));

    let err = List::construct(&[Value::from("Number")]).unwrap_err();
    assert!(matches!(
        err,
        ListError::Dispatch(DispatchError::NoMatchingOverload { .. })
    ));
}

#[test]
fn full_session_through_invoke() {
    let list = number_list(&[]);

    list.invoke("add_range", &[Value::from(3), Value::from(1), Value::from(2)])
        .unwrap();
    list.invoke("sort", &[]).unwrap();
    assert_eq!(list.invoke("join", &[]).unwrap(), Value::str("1,2,3"));

    list.invoke("insert", &[Value::from(0), Value::from(0)])
        .unwrap();
    assert_eq!(
        list.invoke("index_of", &[Value::from(0)]).unwrap(),
        Value::from(0)
    );
    assert_eq!(
        list.invoke("remove", &[Value::from(0)]).unwrap(),
        Value::Bool(true)
    );

    list.invoke("reverse", &[]).unwrap();
    assert_eq!(
        list.to_vec(),
        vec![Value::from(3), Value::from(2), Value::from(1)]
    );

    list.invoke("clear", &[]).unwrap();
    assert_eq!(list.len(), 0);
    // Element type survives a clear
    assert!(list.invoke("add", &[Value::from("x")]).is_err());
}

#[test]
fn mismatch_diagnostics_name_every_candidate() {
    let list = number_list(&[1]);
    let err = list
        .invoke("insert", &[Value::from("zero"), Value::from(1)])
        .unwrap_err();

    let ListError::Dispatch(dispatch) = err else {
        panic!("expected a dispatch error");
    };
    let report = dispatch.report();
    assert!(report.contains("no overload of `insert` matches 2 argument(s)"));
    assert!(report.contains("expected Number at position 0, got String"));
}

#[test]
fn overload_priority_follows_registration_order() {
    // A list-of-lists makes a single list argument ambiguous between
    // add_range's list overload and its rest overload; the list overload
    // was registered first, so the argument's elements are copied.
    let nested = List::new(TypeDesc::list_of(TypeDesc::NUMBER)).unwrap();
    let inner = number_list(&[1, 2]);
    let err = nested
        .invoke("add_range", &[Value::List(inner)])
        .unwrap_err();
    // Copying a List<Number>'s numbers into a List<List<Number>> fails
    // element-wise, proving the copy overload won over the rest overload.
    assert!(matches!(err, ListError::TypeMismatch { .. }));
}

#[test]
fn inner_type_round_trips_through_construct() {
    let list = number_list(&[1]);
    let ty = list.invoke("inner_type", &[]).unwrap();
    assert_eq!(ty, Value::Type(TypeDesc::NUMBER));

    let rebuilt = List::construct(&[ty]).unwrap();
    assert_eq!(rebuilt.inner_type(), TypeDesc::NUMBER);
}

#[test]
fn to_string_matches_display() {
    let list = number_list(&[1, 2, 3]);
    assert_eq!(
        list.invoke("to_string", &[]).unwrap(),
        Value::str(list.to_string())
    );
}

#[test]
fn string_keyed_indexer() {
    let list = number_list(&[7, 8]);
    assert_eq!(list.get_item("0"), Some(Value::from(7)));
    assert_eq!(list.get_item("9"), None);
    assert_eq!(list.get_item("x"), None);
    assert_eq!(list.get_item("-1"), None);

    list.set_item("1", Value::from(9)).unwrap();
    assert_eq!(list.get(1), Some(Value::from(9)));

    let err = list.set_item("5", Value::from(1)).unwrap_err();
    assert_eq!(err, ListError::IndexOutOfRange { index: 5, len: 2 });
    let err = list.set_item("name", Value::from(1)).unwrap_err();
    assert!(matches!(err, ListError::InvalidProperty { .. }));
}
