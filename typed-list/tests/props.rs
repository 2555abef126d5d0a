//! Property-based checks over list operations.

use proptest::prelude::*;
use typed_list::{List, TypeDesc, Value};

fn number_list(values: &[i32]) -> List {
    List::from_values(TypeDesc::NUMBER, values.iter().map(|v| Value::from(*v))).unwrap()
}

fn as_numbers(list: &List) -> Vec<f64> {
    list.iter()
        .map(|v| match v {
            Value::Number(n) => n,
            other => panic!("expected a number, got {other:?}"),
        })
        .collect()
}

proptest! {
    #[test]
    fn roundtrip_preserves_order(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let list = number_list(&values);
        prop_assert_eq!(list.len(), values.len());
        let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        prop_assert_eq!(as_numbers(&list), expected);
    }

    #[test]
    fn sort_is_ordered_permutation(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let list = number_list(&values);
        list.sort();

        let sorted = as_numbers(&list);
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

        let mut expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        expected.sort_by(f64::total_cmp);
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn reverse_twice_is_identity(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let list = number_list(&values);
        list.reverse();
        list.reverse();
        let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        prop_assert_eq!(as_numbers(&list), expected);
    }

    #[test]
    fn slice_never_panics_and_stays_in_bounds(
        values in prop::collection::vec(any::<i32>(), 0..32),
        start in -64i64..64,
        end in -64i64..64,
    ) {
        let list = number_list(&values);
        let sliced = list.slice(start, end);
        prop_assert!(sliced.len() <= list.len());
        // Every sliced element exists in the source
        for item in &sliced {
            prop_assert!(list.contains(&item));
        }
    }

    #[test]
    fn insert_then_remove_at_restores(
        values in prop::collection::vec(any::<i32>(), 0..32),
        index_seed in any::<usize>(),
        inserted in any::<i32>(),
    ) {
        let list = number_list(&values);
        let index = index_seed % (values.len() + 1);

        list.insert(index, Value::from(inserted)).unwrap();
        prop_assert_eq!(list.len(), values.len() + 1);
        prop_assert_eq!(list.get(index), Some(Value::from(inserted)));

        list.remove_at(index).unwrap();
        let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        prop_assert_eq!(as_numbers(&list), expected);
    }

    #[test]
    fn index_of_agrees_with_contains(
        values in prop::collection::vec(0i32..16, 0..32),
        needle in 0i32..16,
    ) {
        let list = number_list(&values);
        let needle = Value::from(needle);
        let index = list.index_of(&needle);
        prop_assert_eq!(index != -1, list.contains(&needle));
        if index != -1 {
            prop_assert_eq!(list.get(index as usize), Some(needle));
        }
    }

    #[test]
    fn find_all_matches_filter(values in prop::collection::vec(any::<i32>(), 0..32)) {
        let list = number_list(&values);
        let kept = list.find_all(|v| matches!(v, Value::Number(n) if *n >= 0.0));
        let expected: Vec<f64> = values
            .iter()
            .filter(|v| **v >= 0)
            .map(|v| *v as f64)
            .collect();
        prop_assert_eq!(as_numbers(&kept), expected);
    }
}
