use collectx::{ConcurrentMap, Error, HashMap, Map};
use itertools::Itertools;

fn put_reports_previous<M: Map<String, i32> + Default>() {
    let mut map = M::default();
    assert_eq!(map.put("a".into(), 1), None);
    assert_eq!(map.put("b".into(), 2), None);
    assert_eq!(map.put("a".into(), 3), Some(1));
    assert_eq!(map.size(), 2);
    assert_eq!(map.get(&"a".into()), Some(3));
    assert_eq!(map.put("a".into(), 3), Some(3));
    assert_eq!(map.size(), 2);
}

fn missing_keys<M: Map<String, i32> + Default>() {
    let mut map = M::default();
    assert_eq!(map.remove(&"missing".into()), Err(Error::KeyNotFound));
    assert_eq!(map.get(&"missing".into()), None);
    assert!(!map.contains_key(&"missing".into()));
    assert!(map.is_empty());
}

fn remove_then_get<M: Map<String, i32> + Default>() {
    let mut map = M::default();
    map.put("k".into(), 9);
    assert!(map.contains_key(&"k".into()));
    assert_eq!(map.remove(&"k".into()), Ok(9));
    assert_eq!(map.get(&"k".into()), None);
    assert_eq!(map.size(), 0);
}

fn clear_empties<M: Map<String, i32> + Default>() {
    let mut map = M::default();
    for (i, key) in ["x", "y", "z"].iter().enumerate() {
        map.put(key.to_string(), i as i32);
    }
    assert_eq!(map.size(), 3);
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.size(), 0);
    assert!(map.keys().is_empty());
}

fn filter_leaves_receiver<M: Map<String, i32> + Default>() {
    let mut map = M::default();
    for (key, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        map.put(key.into(), value);
    }
    let even = map.filter(|_, value| value % 2 == 0);
    assert_eq!(even.size(), 2);
    assert_eq!(
        even.entries()
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .sorted()
            .collect_vec(),
        vec![("b".to_string(), 2), ("d".to_string(), 4)]
    );
    assert_eq!(map.size(), 4);
    assert_eq!(map.get(&"a".into()), Some(1));
}

fn snapshots<M: Map<String, i32> + Default>() {
    let mut map = M::default();
    for (key, value) in [("one", 1), ("two", 2), ("three", 3)] {
        map.put(key.into(), value);
    }
    assert_eq!(map.keys().into_iter().sorted().collect_vec(), vec!["one", "three", "two"]);
    assert_eq!(map.values().into_iter().sorted().collect_vec(), vec![1, 2, 3]);
    assert!(map.contains_value(&2));
    assert!(!map.contains_value(&5));
    assert_eq!(map.find_key(&3), Some("three".to_string()));
    assert_eq!(map.find_key(&5), None);

    let found = map.find_entry(|key, _| key.starts_with('t') && key.len() == 3);
    assert_eq!(found.map(|entry| entry.value), Some(2));

    let mut total = 0;
    map.for_each(|_, value| total += value);
    assert_eq!(total, 6);
}

macro_rules! contract_tests {
    ($name:ident, $map:ty) => {
        mod $name {
            use super::*;

            #[test]
            fn put_reports_previous_value() {
                put_reports_previous::<$map>();
            }

            #[test]
            fn missing_keys_are_not_errors_except_remove() {
                missing_keys::<$map>();
            }

            #[test]
            fn remove_then_get_is_none() {
                remove_then_get::<$map>();
            }

            #[test]
            fn clear_makes_map_empty() {
                clear_empties::<$map>();
            }

            #[test]
            fn filter_keeps_matching_entries() {
                filter_leaves_receiver::<$map>();
            }

            #[test]
            fn snapshot_operations() {
                snapshots::<$map>();
            }
        }
    };
}

contract_tests!(sequential, HashMap<String, i32>);
contract_tests!(concurrent, ConcurrentMap<String, i32>);

#[test]
fn concurrent_map_json() {
    let map: ConcurrentMap<String, Vec<u8>> = vec![
        ("a".to_string(), vec![1]),
        ("b".to_string(), vec![2, 3]),
    ]
    .into_iter()
    .collect();
    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(json, serde_json::json!({"a": [1], "b": [2, 3]}));

    let back: ConcurrentMap<String, Vec<u8>> = serde_json::from_value(json).unwrap();
    assert_eq!(back.size(), 2);
    assert_eq!(back.get("b"), Some(vec![2, 3]));
}

#[test]
fn extend_overwrites() {
    let mut map = ConcurrentMap::new();
    map.extend(vec![(1, "a"), (2, "b")]);
    map.extend(vec![(1, "c")]);
    assert_eq!(map.get(&1), Some("c"));
    assert_eq!(map.size(), 2);
}
