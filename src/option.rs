//! Optional values.
//!
//! Presence and absence are modelled by the standard `Option<T>`; this module
//! only adds what it lacks. The contract the rest of the crate relies on:
//!
//! | operation        | `Option` method     |
//! |------------------|---------------------|
//! | Some / None      | `Some(v)` / `None`  |
//! | isSome / isNone  | `is_some` / `is_none` |
//! | unwrap (panics)  | `unwrap`            |
//! | unwrapOr         | `unwrap_or`         |
//! | unwrapOrElse     | `unwrap_or_else`    |
//! | map              | `map`               |
//! | flatMap          | `and_then`          |
//! | filter           | `filter`            |
//! | or / orElse      | `or` / `or_else`    |
//! | and              | `and`               |
//!
//! With serde, `Some(v)` serializes as `v` and `None` as the format's null.

/// Builds an owned `Option` from a nullable reference.
///
/// ```
/// use collectx::option::from_ref;
///
/// let name: Option<&str> = Some("ferris");
/// assert_eq!(from_ref(name), Some(String::from("ferris")));
/// assert_eq!(from_ref::<str>(None), None);
/// ```
pub fn from_ref<T>(value: Option<&T>) -> Option<T::Owned>
where
    T: ToOwned + ?Sized,
{
    value.map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn some_unwraps_to_value() {
        assert_eq!(Some(5).unwrap(), 5);
        assert!(!None::<i32>.is_some());
        assert!(None::<i32>.is_none());
    }

    #[test]
    #[should_panic(expected = "called `Option::unwrap()` on a `None` value")]
    fn unwrap_none_panics() {
        None::<i32>.unwrap();
    }

    #[test]
    fn unwrap_or_else_is_lazy() {
        let calls = Cell::new(0);
        let value = Some(1).unwrap_or_else(|| {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!(value, 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(None.unwrap_or_else(|| 9), 9);
        assert_eq!(None.unwrap_or(4), 4);
    }

    #[test]
    fn map_skips_none() {
        let calls = Cell::new(0);
        let double = |v: i32| {
            calls.set(calls.get() + 1);
            v * 2
        };
        assert_eq!(Some(21).map(double), Some(42));
        assert!(None.map(double).is_none());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn and_then_chains() {
        let half = |v: i32| if v % 2 == 0 { Some(v / 2) } else { None };
        assert_eq!(Some(8).and_then(half).and_then(half), Some(2));
        assert_eq!(Some(6).and_then(half).and_then(half), None);
        assert_eq!(None.and_then(half), None);
    }

    #[test]
    fn filter_or_and() {
        assert_eq!(Some(4).filter(|v| v % 2 == 0), Some(4));
        assert_eq!(Some(3).filter(|v| v % 2 == 0), None);
        assert_eq!(None.or(Some(1)), Some(1));
        assert_eq!(Some(2).or(Some(1)), Some(2));
        assert_eq!(None.or_else(|| Some(7)), Some(7));
        assert_eq!(Some(1).and(Some("x")), Some("x"));
        assert_eq!(None::<i32>.and(Some("x")), None);
    }

    #[test]
    fn from_ref_copies() {
        let value = 10;
        assert_eq!(from_ref(Some(&value)), Some(10));
        assert_eq!(from_ref::<i32>(None), None);
    }

    #[test]
    fn serde_null() {
        assert_eq!(serde_json::to_string(&Some(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&None::<i32>).unwrap(), "null");
        assert_eq!(serde_json::from_str::<Option<i32>>("null").unwrap(), None);
        assert_eq!(serde_json::from_str::<Option<String>>("\"hi\"").unwrap(), Some("hi".into()));
        assert!(serde_json::from_str::<Option<i32>>("\"hi\"").is_err());
    }
}
