//! Success-or-failure values.
//!
//! Results are the standard `Result<T, E>`. Its methods cover the contract
//! the containers rely on (`is_ok`, `is_err`, `unwrap`, `unwrap_err`,
//! `unwrap_or`, `unwrap_or_else`, `map`, `map_err`, `and_then` for flatMap,
//! `and`, `or`, `or_else`, `ok`, `err`). This module adds:
//!
//! - [`from_pair`] / [`try_with`]: build a `Result` from a value paired with
//!   a nullable error,
//! - [`Tagged`] and the [`tagged`] serde module: the `{"ok": v}` /
//!   `{"err": e}` wire form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `Err(e)` if `error` is present, `Ok(value)` otherwise.
///
/// ```
/// use collectx::result::from_pair;
///
/// assert_eq!(from_pair::<_, &str>(3, None), Ok(3));
/// assert_eq!(from_pair(3, Some("boom")), Err("boom"));
/// ```
pub fn from_pair<T, E>(value: T, error: Option<E>) -> Result<T, E> {
    match error {
        Some(error) => Err(error),
        None => Ok(value),
    }
}

/// Runs `f` and converts the pair it returns with [`from_pair`].
pub fn try_with<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce() -> (T, Option<E>),
{
    let (value, error) = f();
    from_pair(value, error)
}

/// A `Result` that serializes as `{"ok": value}` or `{"err": error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tagged<T, E>(pub Result<T, E>);

impl<T, E> Tagged<T, E> {
    pub fn into_inner(self) -> Result<T, E> {
        self.0
    }
}

impl<T, E> From<Result<T, E>> for Tagged<T, E> {
    fn from(result: Result<T, E>) -> Self {
        Tagged(result)
    }
}

impl<T, E> From<Tagged<T, E>> for Result<T, E> {
    fn from(tagged: Tagged<T, E>) -> Self {
        tagged.0
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Tagged<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Ok(value) => write!(f, "Ok({})", value),
            Err(error) => write!(f, "Err({})", error),
        }
    }
}

impl<T: Serialize, E: Serialize> Serialize for Tagged<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        tagged::serialize(&self.0, serializer)
    }
}

impl<'de, T: Deserialize<'de>, E: Deserialize<'de>> Deserialize<'de> for Tagged<T, E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        tagged::deserialize(deserializer).map(Tagged)
    }
}

/// Serde adapter for `#[serde(with = "collectx::result::tagged")]` fields.
///
/// A document must carry exactly one of the `ok` / `err` keys.
pub mod tagged {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum TaggedRef<'a, T, E> {
        Ok(&'a T),
        Err(&'a E),
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum TaggedOwned<T, E> {
        Ok(T),
        Err(E),
    }

    pub fn serialize<T, E, S>(result: &Result<T, E>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        E: Serialize,
        S: Serializer,
    {
        match result {
            Ok(value) => TaggedRef::<T, E>::Ok(value),
            Err(error) => TaggedRef::Err(error),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, T, E, D>(deserializer: D) -> Result<Result<T, E>, D::Error>
    where
        T: Deserialize<'de>,
        E: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(match TaggedOwned::<T, E>::deserialize(deserializer)? {
            TaggedOwned::Ok(value) => Ok(value),
            TaggedOwned::Err(error) => Err(error),
        })
    }
}
