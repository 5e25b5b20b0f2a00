//! Operational failures reported by the containers.

use thiserror::Error;

/// Recoverable, caller-actionable container failures.
///
/// Absence is not represented here; lookups report it through `Option`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The key is not present in the map.
    #[error("key not found")]
    KeyNotFound,

    /// The element is not present in the set.
    #[error("element not found")]
    ElementNotFound,

    /// A positional operation referred past the end of the list.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The collection has no element to remove.
    #[error("collection is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::IndexOutOfBounds { index: 7, len: 3 }.to_string(),
            "index 7 out of bounds for length 3"
        );
        assert_eq!(Error::Empty.to_string(), "collection is empty");
    }
}
