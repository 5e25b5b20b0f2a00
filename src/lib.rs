//! Generic containers built around `Option` and `Result`.
//!
//! The centerpiece is [`ConcurrentMap`], a lock-free hash map that can be
//! shared between threads without any caller-side locking. Every other
//! container offers the same capability contract for its category
//! ([`Map`], [`Set`], [`List`], [`Deque`], [`Stack`], [`Queue`]) in one or
//! more backing-storage variants.
//!
//! # Conventions
//!
//! - Absence is never an error: lookups return `Option`.
//! - Operational failures (removing a missing key, popping an empty stack,
//!   indexing out of range) return `Result<_, Error>`.
//! - Only the `unwrap` family panics, and only when called on the wrong
//!   variant.
//!
//! # Example
//!
//! ```rust
//! use collectx::ConcurrentMap;
//!
//! let map = ConcurrentMap::new();
//! assert_eq!(map.put("a", 1), None);
//! assert_eq!(map.put("a", 3), Some(1));
//! assert_eq!(map.get(&"a"), Some(3));
//! assert!(map.remove(&"missing").is_err());
//! ```

pub mod array;
pub mod concurrent_map;
pub mod concurrent_set;
pub mod error;
pub mod hash_map;
pub mod hash_set;
pub mod linked;
pub mod list;
pub mod map;
pub mod once;
pub mod option;
pub mod pool;
pub mod result;
pub mod set;

mod sponge;
mod table;

pub use crate::array::{ArrayDeque, ArrayList, ArrayQueue, ArrayStack};
pub use crate::concurrent_map::ConcurrentMap;
pub use crate::concurrent_set::ConcurrentSet;
pub use crate::error::Error;
pub use crate::hash_map::HashMap;
pub use crate::hash_set::HashSet;
pub use crate::linked::{LinkedList, LinkedQueue, LinkedStack};
pub use crate::list::{Deque, List, Queue, Stack};
pub use crate::map::{Entry, Map};
pub use crate::once::{LazyValue, Once};
pub use crate::pool::Pool;
pub use crate::set::Set;

/// Epoch guards for [`ConcurrentMap::lookup`].
///
/// These are `crossbeam-epoch` 0.9 items; a guard from another version of
/// that crate is a different type.
///
/// ```
/// use collectx::{epoch, ConcurrentMap};
///
/// let map = ConcurrentMap::new();
/// map.put(1, "one");
/// let guard = epoch::pin();
/// assert_eq!(map.lookup(&1, &guard), Some(&"one"));
/// ```
pub mod epoch {
    pub use crossbeam_epoch::{pin, Guard};
}
