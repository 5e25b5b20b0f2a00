//! Run-once initialization.
//!
//! [`Once`] runs an initializer exactly once no matter how many threads race
//! on the first call; every caller, including those that arrive while the
//! initializer is still running, blocks until the value is published and
//! then borrows the same cached value. Failures cached through
//! [`Once::call_with_error`] are never retried.
//!
//! If an initializer panics, the cell stays empty and the next caller runs
//! its own initializer.

use once_cell::sync::OnceCell;
use tracing::debug;

/// A cell written by the first successful `call`.
#[derive(Debug)]
pub struct Once<T> {
    cell: OnceCell<T>,
}

impl<T> Once<T> {
    pub const fn new() -> Self {
        Once {
            cell: OnceCell::new(),
        }
    }

    /// Runs `f` if no value is cached yet, then returns the cached value.
    ///
    /// ```
    /// use collectx::Once;
    ///
    /// let once = Once::new();
    /// assert_eq!(*once.call(|| 1), 1);
    /// assert_eq!(*once.call(|| 2), 1);
    /// ```
    pub fn call<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(|| {
            debug!("running once initializer");
            f()
        })
    }

    pub fn is_done(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The cached value, if an initializer has completed.
    pub fn value(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Forgets the cached value so the next `call` initializes again.
    pub fn reset(&mut self) {
        if self.cell.take().is_some() {
            debug!("reset once cell");
        }
    }
}

impl<T, E> Once<Result<T, E>> {
    /// Like [`call`](Once::call) for fallible initializers. An error is
    /// cached exactly like a value.
    pub fn call_with_error<F>(&self, f: F) -> Result<&T, &E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.call(f).as_ref()
    }

    /// The cached error, if the initializer failed.
    pub fn error(&self) -> Option<&E> {
        self.value().and_then(|result| result.as_ref().err())
    }
}

impl<T> Default for Once<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps `f` in a function that runs it on the first call and returns clones
/// of its result afterwards.
///
/// A call whose run of `f` panics caches nothing; the next call runs `f`
/// again.
pub fn once_value<T, F>(f: F) -> impl Fn() -> T
where
    T: Clone,
    F: Fn() -> T,
{
    let cell = OnceCell::new();
    move || cell.get_or_init(&f).clone()
}

/// Wraps `f` in a function that runs it once, with the argument of the
/// first call. Later arguments are dropped.
pub fn once_fn_with_arg<A, F>(f: F) -> impl Fn(A)
where
    F: Fn(A),
{
    let cell = OnceCell::new();
    move |arg: A| {
        cell.get_or_init(|| f(arg));
    }
}

/// A value computed on first access.
pub struct LazyValue<T, F = fn() -> T> {
    cell: OnceCell<T>,
    init: F,
}

impl<T, F> LazyValue<T, F>
where
    F: Fn() -> T,
{
    pub const fn new(init: F) -> Self {
        LazyValue {
            cell: OnceCell::new(),
            init,
        }
    }

    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| {
            debug!("initializing lazy value");
            (self.init)()
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Drops the computed value and installs a new initializer.
    pub fn reset(&mut self, init: F) {
        self.cell = OnceCell::new();
        self.init = init;
        debug!("reset lazy value");
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for LazyValue<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyValue")
            .field("value", &self.cell.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::panic;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn call_caches_first_value() {
        let mut once = Once::new();
        assert!(!once.is_done());
        assert_eq!(once.value(), None);
        assert_eq!(*once.call(|| "first"), "first");
        assert_eq!(*once.call(|| "second"), "first");
        assert!(once.is_done());

        once.reset();
        assert!(!once.is_done());
        assert_eq!(*once.call(|| "third"), "third");
    }

    #[test]
    fn errors_are_cached() {
        let calls = AtomicUsize::new(0);
        let once: Once<Result<i32, Error>> = Once::new();
        let attempt = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Empty)
        };
        assert_eq!(once.call_with_error(attempt), Err(&Error::Empty));
        assert_eq!(once.call_with_error(|| Ok(1)), Err(&Error::Empty));
        assert_eq!(once.error(), Some(&Error::Empty));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let ok: Once<Result<i32, Error>> = Once::new();
        assert_eq!(ok.call_with_error(|| Ok(5)), Ok(&5));
        assert_eq!(ok.error(), None);
    }

    #[test]
    fn panicking_initializer_leaves_cell_empty() {
        let once = Once::new();
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            once.call(|| -> i32 { panic!("boom") });
        }));
        assert!(result.is_err());
        assert!(!once.is_done());
        assert_eq!(*once.call(|| 3), 3);
    }

    #[test]
    fn panicking_once_value_retries() {
        let calls = AtomicUsize::new(0);
        let get = once_value(|| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first attempt fails");
            }
            5
        });
        assert!(panic::catch_unwind(panic::AssertUnwindSafe(|| get())).is_err());
        assert_eq!(get(), 5);
        assert_eq!(get(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_lazy_value_retries() {
        let calls = AtomicUsize::new(0);
        let lazy = LazyValue::new(|| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first attempt fails");
            }
            "ready"
        });
        assert!(panic::catch_unwind(panic::AssertUnwindSafe(|| *lazy.get())).is_err());
        assert!(!lazy.is_initialized());
        assert_eq!(*lazy.get(), "ready");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fn_with_arg_keeps_first_argument() {
        let seen = std::sync::Mutex::new(Vec::new());
        let record = once_fn_with_arg(|arg: &str| seen.lock().unwrap().push(arg.to_string()));
        record("first");
        record("second");
        assert_eq!(*seen.lock().unwrap(), vec!["first".to_string()]);
    }

    #[test]
    fn once_value_runs_once() {
        let calls = AtomicUsize::new(0);
        let get = once_value(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![1, 2]
        });
        assert_eq!(get(), vec![1, 2]);
        assert_eq!(get(), vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_value() {
        let mut lazy: LazyValue<String, Box<dyn Fn() -> String>> =
            LazyValue::new(Box::new(|| "a".to_string()));
        assert!(!lazy.is_initialized());
        assert_eq!(lazy.get(), "a");
        assert!(lazy.is_initialized());

        lazy.reset(Box::new(|| "b".to_string()));
        assert!(!lazy.is_initialized());
        assert_eq!(lazy.get(), "b");
    }

    #[test]
    fn lazy_value_with_fn_pointer() {
        fn answer() -> u32 {
            42
        }
        let lazy: LazyValue<u32> = LazyValue::new(answer);
        assert_eq!(*lazy.get(), 42);
        assert_eq!(format!("{:?}", lazy), "LazyValue { value: Some(42) }");
    }
}
