//! A thread-safe pool of reusable objects.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Hands out cached objects, creating new ones with a factory when the pool
/// is empty.
///
/// ```
/// use collectx::Pool;
///
/// let pool = Pool::new(|| Vec::<u8>::with_capacity(1024));
/// let mut buf = pool.get();
/// buf.extend_from_slice(b"hello");
/// buf.clear();
/// pool.put(buf);
/// assert_eq!(pool.idle(), 1);
/// ```
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    factory: Factory<T>,
    max_idle: usize,
}

impl<T> Pool<T> {
    /// Creates a pool without an idle limit.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_max_idle(usize::MAX, factory)
    }

    /// Creates a pool that keeps at most `max_idle` objects; extra objects
    /// returned with [`put`](Pool::put) are dropped.
    pub fn with_max_idle<F>(max_idle: usize, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Pool {
            idle: Mutex::new(Vec::new()),
            factory: Box::new(factory),
            max_idle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a cached object, or builds a new one.
    pub fn get(&self) -> T {
        match self.try_get() {
            Some(object) => object,
            None => {
                trace!("pool empty, calling factory");
                (self.factory)()
            }
        }
    }

    /// Takes a cached object, or builds one with `factory` instead of the
    /// pool's own.
    pub fn get_or_create<F>(&self, factory: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.try_get().unwrap_or_else(factory)
    }

    /// Takes a cached object without falling back to the factory.
    pub fn try_get(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Returns an object to the pool.
    pub fn put(&self, object: T) {
        let mut idle = self.lock();
        if idle.len() < self.max_idle {
            idle.push(object);
        } else {
            drop(idle);
            trace!("pool full, dropping object");
        }
    }

    /// Number of cached objects.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    /// Drops every cached object.
    pub fn reset(&self) {
        let drained: Vec<T> = std::mem::take(&mut *self.lock());
        drop(drained);
    }

    /// Drops every cached object and switches to a new factory.
    pub fn reset_with<F>(&mut self, factory: F)
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.idle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.factory = Box::new(factory);
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}
