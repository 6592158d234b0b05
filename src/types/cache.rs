//! Compute-once cells for values derived from immutable data.

use std::fmt;
use std::sync::OnceLock;

/// A cell that starts empty and is filled at most once.
///
/// The value is computed outside of any lock, so concurrent first readers
/// may each compute it. The first store wins and later stores are dropped;
/// this is only sound for pure, deterministic computations where every
/// caller would produce the same value. Readers never observe a partially
/// written value.
pub struct OnceCache<T> {
    cell: OnceLock<T>,
}

impl<T: Clone> OnceCache<T> {
    /// Creates an empty cache.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Creates a cache that already holds `value`.
    pub fn with_value(value: T) -> Self {
        let cache = Self::new();
        cache.store(value);
        cache
    }

    /// Returns the cached value, if any.
    pub fn get(&self) -> Option<T> {
        self.cell.get().cloned()
    }

    /// Stores `value` unless a value is already present.
    pub fn store(&self, value: T) {
        let _ = self.cell.set(value);
    }

    /// Returns the cached value, computing and storing it on first access.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.cell.get() {
            return value.clone();
        }
        let value = compute();
        self.store(value.clone());
        value
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Clone> Default for OnceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for OnceCache<T> {
    fn clone(&self) -> Self {
        match self.get() {
            Some(value) => Self::with_value(value),
            None => Self::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OnceCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("OnceCache").field(value).finish(),
            None => f.write_str("OnceCache(<unset>)"),
        }
    }
}

// Caches never take part in value equality.
impl<T> PartialEq for OnceCache<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for OnceCache<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn computes_once_then_reads() {
        let cache = OnceCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            42u64
        };

        assert_eq!(cache.get_or_compute(compute), 42);
        assert_eq!(cache.get_or_compute(compute), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn first_store_wins() {
        let cache = OnceCache::new();
        cache.store(1u32);
        cache.store(2u32);
        assert_eq!(cache.get(), Some(1));
    }

    #[test]
    fn prefilled_skips_compute() {
        let cache = OnceCache::with_value(7u8);
        assert!(cache.is_set());
        assert_eq!(cache.get_or_compute(|| unreachable!()), 7);
    }

    #[test]
    fn concurrent_first_writers_agree() {
        let cache = OnceCache::new();
        let results: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get_or_compute(|| 0xfeed)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|&v| v == 0xfeed));
        assert_eq!(cache.get(), Some(0xfeed));
    }
}
