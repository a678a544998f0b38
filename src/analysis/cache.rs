use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// TTL used in production. Matches the hosting layer's one-hour data
/// refresh window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Time source for expiry checks. Injected so tests can move time
/// forward without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time-bounded memoization for pure computations. An entry is served
/// only while younger than the TTL; an entry exactly at the TTL is
/// already stale. Values are cloned out, callers never share the stored
/// object.
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        TtlCache {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if fresh, otherwise compute,
    /// store and return it.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();

        if let Some((stored_at, value)) = entries.get(&key) {
            if now.duration_since(*stored_at) < self.ttl {
                return value.clone();
            }
        }

        let value = compute();
        entries.insert(key, (now, value.clone()));
        value
    }

    /// Like `get_or_insert_with` for fallible computations. Errors are
    /// returned to the caller and never cached.
    pub fn try_get_or_insert_with<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();

        if let Some((stored_at, value)) = entries.get(&key) {
            if now.duration_since(*stored_at) < self.ttl {
                return Ok(value.clone());
            }
        }

        let value = compute()?;
        entries.insert(key, (now, value.clone()));
        Ok(value)
    }
}
