//! Explicit TTL cache for external data collaborators
//!
//! The weather-service layer caches upstream API responses. The cache is
//! an owned, injected object with a visible `{value, expires_at}` pair —
//! never hidden module state — so callers control its lifetime and tests
//! can drive the clock.

use chrono::{DateTime, Duration, Utc};

/// A cached value stamped with its expiry instant
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

/// Single-slot time-to-live cache
///
/// `get()` only returns the value while fresh; a stale entry reads as
/// empty and is replaced on the next `put()`.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    entry: Option<CacheEntry<T>>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    /// Create an empty cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Store a value, stamping `now + ttl` as its expiry.
    pub fn put(&mut self, value: T) {
        self.put_at(Utc::now(), value);
    }

    /// Store a value against an explicit clock (test seam).
    pub fn put_at(&mut self, now: DateTime<Utc>, value: T) {
        self.entry = Some(CacheEntry {
            value,
            expires_at: now + self.ttl,
        });
    }

    /// The cached value, if still fresh.
    pub fn get(&self) -> Option<&T> {
        self.get_at(Utc::now())
    }

    /// The cached value against an explicit clock (test seam).
    pub fn get_at(&self, now: DateTime<Utc>) -> Option<&T> {
        match &self.entry {
            Some(entry) if now < entry.expires_at => Some(&entry.value),
            _ => None,
        }
    }

    /// Drop the cached value regardless of freshness.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
