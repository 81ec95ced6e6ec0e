use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tl_core::{Clock, Collection, SystemClock};
use tracing::debug;

/// How long a listed collection is served from memory.
pub const DEFAULT_CACHE_TTL: Duration = Duration::minutes(5);

#[derive(Debug)]
struct Entry {
    rows: Vec<Vec<String>>,
    stored_at: DateTime<Utc>,
}

/// Listed rows per collection, valid for a fixed time after they were stored.
#[derive(Debug)]
pub struct RowCache<C: Clock = SystemClock> {
    clock: C,
    ttl: Duration,
    entries: Mutex<HashMap<Collection, Entry>>,
}

impl Default for RowCache<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock, DEFAULT_CACHE_TTL)
    }
}

impl<C: Clock> RowCache<C> {
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Rows stored for `collection` less than one TTL ago. An entry stamped
    /// in the future (the clock stepped back) counts as expired.
    pub fn get(&self, collection: Collection) -> Option<Vec<Vec<String>>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&collection)?;
        let age = self.clock.now() - entry.stored_at;
        if age >= Duration::zero() && age < self.ttl {
            debug!(collection = %collection, age_ms = age.num_milliseconds(), "cache hit");
            Some(entry.rows.clone())
        } else {
            debug!(collection = %collection, "cache expired");
            None
        }
    }

    pub fn insert(&self, collection: Collection, rows: Vec<Vec<String>>) {
        let stored_at = self.clock.now();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection, Entry { rows, stored_at });
    }

    pub fn invalidate(&self, collection: Collection) {
        debug!(collection = %collection, "cache invalidated");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&collection);
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tl_core::ManualClock;

    use super::*;

    fn rows() -> Vec<Vec<String>> {
        vec![vec!["id".to_string()], vec!["t1".to_string()]]
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap())
    }

    #[test]
    fn entries_expire_after_ttl() {
        let clock = clock();
        let cache = RowCache::new(clock.clone(), DEFAULT_CACHE_TTL);
        cache.insert(Collection::Trips, rows());

        clock.advance(Duration::seconds(299));
        assert_eq!(cache.get(Collection::Trips), Some(rows()));

        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get(Collection::Trips), None);
    }

    #[test]
    fn clock_stepping_back_expires_entries() {
        let clock = clock();
        let cache = RowCache::new(clock.clone(), DEFAULT_CACHE_TTL);
        cache.insert(Collection::Trips, rows());

        clock.advance(Duration::seconds(-1));
        assert_eq!(cache.get(Collection::Trips), None);
    }

    #[test]
    fn invalidate_only_touches_one_collection() {
        let cache = RowCache::new(clock(), DEFAULT_CACHE_TTL);
        cache.insert(Collection::Trips, rows());
        cache.insert(Collection::Flights, rows());

        cache.invalidate(Collection::Trips);
        assert!(cache.get(Collection::Trips).is_none());
        assert!(cache.get(Collection::Flights).is_some());

        cache.clear();
        assert!(cache.get(Collection::Flights).is_none());
    }

    #[test]
    fn reinsert_restarts_the_ttl() {
        let clock = clock();
        let cache = RowCache::new(clock.clone(), Duration::seconds(10));
        cache.insert(Collection::Flights, rows());
        clock.advance(Duration::seconds(8));
        cache.insert(Collection::Flights, rows());
        clock.advance(Duration::seconds(8));
        assert!(cache.get(Collection::Flights).is_some());
    }
}
