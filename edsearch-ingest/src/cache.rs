//! The Timestamp Cache (C7, §4.4, §4.7): a bounded in-process LRU cache of
//! the most recently applied timestamp per `(entityKind, pk-json,
//! eventKind)` triple. It lets the freshness gate skip an obviously-stale
//! event without touching the database at all; it is an optimization only
//! — the database-backed sentinel in [`edsearch_db::db::freshness`] remains
//! the source of truth, and a cache miss or parse failure always defers to
//! it rather than risking a wrong skip.

use std::num::NonZeroUsize;

use chrono::DateTime;
use lru::LruCache;

const DEFAULT_CAPACITY: usize = 10_000;

pub struct TimestampCache {
    entries: LruCache<(&'static str, String, &'static str), String>,
}

impl TimestampCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap()),
            ),
        }
    }

    /// Check `candidate_timestamp` against whatever this cache last saw for
    /// this key and unconditionally record it as most-recently-used (§4.4):
    /// absent key, a strictly newer candidate, or either timestamp failing
    /// to parse all insert/update and return `true` ("proceed to the
    /// database-backed gate"); a candidate that is not newer than what's
    /// cached returns `false` ("skip without touching the database").
    pub fn check_and_update(
        &mut self,
        entity_kind: &'static str,
        pk_json: String,
        event_kind: &'static str,
        candidate_timestamp: &str,
    ) -> bool {
        let key = (entity_kind, pk_json, event_kind);

        let is_newer = match self.entries.get(&key) {
            None => true,
            Some(cached) => match (parse(cached), parse(candidate_timestamp)) {
                (Some(cached_ts), Some(candidate_ts)) => candidate_ts > cached_ts,
                _ => true,
            },
        };

        if is_newer {
            self.entries.put(key, candidate_timestamp.to_string());
        } else {
            // Still touch the entry so it stays most-recently-used even
            // though its value is unchanged.
            self.entries.promote(&key);
        }

        is_newer
    }
}

impl Default for TimestampCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// ISO-8601 timestamps normalize a trailing `Z` to `+00:00` for parsing
/// purposes (§4.4); `DateTime::parse_from_rfc3339` already accepts both
/// forms directly.
fn parse(timestamp: &str) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(timestamp).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_newer_and_gets_inserted() {
        let mut cache = TimestampCache::new(10);
        assert!(cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-01T00:00:00Z"));
    }

    #[test]
    fn strictly_newer_candidate_is_newer() {
        let mut cache = TimestampCache::new(10);
        cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-01T00:00:00Z");
        assert!(cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-02T00:00:00Z"));
    }

    #[test]
    fn older_or_equal_candidate_is_not_newer() {
        let mut cache = TimestampCache::new(10);
        cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-02T00:00:00Z");
        assert!(!cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-01T00:00:00Z"));
        assert!(!cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-02T00:00:00Z"));
    }

    #[test]
    fn unparseable_timestamp_is_treated_as_newer() {
        let mut cache = TimestampCache::new(10);
        cache.check_and_update("system", "{}".to_string(), "FSDJump", "not-a-timestamp");
        assert!(cache.check_and_update("system", "{}".to_string(), "FSDJump", "2026-01-01T00:00:00Z"));
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut cache = TimestampCache::new(1);
        cache.check_and_update("system", "{\"a\":1}".to_string(), "FSDJump", "2026-01-01T00:00:00Z");
        cache.check_and_update("system", "{\"b\":1}".to_string(), "FSDJump", "2026-01-01T00:00:00Z");
        // The first key was evicted, so it looks absent (newer) again.
        assert!(cache.check_and_update("system", "{\"a\":1}".to_string(), "FSDJump", "2026-01-01T00:00:00Z"));
    }
}
