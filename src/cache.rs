//! In-memory cache for rendered reports
//!
//! Entries live in fixed time buckets rather than sliding windows: a report
//! cached at 13:10 with a two-hour bucket expires at 14:00 UTC, together with
//! every other report from the same bucket.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

struct StoredEntry {
    value: String,
    bucket: u64,
}

pub struct ResponseCache {
    entries: RwLock<HashMap<String, StoredEntry>>,
    bucket_seconds: u64,
}

/// Key for a report about `city` in `locale`
#[must_use]
pub fn report_key(city: &str, locale: &str) -> String {
    format!("{city}/{locale}")
}

impl ResponseCache {
    #[must_use]
    pub fn new(bucket: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            bucket_seconds: bucket.as_secs().max(1),
        }
    }

    fn bucket_at(&self, now: SystemTime) -> u64 {
        now.duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            / self.bucket_seconds
    }

    /// Retrieves a value if it was stored during the current time bucket.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, SystemTime::now()).await
    }

    #[tracing::instrument(name = "query_cache", level = "debug", skip(self, now))]
    async fn get_at(&self, key: &str, now: SystemTime) -> Option<String> {
        let bucket = self.bucket_at(now);
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.bucket == bucket => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Stores a value for the rest of the current time bucket.
    pub async fn put(&self, key: &str, value: String) {
        self.put_at(key, value, SystemTime::now()).await;
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value, now))]
    async fn put_at(&self, key: &str, value: String, now: SystemTime) {
        let bucket = self.bucket_at(now);
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.bucket == bucket);
        entries.insert(key.to_string(), StoredEntry { value, bucket });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_HOURS: Duration = Duration::from_secs(7200);

    fn at(seconds: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(seconds)
    }

    #[tokio::test]
    async fn test_hit_within_bucket() {
        let cache = ResponseCache::new(TWO_HOURS);
        cache.put_at("56186/en-US", "report".to_string(), at(7200)).await;
        assert_eq!(
            cache.get_at("56186/en-US", at(7200 + 7199)).await.as_deref(),
            Some("report")
        );
    }

    #[tokio::test]
    async fn test_expires_at_bucket_boundary() {
        let cache = ResponseCache::new(TWO_HOURS);
        cache.put_at("56186/en-US", "report".to_string(), at(14_000)).await;
        assert!(cache.get_at("56186/en-US", at(14_400)).await.is_none());
    }

    #[tokio::test]
    async fn test_put_evicts_stale_buckets() {
        let cache = ResponseCache::new(TWO_HOURS);
        cache.put_at("a", "old".to_string(), at(0)).await;
        cache.put_at("b", "new".to_string(), at(7200)).await;
        assert_eq!(cache.entries.read().await.len(), 1);
        assert!(cache.get_at("a", at(7200)).await.is_none());
        assert_eq!(cache.get_at("b", at(7200)).await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = ResponseCache::new(TWO_HOURS);
        let english = report_key("56186", "en-US");
        let french = report_key("56186", "fr-CA");
        cache.put_at(&english, "english".to_string(), at(7200)).await;
        cache.put_at(&french, "french".to_string(), at(7300)).await;

        assert_eq!(cache.get_at(&english, at(7400)).await.as_deref(), Some("english"));
        assert_eq!(cache.get_at(&french, at(7400)).await.as_deref(), Some("french"));
        assert!(cache.get_at(&report_key("56186", "fr"), at(7400)).await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_value() {
        let cache = ResponseCache::new(TWO_HOURS);
        cache.put_at("56186/en-US", "first".to_string(), at(7200)).await;
        cache.put_at("56186/en-US", "second".to_string(), at(7300)).await;
        assert_eq!(
            cache.get_at("56186/en-US", at(7400)).await.as_deref(),
            Some("second")
        );
    }
}
