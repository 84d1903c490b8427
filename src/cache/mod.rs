// Session cache: user id -> minimal public projection, with per-entry TTL

use async_trait::async_trait;
use moka::{future::Cache, Expiry};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use crate::database::User;

/// Reduced, non-secret view of a user kept in the session cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUser {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Session cache unavailable: {0}")]
    Unavailable(String),

    #[error("Session cache operation timed out")]
    Timeout,
}

/// Key-value store with expiry. Callers treat every error as a soft failure.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Upsert `value` under `key`, replacing any prior entry and its TTL
    async fn set(&self, key: Uuid, value: CachedUser, ttl: Duration) -> Result<(), CacheError>;

    /// `None` once the entry's TTL has elapsed
    async fn get(&self, key: Uuid) -> Result<Option<CachedUser>, CacheError>;
}

#[derive(Clone)]
struct Entry {
    user: CachedUser,
    ttl: Duration,
}

/// Expiry policy that reads the TTL stored alongside each entry
struct PerEntryTtl;

impl Expiry<Uuid, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &Uuid, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &Uuid,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process session cache backed by moka
#[derive(Clone)]
pub struct MokaSessionCache {
    cache: Cache<Uuid, Entry>,
}

impl MokaSessionCache {
    /// # Parameters
    /// * `max_capacity` - Maximum number of sessions kept before eviction
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl SessionCache for MokaSessionCache {
    async fn set(&self, key: Uuid, value: CachedUser, ttl: Duration) -> Result<(), CacheError> {
        self.cache.insert(key, Entry { user: value, ttl }).await;
        Ok(())
    }

    async fn get(&self, key: Uuid) -> Result<Option<CachedUser>, CacheError> {
        Ok(self.cache.get(&key).await.map(|entry| entry.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(email: &str) -> CachedUser {
        CachedUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn get_returns_value_before_ttl() {
        let cache = MokaSessionCache::new(100);
        let user = projection("a@b.com");

        cache.set(user.id, user.clone(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(cache.get(user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn entry_is_absent_after_ttl() {
        let cache = MokaSessionCache::new(100);
        let user = projection("a@b.com");

        cache.set(user.id, user.clone(), Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cache.get(user.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_value_and_ttl() {
        let cache = MokaSessionCache::new(100);
        let first = projection("a@b.com");
        let second = CachedUser {
            id: first.id,
            email: "changed@b.com".to_string(),
        };

        cache.set(first.id, first.clone(), Duration::from_millis(50)).await.unwrap();
        cache.set(first.id, second.clone(), Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get(first.id).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn unknown_key_is_absent() {
        let cache = MokaSessionCache::new(100);
        assert_eq!(cache.get(Uuid::new_v4()).await.unwrap(), None);
    }
}
