//! Trip cache stores
//!
//! Every store is best-effort: failures surface as
//! [`TravelPlannerError::CacheUnavailable`] and the planner treats them as a
//! miss (on read) or logs and moves on (on write).

use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::{Result, TravelPlannerError};

/// Key-value store with per-entry time-to-live
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored bytes if present and not expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes the whole value, replacing any previous entry for the key
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Cache key for a trip request: `trip:<city>:<days>`.
///
/// The city is lower-cased, trimmed and has inner whitespace runs collapsed.
#[must_use]
pub fn trip_key(city: &str, days: u8) -> String {
    let normalized = city
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!("trip:{normalized}:{days}")
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    value: Vec<u8>,
    expires_at: u64, // Unix timestamp (seconds)
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TravelPlannerError::cache(format!("System clock error: {e}")))
}

fn cache_err(e: impl std::fmt::Display) -> TravelPlannerError {
    TravelPlannerError::cache(e.to_string())
}

/// Embedded on-disk store backed by a fjall keyspace
pub struct PersistentCache {
    store: Keyspace,
}

impl PersistentCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open().map_err(cache_err)?;
        let items = db
            .keyspace("trips", fjall::KeyspaceCreateOptions::default)
            .map_err(cache_err)?;
        Ok(PersistentCache { store: items })
    }
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key).map_err(cache_err)?.map(|v| v.to_vec()))
}

#[async_trait]
impl CacheStore for PersistentCache {
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(cache_err)??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry = postcard::from_bytes(&bytes).map_err(cache_err)?;
        if unix_now()? < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = unix_now()?
            .checked_add(ttl.as_secs())
            .ok_or_else(|| TravelPlannerError::cache("TTL overflow"))?;
        let bytes = postcard::to_stdvec(&StoredEntry { value, expires_at }).map_err(cache_err)?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(cache_err)?
            .map_err(cache_err)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(cache_err)?
            .map_err(cache_err)?;
        Ok(())
    }
}

/// Store used when caching is switched off or the keyspace could not be opened
pub struct DisabledCache;

#[async_trait]
impl CacheStore for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(TravelPlannerError::cache("caching disabled"))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
        Err(TravelPlannerError::cache("caching disabled"))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(TravelPlannerError::cache("caching disabled"))
    }
}
