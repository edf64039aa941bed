//! Token whitelist store
//!
//! The registry holds at most one valid token per member under
//! `whitelist:{member_id}` with a TTL equal to the token's lifetime.
//! Logging in overwrites the entry (last-write-wins), which is what makes a
//! new session invalidate the previous one. Concurrent logins for the same
//! member race on the overwrite; whichever write lands last wins, and that
//! is the accepted single-active-session behavior.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Duration;
use redis::AsyncCommands;
use thiserror::Error;

/// Store failure. Callers treat any store error as "reject the request";
/// an unreachable store never admits.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store unavailable: {0}")]
    Unavailable(String),
}

/// Registry key for a member's whitelisted token.
pub fn whitelist_key(member_id: i64) -> String {
    format!("whitelist:{}", member_id)
}

/// Key-value port for the token whitelist.
///
/// Single-key operations only; the store's own per-key atomicity is the
/// only coordination required.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Record `token` as the single valid token for `member_id`,
    /// overwriting any previous entry.
    async fn put(&self, member_id: i64, token: &str, ttl: Duration) -> Result<(), StoreError>;

    /// The currently whitelisted token, or `None` if never set or expired.
    async fn get(&self, member_id: i64) -> Result<Option<String>, StoreError>;

    /// Remove the entry. Deleting an absent entry is not an error.
    async fn delete(&self, member_id: i64) -> Result<(), StoreError>;
}

/// Redis-backed whitelist for multi-instance deployments.
pub struct RedisTokenStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisTokenStore {
    /// Connect and build a managed connection (auto-reconnecting).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn put(&self, member_id: i64, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let seconds = ttl.num_seconds().max(1) as u64;
        conn.set_ex::<_, _, ()>(whitelist_key(member_id), token, seconds)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn get(&self, member_id: i64) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(whitelist_key(member_id))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn delete(&self, member_id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(whitelist_key(member_id))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// In-memory whitelist for tests and single-instance runs.
///
/// Honors TTLs by storing a deadline per entry and treating past-deadline
/// entries as absent on read.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<i64, (String, Instant)>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn put(&self, member_id: i64, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let deadline = Instant::now()
            + ttl
                .to_std()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.entries
            .lock()
            .unwrap()
            .insert(member_id, (token.to_string(), deadline));
        Ok(())
    }

    async fn get(&self, member_id: i64) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(&member_id) {
            Some((_, deadline)) if *deadline <= Instant::now() => {
                entries.remove(&member_id);
                Ok(None)
            }
            Some((token, _)) => Ok(Some(token.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, member_id: i64) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(&member_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites_previous_entry() {
        let store = MemoryTokenStore::new();
        store.put(1, "first", Duration::minutes(5)).await.unwrap();
        store.put(1, "second", Duration::minutes(5)).await.unwrap();
        assert_eq!(store.get(1).await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let store = MemoryTokenStore::new();
        store.put(1, "t", Duration::zero()).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryTokenStore::new();
        store.put(1, "t", Duration::minutes(5)).await.unwrap();
        store.delete(1).await.unwrap();
        store.delete(1).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[test]
    fn keys_are_scoped_per_member() {
        assert_eq!(whitelist_key(7), "whitelist:7");
        assert_ne!(whitelist_key(7), whitelist_key(70));
    }
}
