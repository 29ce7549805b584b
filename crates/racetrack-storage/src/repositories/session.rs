use crate::error::StorageResult;
use crate::models::SessionData;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Server-side session storage keyed by an opaque session id.
///
/// Records expire `ttl` after they were last saved or touched. An expired
/// record is indistinguishable from a missing one.
pub trait SessionStore: Send + Sync {
    /// Load a live session
    fn get(&self, sid: &str) -> impl Future<Output = StorageResult<Option<SessionData>>> + Send;

    /// Insert or replace a session, restarting its expiry clock
    fn save(
        &self,
        sid: &str,
        data: &SessionData,
    ) -> impl Future<Output = StorageResult<()>> + Send;

    /// Extend a live session's expiry; returns false when there is nothing to extend
    fn touch(&self, sid: &str) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Remove a session. Removing an unknown id is not an error.
    fn destroy(&self, sid: &str) -> impl Future<Output = StorageResult<()>> + Send;

    /// Delete every expired record and return how many were removed
    fn purge_expired(&self) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Lifetime granted by `save` and `touch`
    fn ttl(&self) -> Duration;
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Sessions persisted in the `sessions` table as JSON.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
    ttl: Duration,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }
}

impl SessionStore for SqliteSessionStore {
    async fn get(&self, sid: &str) -> StorageResult<Option<SessionData>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT sess FROM sessions WHERE sid = ? AND expires_at > ?")
                .bind(sid)
                .bind(now_millis())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((sess,)) => Ok(Some(serde_json::from_str(&sess)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, sid: &str, data: &SessionData) -> StorageResult<()> {
        let sess = serde_json::to_string(data)?;
        let expires_at = now_millis() + self.ttl.num_milliseconds();

        sqlx::query(
            r#"
            INSERT INTO sessions (sid, sess, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT (sid) DO UPDATE SET sess = excluded.sess, expires_at = excluded.expires_at
            "#,
        )
        .bind(sid)
        .bind(sess)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn touch(&self, sid: &str) -> StorageResult<bool> {
        let now = now_millis();
        let result =
            sqlx::query("UPDATE sessions SET expires_at = ? WHERE sid = ? AND expires_at > ?")
                .bind(now + self.ttl.num_milliseconds())
                .bind(sid)
                .bind(now)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn destroy(&self, sid: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM sessions WHERE sid = ?")
            .bind(sid)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now_millis())
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Process-local session store, used by tests and single-node setups that
/// do not need sessions to survive a restart.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, (SessionData, i64)>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, sid: &str) -> StorageResult<Option<SessionData>> {
        let entries = self.entries.read().await;
        let now = now_millis();
        Ok(entries
            .get(sid)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(data, _)| data.clone()))
    }

    async fn save(&self, sid: &str, data: &SessionData) -> StorageResult<()> {
        let expires_at = now_millis() + self.ttl.num_milliseconds();
        self.entries
            .write()
            .await
            .insert(sid.to_string(), (data.clone(), expires_at));
        Ok(())
    }

    async fn touch(&self, sid: &str) -> StorageResult<bool> {
        let now = now_millis();
        let mut entries = self.entries.write().await;
        match entries.get_mut(sid) {
            Some((_, expires_at)) if *expires_at > now => {
                *expires_at = now + self.ttl.num_milliseconds();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn destroy(&self, sid: &str) -> StorageResult<()> {
        self.entries.write().await.remove(sid);
        Ok(())
    }

    async fn purge_expired(&self) -> StorageResult<u64> {
        let now = now_millis();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - entries.len()) as u64)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
