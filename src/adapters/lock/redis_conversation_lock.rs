//! Redis-backed conversation lease lock for multi-instance deployments.
//!
//! Acquire is `SET key token NX PX ttl`. Release deletes the key only if it
//! still holds our token, so a lease that expired and was re-taken by
//! another worker is never released by the old holder.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode, LineUserId};
use crate::ports::{ConversationLock, LockLease};

const KEY_PREFIX: &str = "family_recipes:conversation_lock";

const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

#[derive(Clone)]
pub struct RedisConversationLock {
    conn: MultiplexedConnection,
}

impl RedisConversationLock {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    fn key(line_user_id: &LineUserId) -> String {
        format!("{}:{}", KEY_PREFIX, line_user_id)
    }
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Redis error: {}", e))
}

#[async_trait]
impl ConversationLock for RedisConversationLock {
    async fn try_acquire(
        &self,
        line_user_id: &LineUserId,
        ttl: Duration,
    ) -> Result<Option<LockLease>, DomainError> {
        let lease = LockLease::new(line_user_id.clone());
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(line_user_id))
            .arg(&lease.token)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(reply.map(|_| lease))
    }

    async fn release(&self, lease: &LockLease) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let released: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(Self::key(&lease.line_user_id))
            .arg(&lease.token)
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)?;

        if released == 0 {
            tracing::warn!(
                line_user_id = %lease.line_user_id,
                "Conversation lock expired before release"
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedisConversationLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConversationLock").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_user() {
        let key = RedisConversationLock::key(&LineUserId::new("Uabc").unwrap());
        assert_eq!(key, "family_recipes:conversation_lock:Uabc");
    }

    // Acquire/release against a live server are exercised with
    // `cargo test -- --ignored` and REDIS_URL set.
    #[tokio::test]
    #[ignore]
    async fn acquire_is_exclusive_against_live_redis() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
        let client = redis::Client::open(url).unwrap();
        let conn = client.get_multiplexed_tokio_connection().await.unwrap();
        let lock = RedisConversationLock::new(conn);
        let user = LineUserId::new(format!("U{}", uuid::Uuid::new_v4())).unwrap();

        let lease = lock
            .try_acquire(&user, Duration::from_secs(5))
            .await
            .unwrap()
            .unwrap();
        assert!(lock
            .try_acquire(&user, Duration::from_secs(5))
            .await
            .unwrap()
            .is_none());

        lock.release(&lease).await.unwrap();
        assert!(lock
            .try_acquire(&user, Duration::from_secs(5))
            .await
            .unwrap()
            .is_some());
    }
}
