//! Per-user mutual exclusion around conversation transitions.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::conversation::RecordingError;
use crate::domain::foundation::LineUserId;
use crate::ports::{ConversationLock, LockLease};

/// Acquires the conversation lease with bounded retries.
#[derive(Clone)]
pub struct ConversationGuard {
    lock: Arc<dyn ConversationLock>,
    ttl: Duration,
    attempts: u32,
    retry_delay: Duration,
}

impl ConversationGuard {
    pub fn new(
        lock: Arc<dyn ConversationLock>,
        ttl: Duration,
        attempts: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            lock,
            ttl,
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    pub async fn acquire(&self, line_user_id: &LineUserId) -> Result<LockLease, RecordingError> {
        for attempt in 1..=self.attempts {
            if let Some(lease) = self.lock.try_acquire(line_user_id, self.ttl).await? {
                return Ok(lease);
            }
            if attempt < self.attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        tracing::warn!(
            line_user_id = %line_user_id,
            attempts = self.attempts,
            "Conversation is locked by another event"
        );
        Err(RecordingError::Busy)
    }

    /// Releases the lease; failures only get logged since the TTL frees it.
    pub async fn release(&self, lease: &LockLease) {
        if let Err(e) = self.lock.release(lease).await {
            tracing::warn!(
                line_user_id = %lease.line_user_id,
                error = %e,
                "Failed to release conversation lock"
            );
        }
    }
}
