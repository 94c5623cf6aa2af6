//! Per-user mutual exclusion port.
//!
//! At most one event per LINE identity may be in its load-transition-store
//! unit at a time. A lease expires on its own so a crashed worker cannot
//! block a user forever.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::foundation::{DomainError, LineUserId};

/// Proof of holding the lock; releasing needs the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockLease {
    pub line_user_id: LineUserId,
    pub token: String,
}

impl LockLease {
    pub fn new(line_user_id: LineUserId) -> Self {
        Self {
            line_user_id,
            token: uuid::Uuid::new_v4().to_string(),
        }
    }
}

#[async_trait]
pub trait ConversationLock: Send + Sync {
    /// Try to take the lease; `None` when another holder has it.
    async fn try_acquire(
        &self,
        line_user_id: &LineUserId,
        ttl: Duration,
    ) -> Result<Option<LockLease>, DomainError>;

    /// Release the lease if it is still ours; a stale lease is a no-op.
    async fn release(&self, lease: &LockLease) -> Result<(), DomainError>;
}
