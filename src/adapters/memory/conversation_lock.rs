//! In-process lease lock. Only correct for a single server instance.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, LineUserId};
use crate::ports::{ConversationLock, LockLease};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationLock {
    leases: Arc<Mutex<HashMap<LineUserId, (String, Instant)>>>,
}

impl InMemoryConversationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_held(&self, line_user_id: &LineUserId) -> bool {
        self.leases
            .lock()
            .await
            .get(line_user_id)
            .map(|(_, expires)| *expires > Instant::now())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ConversationLock for InMemoryConversationLock {
    async fn try_acquire(
        &self,
        line_user_id: &LineUserId,
        ttl: Duration,
    ) -> Result<Option<LockLease>, DomainError> {
        let mut leases = self.leases.lock().await;
        let now = Instant::now();
        if let Some((_, expires)) = leases.get(line_user_id) {
            if *expires > now {
                return Ok(None);
            }
        }

        let lease = LockLease::new(line_user_id.clone());
        leases.insert(line_user_id.clone(), (lease.token.clone(), now + ttl));
        Ok(Some(lease))
    }

    async fn release(&self, lease: &LockLease) -> Result<(), DomainError> {
        let mut leases = self.leases.lock().await;
        // Only the holder may release; an expired lease may have been re-taken.
        if leases
            .get(&lease.line_user_id)
            .map(|(token, _)| token == &lease.token)
            .unwrap_or(false)
        {
            leases.remove(&lease.line_user_id);
        }
        Ok(())
    }
}
