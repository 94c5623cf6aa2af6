//! Conversation lease lock adapters.

mod redis_conversation_lock;

pub use redis_conversation_lock::RedisConversationLock;
