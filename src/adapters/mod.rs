//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum HTTP surface (webhook, mini-app, web, photos)
//! - `line` - LINE Messaging API client and webhook parsing
//! - `lock` - Redis conversation lock
//! - `memory` - in-process adapters for tests and single-node runs
//! - `photos` - local photo storage with signed links
//! - `postgres` - PostgreSQL repositories

pub mod http;
pub mod line;
pub mod lock;
pub mod memory;
pub mod photos;
pub mod postgres;
