//! HTTP adapter for the mini-app and web JSON endpoints.

pub mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use routes::api_routes;
