//! HTTP route handlers for the gateway.

pub mod ai;
pub mod articles;
pub mod images;
pub mod users;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
