//! HTTP clients for the services the gateway fronts.
//!
//! Each client implements one of the `denews_core` service traits so the
//! server can hold it behind `Arc<dyn ...>`.

mod gemini;
mod pinata;
mod supabase;

pub use gemini::GeminiClient;
pub use pinata::PinataClient;
pub use supabase::SupabaseClient;

use std::time::Duration;

use denews_core::ServiceError;
use reqwest::{Client, Response};

/// Builds the shared reqwest client with an explicit request timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::Upstream(format!("failed to build HTTP client: {}", e)))
}

/// Turns a non-2xx response into an `Upstream` error carrying status and body.
async fn check_status(service: &str, response: Response) -> Result<Response, ServiceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Upstream(format!("{} API error {}: {}", service, status, body)))
}

// Request URLs can carry credentials, so they never reach error text.
fn transport_error(service: &str, err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Upstream(format!("{} request timed out", service));
    }
    ServiceError::Upstream(format!("{} request failed: {}", service, err.without_url()))
}

fn parse_error(service: &str, err: reqwest::Error) -> ServiceError {
    ServiceError::Parse(format!("{} response: {}", service, err.without_url()))
}
