//! Remote product service client.
//!
//! # Architecture
//!
//! - Plain REST+JSON over `reqwest`; every call carries the bearer credential
//! - Stateless: no retries, no caching, no token refresh - retry policy, if
//!   any, belongs to the caller
//! - Failures are surfaced untranslated beyond taxonomy classification
//!
//! The [`CatalogApi`] trait is the seam the synchronizer is generic over;
//! [`HttpCatalogClient`] is the production implementation.

mod http;

pub use http::HttpCatalogClient;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use gearstock_core::{Product, ProductDraft, ProductId};

/// Errors that can occur when talking to the remote product service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Service unreachable, connection refused, or timed out.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Credential rejected (401/403).
    #[error("authorization failed: {0}")]
    Auth(String),

    /// Mutation target absent server-side (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body could not be parsed.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Acknowledgement returned by the delete endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Confirmation {
    /// Server-provided message, when the service sends one.
    #[serde(default)]
    pub message: Option<String>,
}

/// Operations exposed by the remote product service.
///
/// Implementations must not retry internally.
pub trait CatalogApi: Send + Sync {
    /// Fetch the full catalog. There is no pagination; the service returns
    /// every product.
    fn list_all(
        &self,
        credential: &SecretString,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Create a product. The server assigns the identifier.
    fn create(
        &self,
        credential: &SecretString,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// Replace the product with the given id. The returned product is
    /// authoritative.
    fn update(
        &self,
        credential: &SecretString,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// Delete the product with the given id.
    fn delete(
        &self,
        credential: &SecretString,
        id: &ProductId,
    ) -> impl Future<Output = Result<Confirmation, ApiError>> + Send;
}

/// Error body shape the service uses for failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the service's `{"message": ...}` out of an error body, falling back
/// to the raw text.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.chars().take(200).collect()
            }
        },
        |parsed| parsed.message,
    )
}

/// Classify a non-2xx response into the error taxonomy.
fn classify_status(status: u16, body: &str) -> ApiError {
    let message = error_message(status, body);
    match status {
        401 | 403 => ApiError::Auth(message),
        404 => ApiError::NotFound(message),
        _ => ApiError::Server { status, message },
    }
}
