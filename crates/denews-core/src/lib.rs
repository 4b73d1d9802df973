//! Core domain types and error definitions for the DeNews gateway.
//!
//! This crate provides the types shared across the gateway:
//!
//! - [`ServiceError`]: Error type for validation and upstream calls
//! - [`Cid`]: Content identifier returned by the pinning service
//! - [`UploadItem`], [`UploadResult`] and [`BatchSummary`]: Batch image upload records
//! - [`PinningService`], [`TextGenerator`] and [`UserStore`]: Seams to the external services
//!
//! # Example
//!
//! ```rust
//! use denews_core::{BatchSummary, Cid, UploadResult};
//!
//! let results = vec![
//!     UploadResult::success("a.png", Cid::new("Qm123"), "https://gateway.pinata.cloud"),
//!     UploadResult::not_an_image("b.txt"),
//! ];
//!
//! let summary = BatchSummary::from_results(results);
//! assert_eq!(summary.total_files, 2);
//! assert_eq!(summary.successful_uploads, 1);
//! ```

mod upload;

pub use upload::{BatchSummary, UploadItem, UploadOutcome, UploadResult};

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while validating input or talking to an external service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request itself was unusable (missing fields, empty batch).
    #[error("{0}")]
    InvalidRequest(String),

    /// A batch item did not declare an image content type.
    #[error("Not an image file")]
    UnsupportedMediaType,

    /// Network failure, timeout or non-2xx response from a collaborator.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// A collaborator answered with a body that did not decode.
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    /// A collaborator answered without a field the gateway relies on.
    #[error("Upstream response missing field: {0}")]
    MissingField(&'static str),
}

impl ServiceError {
    /// Creates an InvalidRequest error from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidRequest(message.into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Content identifier assigned by the pinning service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the public retrieval link for this CID under `gateway_base`.
    pub fn gateway_url(&self, gateway_base: &str) -> String {
        format!("{}/ipfs/{}", gateway_base.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A JSON document to pin, labelled with a metadata name.
#[derive(Debug, Clone)]
pub struct PinRequest {
    pub name: String,
    pub content: serde_json::Value,
}

impl PinRequest {
    pub fn new(name: impl Into<String>, content: serde_json::Value) -> Self {
        Self { name: name.into(), content }
    }
}

/// Profile fields written to the users table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phno: Option<String>,
    pub wallet_address: Option<String>,
    pub photo_url: Option<String>,
}

/// A row returned by the users table, passed through untouched.
pub type UserRecord = serde_json::Value;

/// An optional profile photo submitted with a new user.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// File extension of the original filename, if it has one.
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then_some(ext)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Traits
// ─────────────────────────────────────────────────────────────────────────────

/// Content-addressed pinning backend.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Uploads raw file bytes and returns the CID they were pinned under.
    async fn pin_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Cid, ServiceError>;

    /// Pins a JSON document and returns its CID.
    async fn pin_json(&self, request: PinRequest) -> Result<Cid, ServiceError>;
}

/// Generative text backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// User table plus the bucket holding profile photos.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a photo under `object_name` and returns its public URL.
    async fn upload_photo(
        &self,
        object_name: &str,
        photo: PhotoUpload,
    ) -> Result<String, ServiceError>;

    /// Inserts a user and returns the rows the store echoes back.
    async fn insert_user(&self, user: &NewUser) -> Result<Vec<UserRecord>, ServiceError>;

    /// Returns every user whose wallet address matches exactly.
    async fn find_by_wallet(&self, wallet_address: &str) -> Result<Vec<UserRecord>, ServiceError>;
}
