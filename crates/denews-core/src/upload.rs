//! Records produced by the batch image upload.

use serde::Serialize;

use crate::{Cid, ServiceError};

/// One file received in a batch upload request.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadItem {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// True when the declared content type is in the `image/` family.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Outcome of a single item, serialized with a `status` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadOutcome {
    Success { cid: Cid, ipfs_url: String },
    Failed { error: String },
}

/// Per-file entry of a [`BatchSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResult {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: UploadOutcome,
}

impl UploadResult {
    pub fn success(filename: impl Into<String>, cid: Cid, gateway_base: &str) -> Self {
        let ipfs_url = cid.gateway_url(gateway_base);
        Self {
            filename: filename.into(),
            outcome: UploadOutcome::Success { cid, ipfs_url },
        }
    }

    pub fn failed(filename: impl Into<String>, error: &ServiceError) -> Self {
        Self {
            filename: filename.into(),
            outcome: UploadOutcome::Failed { error: error.to_string() },
        }
    }

    pub fn not_an_image(filename: impl Into<String>) -> Self {
        Self::failed(filename, &ServiceError::UnsupportedMediaType)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, UploadOutcome::Success { .. })
    }
}

/// Aggregate response of a batch upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub message: String,
    pub results: Vec<UploadResult>,
    pub total_files: usize,
    pub successful_uploads: usize,
    pub failed_uploads: usize,
}

impl BatchSummary {
    /// Derives the counts from `results`; every result counts exactly once.
    pub fn from_results(results: Vec<UploadResult>) -> Self {
        let total_files = results.len();
        let successful_uploads = results.iter().filter(|r| r.is_success()).count();
        Self {
            message: format!("Processed {} files", total_files),
            results,
            total_files,
            successful_uploads,
            failed_uploads: total_files - successful_uploads,
        }
    }
}
