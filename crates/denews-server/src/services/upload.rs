//! Batch image upload to the pinning service.

use std::sync::Arc;

use denews_core::{BatchSummary, PinningService, ServiceError, UploadItem, UploadResult};
use tracing::{info, warn};

/// Pins each image of a batch and reports a per-file outcome.
pub struct BatchUploader {
    pinning: Arc<dyn PinningService>,
    gateway_url: String,
}

impl BatchUploader {
    pub fn new(pinning: Arc<dyn PinningService>, gateway_url: impl Into<String>) -> Self {
        Self {
            pinning,
            gateway_url: gateway_url.into(),
        }
    }

    /// Processes `items` one at a time, in order.
    ///
    /// Only an empty batch is an error. Per-item failures (non-image type,
    /// upstream errors) become failed entries and never stop the loop.
    pub async fn upload(&self, items: Vec<UploadItem>) -> Result<BatchSummary, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::invalid("No files provided"));
        }

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(self.upload_one(item).await);
        }

        let summary = BatchSummary::from_results(results);
        info!(
            "Batch upload finished: {} files, {} succeeded, {} failed",
            summary.total_files, summary.successful_uploads, summary.failed_uploads
        );
        Ok(summary)
    }

    async fn upload_one(&self, item: UploadItem) -> UploadResult {
        if !item.is_image() {
            warn!("Skipping {}: content type {:?} is not an image", item.filename, item.content_type);
            return UploadResult::not_an_image(item.filename);
        }

        let UploadItem { filename, content_type, bytes } = item;
        match self.pinning.pin_file(bytes, &filename, &content_type).await {
            Ok(cid) => {
                info!("Pinned {} as {}", filename, cid);
                UploadResult::success(filename, cid, &self.gateway_url)
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", filename, e);
                UploadResult::failed(filename, &e)
            }
        }
    }
}
