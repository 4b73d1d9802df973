//! Batch image upload handler.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use denews_core::{BatchSummary, UploadItem};
use tracing::info;

use crate::error::AppError;
use crate::extract::ApiMultipart;
use crate::state::AppState;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /upload-images - Pins every uploaded file and reports per-file results.
///
/// Responds 200 whenever at least one file part arrived, even if every
/// upload failed; clients read `status` on each entry.
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<BatchSummary>, AppError> {
    let items = read_file_parts(multipart).await?;
    info!("Received {} files for upload", items.len());

    let summary = state.uploader.upload(items).await?;
    Ok(Json(summary))
}

/// Collects every part that carries a filename, in arrival order.
async fn read_file_parts(mut multipart: Multipart) -> Result<Vec<UploadItem>, AppError> {
    let mut items = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;
        items.push(UploadItem::new(filename, content_type, bytes.to_vec()));
    }
    Ok(items)
}
