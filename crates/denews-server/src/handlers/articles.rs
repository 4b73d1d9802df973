//! Article and spam report pinning handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use denews_core::PinRequest;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::dto::{PinResponse, PublishArticleRequest, SpamReportRequest};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

const ARTICLE_PIN_NAME: &str = "DeNewsArticle";
const SPAM_PIN_NAME: &str = "SpamReport";

/// POST /upload - Pins an article and returns its CID.
pub async fn publish(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PublishArticleRequest>,
) -> Result<Json<PinResponse>, AppError> {
    let (Some(text), Some(title)) = (non_empty(req.article), non_empty(req.article_title)) else {
        return Err(AppError::bad_request("Article content or title is missing."));
    };

    info!("Publishing article: {}", title);
    let request = PinRequest::new(ARTICLE_PIN_NAME, json!({ "title": title, "text": text }));
    let cid = state.pinning.pin_json(request).await.map_err(|e| {
        error!("Failed to pin article: {}", e);
        AppError::Internal(e.to_string())
    })?;

    info!("Article pinned as {}", cid);
    Ok(Json(PinResponse { cid, message: "Article published successfully" }))
}

/// POST /spam-report - Pins a spam report and returns its CID.
pub async fn report_spam(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SpamReportRequest>,
) -> Result<Json<PinResponse>, AppError> {
    let Some(report) = req.spam_report.filter(|v| !is_blank(v)) else {
        return Err(AppError::bad_request("Spam report content is missing."));
    };

    let request = PinRequest::new(SPAM_PIN_NAME, json!({ "spam_report": report }));
    let cid = state.pinning.pin_json(request).await.map_err(|e| {
        error!("Failed to pin spam report: {}", e);
        AppError::Internal(e.to_string())
    })?;

    info!("Spam report pinned as {}", cid);
    Ok(Json(PinResponse { cid, message: "Spam reported successfully" }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Null, false, zero and empty containers count as no report at all.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
