//! Generative text relay.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{error, info};

use crate::dto::{PromptRequest, PromptResponse};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /ai-agent - Forwards a prompt to the text generator.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    info!("AI prompt received ({} chars)", req.prompt.chars().count());

    let response = state.text.generate(&req.prompt).await.map_err(|e| {
        error!("Text generation failed: {}", e);
        AppError::Internal(e.to_string())
    })?;

    Ok(Json(PromptResponse { response }))
}
