//! Gemini `generateContent` client.

use async_trait::async_trait;
use denews_config::GeminiConfig;
use denews_core::{ServiceError, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{check_status, parse_error, transport_error};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Client for Google's Gemini text generation API.
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Self {
        info!("GeminiClient: model={}, api_key_len={}", config.model, config.api_key.len());
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart { text: prompt }],
            }],
        };

        let url = format!("{}/v1beta/models/{}:generateContent", self.api_url, self.model);
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("Gemini", e))?;

        let response = check_status("Gemini", response).await.inspect_err(|e| {
            error!("Gemini generateContent failed: {}", e);
        })?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| parse_error("Gemini", e))?;

        // Text of the first candidate only; other parts (function calls etc.) carry no text.
        let content = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(ServiceError::MissingField("candidates"))?;

        Ok(content.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
    }
}
