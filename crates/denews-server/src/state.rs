use std::sync::Arc;

use anyhow::{Context, Result};
use denews_config::Config;
use denews_core::{PinningService, TextGenerator, UserStore};
use denews_network::{build_http_client, GeminiClient, PinataClient, SupabaseClient};
use tracing::{info, warn};

use crate::services::upload::BatchUploader;

pub struct AppState {
    pub pinning: Arc<dyn PinningService>,
    pub text: Arc<dyn TextGenerator>,
    pub users: Arc<dyn UserStore>,
    pub uploader: BatchUploader,
}

impl AppState {
    pub fn new(
        pinning: Arc<dyn PinningService>,
        text: Arc<dyn TextGenerator>,
        users: Arc<dyn UserStore>,
        gateway_url: impl Into<String>,
    ) -> Self {
        let uploader = BatchUploader::new(pinning.clone(), gateway_url);
        Self { pinning, text, users, uploader }
    }

    /// Wires the network clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_http_client(config.upstream_timeout)
            .context("failed to build upstream HTTP client")?;

        if !config.pinata.has_credentials() {
            warn!("Pinata credentials not configured: pinning requests will be rejected upstream");
        }

        let pinata = PinataClient::new(http.clone(), &config.pinata);
        let gemini = GeminiClient::new(http.clone(), &config.gemini);
        let supabase = SupabaseClient::new(http, &config.supabase);

        info!(
            "Upstreams: pinata={} gateway={} gemini_model={} supabase={} timeout={}s",
            config.pinata.api_url,
            config.pinata.gateway_url,
            gemini.model(),
            config.supabase.url,
            config.upstream_timeout.as_secs()
        );

        Ok(Self::new(
            Arc::new(pinata),
            Arc::new(gemini),
            Arc::new(supabase),
            config.pinata.gateway_url.clone(),
        ))
    }
}
