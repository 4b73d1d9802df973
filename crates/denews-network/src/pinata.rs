//! Pinata pinning API client.

use async_trait::async_trait;
use denews_config::PinataConfig;
use denews_core::{Cid, PinRequest, PinningService, ServiceError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{check_status, parse_error, transport_error};

const PIN_FILE_PATH: &str = "/pinning/pinFileToIPFS";
const PIN_JSON_PATH: &str = "/pinning/pinJSONToIPFS";

#[derive(Serialize)]
struct PinataMetadata<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PinJsonRequest<'a> {
    pinata_metadata: PinataMetadata<'a>,
    pinata_content: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: Option<String>,
}

/// Client for Pinata's pinning endpoints.
pub struct PinataClient {
    client: Client,
    api_url: String,
    api_key: String,
    secret_api_key: String,
}

impl PinataClient {
    pub fn new(client: Client, config: &PinataConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            secret_api_key: config.secret_api_key.clone(),
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.api_url, path))
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_api_key)
    }

    async fn read_cid(response: reqwest::Response) -> Result<Cid, ServiceError> {
        let response = check_status("Pinata", response).await?;
        let body: PinResponse = response
            .json()
            .await
            .map_err(|e| parse_error("Pinata", e))?;

        body.ipfs_hash
            .filter(|hash| !hash.is_empty())
            .map(Cid::new)
            .ok_or(ServiceError::MissingField("IpfsHash"))
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Cid, ServiceError> {
        debug!("Pinning file {} ({}, {} bytes)", filename, content_type, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| ServiceError::invalid(format!("invalid content type {}: {}", content_type, e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .post(PIN_FILE_PATH)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("Pinata", e))?;

        Self::read_cid(response).await.inspect_err(|e| {
            error!("Pinata file upload failed for {}: {}", filename, e);
        })
    }

    async fn pin_json(&self, request: PinRequest) -> Result<Cid, ServiceError> {
        debug!("Pinning JSON document {}", request.name);

        let body = PinJsonRequest {
            pinata_metadata: PinataMetadata { name: &request.name },
            pinata_content: &request.content,
        };

        let response = self
            .post(PIN_JSON_PATH)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Pinata", e))?;

        Self::read_cid(response).await.inspect_err(|e| {
            error!("Pinata JSON pin failed for {}: {}", request.name, e);
        })
    }
}
