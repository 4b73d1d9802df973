//! Supabase REST (PostgREST) and Storage client for the users table.

use async_trait::async_trait;
use denews_config::SupabaseConfig;
use denews_core::{NewUser, PhotoUpload, ServiceError, UserRecord, UserStore};
use reqwest::{Client, RequestBuilder};
use tracing::{error, info};

use crate::{check_status, parse_error, transport_error};

/// Client for a Supabase project's table and storage APIs.
pub struct SupabaseClient {
    client: Client,
    url: String,
    key: String,
    photo_bucket: String,
    users_table: String,
}

impl SupabaseClient {
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            key: config.key.clone(),
            photo_bucket: config.photo_bucket.clone(),
            users_table: config.users_table.clone(),
        }
    }

    /// Public URL of an object in the photo bucket.
    pub fn public_photo_url(&self, object_name: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.url, self.photo_bucket, object_name)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.users_table)
    }

    async fn read_rows(response: reqwest::Response) -> Result<Vec<UserRecord>, ServiceError> {
        let response = check_status("Supabase", response).await?;
        response
            .json()
            .await
            .map_err(|e| parse_error("Supabase", e))
    }
}

#[async_trait]
impl UserStore for SupabaseClient {
    async fn upload_photo(
        &self,
        object_name: &str,
        photo: PhotoUpload,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.url, self.photo_bucket, object_name);
        let response = self
            .authorized(self.client.post(url))
            .header("content-type", &photo.content_type)
            .body(photo.bytes)
            .send()
            .await
            .map_err(|e| transport_error("Supabase", e))?;

        check_status("Supabase", response).await.inspect_err(|e| {
            error!("Photo upload to bucket {} failed: {}", self.photo_bucket, e);
        })?;

        info!("Stored photo {} in bucket {}", object_name, self.photo_bucket);
        Ok(self.public_photo_url(object_name))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Vec<UserRecord>, ServiceError> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(user)
            .send()
            .await
            .map_err(|e| transport_error("Supabase", e))?;

        Self::read_rows(response).await.inspect_err(|e| {
            error!("Insert into {} failed: {}", self.users_table, e);
        })
    }

    async fn find_by_wallet(&self, wallet_address: &str) -> Result<Vec<UserRecord>, ServiceError> {
        let filter = format!("eq.{}", wallet_address);
        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("wallet_address", filter.as_str())])
            .send()
            .await
            .map_err(|e| transport_error("Supabase", e))?;

        Self::read_rows(response).await.inspect_err(|e| {
            error!("Lookup in {} failed: {}", self.users_table, e);
        })
    }
}
