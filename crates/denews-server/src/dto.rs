use denews_core::{Cid, UserRecord};
use serde::{Deserialize, Serialize};

// === Pinning DTOs ===

#[derive(Debug, Deserialize)]
pub struct PublishArticleRequest {
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpamReportRequest {
    #[serde(default)]
    pub spam_report: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PinResponse {
    pub cid: Cid,
    pub message: &'static str,
}

// === AI DTOs ===

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub response: String,
}

// === User DTOs ===

/// Fields collected from the create-user multipart form.
#[derive(Debug, Default)]
pub struct CreateUserForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phno: Option<String>,
    pub wallet_address: Option<String>,
    pub photo: Option<denews_core::PhotoUpload>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    pub data: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
pub struct GetUserQuery {
    pub wallet_address: String,
}

#[derive(Debug, Serialize)]
pub struct GetUserResponse {
    #[serde(rename = "isRegistered")]
    pub is_registered: bool,
    pub user: Option<UserRecord>,
}

impl GetUserResponse {
    pub fn from_user(user: Option<UserRecord>) -> Self {
        Self { is_registered: user.is_some(), user }
    }
}
