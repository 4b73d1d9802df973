//! User registration and lookup handlers.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use denews_core::PhotoUpload;
use tracing::{error, info};

use crate::dto::{CreateUserForm, CreateUserResponse, GetUserQuery, GetUserResponse};
use crate::error::AppError;
use crate::extract::{ApiMultipart, ApiQuery};
use crate::services::users as user_service;
use crate::state::AppState;

/// POST /create-user/ - Registers a user from a multipart form.
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<CreateUserResponse>, AppError> {
    let form = read_form(multipart).await?;
    info!("Creating user (wallet: {:?})", form.wallet_address);

    let data = user_service::create_user(state.users.as_ref(), form)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(CreateUserResponse { message: "User created", data }))
}

/// GET /get-user/ - Looks a user up by wallet address.
pub async fn get_by_wallet(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<GetUserQuery>,
) -> Result<Json<GetUserResponse>, AppError> {
    let user = user_service::find_user(state.users.as_ref(), &query.wallet_address)
        .await
        .map_err(|e| {
            error!("Failed to look up wallet {}: {}", query.wallet_address, e);
            AppError::from(e)
        })?;

    Ok(Json(GetUserResponse::from_user(user)))
}

async fn read_form(mut multipart: Multipart) -> Result<CreateUserForm, AppError> {
    let mut form = CreateUserForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "photo" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            // Browsers send an empty part when no file was chosen.
            if !bytes.is_empty() {
                form.photo = Some(PhotoUpload { filename, content_type, bytes: bytes.to_vec() });
            }
            continue;
        }

        let value = Some(field.text().await?).filter(|v| !v.is_empty());
        match name.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "phno" => form.phno = value,
            "wallet_address" => form.wallet_address = value,
            _ => {}
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{FakePinning, FakeText, FakeUsers, TestApp};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_create_user_without_photo() {
        let app = TestApp::default();

        let form = MultipartForm::new()
            .add_text("name", "Ada")
            .add_text("email", "ada@example.com")
            .add_text("wallet_address", "0xabc");
        let response = app.server().post("/create-user/").multipart(form).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "User created",
            "data": [{
                "name": "Ada",
                "email": "ada@example.com",
                "phno": null,
                "wallet_address": "0xabc",
                "photo_url": null
            }]
        }));
        assert!(app.users.photos().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_with_photo() {
        let app = TestApp::default();

        let photo = Part::bytes(b"\xFF\xD8jpeg".as_slice())
            .file_name("avatar.jpg")
            .mime_type("image/jpeg");
        let form = MultipartForm::new()
            .add_text("name", "Ada")
            .add_text("email", "ada@example.com")
            .add_part("photo", photo);
        let response = app.server().post("/create-user").multipart(form).await;

        response.assert_status_ok();
        let photos = app.users.photos();
        assert_eq!(photos.len(), 1);
        assert!(photos[0].0.ends_with(".jpg"));
        assert_eq!(photos[0].1.content_type, "image/jpeg");

        let body: Value = response.json();
        let url = body["data"][0]["photo_url"].as_str().unwrap();
        assert!(url.starts_with("https://store.test/user-photos/"));
    }

    #[tokio::test]
    async fn test_create_user_missing_email() {
        let app = TestApp::default();

        let form = MultipartForm::new().add_text("name", "Ada");
        let response = app.server().post("/create-user/").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "detail": "Missing required field: email" }));
        assert!(app.users.rows().is_empty());
    }

    #[tokio::test]
    async fn test_get_user_registered() {
        let users = FakeUsers::default().with_row(json!({ "id": 3, "name": "Ada", "wallet_address": "0xabc" }));
        let app = TestApp::new(FakePinning::default(), FakeText::default(), users);

        let response = app
            .server()
            .get("/get-user/")
            .add_query_param("wallet_address", "0xabc")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "isRegistered": true,
            "user": { "id": 3, "name": "Ada", "wallet_address": "0xabc" }
        }));
    }

    #[tokio::test]
    async fn test_get_user_unknown_wallet() {
        let server = TestApp::default().server();

        let response = server.get("/get-user").add_query_param("wallet_address", "0xnobody").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "isRegistered": false, "user": null }));
    }

    #[tokio::test]
    async fn test_get_user_requires_wallet() {
        let server = TestApp::default().server();

        let response = server.get("/get-user/").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("wallet_address"));
    }
}
