//! User registration and lookup against the user store.

use denews_core::{NewUser, PhotoUpload, ServiceError, UserRecord, UserStore};
use tracing::info;
use uuid::Uuid;

use crate::dto::CreateUserForm;

/// Validates the form, stores the optional photo, then inserts the user.
pub async fn create_user(
    store: &dyn UserStore,
    form: CreateUserForm,
) -> Result<Vec<UserRecord>, ServiceError> {
    let name = form.name.ok_or_else(|| ServiceError::invalid("Missing required field: name"))?;
    let email = form.email.ok_or_else(|| ServiceError::invalid("Missing required field: email"))?;

    let photo_url = match form.photo {
        Some(photo) => Some(store_photo(store, photo).await?),
        None => None,
    };

    let user = NewUser {
        name,
        email,
        phno: form.phno,
        wallet_address: form.wallet_address,
        photo_url,
    };

    let rows = store.insert_user(&user).await?;
    info!("Created user {} ({} rows returned)", user.email, rows.len());
    Ok(rows)
}

/// First user registered under `wallet_address`, if any.
pub async fn find_user(
    store: &dyn UserStore,
    wallet_address: &str,
) -> Result<Option<UserRecord>, ServiceError> {
    let rows = store.find_by_wallet(wallet_address).await?;
    Ok(rows.into_iter().next())
}

async fn store_photo(store: &dyn UserStore, photo: PhotoUpload) -> Result<String, ServiceError> {
    let object_name = photo_object_name(&photo);
    store.upload_photo(&object_name, photo).await
}

fn photo_object_name(photo: &PhotoUpload) -> String {
    let id = Uuid::new_v4();
    match photo.extension() {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeUsers;
    use serde_json::json;

    fn photo(name: &str) -> PhotoUpload {
        PhotoUpload {
            filename: name.into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8],
        }
    }

    #[test]
    fn test_photo_object_name_keeps_extension() {
        let name = photo_object_name(&photo("selfie.jpeg"));
        let (id, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpeg");
        assert!(Uuid::parse_str(id).is_ok());

        let bare = photo_object_name(&photo("selfie"));
        assert!(Uuid::parse_str(&bare).is_ok());
    }

    #[tokio::test]
    async fn test_create_user_requires_name_and_email() {
        let store = FakeUsers::default();

        let form = CreateUserForm { email: Some("a@b.c".into()), ..Default::default() };
        let err = create_user(&store, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");

        let form = CreateUserForm { name: Some("Ada".into()), ..Default::default() };
        let err = create_user(&store, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: email");

        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_with_photo() {
        let store = FakeUsers::default();
        let form = CreateUserForm {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            wallet_address: Some("0xabc".into()),
            photo: Some(photo("me.jpg")),
            ..Default::default()
        };

        let rows = create_user(&store, form).await.unwrap();

        let photos = store.photos();
        assert_eq!(photos.len(), 1);
        assert!(photos[0].0.ends_with(".jpg"));
        assert_eq!(
            rows[0]["photo_url"],
            format!("https://store.test/user-photos/{}", photos[0].0)
        );
        assert_eq!(rows[0]["phno"], json!(null));
    }

    #[tokio::test]
    async fn test_find_user_returns_first_match() {
        let store = FakeUsers::default()
            .with_row(json!({ "id": 1, "wallet_address": "0xabc" }))
            .with_row(json!({ "id": 2, "wallet_address": "0xabc" }));

        let user = find_user(&store, "0xabc").await.unwrap().unwrap();
        assert_eq!(user["id"], 1);

        assert!(find_user(&store, "0xdef").await.unwrap().is_none());
    }
}
