//! In-process fakes of the upstream services for handler and service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use denews_config::ServerConfig;
use denews_core::{
    Cid, NewUser, PhotoUpload, PinRequest, PinningService, ServiceError, TextGenerator, UserRecord,
    UserStore,
};

use crate::routes::build_router;
use crate::state::AppState;

pub const TEST_GATEWAY: &str = "https://gateway.test";

/// Pinning fake: CIDs per filename, optional failures, and a call log.
#[derive(Default)]
pub struct FakePinning {
    cids: HashMap<String, String>,
    failing: HashSet<String>,
    fail_json: bool,
    files: Mutex<Vec<(String, String, usize)>>,
    json: Mutex<Vec<PinRequest>>,
}

impl FakePinning {
    pub fn with_cid(mut self, filename: &str, cid: &str) -> Self {
        self.cids.insert(filename.to_string(), cid.to_string());
        self
    }

    pub fn failing_on(mut self, filename: &str) -> Self {
        self.failing.insert(filename.to_string());
        self
    }

    pub fn failing_json(mut self) -> Self {
        self.fail_json = true;
        self
    }

    pub fn file_calls(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn recorded_files(&self) -> Vec<(String, String, usize)> {
        self.files.lock().unwrap().clone()
    }

    pub fn recorded_json(&self) -> Vec<PinRequest> {
        self.json.lock().unwrap().clone()
    }
}

#[async_trait]
impl PinningService for FakePinning {
    async fn pin_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Cid, ServiceError> {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_string(), content_type.to_string(), bytes.len()));

        if self.failing.contains(filename) {
            return Err(ServiceError::Upstream("Pinata API error 502 Bad Gateway: ".into()));
        }
        let cid = self
            .cids
            .get(filename)
            .cloned()
            .unwrap_or_else(|| format!("Qm{}", filename));
        Ok(Cid::new(cid))
    }

    async fn pin_json(&self, request: PinRequest) -> Result<Cid, ServiceError> {
        let name = request.name.clone();
        self.json.lock().unwrap().push(request);
        if self.fail_json {
            return Err(ServiceError::Upstream("Pinata API error 500: down".into()));
        }
        Ok(Cid::new(format!("Qm{}", name)))
    }
}

/// Text generator fake that echoes the prompt, or fails.
#[derive(Default)]
pub struct FakeText {
    pub fail: bool,
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        if self.fail {
            return Err(ServiceError::Upstream("Gemini API error 429: quota".into()));
        }
        Ok(format!("echo: {}", prompt))
    }
}

/// User store fake backed by a vector of JSON rows.
#[derive(Default)]
pub struct FakeUsers {
    rows: Mutex<Vec<UserRecord>>,
    photos: Mutex<Vec<(String, PhotoUpload)>>,
}

impl FakeUsers {
    pub fn with_row(self, row: UserRecord) -> Self {
        self.rows.lock().unwrap().push(row);
        self
    }

    pub fn rows(&self) -> Vec<UserRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn photos(&self) -> Vec<(String, PhotoUpload)> {
        self.photos.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for FakeUsers {
    async fn upload_photo(
        &self,
        object_name: &str,
        photo: PhotoUpload,
    ) -> Result<String, ServiceError> {
        self.photos.lock().unwrap().push((object_name.to_string(), photo));
        Ok(format!("https://store.test/user-photos/{}", object_name))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Vec<UserRecord>, ServiceError> {
        let row = serde_json::to_value(user).map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.rows.lock().unwrap().push(row.clone());
        Ok(vec![row])
    }

    async fn find_by_wallet(&self, wallet_address: &str) -> Result<Vec<UserRecord>, ServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row["wallet_address"] == wallet_address)
            .cloned()
            .collect())
    }
}

/// Bundle of fakes plus the router wired over them.
pub struct TestApp {
    pub pinning: Arc<FakePinning>,
    pub text: Arc<FakeText>,
    pub users: Arc<FakeUsers>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new(FakePinning::default(), FakeText::default(), FakeUsers::default())
    }
}

impl TestApp {
    pub fn new(pinning: FakePinning, text: FakeText, users: FakeUsers) -> Self {
        Self {
            pinning: Arc::new(pinning),
            text: Arc::new(text),
            users: Arc::new(users),
        }
    }

    pub fn router(&self) -> Router {
        let state = AppState::new(
            self.pinning.clone(),
            self.text.clone(),
            self.users.clone(),
            TEST_GATEWAY,
        );
        build_router(Arc::new(state), &test_server_config())
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}

/// Server over the given pinning backend with the other services faked.
pub fn server_with_pinning(pinning: Arc<dyn PinningService>) -> TestServer {
    let state = AppState::new(
        pinning,
        Arc::new(FakeText::default()),
        Arc::new(FakeUsers::default()),
        TEST_GATEWAY,
    );
    TestServer::new(build_router(Arc::new(state), &test_server_config())).unwrap()
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        allowed_origins: vec!["http://localhost:5173".into()],
        max_upload_bytes: 1024 * 1024,
    }
}
