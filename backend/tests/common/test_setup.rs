use axum::{body::Body, http::Request, response::Response, Router};
use podu_backend::{
    foss_tools::FossToolsCatalog, media_storage::mock::MockMediaStorage, server,
    types::Environment,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

pub const TEST_BASE_URL: &str = "https://podu.test";

/// Setup test environment variables and logging
pub fn setup_test_env() {
    dotenvy::from_path(".env.example").ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to an in-memory bucket and a temporary FOSS catalog
pub struct TestContext {
    pub router: Router,
    pub media_storage: Arc<MockMediaStorage>,
    // Keep the catalog file alive for the duration of the test
    _foss_tools_file: NamedTempFile,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_storage(MockMediaStorage::new(TEST_BASE_URL))
    }

    pub fn with_storage(media_storage: MockMediaStorage) -> Self {
        Self::with_foss_tools(media_storage, SAMPLE_FOSS_TOOLS)
    }

    pub fn with_foss_tools(media_storage: MockMediaStorage, foss_tools_json: &str) -> Self {
        Self::build(
            Environment::Development {
                presign_expiry_override: None,
            },
            media_storage,
            foss_tools_json,
        )
    }

    pub fn in_environment(environment: Environment) -> Self {
        Self::build(
            environment,
            MockMediaStorage::new(TEST_BASE_URL),
            SAMPLE_FOSS_TOOLS,
        )
    }

    fn build(
        environment: Environment,
        media_storage: MockMediaStorage,
        foss_tools_json: &str,
    ) -> Self {
        setup_test_env();

        let mut foss_tools_file = NamedTempFile::new().expect("Failed to create temp file");
        foss_tools_file
            .write_all(foss_tools_json.as_bytes())
            .expect("Failed to write FOSS tools");

        let media_storage = Arc::new(media_storage);
        let foss_tools = Arc::new(FossToolsCatalog::new(foss_tools_file.path().to_path_buf()));

        let router = server::router(environment, media_storage.clone(), foss_tools);

        Self {
            router,
            media_storage,
            _foss_tools_file: foss_tools_file,
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_raw_post_request(
        &self,
        route: &str,
        content_type: &str,
        body: &'static str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}

pub const SAMPLE_FOSS_TOOLS: &str = r#"{
  "tools": [
    {
      "name": "axum",
      "description": "Ergonomic and modular web framework",
      "githubUrl": "https://github.com/tokio-rs/axum"
    },
    {
      "name": "tokio",
      "description": "Asynchronous runtime for Rust",
      "githubUrl": "https://github.com/tokio-rs/tokio"
    }
  ]
}"#;
