//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use erp_api::{AppState, build_app};
use erp_auth::{SessionContext, build_auth_backend};
use erp_core::config::AppConfig;
use erp_database::MemoryBackend;
use erp_storage::build_storage;

pub const DEMO_EMAIL: &str = "ops@example.com";
pub const DEMO_PASSWORD: &str = "s3cret-pass";

const MULTIPART_BOUNDARY: &str = "erp-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-process tables behind the router
    pub backend: Arc<MemoryBackend>,
    /// Local storage root, removed on drop
    pub storage_root: TempDir,
}

/// A part of a `multipart/form-data` body.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl TestApp {
    /// Create a new test application over an empty in-process backend
    pub async fn new() -> Self {
        let storage_root = tempfile::tempdir().expect("Failed to create storage dir");

        let mut config = AppConfig::default();
        config.auth.demo_email = Some(DEMO_EMAIL.to_string());
        config.auth.demo_password = Some(DEMO_PASSWORD.to_string());
        config.storage.local_root = storage_root.path().to_string_lossy().into_owned();
        config.storage.max_image_bytes = 1024;

        let backend = Arc::new(MemoryBackend::new());
        let auth = build_auth_backend(&config.backend, &config.auth)
            .await
            .expect("Failed to build auth backend");
        let session = SessionContext::new(auth, &config.auth);
        let storage = build_storage(&config.storage, &config.backend, None)
            .await
            .expect("Failed to init storage");

        let state = AppState::new(config, backend.clone(), storage, session);

        Self {
            router: build_app(state),
            backend,
            storage_root,
        }
    }

    /// Login with the demo account and return the access token
    pub async fn login(&self) -> String {
        let body = serde_json::json!({
            "email": DEMO_EMAIL,
            "password": DEMO_PASSWORD,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        self.send(req.body(Body::from(body_str)).expect("Failed to build request"))
            .await
    }

    /// Post a `multipart/form-data` body
    pub async fn multipart(&self, path: &str, parts: &[FormPart<'_>], token: &str) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
            let disposition = match part.file_name {
                Some(file) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file}\"\r\n",
                    part.name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
            };
            body.extend_from_slice(disposition.as_bytes());
            if let Some(content_type) = part.content_type {
                body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}
