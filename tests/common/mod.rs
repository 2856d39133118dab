//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure. Every test runs against
//! a fresh in-memory content store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use content_server::application::dto::request::{PostRequest, ServiceRequest};
use content_server::application::services::{ContentService, ContentServiceImpl};
use content_server::config::{
    ContentSettings, CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings,
    TranslationSettings,
};
use content_server::domain::services::{DefaultSlugGenerator, Translator};
use content_server::infrastructure::memory::InMemoryContentStore;
use content_server::infrastructure::translation::DisabledTranslator;
use content_server::presentation::middleware::Claims;
use content_server::startup::{build_router, AppState};

pub const JWT_SECRET: &str = "test-secret-test-secret-test-secret!";
pub const TEST_USER_ID: i64 = 7;

/// Settings suitable for tests
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://localhost/content_test".into(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: JWT_SECRET.into(),
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        translation: TranslationSettings {
            endpoint: None,
            api_key: None,
            timeout_secs: 1,
        },
        content: ContentSettings {
            slug_retry_limit: 5,
        },
        environment: "test".into(),
    }
}

/// Content service over `store` with the given translator
pub fn content_service(
    store: &InMemoryContentStore,
    translator: Arc<dyn Translator>,
) -> ContentServiceImpl<InMemoryContentStore> {
    ContentServiceImpl::new(
        store.clone(),
        translator,
        Arc::new(DefaultSlugGenerator::new()),
        5,
    )
}

/// Signed bearer token for `user_id`
pub fn token_for(user_id: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Parse a JSON payload into a Service request
pub fn service_request(body: Value) -> ServiceRequest {
    serde_json::from_value(body).unwrap()
}

/// Parse a JSON payload into a Post request
pub fn post_request(body: Value) -> PostRequest {
    serde_json::from_value(body).unwrap()
}

/// Minimal Service payload with generated text
pub fn service_body(locale: &str, title: &str) -> Value {
    let excerpt: String = Sentence(3..8).fake();
    json!({
        "locale": locale,
        "title": title,
        "excerpt": excerpt,
        "status": "published",
    })
}

/// Minimal Post payload with generated text
pub fn post_body(locale: &str, title: &str) -> Value {
    let body: String = Sentence(5..12).fake();
    json!({
        "locale": locale,
        "title": title,
        "body": body,
    })
}

/// Create a service through the service layer and return its id
pub async fn seed_service(content: &dyn ContentService, body: Value) -> i64 {
    content.create_service(Some(TEST_USER_ID), service_request(body)).await.unwrap()
}

/// Create a post through the service layer and return its id
pub async fn seed_post(content: &dyn ContentService, body: Value) -> i64 {
    content.create_post(Some(TEST_USER_ID), post_request(body)).await.unwrap()
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryContentStore,
    pub token: String,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let store = InMemoryContentStore::new();
        let state = AppState::new(store.clone(), Arc::new(DisabledTranslator), test_settings());

        Self {
            router: build_router(state),
            store,
            token: token_for(TEST_USER_ID),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make an authenticated request with an optional JSON body
    pub async fn request_auth(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", self.token));

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str) -> (StatusCode, Value) {
        self.request_auth("GET", uri, None).await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post_json_auth(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request_auth("POST", uri, Some(body)).await
    }

    /// Make an authenticated PUT request with JSON body
    pub async fn put_json_auth(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request_auth("PUT", uri, Some(body)).await
    }

    /// Make an authenticated DELETE request
    pub async fn delete_auth(&self, uri: &str) -> (StatusCode, Value) {
        self.request_auth("DELETE", uri, None).await
    }
}
