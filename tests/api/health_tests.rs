//! Health Check API Tests

use axum::http::StatusCode;

use crate::common::TestApp;

/// Test basic health check endpoint returns 200 OK
#[tokio::test]
async fn test_health_check_returns_ok() {
    // Arrange
    let app = TestApp::new();

    // Act
    let (status, body) = app.get("/health").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body.get("version").is_some());
}

/// Test liveness probe endpoint
#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let (status, body) = app.get("/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

/// Readiness opens a transaction against the content store
#[tokio::test]
async fn test_readiness_probe() {
    let app = TestApp::new();

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["checks"]["store"]["latency_ms"].is_u64());
}

/// Health endpoints do not need a token
#[tokio::test]
async fn test_metrics_endpoint_is_public() {
    let app = TestApp::new();
    app.get("/health").await;

    let response = app.get("/metrics").await;

    // Prometheus text is not JSON
    assert_eq!(response.0, StatusCode::OK);
}
