//! Common test utilities for LapakGaming client integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::time::Duration;

use lapakgaming_client::{Environment, LapakConfig, LapakGaming, RetryPolicy};
use serde_json::{json, Value};
use wiremock::MockServer;

/// API key configured on every test client.
pub const API_KEY: &str = "test-api-key";

/// Test harness containing a mock API server and a client pointed at it.
pub struct TestHarness {
    /// The mock LapakGaming API.
    pub server: MockServer,
    /// Client configured against `server`.
    pub client: LapakGaming,
}

impl TestHarness {
    /// Start a mock server and build a client with a short retry delay.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let client = client_for(&server.uri());
        Self { server, client }
    }
}

/// Build a client for an arbitrary base URL.
pub fn client_for(base_url: &str) -> LapakGaming {
    let config = LapakConfig::builder()
        .with_api_key(API_KEY)
        .with_environment(Environment::Development)
        .with_endpoint(Environment::Development, base_url)
        .with_timeout_seconds(5)
        .build()
        .expect("Failed to build config");

    LapakGaming::new(config)
        .expect("Failed to build client")
        .with_retry_policy(RetryPolicy::new(3).with_delay(Duration::from_millis(10)))
}

/// A successful response body.
pub fn success(data: Value) -> Value {
    json!({ "code": "SUCCESS", "message": "", "data": data })
}

/// A failed response body.
pub fn failure(code: &str) -> Value {
    json!({ "code": code, "message": "", "data": null })
}
