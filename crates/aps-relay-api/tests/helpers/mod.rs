//! Test helpers: build the relay router against a local upstream stub.
//!
//! Run from workspace root: `cargo test -p aps-relay-api`. Every test gets its
//! own mockito server, so upstream expectations never leak between tests.

#![allow(dead_code)]

use aps_relay_api::constants;
use aps_relay_api::setup::{self, routes};
use aps_relay_core::Config;
use axum_test::TestServer;
use mockito::{Matcher, Mock, ServerGuard};
use std::collections::HashMap;

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_BUCKET: &str = "relay-test-bucket";
pub const TEST_TOKEN: &str = "test-access-token";

pub const TOKEN_PATH: &str = "/authentication/v2/token";
pub const BUCKET_DETAILS_PATH: &str = "/oss/v2/buckets/relay-test-bucket/details";
pub const BUCKETS_PATH: &str = "/oss/v2/buckets";
pub const JOB_PATH: &str = "/modelderivative/v2/designdata/job";

/// API path prefix for tests (e.g. `/api/aps`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: the relay under test and the upstream stub it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub upstream: ServerGuard,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Fully configured relay with no origin restriction.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Relay configured from the default test settings plus `overrides`.
///
/// An override with an empty value unsets that variable.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let upstream = mockito::Server::new_async().await;

    let mut vars: HashMap<String, String> = HashMap::from([
        ("APS_CLIENT_ID".to_string(), TEST_CLIENT_ID.to_string()),
        ("APS_CLIENT_SECRET".to_string(), TEST_CLIENT_SECRET.to_string()),
        ("APS_BUCKET".to_string(), TEST_BUCKET.to_string()),
        ("APS_BASE_URL".to_string(), upstream.url()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test configuration");
    let state = setup::build_state(config.clone()).expect("Failed to build app state");
    let app = routes::setup_routes(&config, state);

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, upstream }
}

/// Token endpoint answering with a valid bundle, expected exactly once.
pub async fn mock_token(upstream: &mut ServerGuard) -> Mock {
    mock_token_hits(upstream, 1).await
}

pub async fn mock_token_hits(upstream: &mut ServerGuard, hits: usize) -> Mock {
    upstream
        .mock("POST", TOKEN_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("client_id".into(), TEST_CLIENT_ID.into()),
            Matcher::UrlEncoded("client_secret".into(), TEST_CLIENT_SECRET.into()),
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"access_token":"{}","token_type":"Bearer","expires_in":3599}}"#,
            TEST_TOKEN
        ))
        .expect(hits)
        .create_async()
        .await
}

/// Catch-all mocks that fail the test if the relay reaches upstream at all.
pub async fn forbid_upstream(upstream: &mut ServerGuard) -> Vec<Mock> {
    let mut mocks = Vec::new();
    for method in ["GET", "POST", "PUT"] {
        mocks.push(
            upstream
                .mock(method, Matcher::Any)
                .with_status(500)
                .expect(0)
                .create_async()
                .await,
        );
    }
    mocks
}

pub async fn assert_no_upstream_calls(mocks: &[Mock]) {
    for mock in mocks {
        mock.assert_async().await;
    }
}
