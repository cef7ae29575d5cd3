use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use textgen_form::{
    config::{CredentialConfig, EndpointConfig},
    server::{self, AppState},
    session::Session,
};
use tower::ServiceExt; // for `oneshot`
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "hf_test_token";
pub const MODEL_PATH: &str = "/models/test-model";

/// Endpoint settings pointing at the mock server.
pub fn endpoint_for(server: &MockServer) -> EndpointConfig {
    EndpointConfig {
        url: format!("{}{}", server.uri(), MODEL_PATH),
        max_new_tokens: 1000,
        timeout_secs: 5,
    }
}

pub fn literal_credential() -> CredentialConfig {
    CredentialConfig::Literal {
        token: TEST_TOKEN.to_string(),
    }
}

pub fn create_test_app(endpoint: EndpointConfig, credential: CredentialConfig) -> Router {
    create_test_app_with_limit(endpoint, credential, 10 * 1024 * 1024)
}

pub fn create_test_app_with_limit(
    endpoint: EndpointConfig,
    credential: CredentialConfig,
    max_upload_bytes: usize,
) -> Router {
    let session = Session::new(endpoint, &credential);
    server::router(AppState::new(session), max_upload_bytes)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn csv_upload(name: &str, contents: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/dataset?name={name}"))
        .header("content-type", "text/csv")
        .body(Body::from(contents.to_vec()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request through the router and decode the JSON reply.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
