use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use textgen_form::{
    config::EndpointConfig,
    inference::{HttpInferenceClient, InferenceClient, InferenceError},
    session::Credential,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

mod common;

use common::test_utils::{MODEL_PATH, TEST_TOKEN, endpoint_for};

fn client_for(endpoint: EndpointConfig) -> HttpInferenceClient {
    HttpInferenceClient::new(endpoint, Credential::parse(TEST_TOKEN).unwrap()).unwrap()
}

#[tokio::test]
async fn test_generate_returns_first_generated_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_json(json!({
            "inputs": "Write a haiku",
            "parameters": {"max_new_tokens": 1000}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"generated_text": "hello"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(endpoint_for(&server));
    let output = client.generate("Write a haiku").await.unwrap();

    assert_eq!(output, "hello");
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal boom"))
        .mount(&server)
        .await;

    let client = client_for(endpoint_for(&server));
    let err = client.generate("hi").await.unwrap_err();

    assert_eq!(
        err,
        InferenceError::Status {
            status: 500,
            body: Some("internal boom".to_string()),
        }
    );
}

#[tokio::test]
async fn test_unauthorized_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(endpoint_for(&server));
    let err = client.generate("hi").await.unwrap_err();

    assert_eq!(
        err,
        InferenceError::Status {
            status: 401,
            body: None,
        }
    );
}

#[tokio::test]
async fn test_missing_generated_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}])))
        .mount(&server)
        .await;

    let client = client_for(endpoint_for(&server));
    let err = client.generate("hi").await.unwrap_err();

    assert!(matches!(err, InferenceError::MalformedResponse { .. }));
    assert!(err.to_string().contains("generated_text"));
}

#[tokio::test]
async fn test_object_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Model is loading"})),
        )
        .mount(&server)
        .await;

    let client = client_for(endpoint_for(&server));
    let err = client.generate("hi").await.unwrap_err();

    assert_eq!(err, InferenceError::malformed("expected a JSON array"));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"generated_text": "too late"}]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut endpoint = endpoint_for(&server);
    endpoint.timeout_secs = 1;
    let client = client_for(endpoint);
    let err = client.generate("hi").await.unwrap_err();

    assert!(matches!(
        err,
        InferenceError::Transport {
            timed_out: true,
            ..
        }
    ));
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = client_for(EndpointConfig {
        url: format!("http://127.0.0.1:{port}{MODEL_PATH}"),
        max_new_tokens: 1000,
        timeout_secs: 5,
    });
    let err = client.generate("hi").await.unwrap_err();

    match err {
        InferenceError::Transport { message, timed_out } => {
            assert!(!timed_out);
            assert!(!message.is_empty());
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_max_new_tokens_is_configurable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "inputs": "short",
            "parameters": {"max_new_tokens": 64}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"generated_text": "ok"}])))
        .expect(1)
        .mount(&server)
        .await;

    let mut endpoint = endpoint_for(&server);
    endpoint.max_new_tokens = 64;
    let output = client_for(endpoint).generate("short").await.unwrap();

    assert_eq!(output, "ok");
}
