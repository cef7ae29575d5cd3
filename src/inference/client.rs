use super::types::*;
use crate::{Result, config::EndpointConfig, session::Credential};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Upper bound on how much of an error body is kept for diagnostics.
pub const MAX_ERROR_BODY_CHARS: usize = 2048;

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// One-shot generation call. No retries.
    async fn generate(&self, inputs: &str) -> std::result::Result<String, InferenceError>;
}

pub struct HttpInferenceClient {
    client: reqwest::Client,
    url: String,
    parameters: GenerationParameters,
    credential: Credential,
}

impl HttpInferenceClient {
    pub fn new(config: EndpointConfig, credential: Credential) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url,
            parameters: GenerationParameters {
                max_new_tokens: config.max_new_tokens,
            },
            credential,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn generate(&self, inputs: &str) -> std::result::Result<String, InferenceError> {
        let payload = GenerationRequest {
            inputs,
            parameters: self.parameters,
        };

        debug!(
            "Sending generation request to {} ({} input chars, max_new_tokens={})",
            self.url,
            inputs.chars().count(),
            self.parameters.max_new_tokens
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.credential.token())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Generation request to {} failed: {}", self.url, e);
                transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .ok()
                .map(|b| truncate(b.trim()))
                .filter(|b| !b.is_empty());
            warn!("Endpoint returned HTTP {}", status.as_u16());
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        let text = extract_generated_text(&bytes)?;

        debug!("Received {} generated chars", text.chars().count());
        Ok(text)
    }
}

/// Pull `generated_text` out of the first element of the response array.
pub fn extract_generated_text(body: &[u8]) -> std::result::Result<String, InferenceError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| InferenceError::malformed(format!("body is not valid JSON ({e})")))?;

    let items = value
        .as_array()
        .ok_or_else(|| InferenceError::malformed("expected a JSON array"))?;
    let first = items
        .first()
        .ok_or_else(|| InferenceError::malformed("response array is empty"))?;
    let object = first
        .as_object()
        .ok_or_else(|| InferenceError::malformed("first element is not an object"))?;

    match object.get("generated_text") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(InferenceError::malformed("'generated_text' is not a string")),
        None => Err(InferenceError::malformed("missing 'generated_text' field")),
    }
}

fn transport(err: reqwest::Error) -> InferenceError {
    InferenceError::Transport {
        message: err.to_string(),
        timed_out: err.is_timeout(),
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
