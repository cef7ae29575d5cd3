use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
}

/// Why a generation call produced no text. Each variant is reported to the
/// user differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// Connection failure, timeout, or an interrupted body.
    #[error("Request failed: {message}")]
    Transport { message: String, timed_out: bool },

    /// The endpoint answered with a non-2xx status.
    #[error("Endpoint returned HTTP {status}{}", body_suffix(.body))]
    Status { status: u16, body: Option<String> },

    /// 2xx, but the body is not `[{"generated_text": "..."}, ...]`.
    #[error("Error processing the response: {reason}. Check the API response format.")]
    MalformedResponse { reason: String },
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(": {b}")).unwrap_or_default()
}

impl InferenceError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}
