use crate::{config::CredentialSource, dataset::DatasetSummary, session::SessionState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: SessionState,
    pub credential_source: CredentialSource,
    pub dataset: Option<DatasetSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub dataset: DatasetSummary,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub output: String,
    pub used_dataset: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<SessionState>,
}

impl ErrorResponse {
    pub fn new(kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            kind,
            error: error.into(),
            status: None,
            body: None,
            state: None,
        }
    }
}
