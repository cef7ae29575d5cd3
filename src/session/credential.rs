use crate::config::{CredentialConfig, CredentialSource};
use reqwest::header::HeaderValue;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no API token was provided")]
    Empty,

    #[error("API token contains whitespace or control characters")]
    InvalidCharacters,

    #[error("environment variable {var} is not set")]
    EnvVarMissing { var: String },

    #[error("no API token has been entered yet")]
    NotEntered,

    #[error("the API token is configured by the server and cannot be changed here")]
    NotUserEntered,
}

/// Bearer token for the inference endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(CredentialError::Empty);
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CredentialError::InvalidCharacters);
        }
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| CredentialError::InvalidCharacters)?;
        Ok(Self(token.to_string()))
    }

    /// Resolve the configured source. `User` has nothing to resolve until the
    /// page submits a token.
    pub fn from_config(config: &CredentialConfig) -> Result<Option<Self>, CredentialError> {
        match config {
            CredentialConfig::Literal { token } => Self::parse(token).map(Some),
            CredentialConfig::Env { var } => {
                let value = std::env::var(var)
                    .map_err(|_| CredentialError::EnvVarMissing { var: var.clone() })?;
                Self::parse(&value).map(Some)
            }
            CredentialConfig::User => Ok(None),
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub fn describe_source(source: CredentialSource) -> &'static str {
    match source {
        CredentialSource::Literal => "configuration file",
        CredentialSource::Env => "environment variable",
        CredentialSource::User => "entered by user",
    }
}
