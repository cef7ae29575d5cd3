use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub credential: CredentialConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Settings for the remote text-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where the bearer token comes from.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CredentialConfig {
    /// Token written into the configuration file.
    Literal { token: String },
    /// Token read from an environment variable at startup.
    Env {
        #[serde(default = "default_token_var")]
        var: String,
    },
    /// Token typed into the page by the user.
    User,
}

impl CredentialConfig {
    pub fn kind(&self) -> CredentialSource {
        match self {
            Self::Literal { .. } => CredentialSource::Literal,
            Self::Env { .. } => CredentialSource::Env,
            Self::User => CredentialSource::User,
        }
    }
}

impl fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { .. } => f
                .debug_struct("Literal")
                .field("token", &"***")
                .finish(),
            Self::Env { var } => f.debug_struct("Env").field("var", var).finish(),
            Self::User => f.write_str("User"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    Literal,
    Env,
    User,
}

impl CredentialSource {
    pub fn accepts_user_input(self) -> bool {
        matches!(self, Self::User)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            max_new_tokens: default_max_new_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self::Env {
            var: default_token_var(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_endpoint_url() -> String {
    "https://api-inference.huggingface.co/models/tiiuae/falcon-7b-instruct".to_string()
}

fn default_max_new_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_token_var() -> String {
    "HF_API_TOKEN".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.logs.level, "info");
        assert_eq!(config.endpoint.max_new_tokens, 1000);
        assert_eq!(config.endpoint.timeout_secs, 60);
        assert_eq!(config.credential.kind(), CredentialSource::Env);
    }

    #[test]
    fn test_credential_sources_parse() {
        let literal: CredentialConfig =
            serde_yaml::from_str("source: literal\ntoken: hf_abc").unwrap();
        assert!(matches!(literal, CredentialConfig::Literal { ref token } if token == "hf_abc"));

        let env: CredentialConfig = serde_yaml::from_str("source: env").unwrap();
        assert!(matches!(env, CredentialConfig::Env { ref var } if var == "HF_API_TOKEN"));

        let user: CredentialConfig = serde_yaml::from_str("source: user").unwrap();
        assert_eq!(user.kind(), CredentialSource::User);
        assert!(user.kind().accepts_user_input());
    }

    #[test]
    fn test_literal_token_redacted_in_debug() {
        let literal = CredentialConfig::Literal {
            token: "hf_do_not_print".to_string(),
        };
        let config = Config {
            server: ServerConfig::default(),
            endpoint: EndpointConfig::default(),
            credential: literal.clone(),
        };

        assert_eq!(format!("{literal:?}"), r#"Literal { token: "***" }"#);
        assert!(!format!("{config:?}").contains("hf_do_not_print"));
        assert_eq!(
            format!("{:?}", CredentialConfig::Env { var: "HF_API_TOKEN".to_string() }),
            r#"Env { var: "HF_API_TOKEN" }"#
        );
    }

    #[test]
    fn test_unknown_credential_source_rejected() {
        let result: Result<CredentialConfig, _> = serde_yaml::from_str("source: vault");
        assert!(result.is_err());
    }
}
