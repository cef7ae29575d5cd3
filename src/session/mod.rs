//! The single form session: credential state, the uploaded dataset, and the
//! operations the page can trigger.

mod credential;
pub mod fsm;

pub use credential::{Credential, CredentialError, describe_source};
pub use fsm::{SessionEvent, SessionState, SessionStateMachine};

use crate::{
    Result,
    compose::{Prompt, PromptError, compose},
    config::{CredentialConfig, CredentialSource, EndpointConfig},
    dataset::{Dataset, DatasetError, DatasetSummary},
    inference::{HttpInferenceClient, InferenceClient, InferenceError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Generation is unavailable: {reason}")]
    NotReady { state: SessionState, reason: String },

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Uploads are unavailable: {reason}")]
    NotReady { state: SessionState, reason: String },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub output: String,
    pub used_dataset: bool,
}

pub struct Session {
    fsm: SessionStateMachine,
    source: CredentialSource,
    endpoint: EndpointConfig,
    client: Option<Arc<dyn InferenceClient>>,
    dataset: Option<Dataset>,
}

impl Session {
    /// Build the session and, for server-side credential sources, resolve and
    /// validate the token right away.
    pub fn new(endpoint: EndpointConfig, credential: &CredentialConfig) -> Self {
        let mut session = Self {
            fsm: SessionStateMachine::new(),
            source: credential.kind(),
            endpoint,
            client: None,
            dataset: None,
        };

        if !session.source.accepts_user_input() {
            session.resolve_configured(credential);
        }

        session
    }

    /// A session that is already `Ready` with the given client.
    pub fn with_client(endpoint: EndpointConfig, client: Arc<dyn InferenceClient>) -> Self {
        let mut fsm = SessionStateMachine::new();
        let ready = fsm
            .transition(SessionEvent::CredentialSubmitted)
            .and_then(|_| fsm.transition(SessionEvent::CredentialAccepted));
        debug_assert!(ready.is_ok());

        Self {
            fsm,
            source: CredentialSource::Literal,
            endpoint,
            client: Some(client),
            dataset: None,
        }
    }

    fn resolve_configured(&mut self, config: &CredentialConfig) {
        if self.fsm.transition(SessionEvent::CredentialSubmitted).is_err() {
            return;
        }
        match Credential::from_config(config) {
            Ok(Some(credential)) => self.accept(credential),
            Ok(None) => self.reject(CredentialError::NotEntered.to_string()),
            Err(e) => {
                error!(
                    "Configured API token ({}) is unusable: {}",
                    describe_source(self.source),
                    e
                );
                self.reject(e.to_string());
            }
        }
    }

    fn accept(&mut self, credential: Credential) {
        match HttpInferenceClient::new(self.endpoint.clone(), credential) {
            Ok(client) => {
                info!("Inference client ready for {}", client.url());
                self.client = Some(Arc::new(client));
                if let Err(e) = self.fsm.transition(SessionEvent::CredentialAccepted) {
                    error!("Could not mark credential as accepted: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to build inference client: {}", e);
                self.reject(format!("failed to build HTTP client: {e}"));
            }
        }
    }

    fn reject(&mut self, reason: String) {
        self.client = None;
        if let Err(e) = self.fsm.reject(reason) {
            error!("Could not mark credential as rejected: {}", e);
        }
    }

    pub fn state(&self) -> SessionState {
        self.fsm.current_state()
    }

    pub fn credential_source(&self) -> CredentialSource {
        self.source
    }

    pub fn last_error(&self) -> Option<&str> {
        self.fsm.last_error()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    fn not_ready_reason(&self) -> String {
        self.last_error()
            .map(str::to_string)
            .unwrap_or_else(|| CredentialError::NotEntered.to_string())
    }

    fn require_ready(&self) -> std::result::Result<(), UploadError> {
        if self.fsm.is_ready() {
            return Ok(());
        }
        Err(UploadError::NotReady {
            state: self.state(),
            reason: self.not_ready_reason(),
        })
    }

    /// Accept a token typed into the page. A previous token, valid or not, is
    /// replaced.
    pub fn submit_credential(&mut self, raw: &str) -> Result<()> {
        if !self.source.accepts_user_input() {
            return Err(CredentialError::NotUserEntered.into());
        }
        if matches!(self.state(), SessionState::Ready | SessionState::Error) {
            self.fsm.transition(SessionEvent::Reset)?;
            self.client = None;
        }

        self.fsm.transition(SessionEvent::CredentialSubmitted)?;
        match Credential::parse(raw) {
            Ok(credential) => {
                self.accept(credential);
                match self.fsm.last_error() {
                    Some(reason) if !self.fsm.is_ready() => Err(crate::Error::session(reason)),
                    _ => Ok(()),
                }
            }
            Err(e) => {
                warn!("Rejected user-entered API token: {}", e);
                self.reject(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Forget a user-entered token.
    pub fn reset_credential(&mut self) -> Result<()> {
        if !self.source.accepts_user_input() {
            return Err(CredentialError::NotUserEntered.into());
        }
        self.fsm.transition(SessionEvent::Reset)?;
        self.client = None;
        Ok(())
    }

    /// Parse and store an uploaded file. Only allowed once the session is
    /// `Ready`. On a parse failure any previously stored dataset is dropped,
    /// so generation falls back to the bare prompt.
    pub fn upload_dataset(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> std::result::Result<DatasetSummary, UploadError> {
        self.require_ready()?;
        match Dataset::from_csv(name, bytes) {
            Ok(dataset) => {
                info!(
                    "Stored dataset '{}' ({} rows)",
                    dataset.name,
                    dataset.row_count()
                );
                let summary = dataset.summary();
                self.dataset = Some(dataset);
                Ok(summary)
            }
            Err(e) => {
                warn!(
                    "Error reading CSV '{}': {}. Continuing without a dataset",
                    name, e
                );
                self.dataset = None;
                Err(e.into())
            }
        }
    }

    /// Drop the stored dataset. Returns whether one was present.
    pub fn clear_dataset(&mut self) -> std::result::Result<bool, UploadError> {
        self.require_ready()?;
        Ok(self.dataset.take().is_some())
    }

    pub async fn generate(&self, text: &str) -> std::result::Result<Generation, SubmitError> {
        let client = match (&self.client, self.fsm.is_ready()) {
            (Some(client), true) => client,
            _ => {
                return Err(SubmitError::NotReady {
                    state: self.state(),
                    reason: self.not_ready_reason(),
                });
            }
        };

        let prompt = Prompt::new(text)?;
        let composed = compose(&prompt, self.dataset.as_ref());

        let span = info_span!("generate", request_id = %Uuid::new_v4());
        async {
            info!(
                "Generating (dataset: {}, {} input chars)",
                composed.used_dataset,
                composed.inputs.chars().count()
            );
            match client.generate(&composed.inputs).await {
                Ok(output) => Ok(Generation {
                    output,
                    used_dataset: composed.used_dataset,
                }),
                Err(e) => {
                    warn!("Generation failed: {}", e);
                    Err(SubmitError::Inference(e))
                }
            }
        }
        .instrument(span)
        .await
    }
}
