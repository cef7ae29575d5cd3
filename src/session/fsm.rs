use crate::{Error, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoCredential,
    ValidatingCredential,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    CredentialSubmitted,
    CredentialAccepted,
    CredentialRejected,
    Reset,
}

/// Tracks whether generation is currently allowed.
#[derive(Debug)]
pub struct SessionStateMachine {
    state: SessionState,
    last_error: Option<String>,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::NoCredential,
            last_error: None,
        }
    }

    pub fn current_state(&self) -> SessionState {
        self.state
    }

    pub fn transition(&mut self, event: SessionEvent) -> Result<()> {
        let old_state = self.state;
        debug!("Session processing event {:?} in state {:?}", event, old_state);

        let new_state = match (self.state, event) {
            (SessionState::NoCredential, SessionEvent::CredentialSubmitted) => {
                SessionState::ValidatingCredential
            }
            (SessionState::ValidatingCredential, SessionEvent::CredentialAccepted) => {
                SessionState::Ready
            }
            (SessionState::ValidatingCredential, SessionEvent::CredentialRejected) => {
                SessionState::Error
            }
            (SessionState::Ready, SessionEvent::Reset) => SessionState::NoCredential,
            (SessionState::Error, SessionEvent::Reset) => SessionState::NoCredential,
            _ => {
                warn!(
                    "Invalid session transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        if new_state != SessionState::Error {
            self.last_error = None;
        }

        info!(
            "Session state transition: {:?} -> {:?} (event: {:?})",
            old_state, new_state, event
        );
        self.state = new_state;
        Ok(())
    }

    /// Reject the pending credential and remember why.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<()> {
        self.transition(SessionEvent::CredentialRejected)?;
        self.last_error = Some(reason.into());
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
