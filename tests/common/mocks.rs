use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use textgen_form::inference::{InferenceClient, InferenceError};

/// Scripted inference client: replays queued results in order and records
/// every input it was asked to generate from.
#[derive(Debug, Clone, Default)]
pub struct MockInferenceClient {
    pub responses: Arc<Mutex<Vec<Result<String, InferenceError>>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(self, responses: Vec<Result<String, InferenceError>>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn get_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn generate(&self, inputs: &str) -> Result<String, InferenceError> {
        self.requests.lock().unwrap().push(inputs.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(InferenceError::Transport {
                message: "no more mock responses available".to_string(),
                timed_out: false,
            });
        }

        responses.remove(0)
    }
}
