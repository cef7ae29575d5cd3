//! Builds the text sent to the model from the user's prompt and an optional
//! dataset.

use crate::dataset::Dataset;
use thiserror::Error;

pub const DATASET_PREAMBLE: &str = "Here's the relevant data from the CSV file:\n";
pub const DATASET_INSTRUCTION: &str =
    "\n\nBased on the CSV data, answer this question or fulfill this request: ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Please enter a prompt.")]
    Empty,
}

/// Non-empty user instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        if text.is_empty() {
            return Err(PromptError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The final model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRequest {
    pub inputs: String,
    pub used_dataset: bool,
}

pub fn compose(prompt: &Prompt, dataset: Option<&Dataset>) -> ComposedRequest {
    match dataset {
        Some(dataset) => {
            let table = dataset.render_table();
            let mut inputs = String::with_capacity(
                DATASET_PREAMBLE.len() + table.len() + DATASET_INSTRUCTION.len() + prompt.0.len(),
            );
            inputs.push_str(DATASET_PREAMBLE);
            inputs.push_str(&table);
            inputs.push_str(DATASET_INSTRUCTION);
            inputs.push_str(&prompt.0);
            ComposedRequest {
                inputs,
                used_dataset: true,
            }
        }
        None => ComposedRequest {
            inputs: prompt.0.clone(),
            used_dataset: false,
        },
    }
}
