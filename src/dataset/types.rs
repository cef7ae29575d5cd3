use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Rows shown back to the user after an upload.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("the uploaded file is not valid UTF-8 text")]
    Encoding,

    #[error("malformed CSV at line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

/// A parsed comma-separated table: one header row naming the columns, then
/// string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub preview: Vec<Vec<String>>,
    pub uploaded_at: DateTime<Utc>,
}
