use filedesk_core::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::persist::PersistError;

/// Failure of one workflow step.
///
/// Every variant displays the message alone so panels can show server text
/// verbatim behind their own prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Upload(String),
    #[error("{0}")]
    Processing(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Cleanup(String),
    #[error("{0}")]
    Persist(String),
    #[error("{0}")]
    Spreadsheet(String),
}

impl WorkflowError {
    /// `true` when the request never left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_)
                | WorkflowError::Persist(_)
                | WorkflowError::Spreadsheet(_)
        )
    }
}

impl From<PersistError> for WorkflowError {
    fn from(err: PersistError) -> Self {
        WorkflowError::Persist(err.to_string())
    }
}

/// Message for a failed response.
///
/// Prefers the JSON `error` field, then the raw text body, then the status
/// line (`"404 Not Found"`).
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status.to_string()
}

/// Error carried inside an otherwise successful JSON body.
///
/// `{"error": "..."}` and `{"success": false}` both count.
pub(crate) fn embedded_error(value: &serde_json::Value) -> Option<String> {
    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Some(message.to_string());
    }
    match value.get("success").and_then(|s| s.as_bool()) {
        Some(false) => Some("request was not successful".to_string()),
        _ => None,
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> WorkflowError {
    if err.is_connect() {
        return WorkflowError::Transport(format!("could not reach server: {err}"));
    }
    WorkflowError::Transport(err.to_string())
}
