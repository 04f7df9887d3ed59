use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: Value,
}

impl ErrorResponse {
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(message) => message.clone(),
            // validation errors come back as a list of objects
            Value::Array(errors) => errors
                .iter()
                .map(|error| match error.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => error.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("{message} (HTTP {status})")]
    Status { status: StatusCode, message: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Expected a response body from `{0}`")]
    MissingBody(String),
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport(error) => error.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpError::Unauthorized { .. })
    }
}
