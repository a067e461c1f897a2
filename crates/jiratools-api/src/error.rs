//! Error types for the JIRA client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Markdown(#[from] jiratools_core::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a normalized API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401/403: bad credentials or missing permissions
    Auth,
    NotFound,
    Validation,
    RateLimited,
    /// No response was received from the server at all
    TransientNetwork,
    Unknown,
}

/// A failed API call, normalized after retries were exhausted. Carries the
/// HTTP status (when a response was received) and the message extracted
/// from JIRA's error body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn from_response(status: u16, body: &str) -> Self {
        Self {
            kind: classify(status),
            status: Some(status),
            message: format!("API error {status}: {}", extract_details(body)),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::TransientNetwork,
            status: None,
            message: format!("Network error: {}", detail.into()),
        }
    }
}

fn classify(status: u16) -> ApiErrorKind {
    match status {
        401 | 403 => ApiErrorKind::Auth,
        404 => ApiErrorKind::NotFound,
        400 | 422 => ApiErrorKind::Validation,
        429 => ApiErrorKind::RateLimited,
        _ => ApiErrorKind::Unknown,
    }
}

/// Extract a readable message from JIRA's error body: `errorMessages`
/// joined, or the `errors` map as `field: reason` pairs, else the first
/// 200 characters of the raw body.
fn extract_details(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(messages) = value.get("errorMessages").and_then(|m| m.as_array()) {
            if !messages.is_empty() {
                return messages
                    .iter()
                    .filter_map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
            }
        }
        if let Some(errors) = value.get("errors").and_then(|e| e.as_object()) {
            if !errors.is_empty() {
                return errors
                    .iter()
                    .map(|(field, reason)| match reason.as_str() {
                        Some(text) => format!("{field}: {text}"),
                        None => format!("{field}: {reason}"),
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
            }
        }
    }
    body.chars().take(200).collect()
}
