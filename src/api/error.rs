//! API error types.

use serde_json::Value;

/// Errors produced by the HTTP layer and the offline backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never got a response (connection refused, DNS, timeout)
    Transport(String),
    /// The backend answered with a non-2xx status
    Status {
        status: u16,
        message: Option<String>,
        detail: Option<String>,
    },
    /// The response body did not match the expected schema
    Decode(String),
    /// Rejected on the client before any request was sent
    Rejected(String),
}

impl ApiError {
    /// Builds a status error from a raw response body.
    ///
    /// The backend reports failures as `{"message": ..., "detail": ...}`.
    /// `detail` may also be a list of validation entries, each with a `msg`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let detail = parsed.as_ref().and_then(|v| v.get("detail")).and_then(detail_text);

        ApiError::Status {
            status,
            message,
            detail,
        }
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::Status {
            status: 404,
            message: Some(format!("{} not found", what)),
            detail: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Human-readable message for display.
    ///
    /// Priority: backend `message`, backend `detail`, the underlying error's
    /// own message, then a generic fallback.
    pub fn user_message(&self) -> String {
        let text = match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        };

        if text.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            text
        }
    }
}

/// Message used when no error carries any text.
pub const FALLBACK_MESSAGE: &str = "Unknown error";

fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "{}", e),
            ApiError::Status { status, .. } => {
                write!(f, "Request failed with status code {}", status)
            }
            ApiError::Decode(e) => write!(f, "Invalid response from server: {}", e),
            ApiError::Rejected(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
