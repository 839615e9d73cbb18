//! Gateway errors and display-message normalization.
//!
//! ERROR HANDLING
//! ==============
//! Backends report failures in several shapes (`message` as a string, as a
//! list of validation strings, or not at all). [`error_message`] collapses
//! them into one display string with a fixed precedence; every view uses it
//! so the same failure always reads the same way.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde_json::Value;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied.";
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors produced by gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },

    /// A success response did not match the expected record type.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Input rejected on the client before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The base URL or request path could not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// Response body of the failed request, if it was JSON.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Text describing the failure itself rather than the response body. A
    /// status error reads "Request failed with status code N".
    fn detail(&self) -> Option<String> {
        match self {
            Self::Status { .. } | Self::InvalidUrl(_) | Self::HttpClientBuild(_) => Some(self.to_string()),
            Self::Transport(text) | Self::Decode(text) | Self::Validation(text) => {
                (!text.is_empty()).then(|| text.clone())
            }
        }
    }

    /// Normalized display message, using `fallback` when nothing better exists.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        error_message(self.status(), self.body(), self.detail().as_deref(), fallback)
    }
}

/// Build the display string for a failure.
///
/// Precedence:
/// 1. `body.message` is a non-empty list: its strings joined with `". "`
/// 2. `body.message` is a string: verbatim
/// 3. status 401: [`SESSION_EXPIRED_MESSAGE`]
/// 4. status 403: [`ACCESS_DENIED_MESSAGE`]
/// 5. transport-level error text
/// 6. `fallback`
#[must_use]
pub fn error_message(status: Option<u16>, body: Option<&Value>, transport: Option<&str>, fallback: &str) -> String {
    match body.and_then(|b| b.get("message")) {
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if !parts.is_empty() {
                return parts.join(". ");
            }
        }
        Some(Value::String(message)) => return message.clone(),
        _ => {}
    }

    match status {
        Some(401) => return SESSION_EXPIRED_MESSAGE.to_owned(),
        Some(403) => return ACCESS_DENIED_MESSAGE.to_owned(),
        _ => {}
    }

    match transport {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => fallback.to_owned(),
    }
}
