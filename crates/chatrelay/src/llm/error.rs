//! LLM error types.

use thiserror::Error;

use super::status::status_message;

/// Errors that can occur when relaying a chat completion.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request failed before a response arrived
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned a non-2xx status
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body is not a usable completion
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LLMError {
    /// Build an `Api` error carrying the diagnostic text for `status`.
    pub fn from_status(status: u16) -> Self {
        LLMError::Api {
            status,
            message: status_message(status).into_owned(),
        }
    }

    /// Short classification used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            LLMError::Request(_) => "transport",
            LLMError::Api { .. } => "upstream_status",
            LLMError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            LLMError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
