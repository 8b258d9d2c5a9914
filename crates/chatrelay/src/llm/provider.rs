//! Transport trait for chat completion calls.

use async_trait::async_trait;

use super::error::LLMError;
use super::types::WireRequest;

/// Status and body of an upstream response, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one chat completion call. Non-2xx statuses are returned, not raised.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &WireRequest) -> Result<RawResponse, LLMError>;
}
