//! Azure OpenAI chat completion transport.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::error::LLMError;
use super::provider::{ChatTransport, RawResponse};
use super::types::WireRequest;
use crate::config::RelayConfig;

/// Posts chat completions to a fixed Azure deployment URL with `Api-Key` auth.
pub struct AzureOpenAIProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AzureOpenAIProvider {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.endpoint.clone(), config.api_key.clone())
    }
}

#[async_trait]
impl ChatTransport for AzureOpenAIProvider {
    async fn send(&self, request: &WireRequest) -> Result<RawResponse, LLMError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "upstream responded");

        Ok(RawResponse { status, body })
    }
}
