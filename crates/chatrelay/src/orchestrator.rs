//! Drives one chat completion per submitted turn and feeds the delivery callback.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::api::{ApiResponse, ModelConfig};
use crate::config::RelayConfig;
use crate::llm::{
    AzureOpenAIProvider, ChatMessage, ChatRequestOptions, ChatTransport, DeliveryEvent, LLMError,
    parse_wire_response, to_wire_request,
};

/// Owns the request/response cycle against one upstream deployment.
///
/// Holds no per-call state, so clones can serve concurrent submits.
#[derive(Clone)]
pub struct Orchestrator {
    transport: Arc<dyn ChatTransport>,
    model: String,
    debug: bool,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn ChatTransport>, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
            debug: false,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        let transport = Arc::new(AzureOpenAIProvider::from_config(config));
        Self::new(transport, config.model.clone()).with_debug(config.debug)
    }

    /// Log request and response payloads at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The model/deployment id sent with every request.
    pub fn current_model(&self) -> &str {
        &self.model
    }

    /// Model settings for the front-end. None are exposed yet.
    pub fn chat_config(&self) -> ApiResponse<Option<ModelConfig>> {
        ApiResponse::success(None)
    }

    /// Run one turn. Failures are logged and never reach the caller.
    ///
    /// On success the delivery callback receives `Done` followed by the message;
    /// on failure it receives nothing.
    pub async fn submit(&self, options: ChatRequestOptions) {
        let _ = self.submit_with_result(options).await;
    }

    /// Same as [`submit`](Self::submit), but also returns the classified outcome.
    pub async fn submit_with_result(
        &self,
        options: ChatRequestOptions,
    ) -> Result<ChatMessage, LLMError> {
        info!(model = %self.model, "start request");

        let result = self.complete(&options).await;
        match &result {
            Ok(message) => {
                if let Some(ref delivery) = options.delivery {
                    delivery(DeliveryEvent::Done);
                    delivery(DeliveryEvent::Message(message.clone()));
                }
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "chat completion failed");
            }
        }
        result
    }

    async fn complete(&self, options: &ChatRequestOptions) -> Result<ChatMessage, LLMError> {
        let request = to_wire_request(options, &self.model);
        if self.debug {
            debug!(?request, "sending chat completion");
        }

        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            warn!(status = response.status, body = %response.body, "upstream rejected request");
            return Err(LLMError::from_status(response.status));
        }

        if self.debug {
            debug!(body = %response.body, "chat completion result");
        }
        parse_wire_response(&response.body)
    }
}
