//! Chat relay HTTP handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::warn;

use crate::api::{ApiResponse, ModelConfig};
use crate::llm::{ChatRequestOptions, Delivery, DeliveryEvent, LastContext};
use crate::server::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProcessRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: Option<LastContext>,
    #[serde(default)]
    pub system_message: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default, rename = "top_p")]
    pub top_p: Option<f32>,
}

impl ChatProcessRequest {
    fn into_options(self, delivery: Delivery) -> ChatRequestOptions {
        ChatRequestOptions {
            message: self.prompt,
            system_message: self.system_message,
            last_context: self.options,
            temperature: self.temperature,
            top_p: self.top_p,
            delivery: Some(delivery),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/chat-process
///
/// Streams each delivery event as a JSON chunk, newline-separated:
/// `"done"` first, then the assistant message. A failed call ends the stream
/// with a `{"type":"Fail",...}` chunk instead.
pub async fn chat_process(
    State(state): State<AppState>,
    Json(req): Json<ChatProcessRequest>,
) -> Response {
    let (tx, rx) = mpsc::unbounded_channel::<String>();

    let events = tx.clone();
    let delivery: Delivery = Arc::new(move |event: DeliveryEvent| {
        send_chunk(&events, &event);
    });
    let options = req.into_options(delivery);

    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        if let Err(e) = orchestrator.submit_with_result(options).await {
            send_chunk(&tx, &ApiResponse::fail(e.user_message()));
        }
    });

    let body = UnboundedReceiverStream::new(rx)
        .enumerate()
        .map(|(i, chunk)| {
            let chunk = if i == 0 { chunk } else { format!("\n{chunk}") };
            Ok::<_, Infallible>(chunk)
        });

    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(body),
    )
        .into_response()
}

/// POST /api/config
pub async fn chat_config(State(state): State<AppState>) -> Json<ApiResponse<Option<ModelConfig>>> {
    Json(state.orchestrator.chat_config())
}

/// GET /api/model
pub async fn current_model(State(state): State<AppState>) -> Json<ApiResponse<String>> {
    Json(ApiResponse::success(
        state.orchestrator.current_model().to_string(),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

fn send_chunk(tx: &mpsc::UnboundedSender<String>, value: &impl Serialize) {
    match serde_json::to_string(value) {
        Ok(chunk) => {
            // Receiver is gone once the client disconnects.
            let _ = tx.send(chunk);
        }
        Err(e) => warn!(error = %e, "failed to serialize chat chunk"),
    }
}

// ============================================================================
// Tests
// ============================================================================
