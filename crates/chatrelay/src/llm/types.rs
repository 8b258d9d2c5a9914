//! Internal conversation types and the Azure OpenAI chat-completion wire schema.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// Internal request
// ============================================================================

/// Sink receiving the delivery events of one orchestrated call.
pub type Delivery = Arc<dyn Fn(DeliveryEvent) + Send + Sync>;

/// One conversation turn submitted by a caller.
#[derive(Clone, Default)]
pub struct ChatRequestOptions {
    /// The new user turn.
    pub message: String,
    /// System instruction, sent first when non-empty.
    pub system_message: Option<String>,
    /// Fields merged into the last outgoing message.
    pub last_context: Option<LastContext>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub delivery: Option<Delivery>,
}

impl ChatRequestOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn with_last_context(mut self, last_context: LastContext) -> Self {
        self.last_context = Some(last_context);
        self
    }

    pub fn with_delivery(
        mut self,
        delivery: impl Fn(DeliveryEvent) + Send + Sync + 'static,
    ) -> Self {
        self.delivery = Some(Arc::new(delivery));
        self
    }
}

impl fmt::Debug for ChatRequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatRequestOptions")
            .field("message", &self.message)
            .field("system_message", &self.system_message)
            .field("last_context", &self.last_context)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("delivery", &self.delivery.is_some())
            .finish()
    }
}

/// Conversation linkage from the previous exchange.
///
/// Keys other than the two known ids are kept in `extra` and merged as-is.
/// An id that is not a string is dropped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastContext {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_message_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Ok(Some(id)),
        _ => Ok(None),
    }
}

// ============================================================================
// Internal response
// ============================================================================

/// The role of a message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Normalized assistant reply handed to the delivery callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub role: Role,
    pub parent_message_id: String,
    pub conversation_id: String,
    pub detail: CompletionDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionDetail {
    pub finish_reason: Option<String>,
    pub created: u64,
    pub model: String,
    pub index: u32,
}

/// Signal passed to a [`Delivery`] sink.
///
/// `Done` always precedes the `Message` of the same call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryEvent {
    Done,
    Message(ChatMessage),
}

impl Serialize for DeliveryEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeliveryEvent::Done => serializer.serialize_str("done"),
            DeliveryEvent::Message(message) => message.serialize(serializer),
        }
    }
}

// ============================================================================
// Wire schema
// ============================================================================

/// A chat completion request body.
///
/// Unset sampling parameters serialize as `null` so the provider applies its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireRequest {
    pub messages: Vec<WireMessage>,
    pub model: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// One outgoing turn, plus any context fields merged into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            extra: Map::new(),
        }
    }
}

/// A chat completion response body.
#[derive(Debug, Deserialize)]
pub struct WireResponse {
    pub id: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub message: Option<WireReply>,
}

#[derive(Debug, Deserialize)]
pub struct WireReply {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
}
