//! Azure OpenAI chat completion adapter.

mod azure;
mod error;
mod provider;
mod status;
mod translate;
mod types;

pub use azure::AzureOpenAIProvider;
pub use error::LLMError;
pub use provider::{ChatTransport, RawResponse};
pub use status::status_message;
pub use translate::{from_wire_response, parse_wire_response, to_wire_request};
pub use types::{
    ChatMessage, ChatRequestOptions, CompletionDetail, Delivery, DeliveryEvent, LastContext,
    Role, WireChoice, WireMessage, WireReply, WireRequest, WireResponse,
};

#[cfg(test)]
pub(crate) use provider::mock;
