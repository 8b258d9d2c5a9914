//! HTTP request handlers.

mod chat;
mod health;

pub use chat::{ChatProcessRequest, chat_config, chat_process, current_model};
pub use health::{livez, readyz};
