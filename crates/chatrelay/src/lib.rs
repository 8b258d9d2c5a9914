//! chatrelay - relay between internal chat messages and an Azure OpenAI chat-completion API.

// ============================================================================
// Always Available
// ============================================================================

pub mod api;
pub mod config;
pub mod llm;
pub mod orchestrator;

// ============================================================================
// Server-only (behind `server` feature)
// ============================================================================

#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
pub mod server;
