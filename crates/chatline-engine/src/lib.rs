//! chatline-engine: Headless conversation engine for chatline
//!
//! This crate provides the core conversation logic, including:
//! - Chat turns and the in-memory message store
//! - The conversation controller state machine (idle / pending)
//! - The HTTP transport adapter for the chat endpoint
//! - An async session driver that runs one request at a time
//! - Configuration resolution

pub mod config;
pub mod controller;
pub mod session;
pub mod store;
pub mod transport;
pub mod turn;

// Re-export commonly used types
pub use config::{Config, ConfigError, BASE_URL_VAR};
pub use controller::{
    Controller, Dispatch, IgnoreReason, Phase, RequestId, SettleOutcome, SubmitOutcome,
};
pub use session::Session;
pub use store::{ConversationState, MessageStore};
pub use transport::{message_endpoint, HttpTransport, Transport, TransportError, MESSAGE_PATH};
pub use turn::{ChatTurn, Role, FAILURE_MESSAGE, GREETING};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
