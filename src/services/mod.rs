//! External service clients
//! 
//! HTTP clients for the study-time analytics backend and the chat backend.

pub mod analytics;
pub mod chat;

use std::time::Duration;

// Re-export main types
pub use analytics::HttpUsageSink;
pub use chat::{ChatClient, HttpChatClient};

/// Build the shared HTTP client with a per-request timeout
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("study-timer/", env!("CARGO_PKG_VERSION")))
        .build()
}
