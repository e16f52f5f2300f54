//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ChatMessage, ChatState, TimerState};

/// Timer snapshot as seen by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub remaining_seconds: u64,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub running: bool,
    pub target_minutes: u32,
    pub accumulated_seconds: u64,
    pub start_timestamp: Option<DateTime<Utc>>,
    pub last_report_timestamp: Option<DateTime<Utc>>,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            remaining_seconds: state.remaining_seconds,
            display: state.formatted(),
            running: state.running,
            target_minutes: state.target_minutes,
            accumulated_seconds: state.accumulated_seconds,
            start_timestamp: state.start_timestamp,
            last_report_timestamp: state.last_report_timestamp,
        }
    }
}

/// API response structure for timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Build a response whose status follows the timer's running flag
    pub fn new(message: impl Into<String>, state: &TimerState) -> Self {
        Self {
            status: if state.running { "running" } else { "stopped" }.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer: TimerView::from(state),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetMinutesRequest {
    pub minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Conversation plus the reply produced by the last send, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: Option<ChatMessage>,
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
}

impl ChatResponse {
    pub fn new(reply: Option<ChatMessage>, chat: ChatState) -> Self {
        Self {
            reply,
            messages: chat.messages,
            typing: chat.typing,
        }
    }
}

/// Status response with timer and chat information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub chat_messages: usize,
    pub chat_typing: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
