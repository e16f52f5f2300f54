//! State management module
//! 
//! This module contains the timer and chat state structures and the
//! shared application state that owns them.

pub mod app_state;
pub mod chat_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use chat_state::{ChatMessage, ChatSession, ChatState, Sender, FALLBACK_REPLY};
pub use timer_state::{format_time, TimerState, DEFAULT_MINUTES};
