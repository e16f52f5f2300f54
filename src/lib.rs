//! Study Timer - a study-session countdown timer with chat relay
//! 
//! This library provides the countdown engine that reconciles persisted
//! state against the wall clock, the rate-limited study-time reporter,
//! the chat session, and the HTTP API that drives them.

pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
