//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::state::DEFAULT_MINUTES;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "study-timer")]
#[command(about = "A study-session countdown timer and chat relay")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the persisted timer and chat state
    #[arg(short, long, default_value = "study-timer-state.json")]
    pub store: PathBuf,

    /// Endpoint receiving studied minutes
    #[arg(long, default_value = "http://localhost:5000/api/analytics/study-time")]
    pub analytics_url: String,

    /// Endpoint answering chat messages
    #[arg(long, default_value = "http://localhost:5000/api/chat")]
    pub chat_url: String,

    /// Countdown length in minutes when none is stored
    #[arg(short, long, default_value_t = DEFAULT_MINUTES, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub minutes: u32,

    /// Minimum seconds between two study-time reports
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(0..=86_400))]
    pub report_interval: u64,

    /// Timeout for backend requests in seconds
    #[arg(long, default_value = "10")]
    pub request_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn report_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.report_interval as i64)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
