//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the durable key/value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read store at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected timer commands
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimerError {
    #[error("Minutes must be between {min} and {max}, got {value}")]
    InvalidMinutes { value: u32, min: u32, max: u32 },

    #[error("Cannot change the target time while the timer is running")]
    Running,
}

/// Failures talking to the analytics or chat backends
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}
