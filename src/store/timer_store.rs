//! Typed views over the key/value store for the timer and chat history

use std::{str::FromStr, sync::Arc};
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::{
    error::StoreError,
    state::{ChatMessage, TimerState},
};

/// Store keys, kept compatible with the web client's local storage layout
pub mod keys {
    pub const TIME_LEFT: &str = "timeLeft";
    pub const IS_RUNNING: &str = "isRunning";
    pub const CUSTOM_MINUTES: &str = "customMinutes";
    pub const ACCUMULATED_TIME: &str = "accumulatedTime";
    pub const START_TIME: &str = "startTime";
    pub const LAST_SYNC_TIME: &str = "lastSyncTime";
    pub const SEGMENT_TIME: &str = "segmentTime";
    pub const CHAT_HISTORY: &str = "chatHistory";
}

/// Loads and saves [`TimerState`]
#[derive(Clone)]
pub struct TimerStore {
    store: Arc<dyn KeyValueStore>,
    default_minutes: u32,
}

impl TimerStore {
    pub fn new(store: Arc<dyn KeyValueStore>, default_minutes: u32) -> Self {
        Self {
            store,
            default_minutes,
        }
    }

    /// Read the persisted timer. Every absent or unparsable field falls back
    /// to its default on its own.
    pub fn load(&self) -> TimerState {
        let target_minutes = self
            .parse::<u32>(keys::CUSTOM_MINUTES)
            .filter(|minutes| *minutes > 0)
            .unwrap_or(self.default_minutes);
        let mut state = TimerState::new(target_minutes);

        if let Some(remaining) = self.parse::<u64>(keys::TIME_LEFT) {
            state.remaining_seconds = remaining;
        }
        state.running = self.parse::<bool>(keys::IS_RUNNING).unwrap_or(false);
        state.accumulated_seconds = self.parse::<u64>(keys::ACCUMULATED_TIME).unwrap_or(0);
        state.last_report_timestamp = self.timestamp(keys::LAST_SYNC_TIME);
        state.segment_seconds = self
            .parse::<u64>(keys::SEGMENT_TIME)
            .unwrap_or(state.remaining_seconds);

        // A start time only means something while running
        if state.running {
            state.start_timestamp = self.timestamp(keys::START_TIME);
        }

        debug!(
            "Loaded timer: remaining={}s running={} target={}min accumulated={}s",
            state.remaining_seconds, state.running, state.target_minutes, state.accumulated_seconds
        );
        state
    }

    /// Mirror the whole state into the store in one write
    pub fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        self.store.write_batch(vec![
            (keys::TIME_LEFT, Some(state.remaining_seconds.to_string())),
            (keys::IS_RUNNING, Some(state.running.to_string())),
            (keys::CUSTOM_MINUTES, Some(state.target_minutes.to_string())),
            (keys::ACCUMULATED_TIME, Some(state.accumulated_seconds.to_string())),
            (keys::SEGMENT_TIME, Some(state.segment_seconds.to_string())),
            (
                keys::START_TIME,
                state.start_timestamp.map(|t| t.timestamp_millis().to_string()),
            ),
            (
                keys::LAST_SYNC_TIME,
                state.last_report_timestamp.map(|t| t.timestamp_millis().to_string()),
            ),
        ])
    }

    fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring corrupt stored value {}={:?}", key, raw);
                None
            }
        }
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let millis = self.parse::<i64>(key)?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Loads and saves the chat conversation
#[derive(Clone)]
pub struct ChatHistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl ChatHistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Vec<ChatMessage> {
        let Some(raw) = self.store.get(keys::CHAT_HISTORY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring corrupt chat history: {}", e);
            Vec::new()
        })
    }

    pub fn save(&self, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(messages)?;
        self.store.set(keys::CHAT_HISTORY, raw)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CHAT_HISTORY)
    }
}
