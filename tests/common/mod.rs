//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use study_timer::{
    error::ClientError,
    services::ChatClient,
    state::{AppState, ChatSession},
    store::{ChatHistoryStore, KeyValueStore, MemoryStore, TimerStore},
    timer::{StudyTimer, UsageReporter, UsageSink},
    utils::ManualClock,
};

#[derive(Default)]
pub struct RecordingSink {
    pub reports: Mutex<Vec<(u64, NaiveDate)>>,
}

impl RecordingSink {
    pub fn minutes(&self) -> Vec<u64> {
        self.reports.lock().unwrap().iter().map(|(m, _)| *m).collect()
    }
}

#[async_trait]
impl UsageSink for RecordingSink {
    async fn record(&self, minutes: u64, date: NaiveDate) -> Result<(), ClientError> {
        self.reports.lock().unwrap().push((minutes, date));
        Ok(())
    }
}

pub struct CannedChat(pub Option<&'static str>);

#[async_trait]
impl ChatClient for CannedChat {
    async fn reply(&self, _message: &str) -> Result<String, ClientError> {
        self.0.map(str::to_string).ok_or_else(|| ClientError::Status {
            endpoint: "chat".to_string(),
            status: 500,
            body: "boom".to_string(),
        })
    }
}

pub struct Fixture {
    pub kv: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub clock: Arc<ManualClock>,
    pub state: Arc<AppState>,
}

impl Fixture {
    pub fn new(chat_reply: Option<&'static str>) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), chat_reply)
    }

    pub fn with_store(kv: Arc<MemoryStore>, chat_reply: Option<&'static str>) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));
        let store: Arc<dyn KeyValueStore> = kv.clone();

        let timer = StudyTimer::restore(
            TimerStore::new(store.clone(), 25),
            UsageReporter::new(sink.clone()),
            clock.clone(),
        );
        let chat = ChatSession::restore(
            ChatHistoryStore::new(store),
            Arc::new(CannedChat(chat_reply)),
        );
        let state = Arc::new(AppState::new(timer, chat, 0, "127.0.0.1".to_string()));

        Self {
            kv,
            sink,
            clock,
            state,
        }
    }
}
