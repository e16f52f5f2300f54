//! Main application state management

use std::{sync::Mutex, time::Instant};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tracing::{debug, info};

use super::{ChatSession, TimerState};
use crate::{
    error::TimerError,
    timer::{Completion, StudyTimer, TickOutcome},
};

/// Shared state behind the HTTP API and the tick driver
pub struct AppState {
    /// The countdown engine. One async lock serialises every transition,
    /// including its report and store write.
    pub timer: AsyncMutex<StudyTimer>,
    pub chat: ChatSession,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Fired whenever a countdown finishes
    pub completion_tx: broadcast::Sender<Completion>,
    /// Running flag, watched by the tick driver
    pub running_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    pub _running_rx: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(timer: StudyTimer, chat: ChatSession, port: u16, host: String) -> Self {
        let (completion_tx, _) = broadcast::channel(16);
        let (running_tx, running_rx) = watch::channel(timer.is_running());

        Self {
            timer: AsyncMutex::new(timer),
            chat,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            completion_tx,
            running_tx,
            _running_rx: running_rx,
        }
    }

    /// Reconcile the restored timer with the wall clock
    pub async fn activate(&self) -> TimerState {
        let mut timer = self.timer.lock().await;
        if let Some(completion) = timer.activate().await {
            self.notify_completion(completion);
        }
        self.publish_running(timer.is_running());
        timer.state().clone()
    }

    pub async fn start_timer(&self) -> TimerState {
        let mut timer = self.timer.lock().await;
        timer.start();
        self.after_action("start", &timer)
    }

    pub async fn pause_timer(&self) -> TimerState {
        let mut timer = self.timer.lock().await;
        timer.pause().await;
        self.after_action("pause", &timer)
    }

    pub async fn toggle_timer(&self) -> TimerState {
        let mut timer = self.timer.lock().await;
        timer.toggle().await;
        self.after_action("toggle", &timer)
    }

    pub async fn reset_timer(&self) -> TimerState {
        let mut timer = self.timer.lock().await;
        timer.reset().await;
        self.after_action("reset", &timer)
    }

    pub async fn set_minutes(&self, minutes: u32) -> Result<TimerState, TimerError> {
        let mut timer = self.timer.lock().await;
        timer.set_minutes(minutes)?;
        Ok(self.after_action("set-minutes", &timer))
    }

    /// One tick of the countdown, called by the tick driver
    pub async fn tick(&self) -> TickOutcome {
        let mut timer = self.timer.lock().await;
        let outcome = timer.tick().await;
        if let TickOutcome::Completed(completion) = &outcome {
            self.notify_completion(completion.clone());
            self.publish_running(false);
        }
        outcome
    }

    /// Shutdown hook, see [`StudyTimer::deactivate`]
    pub async fn deactivate(&self) {
        let mut timer = self.timer.lock().await;
        timer.deactivate().await;
        // Stop ticking in this process; the store still says running
        self.publish_running(false);
    }

    pub async fn get_timer_state(&self) -> TimerState {
        self.timer.lock().await.state().clone()
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<Completion> {
        self.completion_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Record a user action, called for chat actions too
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn after_action(&self, action: &str, timer: &StudyTimer) -> TimerState {
        self.record_action(action);
        self.publish_running(timer.is_running());
        timer.state().clone()
    }

    fn publish_running(&self, running: bool) {
        self.running_tx.send_if_modified(|current| {
            if *current == running {
                return false;
            }
            debug!("Timer running flag -> {}", running);
            *current = running;
            true
        });
    }

    fn notify_completion(&self, completion: Completion) {
        info!(
            "Study session complete: {} minutes (reported: {})",
            completion.minutes, completion.reported
        );
        // No subscribers is fine
        let _ = self.completion_tx.send(completion);
    }
}
