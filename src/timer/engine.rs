//! Study countdown engine
//!
//! The engine owns the authoritative [`TimerState`]. Every transition
//! mutates it, optionally flushes studied minutes through the
//! [`UsageReporter`], and then mirrors it into the [`TimerStore`]. Elapsed
//! time is always taken from the wall clock, so a stalled tick driver or a
//! restart never loses study time.
//!
//! ```text
//! stopped --start--> running --pause/reset--> stopped
//!                    running --tick to zero--> stopped (completion)
//! ```

use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::reporter::UsageReporter;
use crate::{
    error::TimerError,
    state::{timer_state::round_minutes, TimerState},
    store::TimerStore,
    utils::Clock,
};

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 120;

/// A countdown that ran out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Whole minutes studied in the finished session
    pub minutes: u64,
    /// Whether the minutes reached the analytics backend
    pub reported: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is stopped, nothing changed
    Idle,
    Ticked { remaining_seconds: u64 },
    Completed(Completion),
}

pub struct StudyTimer {
    state: TimerState,
    store: TimerStore,
    reporter: UsageReporter,
    clock: Arc<dyn Clock>,
}

impl StudyTimer {
    /// Build an engine from whatever the store holds. Call
    /// [`activate`](Self::activate) before driving it.
    pub fn restore(store: TimerStore, reporter: UsageReporter, clock: Arc<dyn Clock>) -> Self {
        let state = store.load();
        Self {
            state,
            store,
            reporter,
            clock,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Reconcile the restored state against the time that passed while
    /// nothing was ticking.
    pub async fn activate(&mut self) -> Option<Completion> {
        if !self.state.running {
            return None;
        }

        let now = self.clock.now();
        let Some(start) = self.state.start_timestamp else {
            warn!("Timer was running without a start time, restarting the segment now");
            self.state.begin_segment(now);
            self.persist();
            return None;
        };

        let elapsed = self.state.elapsed_seconds(now);
        if elapsed < self.state.segment_seconds {
            self.state.remaining_seconds = self.state.segment_seconds - elapsed;
            info!(
                "Resumed timer started at {}, {}s left",
                start, self.state.remaining_seconds
            );
            self.persist();
            return None;
        }

        info!("Timer ran out while inactive (started at {})", start);
        let total_seconds = self
            .state
            .accumulated_seconds
            .saturating_add(self.state.segment_seconds);
        self.state.remaining_seconds = 0;
        self.state.running = false;
        self.state.start_timestamp = None;
        self.state.segment_seconds = 0;
        self.state.accumulated_seconds = total_seconds;

        let minutes = round_minutes(total_seconds);
        let completion = if minutes >= 1 {
            let reported = self.flush(minutes, now).await;
            if reported {
                self.state.accumulated_seconds = 0;
            }
            Some(Completion {
                minutes,
                reported,
                completed_at: now,
            })
        } else {
            None
        };

        self.persist();
        completion
    }

    /// Advance the countdown by one second
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            self.persist();
            return TickOutcome::Ticked {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        TickOutcome::Completed(self.complete().await)
    }

    /// Start counting down. Returns `false` when already running.
    pub fn start(&mut self) -> bool {
        if self.state.running {
            return false;
        }

        if self.state.remaining_seconds == 0 {
            debug!("Countdown was finished, re-arming to {} minutes", self.state.target_minutes);
            self.state.remaining_seconds = self.state.target_seconds();
        }

        let now = self.clock.now();
        self.state.begin_segment(now);
        info!("Timer started with {}s left", self.state.remaining_seconds);
        self.persist();
        true
    }

    /// Stop counting and flush whole studied minutes. Returns `false` when
    /// already stopped.
    pub async fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }

        let now = self.clock.now();
        let elapsed = self.state.end_segment(now);
        info!(
            "Timer paused after {}s, {}s left",
            elapsed, self.state.remaining_seconds
        );
        self.persist();

        self.flush_whole_minutes(now).await;
        self.persist();
        true
    }

    /// Start when stopped, pause when running. Returns the new running flag.
    pub async fn toggle(&mut self) -> bool {
        if self.state.running {
            self.pause().await;
        } else {
            self.start();
        }
        self.state.running
    }

    /// Stop and rewind to the full target. Any whole minutes still
    /// accumulated are reported first; the accumulator is cleared either way.
    pub async fn reset(&mut self) {
        let now = self.clock.now();
        if self.state.running {
            self.state.end_segment(now);
        }

        let whole = self.state.accumulated_seconds / 60;
        if whole >= 1 {
            self.flush(whole, now).await;
        }

        self.state.accumulated_seconds = 0;
        self.state.running = false;
        self.state.start_timestamp = None;
        self.state.remaining_seconds = self.state.target_seconds();
        self.state.segment_seconds = self.state.remaining_seconds;
        info!("Timer reset to {} minutes", self.state.target_minutes);
        self.persist();
    }

    /// Change the countdown length and rewind to it
    pub fn set_minutes(&mut self, minutes: u32) -> Result<(), TimerError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            return Err(TimerError::InvalidMinutes {
                value: minutes,
                min: MIN_MINUTES,
                max: MAX_MINUTES,
            });
        }
        if self.state.running {
            return Err(TimerError::Running);
        }

        self.state.target_minutes = minutes;
        self.state.remaining_seconds = self.state.target_seconds();
        self.state.segment_seconds = self.state.remaining_seconds;
        info!("Timer target set to {} minutes", minutes);
        self.persist();
        Ok(())
    }

    /// Shutdown hook. Folds the running segment like a pause but leaves the
    /// timer marked as running, rebased to now, so the next activation picks
    /// up where this one stopped.
    pub async fn deactivate(&mut self) {
        if !self.state.running {
            self.persist();
            return;
        }

        let now = self.clock.now();
        let elapsed = self.state.elapsed_seconds(now);
        self.state.accumulated_seconds = self.state.accumulated_seconds.saturating_add(elapsed);
        self.state.remaining_seconds = self.state.segment_seconds.saturating_sub(elapsed);
        self.state.begin_segment(now);
        self.persist();

        self.flush_whole_minutes(now).await;
        info!(
            "Timer deactivated while running, {}s left and {}s unreported",
            self.state.remaining_seconds, self.state.accumulated_seconds
        );
        self.persist();
    }

    async fn complete(&mut self) -> Completion {
        let now = self.clock.now();
        self.state.remaining_seconds = 0;
        let elapsed = self.state.end_segment(now);

        let minutes = round_minutes(self.state.accumulated_seconds);
        info!("Timer completed: segment {}s, {} minutes studied", elapsed, minutes);

        let reported = self.flush(minutes, now).await;
        if reported {
            self.state.accumulated_seconds = 0;
        }
        self.persist();

        Completion {
            minutes,
            reported,
            completed_at: now,
        }
    }

    /// Report the whole minutes in the accumulator, keeping the remainder
    async fn flush_whole_minutes(&mut self, now: DateTime<Utc>) {
        let whole = self.state.accumulated_seconds / 60;
        if whole >= 1 && self.flush(whole, now).await {
            self.state.accumulated_seconds %= 60;
        }
    }

    async fn flush(&mut self, minutes: u64, now: DateTime<Utc>) -> bool {
        self.reporter
            .report(minutes, now, &mut self.state.last_report_timestamp)
            .await
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            warn!("Failed to persist timer state: {}", e);
        }
    }
}
