//! Timer state structure and management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countdown length used when nothing else is configured
pub const DEFAULT_MINUTES: u32 = 25;

/// Study countdown state, mirrored into the durable store after every
/// transition.
///
/// `start_timestamp` is set exactly when `running` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub running: bool,
    pub target_minutes: u32,
    /// Seconds studied but not yet reported
    pub accumulated_seconds: u64,
    /// Start of the current running segment
    pub start_timestamp: Option<DateTime<Utc>>,
    /// `remaining_seconds` at `start_timestamp`
    pub segment_seconds: u64,
    pub last_report_timestamp: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create a stopped timer with a full countdown of `target_minutes`
    pub fn new(target_minutes: u32) -> Self {
        let remaining_seconds = u64::from(target_minutes) * 60;
        Self {
            remaining_seconds,
            running: false,
            target_minutes,
            accumulated_seconds: 0,
            start_timestamp: None,
            segment_seconds: remaining_seconds,
            last_report_timestamp: None,
        }
    }

    /// Full countdown length in seconds
    pub fn target_seconds(&self) -> u64 {
        u64::from(self.target_minutes) * 60
    }

    /// Whole seconds since the segment started, clamped at zero when the
    /// clock moved backwards
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.start_timestamp
            .map(|start| elapsed_seconds(start, now))
            .unwrap_or(0)
    }

    /// Mark the segment as started at `now`
    pub fn begin_segment(&mut self, now: DateTime<Utc>) {
        self.running = true;
        self.start_timestamp = Some(now);
        self.segment_seconds = self.remaining_seconds;
    }

    /// Stop the segment, folding elapsed wall-clock time into the
    /// accumulator. Returns the folded seconds.
    pub fn end_segment(&mut self, now: DateTime<Utc>) -> u64 {
        let elapsed = self.elapsed_seconds(now);
        self.accumulated_seconds = self.accumulated_seconds.saturating_add(elapsed);
        self.running = false;
        self.start_timestamp = None;
        self.segment_seconds = self.remaining_seconds;
        elapsed
    }

    /// Remaining time as `MM:SS`
    pub fn formatted(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES)
    }
}

/// Whole seconds between two instants, never negative
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let millis = (to - from).num_milliseconds().max(0);
    (millis / 1000) as u64
}

/// Round seconds to whole minutes, halves up
pub fn round_minutes(seconds: u64) -> u64 {
    seconds.saturating_add(30) / 60
}

/// Render seconds as zero padded `MM:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
