//! Study countdown timer: the state machine and its usage reporting

pub mod engine;
pub mod reporter;

pub use engine::{Completion, StudyTimer, TickOutcome, MAX_MINUTES, MIN_MINUTES};
pub use reporter::{UsageReporter, UsageSink, DEFAULT_REPORT_INTERVAL_SECS};
