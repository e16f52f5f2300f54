//! Study-time reporting with rate limiting

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::error::ClientError;

/// Minimum spacing between two reports unless configured otherwise
pub const DEFAULT_REPORT_INTERVAL_SECS: i64 = 60;

/// Destination for studied minutes, usually the analytics backend
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, minutes: u64, date: NaiveDate) -> Result<(), ClientError>;
}

/// Forwards whole minutes to a [`UsageSink`], at most once per interval.
///
/// A `false` result means nothing was committed and the caller keeps its
/// accumulated seconds for the next flush.
#[derive(Clone)]
pub struct UsageReporter {
    sink: Arc<dyn UsageSink>,
    min_interval: Duration,
}

impl UsageReporter {
    pub fn new(sink: Arc<dyn UsageSink>) -> Self {
        Self::with_interval(sink, Duration::seconds(DEFAULT_REPORT_INTERVAL_SECS))
    }

    pub fn with_interval(sink: Arc<dyn UsageSink>, min_interval: Duration) -> Self {
        Self { sink, min_interval }
    }

    /// Report `minutes` for the UTC date of `now`. Updates `last_report`
    /// only when the sink accepted the report.
    pub async fn report(
        &self,
        minutes: u64,
        now: DateTime<Utc>,
        last_report: &mut Option<DateTime<Utc>>,
    ) -> bool {
        if minutes < 1 {
            return false;
        }

        if let Some(last) = *last_report {
            let since = now - last;
            if since < self.min_interval {
                debug!(
                    "Suppressing report of {} minutes, last report was {}s ago",
                    minutes,
                    since.num_seconds()
                );
                return false;
            }
        }

        let date = now.date_naive();
        info!("Reporting {} study minutes for {}", minutes, date);

        match self.sink.record(minutes, date).await {
            Ok(()) => {
                *last_report = Some(now);
                true
            }
            Err(e) => {
                warn!("Failed to report study time, keeping it for later: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Sink that remembers every report and can be told to fail
    #[derive(Default)]
    pub struct RecordingSink {
        pub reports: Mutex<Vec<(u64, NaiveDate)>>,
        pub failing: Mutex<bool>,
    }

    impl RecordingSink {
        pub fn minutes(&self) -> Vec<u64> {
            self.reports.lock().unwrap().iter().map(|(m, _)| *m).collect()
        }

        pub fn set_failing(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }
    }

    #[async_trait]
    impl UsageSink for RecordingSink {
        async fn record(&self, minutes: u64, date: NaiveDate) -> Result<(), ClientError> {
            if *self.failing.lock().unwrap() {
                return Err(ClientError::Status {
                    endpoint: "analytics".to_string(),
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.reports.lock().unwrap().push((minutes, date));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;
    use chrono::TimeZone;

    fn reporter() -> (Arc<RecordingSink>, UsageReporter) {
        let sink = Arc::new(RecordingSink::default());
        (sink.clone(), UsageReporter::new(sink))
    }

    #[tokio::test]
    async fn zero_minutes_are_not_reported() {
        let (sink, reporter) = reporter();
        let mut last = None;

        assert!(!reporter.report(0, Utc::now(), &mut last).await);
        assert!(sink.minutes().is_empty());
        assert!(last.is_none());
    }

    #[tokio::test]
    async fn reports_use_the_utc_date() {
        let (sink, reporter) = reporter();
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        let mut last = None;

        assert!(reporter.report(3, now, &mut last).await);
        assert_eq!(
            *sink.reports.lock().unwrap(),
            vec![(3, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())]
        );
        assert_eq!(last, Some(now));
    }

    #[tokio::test]
    async fn second_report_within_interval_is_suppressed() {
        let (sink, reporter) = reporter();
        let now = Utc::now();
        let mut last = None;

        assert!(reporter.report(2, now, &mut last).await);
        assert!(!reporter.report(5, now + Duration::seconds(59), &mut last).await);
        assert_eq!(last, Some(now));

        assert!(reporter.report(5, now + Duration::seconds(60), &mut last).await);
        assert_eq!(sink.minutes(), vec![2, 5]);
    }

    #[tokio::test]
    async fn failed_report_leaves_last_report_alone() {
        let (sink, reporter) = reporter();
        sink.set_failing(true);
        let mut last = None;

        assert!(!reporter.report(4, Utc::now(), &mut last).await);
        assert!(last.is_none());
    }
}
