//! Record sink fakes and a fixed clock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use LedgerBuddy::models::FinalizedRecord;
use LedgerBuddy::state::{Clock, RecordSink};
use LedgerBuddy::utils::errors::{LedgerBuddyError, Result, SheetsError};

/// Sink that keeps every appended record in memory
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<FinalizedRecord>>,
    /// Remaining number of appends that fail before the sink recovers
    pub failures_left: AtomicUsize,
    /// Artificial latency per append
    pub delay: Option<Duration>,
    /// Answer every append as if the outcome were unknown
    pub uncertain: bool,
}

impl RecordingSink {
    pub fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
            ..Default::default()
        }
    }

    pub fn uncertain() -> Self {
        Self {
            uncertain: true,
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub async fn rows(&self) -> Vec<Vec<serde_json::Value>> {
        self.records.lock().await.iter().map(|r| r.to_row()).collect()
    }

    pub async fn count(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn append_row(&self, record: &FinalizedRecord) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.uncertain {
            return Err(LedgerBuddyError::Sheets(SheetsError::WriteUncertain(
                "operation timed out".to_string(),
            )));
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(LedgerBuddyError::Sheets(SheetsError::Api {
                status: 429,
                message: "Quota exceeded for quota metric 'Write requests'.".to_string(),
            }));
        }

        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Clock stuck on one day
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn christmas() -> Self {
        Self(NaiveDate::from_ymd_opt(2025, 12, 25).expect("valid date"))
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
