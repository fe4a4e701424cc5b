//! Mock job for exercising the scheduler without a Discord connection.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! keepalive-cron = { path = "...", features = ["test-support"] }
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::traits::Job;

/// Counts every run; optionally fails each one.
#[derive(Clone, Default)]
pub struct MockJob {
    runs: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockJob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent run return an error.
    pub fn fail_runs(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockJobError(pub &'static str);

impl std::fmt::Display for MockJobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockJobError {}

impl Job for MockJob {
    type Error = MockJobError;

    async fn run(&self) -> Result<(), MockJobError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            Err(MockJobError("job failed"))
        } else {
            Ok(())
        }
    }
}
