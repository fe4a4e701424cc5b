//! # keepalive-cron
//!
//! Single-job CRON scheduler used by the thread keepalive bot.
//!
//! ## Features
//!
//! - Standard 5-field crontab expressions (`"35 15 * * *"`) as well as the
//!   6/7-field form with a leading seconds column (`"0 35 15 * * *"`).
//! - Fire times are evaluated in the host's local time zone, like `cron(8)`.
//!   As there, a crontab restricting both day fields fires when either
//!   matches.
//! - The tick loop stops as soon as the shared [`CancellationToken`] is
//!   cancelled.
//! - A failing job is logged and retried at its next scheduled time only.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use keepalive_cron::{CronSchedule, Job, Scheduler};
//! use tokio_util::sync::CancellationToken;
//!
//! struct Hello;
//!
//! impl Job for Hello {
//!     type Error = std::convert::Infallible;
//!
//!     async fn run(&self) -> Result<(), Self::Error> {
//!         println!("hello");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let schedule = CronSchedule::parse("*/5 * * * *").unwrap();
//!     Scheduler::new("hello", schedule, Hello)
//!         .run(CancellationToken::new())
//!         .await;
//! }
//! ```
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod error;
pub mod job;
pub mod schedule;
pub mod scheduler;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use error::CronError;
pub use job::JobState;
pub use schedule::{CronSchedule, DEFAULT_CRONTAB};
pub use scheduler::Scheduler;
pub use traits::Job;
