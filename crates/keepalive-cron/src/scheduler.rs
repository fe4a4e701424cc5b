use std::time::Duration;

use chrono::{DateTime, Local};
use tokio_util::sync::CancellationToken;

use crate::{job::JobState, schedule::CronSchedule, traits::Job};

const TICK_INTERVAL: Duration = Duration::from_millis(500);

pub struct Scheduler<J> {
    state: JobState,
    job: J,
    tick_interval: Duration,
}

impl<J: Job> Scheduler<J> {
    pub fn new(id: impl Into<String>, schedule: CronSchedule, job: J) -> Self {
        Self {
            state: JobState::new(id, schedule, Local::now()),
            job,
            tick_interval: TICK_INTERVAL,
        }
    }

    /// Override how often the loop checks for a due fire time.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn next_fire(&self) -> Option<DateTime<Local>> {
        self.state.next_fire
    }

    /// Run the job on schedule until `shutdown` is cancelled.
    ///
    /// A run in progress is awaited before the cancellation is observed.
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(
            job_id = %self.state.id,
            schedule = %self.state.schedule,
            next_fire = ?self.state.next_fire,
            "CRON scheduler starting"
        );

        let mut tick = tokio::time::interval(self.tick_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(job_id = %self.state.id, "Shutdown requested, stopping scheduler");
                    break;
                }

                _ = tick.tick() => {
                    let now = Local::now();
                    if self.state.should_fire(now) {
                        self.fire(now).await;
                    }
                }
            }
        }
    }

    async fn fire(&mut self, now: DateTime<Local>) {
        tracing::info!(job_id = %self.state.id, fired_at = %now, "Job firing");

        if let Err(e) = self.job.run().await {
            tracing::error!(job_id = %self.state.id, error = %e, "Job run failed");
        }

        self.state.mark_fired(now);
        tracing::debug!(job_id = %self.state.id, next_fire = ?self.state.next_fire, "Job rescheduled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockJob;

    fn every_second() -> CronSchedule {
        CronSchedule::parse("* * * * * *").unwrap()
    }

    #[tokio::test]
    async fn test_new_schedules_first_fire_in_future() {
        let before = Local::now();
        let scheduler = Scheduler::new("keepalive", every_second(), MockJob::new());
        let next = scheduler.next_fire().unwrap();
        assert!(next > before);
        assert!(next <= before + chrono::Duration::seconds(2));
    }

    #[tokio::test]
    async fn test_run_returns_when_already_cancelled() {
        let job = MockJob::new();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        tokio::time::timeout(
            Duration::from_secs(1),
            Scheduler::new("keepalive", CronSchedule::parse("35 15 * * *").unwrap(), job.clone())
                .run(shutdown),
        )
        .await
        .expect("scheduler should stop on cancellation");

        assert_eq!(job.run_count(), 0);
    }

    #[tokio::test]
    async fn test_due_job_runs() {
        let job = MockJob::new();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(
            Scheduler::new("keepalive", every_second(), job.clone())
                .with_tick_interval(Duration::from_millis(50))
                .run(shutdown.clone()),
        );

        tokio::time::sleep(Duration::from_millis(2500)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert!(job.run_count() >= 1, "expected at least one run");
    }

    #[tokio::test]
    async fn test_failing_job_keeps_schedule_alive() {
        let job = MockJob::new();
        job.fail_runs();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(
            Scheduler::new("keepalive", every_second(), job.clone())
                .with_tick_interval(Duration::from_millis(50))
                .run(shutdown.clone()),
        );

        tokio::time::sleep(Duration::from_millis(2600)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert!(job.run_count() >= 2, "failures must not stop later runs");
    }
}
