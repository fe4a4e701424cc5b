use chrono::{DateTime, Local};

use crate::schedule::CronSchedule;

/// Runtime state tracked by the scheduler for its job.
#[derive(Debug, Clone)]
pub struct JobState {
    pub id: String,
    pub schedule: CronSchedule,
    pub next_fire: Option<DateTime<Local>>,
    pub last_fired: Option<DateTime<Local>>,
}

impl JobState {
    pub fn new(id: impl Into<String>, schedule: CronSchedule, now: DateTime<Local>) -> Self {
        let mut state = Self {
            id: id.into(),
            schedule,
            next_fire: None,
            last_fired: None,
        };
        state.compute_next_fire(now);
        state
    }

    pub fn should_fire(&self, now: DateTime<Local>) -> bool {
        self.next_fire.is_some_and(|t| now >= t)
    }

    /// Recompute `next_fire` after the job fires.
    pub fn compute_next_fire(&mut self, from: DateTime<Local>) {
        self.next_fire = self.schedule.next_after(&from);
    }

    pub fn mark_fired(&mut self, now: DateTime<Local>) {
        self.last_fired = Some(now);
        self.compute_next_fire(now);
    }
}
