// src/stats.rs
use chrono::{Days, NaiveDate};
use std::time::Duration;

use crate::types::JobSummary;

pub const RECENT_WINDOW_DAYS: u64 = 7;
pub const ANIMATION_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub total_jobs: u64,
    pub recent_jobs: u64,
}

impl JobStats {
    /// Count all jobs and those posted within the last week of `today`.
    /// Jobs without a posted date never count as recent.
    pub fn compute(jobs: &[JobSummary], today: NaiveDate) -> Self {
        let cutoff = today
            .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);

        let recent_jobs = jobs
            .iter()
            .filter(|job| job.posted_date.is_some_and(|posted| posted >= cutoff))
            .count();

        Self {
            total_jobs: jobs.len() as u64,
            recent_jobs: recent_jobs as u64,
        }
    }
}

/// Linear count-up from zero to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u64,
    duration: Duration,
}

impl CounterAnimation {
    pub fn new(target: u64, duration: Duration) -> Self {
        Self { target, duration }
    }

    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if self.is_finished(elapsed) {
            return self.target;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        ((self.target as f64) * progress).floor() as u64
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.duration.is_zero() || elapsed >= self.duration
    }
}
