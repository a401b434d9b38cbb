//! Remaining time estimation.

use chrono::Duration;
use serde::Serialize;
use curriculum_core::{CompletionStatus, Time, WeekNumber};

use crate::engine::{WeekProgress, WeekProgressReport};

/// Remaining work in one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEstimation {
    /// Week
    pub week: WeekNumber,
    /// Sum of estimates of unfinished units, in minutes
    pub remaining_minutes: u64,
    /// Unfinished units that carry no estimate
    pub unestimated_units: usize,
}

/// Completion time estimator.
#[derive(Debug, Clone)]
pub struct CompletionEstimator {
    minutes_per_day: u32,
}

impl CompletionEstimator {
    /// Create an estimator assuming `minutes_per_day` of study.
    pub fn new(minutes_per_day: u32) -> Self {
        Self { minutes_per_day }
    }

    /// Estimate remaining work of one week.
    pub fn estimate_week(&self, week: &WeekProgress) -> TimeEstimation {
        let mut remaining_minutes = 0u64;
        let mut unestimated_units = 0;

        for unit in week.units.iter().filter(|u| u.status != CompletionStatus::Completed) {
            match unit.estimated_minutes {
                Some(minutes) => remaining_minutes += u64::from(minutes),
                None => unestimated_units += 1,
            }
        }

        TimeEstimation {
            week: week.week,
            remaining_minutes,
            unestimated_units,
        }
    }

    /// Estimate every week in order.
    pub fn estimate(&self, report: &WeekProgressReport) -> Vec<TimeEstimation> {
        report.weeks.iter().map(|w| self.estimate_week(w)).collect()
    }

    /// Total estimated remaining time.
    pub fn remaining(&self, report: &WeekProgressReport) -> Duration {
        let minutes: u64 = self.estimate(report).iter().map(|e| e.remaining_minutes).sum();
        Duration::minutes(i64::try_from(minutes).unwrap_or(i64::MAX / 60_000))
    }

    /// Projected finish date at the configured daily pace.
    ///
    /// Returns `from` when nothing remains. Returns `None` when an unfinished
    /// unit has no estimate or no study time is budgeted.
    pub fn projected_finish(&self, report: &WeekProgressReport, from: Time) -> Option<Time> {
        let estimates = self.estimate(report);
        if estimates.iter().any(|e| e.unestimated_units > 0) {
            return None;
        }
        let minutes: u64 = estimates.iter().map(|e| e.remaining_minutes).sum();
        let remaining = i64::try_from(minutes).ok()?;
        if remaining == 0 {
            return Some(from);
        }
        if self.minutes_per_day == 0 {
            return None;
        }
        let per_day = i64::from(self.minutes_per_day);
        let days = (remaining + per_day - 1) / per_day;
        from.checked_add_signed(Duration::days(days))
    }
}

impl Default for CompletionEstimator {
    fn default() -> Self {
        Self::new(60)
    }
}
