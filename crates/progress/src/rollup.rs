//! Aggregate counters over all weeks.

use serde::Serialize;
use curriculum_core::{WeekNumber, WeekStatus};

use crate::engine::WeekProgress;

/// Summary of a learner's progress across the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    /// First week that is current or in progress, week 1 when none is
    pub current_week: WeekNumber,

    /// Completed share of all units, rounded half up (0-100)
    pub overall_progress_percent: u8,

    /// Completed units across all weeks
    pub total_completed: usize,

    /// Units across all weeks
    pub total_units: usize,
}

/// Roll week results up into a summary.
pub fn summarize(weeks: &[WeekProgress]) -> ProgressSummary {
    let total_completed = weeks.iter().map(|w| w.completed_units).sum();
    let total_units = weeks.iter().map(|w| w.total_units).sum();

    ProgressSummary {
        current_week: current_week(weeks),
        overall_progress_percent: percent(total_completed, total_units),
        total_completed,
        total_units,
    }
}

/// First week whose status is current or in progress.
///
/// Falls back to week 1, including when every week is completed.
pub fn current_week(weeks: &[WeekProgress]) -> WeekNumber {
    weeks
        .iter()
        .find(|w| matches!(w.status, WeekStatus::Current | WeekStatus::InProgress))
        .map(|w| w.week)
        .unwrap_or(WeekNumber::FIRST)
}

/// `completed / total` as a whole percentage, rounded half up; 0 when empty.
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    ((completed * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u8, status: WeekStatus, completed: usize, total: usize) -> WeekProgress {
        WeekProgress {
            week: WeekNumber::new(n).unwrap(),
            status,
            total_units: total,
            completed_units: completed,
            in_progress_units: 0,
            units: Vec::new(),
        }
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 5), 20);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(1, 200), 1); // 0.5 rounds up
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn test_current_week_first_open() {
        let weeks = vec![
            week(1, WeekStatus::Completed, 2, 2),
            week(2, WeekStatus::InProgress, 1, 2),
            week(3, WeekStatus::Locked, 0, 2),
        ];
        assert_eq!(current_week(&weeks).get(), 2);
    }

    #[test]
    fn test_current_week_defaults_to_first() {
        let weeks = vec![
            week(1, WeekStatus::Completed, 1, 1),
            week(2, WeekStatus::Completed, 1, 1),
        ];
        assert_eq!(current_week(&weeks), WeekNumber::FIRST);
    }

    #[test]
    fn test_summarize_totals() {
        let weeks = vec![
            week(1, WeekStatus::Completed, 2, 2),
            week(2, WeekStatus::Current, 0, 2),
        ];
        let summary = summarize(&weeks);
        assert_eq!(summary.total_completed, 2);
        assert_eq!(summary.total_units, 4);
        assert_eq!(summary.overall_progress_percent, 50);
        assert_eq!(summary.current_week.get(), 2);
    }
}
