//! Gap detection.
//!
//! Week statuses do not enforce sequential unlocking, so a learner can finish
//! a later week while an earlier one sits untouched. This module reports
//! those gaps without changing any status.

use serde::Serialize;
use curriculum_core::{WeekNumber, WeekStatus};

use crate::engine::{WeekProgress, WeekProgressReport};

/// A week with no progress that precedes a week with progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekGap {
    /// The untouched week
    pub week: WeekNumber,
    /// Its derived status
    pub status: WeekStatus,
    /// Units waiting in it
    pub pending_units: usize,
    /// Nearest later week with progress
    pub skipped_to: WeekNumber,
}

/// Gap statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapStats {
    /// Number of gap weeks
    pub gap_weeks: usize,
    /// Units waiting in gap weeks
    pub pending_units: usize,
    /// Furthest week with any progress
    pub furthest_week_with_progress: Option<WeekNumber>,
}

/// Result of gap analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapReport {
    /// Gap weeks in ascending order
    pub gaps: Vec<WeekGap>,
    /// Statistics
    pub stats: GapStats,
}

impl GapReport {
    /// Whether the learner has worked strictly in order.
    pub fn is_sequential(&self) -> bool {
        self.gaps.is_empty()
    }
}

fn has_progress(week: &WeekProgress) -> bool {
    week.completed_units > 0 || week.in_progress_units > 0
}

/// Find weeks with units but no progress that come before a week with progress.
pub fn detect_gaps(report: &WeekProgressReport) -> GapReport {
    let mut gaps = Vec::new();
    let mut next_with_progress: Option<WeekNumber> = None;

    for week in report.weeks.iter().rev() {
        if has_progress(week) {
            next_with_progress = Some(week.week);
        } else if week.total_units > 0 {
            if let Some(skipped_to) = next_with_progress {
                gaps.push(WeekGap {
                    week: week.week,
                    status: week.status,
                    pending_units: week.total_units,
                    skipped_to,
                });
            }
        }
    }
    gaps.reverse();

    let stats = GapStats {
        gap_weeks: gaps.len(),
        pending_units: gaps.iter().map(|g| g.pending_units).sum(),
        furthest_week_with_progress: report
            .weeks
            .iter()
            .rev()
            .find(|w| has_progress(w))
            .map(|w| w.week),
    };

    GapReport { gaps, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curriculum_core::{CompletionMap, CompletionStatus, Mission, TrackId, UnitId, UnitKind};
    use crate::engine::ProgressEngine;

    fn report(catalog: &[(&str, i64)], done: &[&str]) -> WeekProgressReport {
        let missions: Vec<Mission> = catalog
            .iter()
            .map(|(id, w)| Mission::new(*id, "builder", *w, 1))
            .collect();
        let completions: CompletionMap = done
            .iter()
            .map(|id| (UnitKind::Mission, UnitId::new(*id), CompletionStatus::Completed))
            .collect();
        ProgressEngine::default().compute_missions(&TrackId::new("builder"), &missions, &completions)
    }

    #[test]
    fn test_sequential_progress_has_no_gaps() {
        let gaps = detect_gaps(&report(&[("a", 1), ("b", 2), ("c", 3)], &["a", "b"]));
        assert!(gaps.is_sequential());
        assert_eq!(gaps.stats.furthest_week_with_progress.map(|w| w.get()), Some(2));
    }

    #[test]
    fn test_skipped_week_reported() {
        let gaps = detect_gaps(&report(&[("a", 1), ("b", 3), ("c", 3), ("d", 5)], &["a", "d"]));

        assert_eq!(gaps.gaps.len(), 1);
        let gap = &gaps.gaps[0];
        assert_eq!(gap.week.get(), 3);
        assert_eq!(gap.skipped_to.get(), 5);
        assert_eq!(gap.pending_units, 2);
        assert_eq!(gaps.stats.pending_units, 2);
    }

    #[test]
    fn test_empty_weeks_are_not_gaps() {
        let gaps = detect_gaps(&report(&[("a", 1), ("b", 4)], &["b"]));
        assert_eq!(gaps.gaps.iter().map(|g| g.week.get()).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_no_progress_no_gaps() {
        let gaps = detect_gaps(&report(&[("a", 1), ("b", 2)], &[]));
        assert!(gaps.is_sequential());
        assert!(gaps.stats.furthest_week_with_progress.is_none());
    }
}
