//! Per-unit runtime availability.

use curriculum_core::{CompletionStatus, UnitAvailability, WeekStatus};

/// Availability of a unit given its own status and its week's status.
///
/// Recorded progress always shows through; otherwise the unit can be opened
/// only while its week is current or in progress.
pub fn unit_availability(status: CompletionStatus, week: WeekStatus) -> UnitAvailability {
    match status {
        CompletionStatus::Completed => UnitAvailability::Completed,
        CompletionStatus::InProgress => UnitAvailability::InProgress,
        CompletionStatus::NotStarted if week.is_open() => UnitAvailability::Available,
        CompletionStatus::NotStarted => UnitAvailability::Locked,
    }
}
