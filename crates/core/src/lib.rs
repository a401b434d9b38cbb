//! Curriculum core data models.
//!
//! Units (missions and lessons), completion records and the twelve-week
//! calendar they are scheduled on.

#![warn(missing_docs)]

// Identities
mod id;

// Curriculum content
mod unit;
mod week;
mod lesson_map;

// Learner state
mod completion;

// Re-exports
pub use id::*;

pub use unit::{Mission, Lesson, UnitKind};
pub use week::{WeekNumber, WeekStatus, WeekTheme, UnitAvailability, WEEK_COUNT};
pub use lesson_map::{LessonWeekMap, DEFAULT_LESSONS_PER_WEEK};
pub use completion::{CompletionStatus, CompletionRecord, CompletionMap};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Errors raised when constructing model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Week ordinal outside `1..=WEEK_COUNT`
    #[error("week {0} is outside 1..={max}", max = WEEK_COUNT)]
    WeekOutOfRange(i64),

    /// Lesson order listed twice in a lesson week table
    #[error("lesson order {0} is mapped more than once")]
    DuplicateLessonOrder(u32),
}
