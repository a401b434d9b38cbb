//! Curriculum progression.
//!
//! Week statuses, progress rollups, and the services that feed them.

#![warn(missing_docs)]

pub mod engine;
pub mod rollup;
pub mod availability;
pub mod state;
pub mod config;
pub mod tracker;
pub mod gaps;
pub mod estimator;
mod error;

pub use engine::{
    compute_week_progress, ProgressEngine, UnitSource, MissionSource, LessonSource, Placement,
    WeekProgress, UnitProgress, WeekProgressReport, WeekTally,
};
pub use rollup::{ProgressSummary, summarize, current_week, percent};
pub use availability::unit_availability;
pub use state::{ProgressInputs, ProgressState};
pub use config::{ProgressConfig, ProgressMode};
pub use tracker::{ProgressTracker, ProgressSnapshot, BasicProgressTracker, ReportCache, CacheKey};
pub use gaps::{detect_gaps, GapReport, GapStats, WeekGap};
pub use estimator::{CompletionEstimator, TimeEstimation};
pub use error::ProgressError;
