//! Loading state for engine inputs.
//!
//! Catalog and completions arrive independently. Running the engine on a
//! half-loaded snapshot would briefly flag the wrong week as current, so
//! inputs stay `Loading` until every part the mode needs has resolved. An
//! empty catalog that has resolved is a valid, loaded input.

use curriculum_core::{CompletionMap, CompletionRecord, Lesson, Mission, TrackId};

use crate::config::ProgressMode;
use crate::engine::{ProgressEngine, WeekProgressReport};

/// Result of evaluating possibly partial inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressState {
    /// At least one input has not resolved yet
    Loading,
    /// Inputs resolved and the engine ran
    Ready(WeekProgressReport),
}

impl ProgressState {
    /// The report, if ready.
    pub fn report(&self) -> Option<&WeekProgressReport> {
        match self {
            ProgressState::Loading => None,
            ProgressState::Ready(report) => Some(report),
        }
    }

    /// Whether inputs are still loading.
    pub fn is_loading(&self) -> bool {
        matches!(self, ProgressState::Loading)
    }
}

/// Inputs for one learner and track, filled in as fetches resolve.
#[derive(Debug, Clone)]
pub struct ProgressInputs {
    track: TrackId,
    mode: ProgressMode,
    missions: Option<Vec<Mission>>,
    lessons: Option<Vec<Lesson>>,
    completions: Option<CompletionMap>,
}

impl ProgressInputs {
    /// Start with nothing loaded.
    pub fn new(track: TrackId, mode: ProgressMode) -> Self {
        Self {
            track,
            mode,
            missions: None,
            lessons: None,
            completions: None,
        }
    }

    /// Record the resolved mission catalog.
    pub fn with_missions(mut self, missions: Vec<Mission>) -> Self {
        self.missions = Some(missions);
        self
    }

    /// Record the resolved lesson catalog.
    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = Some(lessons);
        self
    }

    /// Record resolved completions.
    pub fn with_completions(mut self, completions: CompletionMap) -> Self {
        self.completions = Some(completions);
        self
    }

    /// Record resolved completions from raw records.
    pub fn with_records(self, records: &[CompletionRecord]) -> Self {
        self.with_completions(CompletionMap::from_records(records))
    }

    /// Whether everything the mode needs has resolved.
    pub fn is_loaded(&self) -> bool {
        let lessons_ready = match self.mode {
            ProgressMode::MissionsOnly => true,
            ProgressMode::Hybrid => self.lessons.is_some(),
        };
        self.missions.is_some() && self.completions.is_some() && lessons_ready
    }

    /// Run the engine if all inputs have resolved.
    pub fn evaluate(&self, engine: &ProgressEngine) -> ProgressState {
        let (Some(missions), Some(completions)) = (&self.missions, &self.completions) else {
            return ProgressState::Loading;
        };
        if !self.is_loaded() {
            return ProgressState::Loading;
        }
        let lessons = self.lessons.as_deref().unwrap_or_default();
        ProgressState::Ready(engine.compute(self.mode, &self.track, missions, lessons, completions))
    }
}
