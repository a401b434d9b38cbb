//! Completion records - a learner's relationship to one unit.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::id::{LearnerId, RecordId, UnitId};
use crate::unit::UnitKind;
use crate::Time;

/// Completion status of a unit for one learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// No record exists
    #[default]
    NotStarted,
    /// Started but not finished
    InProgress,
    /// Finished
    Completed,
}

impl CompletionStatus {
    /// Status as observable for a unit kind.
    ///
    /// Lessons only ever report completion, so an in-progress lesson reads as
    /// not started.
    pub fn observed_for(self, kind: UnitKind) -> Self {
        match (kind, self) {
            (UnitKind::Lesson, CompletionStatus::InProgress) => CompletionStatus::NotStarted,
            (_, status) => status,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::NotStarted => "not_started",
            CompletionStatus::InProgress => "in_progress",
            CompletionStatus::Completed => "completed",
        }
    }
}

/// A stored completion record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Unique identifier
    pub id: RecordId,

    /// Learner the record belongs to
    pub learner_id: LearnerId,

    /// Unit the record refers to
    pub unit_id: UnitId,

    /// Kind of the unit
    pub kind: UnitKind,

    /// Recorded status
    pub status: CompletionStatus,

    /// Last write time
    pub updated_at: Time,

    /// When the unit was completed, if it was
    #[serde(default)]
    pub completed_at: Option<Time>,
}

impl CompletionRecord {
    /// Create a mission attempt record.
    pub fn mission(learner_id: LearnerId, unit_id: UnitId, status: CompletionStatus) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: RecordId::new(),
            learner_id,
            unit_id,
            kind: UnitKind::Mission,
            status,
            updated_at: now,
            completed_at: (status == CompletionStatus::Completed).then_some(now),
        }
    }

    /// Create a lesson record; a lesson is completed iff it has a timestamp.
    pub fn lesson(learner_id: LearnerId, unit_id: UnitId, completed_at: Option<Time>) -> Self {
        let status = if completed_at.is_some() {
            CompletionStatus::Completed
        } else {
            CompletionStatus::NotStarted
        };
        Self {
            id: RecordId::new(),
            learner_id,
            unit_id,
            kind: UnitKind::Lesson,
            status,
            updated_at: completed_at.unwrap_or_else(chrono::Utc::now),
            completed_at,
        }
    }

    /// Status as observable for this record's unit kind.
    pub fn observed_status(&self) -> CompletionStatus {
        self.status.observed_for(self.kind)
    }
}

/// Unit to most recent completion status.
///
/// Entries are keyed by unit kind and id, so a mission and a lesson sharing
/// an id are tracked separately. Units without an entry are not started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMap {
    statuses: HashMap<(UnitKind, UnitId), CompletionStatus>,
}

impl CompletionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored records, keeping the most recently written record
    /// per unit. On equal timestamps the later record in input order wins.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CompletionRecord>) -> Self {
        let mut latest: HashMap<(UnitKind, &UnitId), &CompletionRecord> = HashMap::new();
        for record in records {
            let key = (record.kind, &record.unit_id);
            let newer = latest
                .get(&key)
                .map_or(true, |existing| existing.updated_at <= record.updated_at);
            if newer {
                latest.insert(key, record);
            }
        }

        Self {
            statuses: latest
                .into_iter()
                .map(|((kind, id), record)| ((kind, id.clone()), record.observed_status()))
                .collect(),
        }
    }

    /// Set the status of a unit.
    pub fn insert(&mut self, kind: UnitKind, unit_id: UnitId, status: CompletionStatus) {
        self.statuses.insert((kind, unit_id), status);
    }

    /// Status of a unit, `NotStarted` when absent.
    pub fn status_of(&self, kind: UnitKind, unit_id: &UnitId) -> CompletionStatus {
        self.statuses
            .get(&(kind, unit_id.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Whether a record exists for the unit.
    pub fn contains(&self, kind: UnitKind, unit_id: &UnitId) -> bool {
        self.statuses.contains_key(&(kind, unit_id.clone()))
    }

    /// Number of units with a record.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Whether no records exist.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Iterate over recorded units.
    pub fn iter(&self) -> impl Iterator<Item = (UnitKind, &UnitId, CompletionStatus)> {
        self.statuses.iter().map(|((kind, id), status)| (*kind, id, *status))
    }
}

impl FromIterator<(UnitKind, UnitId, CompletionStatus)> for CompletionMap {
    fn from_iter<I: IntoIterator<Item = (UnitKind, UnitId, CompletionStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter
                .into_iter()
                .map(|(kind, id, status)| ((kind, id), status))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_lesson_in_progress_not_observable() {
        assert_eq!(
            CompletionStatus::InProgress.observed_for(UnitKind::Lesson),
            CompletionStatus::NotStarted
        );
        assert_eq!(
            CompletionStatus::InProgress.observed_for(UnitKind::Mission),
            CompletionStatus::InProgress
        );
        assert_eq!(
            CompletionStatus::Completed.observed_for(UnitKind::Lesson),
            CompletionStatus::Completed
        );
    }

    #[test]
    fn test_lesson_record_status_from_timestamp() {
        let done = CompletionRecord::lesson("ana".into(), "l1".into(), Some(Utc::now()));
        assert_eq!(done.status, CompletionStatus::Completed);

        let open = CompletionRecord::lesson("ana".into(), "l2".into(), None);
        assert_eq!(open.status, CompletionStatus::NotStarted);
    }

    #[test]
    fn test_from_records_last_write_wins() {
        let mut older = CompletionRecord::mission("ana".into(), "m1".into(), CompletionStatus::Completed);
        older.updated_at = Utc::now() - Duration::hours(2);
        let newer = CompletionRecord::mission("ana".into(), "m1".into(), CompletionStatus::InProgress);

        let map = CompletionMap::from_records([&newer, &older]);
        assert_eq!(map.status_of(UnitKind::Mission, &"m1".into()), CompletionStatus::InProgress);

        let map = CompletionMap::from_records([&older, &newer]);
        assert_eq!(map.status_of(UnitKind::Mission, &"m1".into()), CompletionStatus::InProgress);
    }

    #[test]
    fn test_missing_unit_is_not_started() {
        let map = CompletionMap::new();
        assert_eq!(map.status_of(UnitKind::Mission, &"ghost".into()), CompletionStatus::NotStarted);
        assert!(map.is_empty());
    }

    #[test]
    fn test_mission_and_lesson_with_same_id_kept_apart() {
        let mission = CompletionRecord::mission("ana".into(), "x".into(), CompletionStatus::Completed);
        let lesson = CompletionRecord::lesson("ana".into(), "x".into(), None);

        let map = CompletionMap::from_records([&mission, &lesson]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.status_of(UnitKind::Mission, &"x".into()), CompletionStatus::Completed);
        assert_eq!(map.status_of(UnitKind::Lesson, &"x".into()), CompletionStatus::NotStarted);
        assert!(!map.contains(UnitKind::Lesson, &"y".into()));
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&CompletionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
