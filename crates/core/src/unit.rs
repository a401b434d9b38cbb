//! Unit model - missions and lessons.

use serde::{Deserialize, Serialize};
use crate::id::{ModuleId, TrackId, UnitId};
use crate::week::WeekNumber;

/// Kind of a trackable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Hands-on mission
    Mission,
    /// Structured lesson
    Lesson,
}

impl UnitKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Mission => "mission",
            UnitKind::Lesson => "lesson",
        }
    }
}

/// A hands-on mission scheduled on a `(track, week, day)` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique identifier
    pub id: UnitId,

    /// Track the mission belongs to
    pub track: TrackId,

    /// Week as stored; may be out of range in bad data
    pub week: i64,

    /// Day within the week
    #[serde(default)]
    pub day: u32,

    /// Title
    pub title: String,

    /// Subtitle
    #[serde(default)]
    pub subtitle: String,

    /// Estimated duration in minutes
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

impl Mission {
    /// Create a mission with empty display fields.
    pub fn new(id: impl Into<UnitId>, track: impl Into<TrackId>, week: i64, day: u32) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            track: track.into(),
            week,
            day,
            subtitle: String::new(),
            estimated_minutes: None,
        }
    }

    /// Resolved week, or `None` when the stored value is out of range.
    pub fn week_number(&self) -> Option<WeekNumber> {
        WeekNumber::from_i64(self.week).ok()
    }
}

/// A structured lesson; its week is derived from `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier
    pub id: UnitId,

    /// Curriculum module
    pub module_id: ModuleId,

    /// Title
    pub title: String,

    /// Duration estimate in minutes
    #[serde(default)]
    pub duration_minutes: Option<u32>,

    /// Ordering index, mapped onto weeks by a `LessonWeekMap`
    pub order: u32,
}

impl Lesson {
    /// Create a lesson with empty display fields.
    pub fn new(id: impl Into<UnitId>, module_id: impl Into<ModuleId>, order: u32) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            module_id: module_id.into(),
            duration_minutes: None,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_week_out_of_range() {
        assert_eq!(Mission::new("m1", "core", 3, 1).week_number().map(WeekNumber::get), Some(3));
        assert!(Mission::new("m2", "core", 0, 1).week_number().is_none());
        assert!(Mission::new("m3", "core", 13, 1).week_number().is_none());
    }

    #[test]
    fn test_mission_deserialize_defaults() {
        let json = r#"{"id":"m1","track":"builder","week":2,"title":"Hello"}"#;
        let mission: Mission = serde_json::from_str(json).unwrap();
        assert_eq!(mission.day, 0);
        assert!(mission.subtitle.is_empty());
        assert!(mission.estimated_minutes.is_none());
    }
}
