//! Progress service configuration.

use std::path::Path;
use serde::{Deserialize, Serialize};
use curriculum_core::LessonWeekMap;

use crate::ProgressError;

/// Which unit sources feed the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMode {
    /// Missions only
    MissionsOnly,
    /// Missions and lessons merged into the same weeks
    #[default]
    Hybrid,
}

/// Configuration for the progress tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Lesson order to week table
    pub lesson_week_map: LessonWeekMap,

    /// Mode used when the caller does not pick one
    pub default_mode: ProgressMode,

    /// Max cached reports before the cache is cleared
    pub cache_capacity: usize,

    /// Study time assumed per day when projecting a finish date
    pub study_minutes_per_day: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            lesson_week_map: LessonWeekMap::default(),
            default_mode: ProgressMode::default(),
            cache_capacity: 256,
            study_minutes_per_day: 60,
        }
    }
}

impl ProgressConfig {
    /// Load configuration from a JSON file. Missing keys take defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ProgressError> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&json)
    }

    /// Parse configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ProgressConfig::from_json(r#"{"default_mode": "missions_only"}"#).unwrap();
        assert_eq!(config.default_mode, ProgressMode::MissionsOnly);
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.lesson_week_map, LessonWeekMap::default());
    }

    #[test]
    fn test_custom_lesson_table() {
        let config = ProgressConfig::from_json(r#"{"lesson_week_map": {"1": 2, "2": 2}}"#).unwrap();
        assert_eq!(config.lesson_week_map.len(), 2);
        assert_eq!(config.lesson_week_map.week_for(1).map(|w| w.get()), Some(2));
    }

    #[test]
    fn test_invalid_week_rejected() {
        let result = ProgressConfig::from_json(r#"{"lesson_week_map": {"1": 14}}"#);
        assert!(matches!(result, Err(ProgressError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        tokio::fs::write(&path, r#"{"study_minutes_per_day": 30}"#).await.unwrap();

        let config = ProgressConfig::load(&path).await.unwrap();
        assert_eq!(config.study_minutes_per_day, 30);
    }
}
