//! Static lesson order to week lookup.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::week::{WeekNumber, WEEK_COUNT};
use crate::ModelError;

/// Lessons scheduled per week in the default table.
pub const DEFAULT_LESSONS_PER_WEEK: u32 = 3;

/// Maps a lesson's ordering index onto a curriculum week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonWeekMap {
    weeks: BTreeMap<u32, WeekNumber>,
}

impl LessonWeekMap {
    /// Build a table from `(order, week)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u8)>) -> Result<Self, ModelError> {
        let mut weeks = BTreeMap::new();
        for (order, week) in pairs {
            let week = WeekNumber::new(week)?;
            if weeks.insert(order, week).is_some() {
                return Err(ModelError::DuplicateLessonOrder(order));
            }
        }
        Ok(Self { weeks })
    }

    /// Week for a lesson order, `None` when the table has no entry.
    pub fn week_for(&self, order: u32) -> Option<WeekNumber> {
        self.weeks.get(&order).copied()
    }

    /// Number of mapped orders.
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

impl Default for LessonWeekMap {
    /// Orders `1..=36`, three lessons per week.
    fn default() -> Self {
        let total = u32::from(WEEK_COUNT) * DEFAULT_LESSONS_PER_WEEK;
        let weeks = (1..=total)
            .filter_map(|order| {
                let week = (order - 1) / DEFAULT_LESSONS_PER_WEEK + 1;
                u8::try_from(week).ok().and_then(|w| WeekNumber::new(w).ok()).map(|w| (order, w))
            })
            .collect();
        Self { weeks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let map = LessonWeekMap::default();
        assert_eq!(map.len(), 36);
        assert_eq!(map.week_for(1).map(WeekNumber::get), Some(1));
        assert_eq!(map.week_for(3).map(WeekNumber::get), Some(1));
        assert_eq!(map.week_for(4).map(WeekNumber::get), Some(2));
        assert_eq!(map.week_for(36).map(WeekNumber::get), Some(12));
        assert_eq!(map.week_for(0), None);
        assert_eq!(map.week_for(37), None);
    }

    #[test]
    fn test_from_pairs_rejects_bad_week() {
        assert!(matches!(
            LessonWeekMap::from_pairs([(1, 13)]),
            Err(ModelError::WeekOutOfRange(13))
        ));
    }

    #[test]
    fn test_from_pairs_rejects_duplicate_order() {
        assert!(matches!(
            LessonWeekMap::from_pairs([(1, 1), (1, 2)]),
            Err(ModelError::DuplicateLessonOrder(1))
        ));
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let map: LessonWeekMap = serde_json::from_str(r#"{"1": 1, "2": 5}"#).unwrap();
        assert_eq!(map.week_for(2).map(WeekNumber::get), Some(5));
    }
}
