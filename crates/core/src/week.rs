//! Week model - the twelve ordinal buckets of the curriculum.

use serde::{Deserialize, Serialize};
use crate::ModelError;

/// Number of weeks in the curriculum.
pub const WEEK_COUNT: u8 = 12;

/// A week ordinal, always within `1..=WEEK_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekNumber(u8);

impl WeekNumber {
    /// First week of the curriculum.
    pub const FIRST: WeekNumber = WeekNumber(1);

    /// Validate a raw week ordinal.
    pub fn new(week: u8) -> Result<Self, ModelError> {
        if (1..=WEEK_COUNT).contains(&week) {
            Ok(Self(week))
        } else {
            Err(ModelError::WeekOutOfRange(i64::from(week)))
        }
    }

    /// Validate a week ordinal coming from an untyped source.
    pub fn from_i64(week: i64) -> Result<Self, ModelError> {
        u8::try_from(week)
            .map_err(|_| ModelError::WeekOutOfRange(week))
            .and_then(Self::new)
    }

    /// Raw ordinal.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, handy for indexing week arrays.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All weeks in ascending order.
    pub fn all() -> impl Iterator<Item = WeekNumber> {
        (1..=WEEK_COUNT).map(WeekNumber)
    }

    /// Static theme metadata for this week.
    pub fn theme(self) -> &'static WeekTheme {
        &WEEK_THEMES[self.index()]
    }
}

impl TryFrom<u8> for WeekNumber {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekNumber> for u8 {
    fn from(week: WeekNumber) -> Self {
        week.0
    }
}

impl std::fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Derived status of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStatus {
    /// Every unit in the week is completed
    Completed,
    /// Some progress, not finished
    InProgress,
    /// The week the learner should work on next
    Current,
    /// Not reachable yet
    Locked,
}

impl WeekStatus {
    /// Whether units in a week with this status can be worked on.
    pub fn is_open(self) -> bool {
        matches!(self, WeekStatus::Current | WeekStatus::InProgress)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStatus::Completed => "completed",
            WeekStatus::InProgress => "in_progress",
            WeekStatus::Current => "current",
            WeekStatus::Locked => "locked",
        }
    }
}

/// Runtime availability of a single unit, used for rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitAvailability {
    /// Recorded as completed
    Completed,
    /// Recorded as in progress
    InProgress,
    /// Not started, week is open
    Available,
    /// Not started, week is locked
    Locked,
}

impl UnitAvailability {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitAvailability::Completed => "completed",
            UnitAvailability::InProgress => "in_progress",
            UnitAvailability::Available => "available",
            UnitAvailability::Locked => "locked",
        }
    }
}

/// Display metadata for a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekTheme {
    /// Short name
    pub name: &'static str,

    /// One-line tagline
    pub tagline: &'static str,
}

static WEEK_THEMES: [WeekTheme; WEEK_COUNT as usize] = [
    WeekTheme { name: "Launch", tagline: "Set up your tools and ship a first win" },
    WeekTheme { name: "Foundations", tagline: "Core concepts you will lean on all term" },
    WeekTheme { name: "Building Blocks", tagline: "Compose small pieces into working parts" },
    WeekTheme { name: "Data", tagline: "Collect, clean and question your data" },
    WeekTheme { name: "Patterns", tagline: "Spot the shapes that repeat" },
    WeekTheme { name: "Interfaces", tagline: "Make your work usable by others" },
    WeekTheme { name: "Midpoint Review", tagline: "Look back, then level up" },
    WeekTheme { name: "Automation", tagline: "Let the machine do the boring parts" },
    WeekTheme { name: "Collaboration", tagline: "Build with and for a team" },
    WeekTheme { name: "Polish", tagline: "Refine, test and harden" },
    WeekTheme { name: "Capstone", tagline: "Put everything together" },
    WeekTheme { name: "Showcase", tagline: "Present what you built" },
];
