//! Week progression engine.
//!
//! Merges placements from any number of unit sources into twelve week
//! buckets and derives each week's status in a single ascending scan:
//!
//! ```text
//! all units completed                      -> Completed
//! any in progress, or partially completed  -> InProgress (claims current)
//! no progress and nothing claimed current  -> Current    (claims current)
//! otherwise                                -> Locked
//! ```
//!
//! Everything here is pure: same inputs, same report.

use std::collections::HashSet;
use serde::Serialize;
use curriculum_core::{
    CompletionMap, CompletionStatus, Lesson, LessonWeekMap, Mission, TrackId, UnitAvailability,
    UnitId, UnitKind, WeekNumber, WeekStatus, WEEK_COUNT,
};
use tracing::{debug, warn};

use crate::availability::unit_availability;
use crate::config::ProgressMode;
use crate::rollup::{summarize, ProgressSummary};

/// Where a unit sits in the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Unit identifier
    pub unit_id: UnitId,
    /// Unit kind
    pub kind: UnitKind,
    /// Resolved week, `None` when the unit cannot be scheduled
    pub week: Option<WeekNumber>,
    /// Position within the week (mission day or lesson order)
    pub position: u32,
    /// Duration estimate, opaque to the status derivation
    pub estimated_minutes: Option<u32>,
}

/// A catalog contributing units to the calendar.
pub trait UnitSource {
    /// Kind of units this source yields.
    fn kind(&self) -> UnitKind;

    /// Placements of every unit relevant to `track`.
    fn placements(&self, track: &TrackId) -> Vec<Placement>;
}

/// Missions of a track, scheduled by their stored week.
pub struct MissionSource<'a> {
    missions: &'a [Mission],
}

impl<'a> MissionSource<'a> {
    /// Wrap a mission catalog.
    pub fn new(missions: &'a [Mission]) -> Self {
        Self { missions }
    }
}

impl UnitSource for MissionSource<'_> {
    fn kind(&self) -> UnitKind {
        UnitKind::Mission
    }

    fn placements(&self, track: &TrackId) -> Vec<Placement> {
        self.missions
            .iter()
            .filter(|mission| {
                let on_track = &mission.track == track;
                if !on_track {
                    debug!("Ignoring mission {} from track {}", mission.id, mission.track);
                }
                on_track
            })
            .map(|mission| Placement {
                unit_id: mission.id.clone(),
                kind: UnitKind::Mission,
                week: mission.week_number(),
                position: mission.day,
                estimated_minutes: mission.estimated_minutes,
            })
            .collect()
    }
}

/// Lessons, scheduled through a lesson order to week table.
pub struct LessonSource<'a> {
    lessons: &'a [Lesson],
    weeks: &'a LessonWeekMap,
}

impl<'a> LessonSource<'a> {
    /// Wrap a lesson catalog and its week table.
    pub fn new(lessons: &'a [Lesson], weeks: &'a LessonWeekMap) -> Self {
        Self { lessons, weeks }
    }
}

impl UnitSource for LessonSource<'_> {
    fn kind(&self) -> UnitKind {
        UnitKind::Lesson
    }

    fn placements(&self, _track: &TrackId) -> Vec<Placement> {
        self.lessons
            .iter()
            .map(|lesson| Placement {
                unit_id: lesson.id.clone(),
                kind: UnitKind::Lesson,
                week: self.weeks.week_for(lesson.order),
                position: lesson.order,
                estimated_minutes: lesson.duration_minutes,
            })
            .collect()
    }
}

/// Progress of a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitProgress {
    /// Unit identifier
    pub id: UnitId,
    /// Unit kind
    pub kind: UnitKind,
    /// Position within the week
    pub position: u32,
    /// Observed completion status
    pub status: CompletionStatus,
    /// Runtime availability for rendering
    pub availability: UnitAvailability,
    /// Duration estimate
    pub estimated_minutes: Option<u32>,
}

/// Progress of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekProgress {
    /// Week ordinal
    pub week: WeekNumber,
    /// Derived status
    pub status: WeekStatus,
    /// Units scheduled in the week
    pub total_units: usize,
    /// Completed units
    pub completed_units: usize,
    /// Units in progress
    pub in_progress_units: usize,
    /// Units in canonical order
    pub units: Vec<UnitProgress>,
}

/// Full result of a progression run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekProgressReport {
    /// Weeks 1..=12 in order
    pub weeks: Vec<WeekProgress>,
    /// Aggregate counters
    pub summary: ProgressSummary,
    /// Units dropped because no week could be resolved
    pub dropped_units: usize,
}

impl WeekProgressReport {
    /// Progress of one week.
    pub fn week(&self, week: WeekNumber) -> &WeekProgress {
        &self.weeks[week.index()]
    }
}

/// Completion counts for one week bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekTally {
    /// Units in the bucket
    pub total: usize,
    /// Completed units
    pub completed: usize,
    /// Units in progress
    pub in_progress: usize,
}

impl WeekTally {
    /// Derive the week status, updating the running `found_current` flag.
    pub fn status(&self, found_current: &mut bool) -> WeekStatus {
        if self.total > 0 && self.completed == self.total {
            WeekStatus::Completed
        } else if self.in_progress > 0 || (self.completed > 0 && self.completed < self.total) {
            *found_current = true;
            WeekStatus::InProgress
        } else if !*found_current && self.completed == 0 {
            *found_current = true;
            WeekStatus::Current
        } else {
            WeekStatus::Locked
        }
    }
}

/// Compute week statuses and totals for a learner's track.
///
/// Placements without a week are dropped, duplicates within one source keep
/// their first placement, and completions for unknown units are ignored.
pub fn compute_week_progress(
    track: &TrackId,
    sources: &[&dyn UnitSource],
    completions: &CompletionMap,
) -> WeekProgressReport {
    let mut buckets: Vec<Vec<Placement>> = vec![Vec::new(); usize::from(WEEK_COUNT)];
    let mut catalog_ids: HashSet<(UnitKind, UnitId)> = HashSet::new();
    let mut dropped_units = 0;

    for source in sources {
        let mut seen: HashSet<UnitId> = HashSet::new();
        for placement in source.placements(track) {
            if !seen.insert(placement.unit_id.clone()) {
                warn!(
                    "Duplicate {} {} in catalog, keeping first placement",
                    source.kind().as_str(),
                    placement.unit_id
                );
                continue;
            }
            let Some(week) = placement.week else {
                warn!(
                    "No week for {} {}, excluding it from progress",
                    placement.kind.as_str(),
                    placement.unit_id
                );
                dropped_units += 1;
                continue;
            };
            catalog_ids.insert((placement.kind, placement.unit_id.clone()));
            buckets[week.index()].push(placement);
        }
    }

    let orphaned = completions
        .iter()
        .filter(|(kind, id, _)| !catalog_ids.contains(&(*kind, (*id).clone())))
        .count();
    if orphaned > 0 {
        debug!("Ignoring {} completion records with no catalog unit", orphaned);
    }

    // An empty catalog has no week to work on.
    let mut found_current = catalog_ids.is_empty();
    let mut weeks = Vec::with_capacity(buckets.len());

    for (week, mut bucket) in WeekNumber::all().zip(buckets) {
        bucket.sort_by(|a, b| {
            (a.kind, a.position, &a.unit_id).cmp(&(b.kind, b.position, &b.unit_id))
        });

        let statuses: Vec<CompletionStatus> = bucket
            .iter()
            .map(|p| completions.status_of(p.kind, &p.unit_id).observed_for(p.kind))
            .collect();

        let tally = WeekTally {
            total: bucket.len(),
            completed: statuses.iter().filter(|s| **s == CompletionStatus::Completed).count(),
            in_progress: statuses.iter().filter(|s| **s == CompletionStatus::InProgress).count(),
        };
        let status = tally.status(&mut found_current);

        debug!(
            "Week {}: {}/{} completed, {} in progress -> {}",
            week,
            tally.completed,
            tally.total,
            tally.in_progress,
            status.as_str()
        );

        let units = bucket
            .into_iter()
            .zip(statuses)
            .map(|(placement, unit_status)| UnitProgress {
                availability: unit_availability(unit_status, status),
                id: placement.unit_id,
                kind: placement.kind,
                position: placement.position,
                status: unit_status,
                estimated_minutes: placement.estimated_minutes,
            })
            .collect();

        weeks.push(WeekProgress {
            week,
            status,
            total_units: tally.total,
            completed_units: tally.completed,
            in_progress_units: tally.in_progress,
            units,
        });
    }

    let summary = summarize(&weeks);

    WeekProgressReport {
        weeks,
        summary,
        dropped_units,
    }
}

/// Progression engine bound to a lesson week table.
#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    lesson_weeks: LessonWeekMap,
}

impl ProgressEngine {
    /// Create an engine using the given lesson week table.
    pub fn new(lesson_weeks: LessonWeekMap) -> Self {
        Self { lesson_weeks }
    }

    /// Lesson week table in use.
    pub fn lesson_weeks(&self) -> &LessonWeekMap {
        &self.lesson_weeks
    }

    /// Progress over missions only.
    pub fn compute_missions(
        &self,
        track: &TrackId,
        missions: &[Mission],
        completions: &CompletionMap,
    ) -> WeekProgressReport {
        compute_week_progress(track, &[&MissionSource::new(missions)], completions)
    }

    /// Progress over missions and lessons merged into the same weeks.
    pub fn compute_hybrid(
        &self,
        track: &TrackId,
        missions: &[Mission],
        lessons: &[Lesson],
        completions: &CompletionMap,
    ) -> WeekProgressReport {
        compute_week_progress(
            track,
            &[
                &MissionSource::new(missions),
                &LessonSource::new(lessons, &self.lesson_weeks),
            ],
            completions,
        )
    }

    /// Progress for the given mode; lessons are ignored in mission-only mode.
    pub fn compute(
        &self,
        mode: ProgressMode,
        track: &TrackId,
        missions: &[Mission],
        lessons: &[Lesson],
        completions: &CompletionMap,
    ) -> WeekProgressReport {
        match mode {
            ProgressMode::MissionsOnly => self.compute_missions(track, missions, completions),
            ProgressMode::Hybrid => self.compute_hybrid(track, missions, lessons, completions),
        }
    }
}
