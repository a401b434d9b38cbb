//! Progress tracking service.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use curriculum_core::{LearnerId, TrackId};
use curriculum_storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::{ProgressConfig, ProgressMode};
use crate::engine::{ProgressEngine, WeekProgressReport};
use crate::state::{ProgressInputs, ProgressState};
use crate::ProgressError;

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Week progress of a learner on a track.
    async fn week_progress(
        &self,
        learner: &LearnerId,
        track: &TrackId,
        mode: ProgressMode,
    ) -> Result<WeekProgressReport, ProgressError>;

    /// Progress over missions only.
    async fn mission_progress(
        &self,
        learner: &LearnerId,
        track: &TrackId,
    ) -> Result<WeekProgressReport, ProgressError> {
        self.week_progress(learner, track, ProgressMode::MissionsOnly).await
    }

    /// Progress over missions and lessons.
    async fn hybrid_progress(
        &self,
        learner: &LearnerId,
        track: &TrackId,
    ) -> Result<WeekProgressReport, ProgressError> {
        self.week_progress(learner, track, ProgressMode::Hybrid).await
    }

    /// Take a progress snapshot.
    async fn snapshot(
        &self,
        learner: &LearnerId,
        track: &TrackId,
        mode: ProgressMode,
    ) -> Result<ProgressSnapshot, ProgressError> {
        let report = self.week_progress(learner, track, mode).await?;
        Ok(ProgressSnapshot {
            timestamp: Utc::now(),
            learner: learner.clone(),
            track: track.clone(),
            mode,
            report,
        })
    }
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Learner
    pub learner: LearnerId,

    /// Track
    pub track: TrackId,

    /// Sources used
    pub mode: ProgressMode,

    /// Computed progress
    pub report: WeekProgressReport,
}

/// Cache key: a report is valid as long as neither the catalog nor the
/// learner's completions have been written since.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Learner
    pub learner: LearnerId,
    /// Track
    pub track: TrackId,
    /// Sources used
    pub mode: ProgressMode,
    /// Catalog version at computation time
    pub catalog_version: u64,
    /// Completions version at computation time
    pub completions_version: u64,
}

/// Bounded report cache; cleared wholesale once full.
#[derive(Debug)]
pub struct ReportCache {
    reports: HashMap<CacheKey, WeekProgressReport>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ReportCache {
    /// Create a cache holding at most `capacity` reports.
    pub fn new(capacity: usize) -> Self {
        Self {
            reports: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a report.
    pub fn get(&mut self, key: &CacheKey) -> Option<WeekProgressReport> {
        match self.reports.get(key) {
            Some(report) => {
                self.hits += 1;
                Some(report.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a report.
    pub fn insert(&mut self, key: CacheKey, report: WeekProgressReport) {
        if self.capacity == 0 {
            return;
        }
        if self.reports.len() >= self.capacity {
            debug!("Report cache full ({} entries), clearing", self.reports.len());
            self.reports.clear();
        }
        self.reports.insert(key, report);
    }

    /// Number of cached reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<S>,
    engine: ProgressEngine,
    cache: Mutex<ReportCache>,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker with default configuration.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, ProgressConfig::default())
    }

    /// Create a tracker with the given configuration.
    pub fn with_config(storage: S, config: ProgressConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            engine: ProgressEngine::new(config.lesson_week_map),
            cache: Mutex::new(ReportCache::new(config.cache_capacity)),
        }
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Cache `(hits, misses)`.
    pub async fn cache_stats(&self) -> (u64, u64) {
        self.cache.lock().await.stats()
    }

    /// Fetch every input the mode needs from storage.
    async fn load_inputs(
        &self,
        learner: &LearnerId,
        track: &TrackId,
        mode: ProgressMode,
    ) -> Result<ProgressInputs, ProgressError> {
        let (missions, records) = tokio::try_join!(
            self.storage.list_missions(track),
            self.storage.list_completions(learner),
        )?;

        let mut inputs = ProgressInputs::new(track.clone(), mode)
            .with_missions(missions)
            .with_records(&records);

        if mode == ProgressMode::Hybrid {
            inputs = inputs.with_lessons(self.storage.list_lessons().await?);
        }

        Ok(inputs)
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn week_progress(
        &self,
        learner: &LearnerId,
        track: &TrackId,
        mode: ProgressMode,
    ) -> Result<WeekProgressReport, ProgressError> {
        let (catalog_version, completions_version) = tokio::try_join!(
            self.storage.catalog_version(),
            self.storage.completions_version(learner),
        )?;
        let key = CacheKey {
            learner: learner.clone(),
            track: track.clone(),
            mode,
            catalog_version,
            completions_version,
        };

        if let Some(report) = self.cache.lock().await.get(&key) {
            debug!("Progress cache hit for {} on {}", learner, track);
            return Ok(report);
        }

        let inputs = self.load_inputs(learner, track, mode).await?;
        let ProgressState::Ready(report) = inputs.evaluate(&self.engine) else {
            return Err(ProgressError::NotLoaded);
        };

        info!(
            "Computed progress for {} on {}: week {}, {}% ({}/{})",
            learner,
            track,
            report.summary.current_week,
            report.summary.overall_progress_percent,
            report.summary.total_completed,
            report.summary.total_units
        );

        self.cache.lock().await.insert(key, report.clone());
        Ok(report)
    }
}
