//! Storage trait abstraction.

use async_trait::async_trait;
use curriculum_core::{CompletionRecord, LearnerId, Lesson, Mission, TrackId, UnitId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for curriculum catalogs and learner completions.
///
/// Versions are monotonically increasing counters bumped on every write to
/// the corresponding collection; callers use them as cache keys.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Catalog operations ===

    /// Save a mission (create or update).
    async fn save_mission(&mut self, mission: &Mission) -> Result<()>;

    /// Load a mission by ID.
    async fn load_mission(&self, id: &UnitId) -> Result<Option<Mission>>;

    /// List missions of a track.
    async fn list_missions(&self, track: &TrackId) -> Result<Vec<Mission>>;

    /// Save a lesson (create or update).
    async fn save_lesson(&mut self, lesson: &Lesson) -> Result<()>;

    /// Load a lesson by ID.
    async fn load_lesson(&self, id: &UnitId) -> Result<Option<Lesson>>;

    /// List all lessons.
    async fn list_lessons(&self) -> Result<Vec<Lesson>>;

    /// Current catalog version.
    async fn catalog_version(&self) -> Result<u64>;

    // === Completion operations ===

    /// Save a completion record, replacing the learner's previous record for
    /// the same unit kind and id.
    async fn save_completion(&mut self, record: &CompletionRecord) -> Result<()>;

    /// List every completion record of a learner.
    async fn list_completions(&self, learner: &LearnerId) -> Result<Vec<CompletionRecord>>;

    /// Current completions version for a learner.
    async fn completions_version(&self, learner: &LearnerId) -> Result<u64>;
}
