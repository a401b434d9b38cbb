//! Progress service errors.

use curriculum_storage::StorageError;

/// Errors raised by the progress service.
///
/// The engine itself never fails; these come from loading its inputs.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration file could not be read
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// Catalog or completions were not loaded before evaluation
    #[error("progress inputs are still loading")]
    NotLoaded,
}
