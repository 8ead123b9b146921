// Error types for the chart pipeline

use thiserror::Error;

/// Result type alias using ChartError.
pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    // === Loading ===
    #[error("Failed to load data from '{source_id}': {reason}")]
    DataLoad { source_id: String, reason: String },

    // === Rendering / Export ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Nothing to export: no chart has been rendered yet")]
    ExportTargetMissing,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub fn data_load(source_id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ChartError::DataLoad {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the user can recover by picking another data source.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChartError::DataLoad { .. } | ChartError::ExportTargetMissing)
    }
}
