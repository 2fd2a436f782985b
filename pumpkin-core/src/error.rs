//! Error types for decorator operations.

use thiserror::Error;

use crate::DecorationId;

/// Result type for decorator operations.
pub type DecorResult<T> = Result<T, DecorError>;

/// Errors that can occur in decorator operations.
#[derive(Debug, Error)]
pub enum DecorError {
    /// Decoration not found in the scene.
    #[error("Decoration not found: {0}")]
    DecorationNotFound(DecorationId),

    /// Scene or event serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Loaded scene breaks a scene invariant.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// Rasterizing the export image failed.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Writing the export artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
