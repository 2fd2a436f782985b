//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rasterizing an export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The composed SVG could not be parsed.
    #[error("SVG parsing failed: {0}")]
    Svg(String),

    /// The target pixmap could not be allocated.
    #[error("Failed to create {width}x{height} pixmap")]
    Pixmap {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl From<RenderError> for pumpkin_core::DecorError {
    fn from(e: RenderError) -> Self {
        Self::Render(e.to_string())
    }
}
