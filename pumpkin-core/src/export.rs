//! Export seams: the layout handed to a rasterizer and the download it produces.

use serde::{Deserialize, Serialize};

use crate::{DecorError, DecorResult, PumpkinColor};

/// Filename offered for every exported image.
pub const EXPORT_FILENAME: &str = "halloween-pumpkin.png";

/// A glyph positioned in output-image pixels.
///
/// `y` is the text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedGlyph {
    /// Text to draw.
    pub glyph: String,
    /// Output-space x.
    pub x: f32,
    /// Output-space baseline y.
    pub y: f32,
}

/// Everything a rasterizer needs to draw the pumpkin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Body color.
    pub body_color: PumpkinColor,
    /// Decoration glyphs in paint order.
    pub glyphs: Vec<PlacedGlyph>,
}

/// Turns an [`ExportSnapshot`] into encoded image bytes.
pub trait Rasterizer {
    /// Output image size (width, height) in pixels.
    fn output_size(&self) -> (u32, u32);

    /// Draw and encode the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or encoding fails.
    fn rasterize(&self, snapshot: &ExportSnapshot) -> DecorResult<Vec<u8>>;
}

/// Receives the exported file, e.g. by triggering a browser download or writing to disk.
pub trait DownloadSink {
    /// Offer `bytes` to the user under `filename`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be delivered.
    fn offer(&mut self, filename: &str, bytes: Vec<u8>) -> DecorResult<()>;
}

/// Sink that keeps every offered file in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Offered files, oldest first.
    pub downloads: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for MemorySink {
    fn offer(&mut self, filename: &str, bytes: Vec<u8>) -> DecorResult<()> {
        self.downloads.push((filename.to_string(), bytes));
        Ok(())
    }
}

/// Sink for hosts with nowhere to put downloads. Every offer fails and the bytes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl DownloadSink for DiscardSink {
    fn offer(&mut self, filename: &str, bytes: Vec<u8>) -> DecorResult<()> {
        tracing::debug!(filename, bytes = bytes.len(), "discarding download");
        Err(DecorError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no download sink configured",
        )))
    }
}
