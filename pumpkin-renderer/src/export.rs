//! Pumpkin export to PNG.
//!
//! Composes the pumpkin (background, body, stem, glyphs) as an SVG document and
//! rasterizes it with the resvg/tiny-skia pipeline.

use std::fmt::Write;
use std::sync::Arc;

use pumpkin_core::{DecorResult, ExportSnapshot, Rasterizer};

use crate::error::{RenderError, RenderResult};

/// Canvas size the body and stem geometry is laid out for.
const DESIGN_WIDTH: f32 = 1200.0;
const DESIGN_HEIGHT: f32 = 1350.0;

/// Configuration for pumpkin export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output width in pixels (default: 1200).
    pub width: u32,
    /// Output height in pixels (default: 1350).
    pub height: u32,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// Stem color as RGBA bytes.
    pub stem: [u8; 4],
    /// Fill for glyph text. Color emoji fonts ignore it.
    pub glyph_fill: [u8; 4],
    /// Glyph font size in pixels (default: 60).
    pub font_size: f32,
    /// Glyph font family.
    pub font_family: String,
    /// Load installed system fonts for glyph text.
    pub load_system_fonts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1350,
            background: [0x1a, 0x1a, 0x2e, 255],
            stem: [0x2d, 0x50, 0x16, 255],
            glyph_fill: [0x2d, 0x50, 0x16, 255],
            font_size: 60.0,
            font_family: "Arial".to_string(),
            load_system_fonts: true,
        }
    }
}

/// Renders [`ExportSnapshot`]s to PNG.
pub struct PumpkinExporter {
    config: ExportConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl PumpkinExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        if config.load_system_fonts {
            fontdb.load_system_fonts();
            tracing::debug!(faces = fontdb.len(), "loaded system fonts");
        }
        Self {
            config,
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The exporter configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Compose the snapshot as an SVG document.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn render_to_svg(&self, snapshot: &ExportSnapshot) -> String {
        let (w, h) = (snapshot.width.max(1), snapshot.height.max(1));
        let sx = w as f32 / DESIGN_WIDTH;
        let sy = h as f32 / DESIGN_HEIGHT;

        let mut svg = String::with_capacity(1024 + snapshot.glyphs.len() * 128);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        );

        let (bg, bg_alpha) = hex(self.config.background);
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{bg}\" fill-opacity=\"{bg_alpha}\"/>",
        );

        // Body and stem are laid out on the 1200x1350 design canvas.
        let _ = write!(svg, "<g transform=\"scale({sx} {sy})\">");
        let _ = write!(
            svg,
            "<ellipse cx=\"600\" cy=\"700\" rx=\"350\" ry=\"300\" fill=\"{}\"/>",
            snapshot.body_color.body_hex(),
        );
        let (stem, stem_alpha) = hex(self.config.stem);
        let _ = write!(
            svg,
            "<path d=\"M580,410 Q570,350 600,320 Q630,350 620,410 Z\" fill=\"{stem}\" fill-opacity=\"{stem_alpha}\"/>",
        );
        svg.push_str("</g>");

        let (fill, fill_alpha) = hex(self.config.glyph_fill);
        let family = escape_xml(&self.config.font_family);
        for placed in &snapshot.glyphs {
            tracing::trace!(glyph = %placed.glyph, x = placed.x, y = placed.y, "draw glyph");
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-family=\"{family}\" fill=\"{fill}\" fill-opacity=\"{fill_alpha}\">{}</text>",
                placed.x,
                placed.y,
                self.config.font_size,
                escape_xml(&placed.glyph),
            );
        }

        svg.push_str("</svg>");
        svg
    }

    /// Render the snapshot to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, snapshot: &ExportSnapshot) -> RenderResult<Vec<u8>> {
        let svg = self.render_to_svg(snapshot);
        let pixmap = self.rasterize_svg(&svg)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(&self, svg: &str) -> RenderResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

        let width = (tree.size().width() as u32).max(1);
        let height = (tree.size().height() as u32).max(1);
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl Default for PumpkinExporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for PumpkinExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PumpkinExporter")
            .field("config", &self.config)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer for PumpkinExporter {
    fn output_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn rasterize(&self, snapshot: &ExportSnapshot) -> DecorResult<Vec<u8>> {
        Ok(self.render_to_png(snapshot)?)
    }
}

/// `#rrggbb` plus alpha in 0..=1.
fn hex(rgba: [u8; 4]) -> (String, f32) {
    (
        format!("#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2]),
        f32::from(rgba[3]) / 255.0,
    )
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
