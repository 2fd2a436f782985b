//! Input events delivered by the page (palette, decorations, control panel).

use serde::{Deserialize, Serialize};

use crate::{DecorError, DecorResult, DecorationId};

/// All input events the decorator can receive.
///
/// Pointer coordinates are client coordinates; the controller maps them into
/// the zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// A palette entry was dropped on the zone.
    PaletteDrop {
        /// Palette type tag.
        kind: String,
        /// Client x of the drop point.
        x: f32,
        /// Client y of the drop point.
        y: f32,
    },

    /// A palette entry was clicked.
    PaletteClick {
        /// Palette type tag.
        kind: String,
    },

    /// Pointer pressed on a decoration.
    PointerDown {
        /// Decoration under the pointer.
        target: DecorationId,
        /// Client x.
        x: f32,
        /// Client y.
        y: f32,
    },

    /// Pointer moved anywhere on the page.
    PointerMove {
        /// Client x.
        x: f32,
        /// Client y.
        y: f32,
    },

    /// Pointer released anywhere on the page.
    PointerUp,

    /// A decoration was clicked.
    Click {
        /// Clicked decoration.
        target: DecorationId,
    },

    /// A decoration was double-clicked.
    DoubleClick {
        /// Double-clicked decoration.
        target: DecorationId,
    },

    /// The empty zone background was clicked.
    BackgroundClick,

    /// A key was pressed.
    Key {
        /// Key name, e.g. `"Delete"`.
        key: String,
    },

    /// Size slider moved.
    SizeChanged {
        /// New scale factor.
        value: f32,
    },

    /// Color selector changed.
    ColorChanged {
        /// Palette color key.
        value: String,
    },

    /// Light button pressed.
    LightButton,

    /// Glow checkbox changed.
    GlowToggled {
        /// New checkbox state.
        checked: bool,
    },

    /// Flicker checkbox changed.
    FlickerToggled {
        /// New checkbox state.
        checked: bool,
    },

    /// Clear button pressed.
    ClearRequested,

    /// Export button pressed.
    ExportRequested,

    /// The zone's bounding box changed.
    ZoneResized {
        /// Client x of the left edge.
        left: f32,
        /// Client y of the top edge.
        top: f32,
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },

    /// Let time pass, in milliseconds. Used by scripted hosts.
    Wait {
        /// Milliseconds to wait.
        ms: u64,
    },
}

impl InputEvent {
    /// Parse a JSON-lines event script. Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error for the first line that is not a valid event.
    pub fn parse_lines(script: &str) -> DecorResult<Vec<Self>> {
        script
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| serde_json::from_str(line).map_err(DecorError::Serialization))
            .collect()
    }
}
