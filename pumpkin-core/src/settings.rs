//! Control-panel settings and the view state derived from them.

use serde::{Deserialize, Serialize};

/// Pumpkin body colors offered by the color selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpkinColor {
    /// Classic orange.
    #[default]
    Orange,
    /// Pale "ghost" pumpkin.
    White,
    /// Unripe green.
    Green,
    /// Painted purple.
    Purple,
    /// Painted black.
    Black,
}

impl PumpkinColor {
    /// Parse a selector key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "orange" => Some(Self::Orange),
            "white" => Some(Self::White),
            "green" => Some(Self::Green),
            "purple" => Some(Self::Purple),
            "black" => Some(Self::Black),
            _ => None,
        }
    }

    /// The selector key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::White => "white",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Black => "black",
        }
    }

    /// Body fill used by the exported image.
    #[must_use]
    pub fn body_hex(self) -> &'static str {
        match self {
            Self::Orange => "#FF7518",
            Self::White => "#F2EBD9",
            Self::Green => "#5B8C2A",
            Self::Purple => "#6B3FA0",
            Self::Black => "#2B2B2B",
        }
    }
}

/// One control-panel change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "setting", content = "value", rename_all = "snake_case")]
pub enum SettingChange {
    /// Size slider moved.
    Size(f32),
    /// Color selector changed, by key.
    Color(String),
    /// Glow checkbox toggled.
    Glow(bool),
    /// Flicker checkbox toggled.
    Flicker(bool),
}

/// The control-panel state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Settings {
    /// Scale factor applied to the pumpkin graphic.
    pub pumpkin_size: f32,
    /// Body color.
    pub pumpkin_color: PumpkinColor,
    /// Glow checkbox.
    pub glow_enabled: bool,
    /// Flicker checkbox.
    pub flicker_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pumpkin_size: 1.0,
            pumpkin_color: PumpkinColor::Orange,
            glow_enabled: false,
            flicker_enabled: false,
        }
    }
}

impl Settings {
    /// CSS class list for the pumpkin container.
    #[must_use]
    pub fn container_class(&self) -> String {
        format!("pumpkin-container pumpkin-{}", self.pumpkin_color.key())
    }

    /// CSS transform for the pumpkin graphic.
    #[must_use]
    pub fn pumpkin_transform(&self) -> String {
        format!("scale({})", self.pumpkin_size)
    }

    /// CSS transform origin paired with [`Settings::pumpkin_transform`].
    #[must_use]
    pub fn transform_origin(&self) -> &'static str {
        "center top"
    }

    /// Size shown next to the slider, e.g. `"120%"`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn size_label(&self) -> String {
        format!("{}%", (self.pumpkin_size * 100.0).round() as i64)
    }
}
