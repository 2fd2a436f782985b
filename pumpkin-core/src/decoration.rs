//! Decorations - the stickers placed on the pumpkin.

use serde::{Deserialize, Serialize};

/// Glyph drawn for any type tag that is not in the palette.
pub const FALLBACK_GLYPH: &str = "🎃";

/// Unique identifier for a decoration.
///
/// Ids are handed out in increasing order by the scene and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecorationId(u64);

impl DecorationId {
    /// Create an id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DecorationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The sticker kinds offered by the palette.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DecorationKind {
    /// Triangle eye.
    EyeTriangle,
    /// Square eye.
    EyeSquare,
    /// Round eye.
    EyeCircle,
    /// Triangle nose.
    NoseTriangle,
    /// Round nose.
    NoseCircle,
    /// Smiling mouth.
    MouthSmile,
    /// Toothy grin.
    MouthToothy,
    /// Frowning mouth.
    MouthFrown,
    /// Spider.
    Spider,
    /// Spider web.
    Web,
    /// Bat.
    Bat,
    /// Ghost.
    Ghost,
    /// Skull.
    Skull,
    /// Bone.
    Bone,
    /// Wrapped candy.
    Candy,
    /// Candy corn.
    CandyCorn,
    /// A tag the palette does not know. Rendered with [`FALLBACK_GLYPH`].
    Unknown(String),
}

impl DecorationKind {
    /// Every known kind, in palette order.
    pub const ALL: [DecorationKind; 16] = [
        DecorationKind::EyeTriangle,
        DecorationKind::EyeSquare,
        DecorationKind::EyeCircle,
        DecorationKind::NoseTriangle,
        DecorationKind::NoseCircle,
        DecorationKind::MouthSmile,
        DecorationKind::MouthToothy,
        DecorationKind::MouthFrown,
        DecorationKind::Spider,
        DecorationKind::Web,
        DecorationKind::Bat,
        DecorationKind::Ghost,
        DecorationKind::Skull,
        DecorationKind::Bone,
        DecorationKind::Candy,
        DecorationKind::CandyCorn,
    ];

    /// Parse a palette type tag. Unrecognized tags become [`DecorationKind::Unknown`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "eye-triangle" => Self::EyeTriangle,
            "eye-square" => Self::EyeSquare,
            "eye-circle" => Self::EyeCircle,
            "nose-triangle" => Self::NoseTriangle,
            "nose-circle" => Self::NoseCircle,
            "mouth-smile" => Self::MouthSmile,
            "mouth-toothy" => Self::MouthToothy,
            "mouth-frown" => Self::MouthFrown,
            "spider" => Self::Spider,
            "web" => Self::Web,
            "bat" => Self::Bat,
            "ghost" => Self::Ghost,
            "skull" => Self::Skull,
            "bone" => Self::Bone,
            "candy" => Self::Candy,
            "candy-corn" => Self::CandyCorn,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The palette type tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::EyeTriangle => "eye-triangle",
            Self::EyeSquare => "eye-square",
            Self::EyeCircle => "eye-circle",
            Self::NoseTriangle => "nose-triangle",
            Self::NoseCircle => "nose-circle",
            Self::MouthSmile => "mouth-smile",
            Self::MouthToothy => "mouth-toothy",
            Self::MouthFrown => "mouth-frown",
            Self::Spider => "spider",
            Self::Web => "web",
            Self::Bat => "bat",
            Self::Ghost => "ghost",
            Self::Skull => "skull",
            Self::Bone => "bone",
            Self::Candy => "candy",
            Self::CandyCorn => "candy-corn",
            Self::Unknown(tag) => tag,
        }
    }

    /// The glyph rendered for this kind.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::EyeTriangle => "🔺",
            Self::EyeSquare => "⬛",
            Self::EyeCircle => "⭕",
            Self::NoseTriangle => "🔻",
            Self::NoseCircle => "⚫",
            Self::MouthSmile => "😊",
            Self::MouthToothy => "😬",
            Self::MouthFrown => "😮",
            Self::Spider => "🕷️",
            Self::Web => "🕸️",
            Self::Bat => "🦇",
            Self::Ghost => "👻",
            Self::Skull => "💀",
            Self::Bone => "🦴",
            Self::Candy => "🍬",
            Self::CandyCorn => "🌽",
            Self::Unknown(_) => FALLBACK_GLYPH,
        }
    }

    /// Whether this kind is one of the palette entries.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for DecorationKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<DecorationKind> for String {
    fn from(kind: DecorationKind) -> Self {
        kind.tag().to_string()
    }
}

/// A point in zone-local pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the zone's left edge.
    pub x: f32,
    /// Pixels from the zone's top edge.
    pub y: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Per-decoration drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DragState {
    /// Not being dragged.
    #[default]
    Idle,
    /// Following the pointer.
    Dragging {
        /// Pointer position minus decoration position at grab time.
        grab_dx: f32,
        /// Pointer position minus decoration position at grab time.
        grab_dy: f32,
    },
}

/// A placed sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// Unique identifier.
    pub id: DecorationId,
    /// Sticker kind.
    pub kind: DecorationKind,
    /// Top-left corner in zone-local pixels.
    pub position: Position,
    /// Whether this decoration is the current selection.
    pub selected: bool,
    /// Drag state.
    pub drag: DragState,
}

impl Decoration {
    /// Create an idle, unselected decoration.
    #[must_use]
    pub fn new(id: DecorationId, kind: DecorationKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            selected: false,
            drag: DragState::Idle,
        }
    }

    /// The glyph rendered for this decoration.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        self.kind.glyph()
    }

    /// Whether this decoration is following the pointer.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}
