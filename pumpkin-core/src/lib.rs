//! # Pumpkin Decorator Core
//!
//! Headless logic for the pumpkin sticker editor.
//! Compiles to WASM for the browser page.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              pumpkin-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Scene            │  Input Adapter          │
//! │  - Decorations    │  - Palette drop/click   │
//! │  - Selection      │  - Pointer, key         │
//! │  - Drag clamping  │  - Control panel        │
//! ├─────────────────────────────────────────────┤
//! │  Lighting         │  Export seams           │
//! │  - Lit / glow     │  - Output-space layout  │
//! │  - Flicker task   │  - Rasterizer, download │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod controller;
pub mod decoration;
pub mod error;
pub mod event;
pub mod export;
pub mod flicker;
pub mod input;
pub mod lighting;
pub mod scene;
pub mod settings;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{DecoratorConfig, DeleteKeyBinding, OpacityBand};
pub use controller::{DecoratorController, CLEAR_PROMPT, DELETE_KEY};
pub use decoration::{Decoration, DecorationId, DecorationKind, DragState, Position, FALLBACK_GLYPH};
pub use error::{DecorError, DecorResult};
pub use event::InputEvent;
pub use export::{DiscardSink, DownloadSink, ExportSnapshot, MemorySink, PlacedGlyph, Rasterizer, EXPORT_FILENAME};
pub use flicker::{FlickerParams, FlickerScheduler, GlowLevel, ManualFlicker};
#[cfg(feature = "tokio")]
pub use flicker::TokioFlicker;
pub use input::{Dispatched, InputAdapter};
pub use lighting::LightState;
pub use scene::{Scene, Zone};
pub use settings::{PumpkinColor, SettingChange, Settings};

/// Decorator core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
