//! # Pumpkin Decorator Renderer
//!
//! Draws the exported pumpkin image.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ExportSnapshot│──▶│ SVG document │──▶│ tiny-skia PNG│
//! │ (core)       │   │ (compose)    │   │ (resvg)      │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;

pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, PumpkinExporter};
