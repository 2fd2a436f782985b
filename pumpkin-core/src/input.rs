//! Input adapter: turns page events into controller commands.

use std::time::Duration;

use crate::export::{DiscardSink, DownloadSink, Rasterizer};
use crate::{DecorationId, DecoratorController, InputEvent, SettingChange, Zone};

/// What dispatching one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A decoration was created.
    Added(DecorationId),
    /// A decoration was deleted.
    Deleted(DecorationId),
    /// The clear prompt was answered; `true` if the scene was cleared.
    Cleared(bool),
    /// The export ran; `true` if a download was offered.
    Exported(bool),
    /// The host should let this much time pass.
    Wait(Duration),
    /// State was updated.
    Applied,
    /// The event had no effect.
    Ignored,
}

/// Routes [`InputEvent`]s to a [`DecoratorController`].
///
/// Holds the collaborators that the commands themselves do not own: the
/// clear confirmation, the rasterizer and the download sink.
pub struct InputAdapter {
    confirm: Box<dyn FnMut(&str) -> bool>,
    rasterizer: Option<Box<dyn Rasterizer>>,
    sink: Box<dyn DownloadSink>,
}

impl InputAdapter {
    /// Create an adapter that asks `confirm` before clearing.
    ///
    /// Exports are ignored until a rasterizer is set, and rendered files are
    /// dropped until a sink is set.
    #[must_use]
    pub fn new(confirm: impl FnMut(&str) -> bool + 'static) -> Self {
        Self {
            confirm: Box::new(confirm),
            rasterizer: None,
            sink: Box::new(DiscardSink),
        }
    }

    /// Use `rasterizer` for exports.
    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Deliver exports to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn DownloadSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Apply one event.
    ///
    /// Events that target a missing decoration are logged and ignored.
    pub fn dispatch(&mut self, controller: &mut DecoratorController, event: &InputEvent) -> Dispatched {
        tracing::trace!(?event, "dispatch");
        match event {
            InputEvent::PaletteDrop { kind, x, y } => {
                Dispatched::Added(controller.drop_from_palette(kind, *x, *y))
            }
            InputEvent::PaletteClick { kind } => Dispatched::Added(controller.add_at_center(kind)),
            InputEvent::PointerDown { target, x, y } => {
                applied(controller.begin_drag(*target, *x, *y).map(|()| Dispatched::Applied))
            }
            InputEvent::PointerMove { x, y } => {
                if controller.drag_to(*x, *y) > 0 {
                    Dispatched::Applied
                } else {
                    Dispatched::Ignored
                }
            }
            InputEvent::PointerUp => {
                if controller.end_drag() > 0 {
                    Dispatched::Applied
                } else {
                    Dispatched::Ignored
                }
            }
            InputEvent::Click { target } => {
                applied(controller.select(*target).map(|()| Dispatched::Applied))
            }
            InputEvent::DoubleClick { target } => {
                applied(controller.delete(*target).map(|d| Dispatched::Deleted(d.id)))
            }
            InputEvent::BackgroundClick => {
                controller.clear_selection();
                Dispatched::Applied
            }
            InputEvent::Key { key } => match controller.handle_key(key) {
                Some(id) => Dispatched::Deleted(id),
                None => Dispatched::Ignored,
            },
            InputEvent::SizeChanged { value } => {
                controller.set_setting(SettingChange::Size(*value));
                Dispatched::Applied
            }
            InputEvent::ColorChanged { value } => {
                controller.set_setting(SettingChange::Color(value.clone()));
                Dispatched::Applied
            }
            InputEvent::LightButton => {
                controller.toggle_light();
                Dispatched::Applied
            }
            InputEvent::GlowToggled { checked } => {
                controller.set_setting(SettingChange::Glow(*checked));
                Dispatched::Applied
            }
            InputEvent::FlickerToggled { checked } => {
                controller.set_setting(SettingChange::Flicker(*checked));
                Dispatched::Applied
            }
            InputEvent::ClearRequested => {
                Dispatched::Cleared(controller.clear_all(|prompt| (self.confirm)(prompt)))
            }
            InputEvent::ExportRequested => match &self.rasterizer {
                Some(rasterizer) => {
                    Dispatched::Exported(controller.export(rasterizer.as_ref(), self.sink.as_mut()))
                }
                None => {
                    tracing::warn!("export requested without a rasterizer");
                    Dispatched::Exported(false)
                }
            },
            InputEvent::ZoneResized {
                left,
                top,
                width,
                height,
            } => {
                controller.set_zone(Zone::new(*width, *height).with_origin(*left, *top));
                Dispatched::Applied
            }
            InputEvent::Wait { ms } => {
                let elapsed = Duration::from_millis(*ms);
                controller.advance_clock(elapsed);
                Dispatched::Wait(elapsed)
            }
        }
    }
}

impl std::fmt::Debug for InputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAdapter")
            .field("has_rasterizer", &self.rasterizer.is_some())
            .finish_non_exhaustive()
    }
}

fn applied(result: crate::DecorResult<Dispatched>) -> Dispatched {
    result.unwrap_or_else(|e| {
        tracing::debug!("ignoring event: {e}");
        Dispatched::Ignored
    })
}
