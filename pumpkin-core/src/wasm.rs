//! WebAssembly bindings for pumpkin-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! The page forwards its DOM events here and reads view state back each frame.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::flicker::{sample_opacity, FlickerParams, FlickerScheduler, GlowLevel};
use crate::{
    DecorationId, DecoratorConfig, DecoratorController, InputAdapter, InputEvent, SettingChange,
    Zone,
};

/// Initialize the decorator WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Flicker driven by `window.setInterval`.
#[derive(Default)]
struct BrowserFlicker {
    interval: Option<(i32, Closure<dyn FnMut()>)>,
}

impl FlickerScheduler for BrowserFlicker {
    fn start(&mut self, glow: GlowLevel, params: FlickerParams) {
        self.stop();
        let Some(window) = web_sys::window() else {
            tracing::warn!("no window, flicker disabled");
            return;
        };
        let mut rng = StdRng::from_entropy();
        let band = params.band;
        let tick = Closure::<dyn FnMut()>::new(move || {
            glow.set(sample_opacity(&mut rng, band));
        });
        let period_ms = i32::try_from(params.period.as_millis()).unwrap_or(i32::MAX);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            period_ms,
        ) {
            Ok(handle) => self.interval = Some((handle, tick)),
            Err(e) => tracing::warn!("setInterval failed: {e:?}"),
        }
    }

    fn stop(&mut self) {
        if let Some((handle, _tick)) = self.interval.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(handle);
            }
        }
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

impl Drop for BrowserFlicker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn browser_confirm(prompt: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(prompt).ok())
        .unwrap_or(false)
}

/// Decorator instance for WASM.
#[wasm_bindgen]
pub struct WasmDecorator {
    controller: DecoratorController,
    adapter: InputAdapter,
}

#[wasm_bindgen]
impl WasmDecorator {
    /// Create a decorator over a zone of the given size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(zone_width: f32, zone_height: f32) -> Self {
        let config = DecoratorConfig {
            zone: Zone::new(zone_width, zone_height),
            ..DecoratorConfig::default()
        };
        Self {
            controller: DecoratorController::new(&config, Box::<BrowserFlicker>::default()),
            adapter: InputAdapter::new(browser_confirm),
        }
    }

    /// Update the zone's bounding box (from `getBoundingClientRect`).
    #[wasm_bindgen(js_name = setZone)]
    pub fn set_zone(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.controller
            .set_zone(Zone::new(width, height).with_origin(left, top));
    }

    /// Place a decoration at a zone-local position. Returns its id.
    #[wasm_bindgen(js_name = addDecoration)]
    pub fn add_decoration(&mut self, type_tag: &str, x: f32, y: f32) -> u64 {
        self.controller.add_decoration(type_tag, x, y).get()
    }

    /// Place a decoration dropped at a client position. Returns its id.
    #[wasm_bindgen(js_name = dropFromPalette)]
    pub fn drop_from_palette(&mut self, type_tag: &str, client_x: f32, client_y: f32) -> u64 {
        self.controller
            .drop_from_palette(type_tag, client_x, client_y)
            .get()
    }

    /// Place a decoration at the zone center. Returns its id.
    #[wasm_bindgen(js_name = addAtCenter)]
    pub fn add_at_center(&mut self, type_tag: &str) -> u64 {
        self.controller.add_at_center(type_tag).get()
    }

    /// Grab a decoration. Returns false if it does not exist.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, id: u64, client_x: f32, client_y: f32) -> bool {
        self.controller
            .begin_drag(DecorationId::from_raw(id), client_x, client_y)
            .is_ok()
    }

    /// Move grabbed decorations.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.controller.drag_to(client_x, client_y);
    }

    /// Release grabbed decorations.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.controller.end_drag();
    }

    /// Select a decoration. Returns false if it does not exist.
    pub fn select(&mut self, id: u64) -> bool {
        self.controller.select(DecorationId::from_raw(id)).is_ok()
    }

    /// Clear the selection.
    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.controller.clear_selection();
    }

    /// Delete a decoration. Returns false if it does not exist.
    #[wasm_bindgen(js_name = deleteDecoration)]
    pub fn delete_decoration(&mut self, id: u64) -> bool {
        self.controller.delete(DecorationId::from_raw(id)).is_ok()
    }

    /// Forward a key press. Returns the deleted id, if any.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> Option<u64> {
        self.controller.handle_key(key).map(DecorationId::get)
    }

    /// Clear every decoration after asking the user.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> bool {
        self.controller.clear_all(browser_confirm)
    }

    /// Size slider changed.
    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&mut self, size: f32) {
        self.controller.set_setting(SettingChange::Size(size));
    }

    /// Color selector changed.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, key: &str) {
        self.controller
            .set_setting(SettingChange::Color(key.to_string()));
    }

    /// Glow checkbox changed.
    #[wasm_bindgen(js_name = setGlow)]
    pub fn set_glow(&mut self, enabled: bool) {
        self.controller.set_setting(SettingChange::Glow(enabled));
    }

    /// Flicker checkbox changed.
    #[wasm_bindgen(js_name = setFlicker)]
    pub fn set_flicker(&mut self, enabled: bool) {
        self.controller.set_setting(SettingChange::Flicker(enabled));
    }

    /// Light button pressed. Returns whether the pumpkin is now lit.
    #[wasm_bindgen(js_name = toggleLight)]
    pub fn toggle_light(&mut self) -> bool {
        self.controller.toggle_light()
    }

    /// Apply one [`InputEvent`] serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is not a valid event.
    #[wasm_bindgen(js_name = dispatchJson)]
    pub fn dispatch_json(&mut self, json: &str) -> Result<(), String> {
        let event: InputEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.adapter.dispatch(&mut self.controller, &event);
        Ok(())
    }

    /// Whether the pumpkin is lit.
    #[wasm_bindgen(js_name = isLit)]
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.controller.is_lit()
    }

    /// Current glow-overlay opacity.
    #[wasm_bindgen(js_name = glowOpacity)]
    #[must_use]
    pub fn glow_opacity(&self) -> f32 {
        self.controller.glow_opacity()
    }

    /// CSS class list for the pumpkin container.
    #[wasm_bindgen(js_name = containerClass)]
    #[must_use]
    pub fn container_class(&self) -> String {
        self.controller.settings().container_class()
    }

    /// CSS transform for the pumpkin graphic.
    #[wasm_bindgen(js_name = pumpkinTransform)]
    #[must_use]
    pub fn pumpkin_transform(&self) -> String {
        self.controller.settings().pumpkin_transform()
    }

    /// Label shown next to the size slider.
    #[wasm_bindgen(js_name = sizeLabel)]
    #[must_use]
    pub fn size_label(&self) -> String {
        self.controller.settings().size_label()
    }

    /// Get the current scene as JSON.
    #[wasm_bindgen(js_name = getSceneJson)]
    #[must_use]
    pub fn get_scene_json(&self) -> String {
        self.controller.scene().to_json().unwrap_or_default()
    }

    /// Get the export layout for an output image of the given size, as JSON.
    #[wasm_bindgen(js_name = exportSnapshotJson)]
    #[must_use]
    pub fn export_snapshot_json(&self, width: u32, height: u32) -> String {
        serde_json::to_string(&self.controller.export_snapshot(width, height)).unwrap_or_default()
    }
}
