//! The decoration scene controller: command handlers over the scene, settings and lighting.

use std::time::Duration;

use crate::config::{DecoratorConfig, DeleteKeyBinding};
use crate::export::{DownloadSink, ExportSnapshot, Rasterizer, EXPORT_FILENAME};
use crate::flicker::{FlickerParams, FlickerScheduler, GlowLevel, ManualFlicker};
use crate::lighting::LightState;
use crate::{
    Decoration, DecorationId, DecorationKind, DecorResult, Position, PumpkinColor, Scene,
    SettingChange, Settings, Zone,
};

/// Prompt shown before clearing every decoration.
pub const CLEAR_PROMPT: &str = "Clear all decorations?";

/// Key name that deletes the current selection.
pub const DELETE_KEY: &str = "Delete";

/// Owns the scene, the settings and the lighting state for one editor session.
#[derive(Debug)]
pub struct DecoratorController {
    scene: Scene,
    settings: Settings,
    light: LightState,
    delete_binding: DeleteKeyBinding,
    delete_armed: bool,
}

impl DecoratorController {
    /// Create a controller that flickers through `scheduler`.
    #[must_use]
    pub fn new(config: &DecoratorConfig, scheduler: Box<dyn FlickerScheduler>) -> Self {
        let params = FlickerParams {
            period: config.flicker_period,
            band: config.flicker_band,
        };
        Self {
            scene: Scene::new(config.zone, config.footprint),
            settings: Settings::default(),
            light: LightState::new(scheduler, config.lit_opacity, params),
            delete_binding: config.delete_binding,
            delete_armed: false,
        }
    }

    /// Create a controller whose flicker only advances through [`Self::advance_clock`].
    #[must_use]
    pub fn headless(config: &DecoratorConfig) -> Self {
        Self::new(config, Box::new(ManualFlicker::new(config.flicker_seed)))
    }

    // --- placement ---

    /// Place a decoration of the given palette type at a zone-local position.
    ///
    /// Unknown types are placed with the fallback glyph.
    pub fn add_decoration(&mut self, type_tag: &str, x: f32, y: f32) -> DecorationId {
        let kind = DecorationKind::from_tag(type_tag);
        if !kind.is_known() {
            tracing::debug!(type_tag, "unknown decoration type, using fallback glyph");
        }
        let id = self.scene.add(kind, Position::new(x, y));
        tracing::debug!(%id, type_tag, x, y, "decoration added");
        id
    }

    /// Place a decoration where a palette entry was dropped, given in client coordinates.
    pub fn drop_from_palette(&mut self, type_tag: &str, client_x: f32, client_y: f32) -> DecorationId {
        let at = self.scene.zone.to_local(client_x, client_y);
        self.add_decoration(type_tag, at.x, at.y)
    }

    /// Place a decoration at the zone center.
    pub fn add_at_center(&mut self, type_tag: &str) -> DecorationId {
        let at = self.scene.zone.center();
        self.add_decoration(type_tag, at.x, at.y)
    }

    // --- dragging ---

    /// Grab a decoration at the given client pointer position.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn begin_drag(&mut self, id: DecorationId, client_x: f32, client_y: f32) -> DecorResult<()> {
        self.scene.begin_drag(id, client_x, client_y)
    }

    /// Move every grabbed decoration after the pointer, clamped to the zone.
    pub fn drag_to(&mut self, client_x: f32, client_y: f32) -> usize {
        self.scene.drag_to(client_x, client_y)
    }

    /// Release every grabbed decoration.
    pub fn end_drag(&mut self) -> usize {
        self.scene.end_drag()
    }

    /// Move a decoration to a zone-local position, clamped to the zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn move_decoration(&mut self, id: DecorationId, x: f32, y: f32) -> DecorResult<Position> {
        self.scene.move_to(id, Position::new(x, y))
    }

    // --- selection & deletion ---

    /// Select a decoration and arm the Delete key.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn select(&mut self, id: DecorationId) -> DecorResult<()> {
        self.scene.select(id)?;
        self.delete_armed = true;
        tracing::debug!(%id, "decoration selected");
        Ok(())
    }

    /// Clear the selection, as a click on the empty zone does.
    pub fn clear_selection(&mut self) {
        if let Some(id) = self.scene.deselect() {
            tracing::debug!(%id, "selection cleared");
        }
    }

    /// Delete a decoration without confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn delete(&mut self, id: DecorationId) -> DecorResult<Decoration> {
        let removed = self.scene.remove(id)?;
        tracing::debug!(%id, "decoration deleted");
        Ok(removed)
    }

    /// Handle a key press. Returns the id deleted by it, if any.
    ///
    /// With [`DeleteKeyBinding::SingleShot`] the binding is consumed by the
    /// first key press after a selection, whatever the key.
    pub fn handle_key(&mut self, key: &str) -> Option<DecorationId> {
        let armed = match self.delete_binding {
            DeleteKeyBinding::SingleShot => std::mem::take(&mut self.delete_armed),
            DeleteKeyBinding::Persistent => true,
        };
        if !armed || key != DELETE_KEY {
            return None;
        }
        let id = self.scene.selected()?;
        self.scene.remove(id).ok()?;
        tracing::debug!(%id, "selected decoration deleted by key");
        Some(id)
    }

    /// Remove every decoration if `confirm` accepts [`CLEAR_PROMPT`]. Returns whether it did.
    pub fn clear_all(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(CLEAR_PROMPT) {
            return false;
        }
        let removed = self.scene.clear();
        tracing::debug!(removed, "decorations cleared");
        true
    }

    // --- settings & lighting ---

    /// Apply one control-panel change.
    pub fn set_setting(&mut self, change: SettingChange) {
        match change {
            SettingChange::Size(size) => {
                if size.is_finite() && size > 0.0 {
                    self.settings.pumpkin_size = size;
                } else {
                    tracing::warn!(size, "ignoring non-positive pumpkin size");
                }
            }
            SettingChange::Color(key) => match PumpkinColor::from_key(&key) {
                Some(color) => self.settings.pumpkin_color = color,
                None => tracing::warn!(%key, "ignoring unknown pumpkin color"),
            },
            SettingChange::Glow(enabled) => {
                self.settings.glow_enabled = enabled;
                self.light.update_glow(&self.settings);
            }
            SettingChange::Flicker(enabled) => {
                self.settings.flicker_enabled = enabled;
                self.light.update_flicker(&self.settings);
            }
        }
    }

    /// Flip the light. Returns whether the pumpkin is now lit.
    pub fn toggle_light(&mut self) -> bool {
        self.light.toggle(&self.settings)
    }

    /// Recompute glow from the current flags.
    pub fn update_glow(&mut self) {
        self.light.update_glow(&self.settings);
    }

    /// Start or stop flicker from the current flags.
    pub fn update_flicker(&mut self) {
        self.light.update_flicker(&self.settings);
    }

    /// Let a clockless flicker scheduler catch up with `elapsed`.
    pub fn advance_clock(&mut self, elapsed: Duration) {
        self.light.poll(elapsed);
    }

    /// Resize or move the decoration zone.
    pub fn set_zone(&mut self, zone: Zone) {
        self.scene.zone = zone;
    }

    // --- export ---

    /// Layout of the current scene in the rasterizer's output space.
    #[must_use]
    pub fn export_snapshot(&self, width: u32, height: u32) -> ExportSnapshot {
        ExportSnapshot {
            width,
            height,
            body_color: self.settings.pumpkin_color,
            glyphs: self.scene.export_layout(width, height),
        }
    }

    /// Rasterize the pumpkin and offer it as [`EXPORT_FILENAME`].
    ///
    /// Failures are logged and produce no download. Returns whether a download was offered.
    pub fn export(&self, rasterizer: &dyn Rasterizer, sink: &mut dyn DownloadSink) -> bool {
        let (width, height) = rasterizer.output_size();
        let snapshot = self.export_snapshot(width, height);
        let bytes = match rasterizer.rasterize(&snapshot) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("export rasterization failed: {e}");
                return false;
            }
        };
        let size = bytes.len();
        match sink.offer(EXPORT_FILENAME, bytes) {
            Ok(()) => {
                tracing::info!(bytes = size, glyphs = snapshot.glyphs.len(), "pumpkin exported");
                true
            }
            Err(e) => {
                tracing::warn!("export download failed: {e}");
                false
            }
        }
    }

    // --- view state ---

    /// The decoration scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The control-panel settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The selected decoration.
    #[must_use]
    pub fn selected(&self) -> Option<DecorationId> {
        self.scene.selected()
    }

    /// Whether the pumpkin is lit.
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.light.is_lit()
    }

    /// Current glow-overlay opacity.
    #[must_use]
    pub fn glow_opacity(&self) -> f32 {
        self.light.glow_opacity()
    }

    /// Shared handle to the glow level.
    #[must_use]
    pub fn glow(&self) -> GlowLevel {
        self.light.glow()
    }

    /// Whether the flicker task is running.
    #[must_use]
    pub fn flicker_running(&self) -> bool {
        self.light.flicker_running()
    }

    /// Whether the next Delete press would delete the selection.
    #[must_use]
    pub fn delete_armed(&self) -> bool {
        match self.delete_binding {
            DeleteKeyBinding::SingleShot => self.delete_armed,
            DeleteKeyBinding::Persistent => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::DecorError;

    fn controller() -> DecoratorController {
        DecoratorController::headless(&DecoratorConfig {
            flicker_seed: Some(11),
            ..DecoratorConfig::default()
        })
    }

    struct StubRasterizer {
        fail: bool,
    }

    impl Rasterizer for StubRasterizer {
        fn output_size(&self) -> (u32, u32) {
            (1200, 1350)
        }

        fn rasterize(&self, snapshot: &ExportSnapshot) -> DecorResult<Vec<u8>> {
            if self.fail {
                return Err(DecorError::Render("boom".to_string()));
            }
            Ok(snapshot.glyphs.iter().map(|g| g.glyph.len() as u8).collect())
        }
    }

    #[test]
    fn add_skull_at_point() {
        let mut c = controller();
        let id = c.add_decoration("skull", 100.0, 100.0);
        let skull = c.scene().get(id).expect("added");
        assert_eq!(skull.glyph(), "💀");
        assert_eq!(skull.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn drop_and_click_create_the_same_entity() {
        let mut c = controller();
        c.set_zone(Zone::new(400.0, 450.0).with_origin(100.0, 50.0));
        let dropped = c.drop_from_palette("bat", 300.0, 275.0);
        let clicked = c.add_at_center("bat");

        let a = c.scene().get(dropped).expect("dropped");
        let b = c.scene().get(clicked).expect("clicked");
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.position, b.position);
        assert_eq!(b.position, Position::new(200.0, 225.0));
        assert!(!a.selected && !b.selected);
    }

    #[test]
    fn double_click_delete_of_selected_clears_pointer() {
        let mut c = controller();
        let id = c.add_decoration("ghost", 10.0, 10.0);
        c.select(id).expect("select");
        c.delete(id).expect("delete");
        assert!(c.scene().is_empty());
        assert_eq!(c.selected(), None);
        assert!(c.delete(id).is_err());
    }

    #[test]
    fn delete_key_removes_selection() {
        let mut c = controller();
        let keep = c.add_decoration("bat", 0.0, 0.0);
        let id = c.add_decoration("web", 0.0, 0.0);
        c.select(id).expect("select");

        assert_eq!(c.handle_key(DELETE_KEY), Some(id));
        assert_eq!(c.selected(), None);
        assert_eq!(c.scene().len(), 1);
        assert!(c.scene().get(keep).is_some());
    }

    // The single-shot binding mirrors the page: each selection arms one
    // listener that any key press consumes.
    #[test]
    fn single_shot_delete_is_consumed_by_any_key() {
        let mut c = controller();
        let id = c.add_decoration("bat", 0.0, 0.0);
        c.select(id).expect("select");
        assert!(c.delete_armed());

        assert_eq!(c.handle_key("a"), None);
        assert!(!c.delete_armed());
        assert_eq!(c.handle_key(DELETE_KEY), None);
        assert_eq!(c.scene().len(), 1, "binding was consumed by the first key");

        c.select(id).expect("re-select arms again");
        assert_eq!(c.handle_key(DELETE_KEY), Some(id));
    }

    #[test]
    fn delete_key_after_background_click_deletes_nothing() {
        let mut c = controller();
        let a = c.add_decoration("bat", 0.0, 0.0);
        c.select(a).expect("select");
        c.clear_selection();
        assert_eq!(c.handle_key(DELETE_KEY), None);
        assert_eq!(c.scene().len(), 1, "nothing selected, nothing deleted");
        assert!(!c.delete_armed());
    }

    #[test]
    fn persistent_delete_binding_stays_armed() {
        let mut c = DecoratorController::headless(&DecoratorConfig {
            delete_binding: DeleteKeyBinding::Persistent,
            ..DecoratorConfig::default()
        });
        let a = c.add_decoration("bat", 0.0, 0.0);
        let b = c.add_decoration("bat", 0.0, 0.0);
        c.select(a).expect("select");
        assert_eq!(c.handle_key("Escape"), None);
        assert_eq!(c.handle_key(DELETE_KEY), Some(a));
        c.select(b).expect("select");
        c.clear_selection();
        c.select(b).expect("select");
        assert_eq!(c.handle_key(DELETE_KEY), Some(b));
        assert!(c.scene().is_empty());
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut c = controller();
        let id = c.add_decoration("candy", 0.0, 0.0);
        c.add_decoration("bone", 0.0, 0.0);
        c.select(id).expect("select");

        let mut asked = String::new();
        assert!(!c.clear_all(|prompt| {
            asked = prompt.to_string();
            false
        }));
        assert_eq!(asked, CLEAR_PROMPT);
        assert_eq!(c.scene().len(), 2);

        assert!(c.clear_all(|_| true));
        assert!(c.scene().is_empty());
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn glow_then_light_gives_lit_level() {
        let mut c = controller();
        c.set_setting(SettingChange::Glow(true));
        assert!(c.glow_opacity().abs() < f32::EPSILON);
        assert!(c.toggle_light());
        assert!((c.glow_opacity() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn lit_flicker_samples_stay_in_band() {
        let mut c = controller();
        c.set_setting(SettingChange::Flicker(true));
        assert!(!c.flicker_running());
        c.toggle_light();
        assert!(c.flicker_running());
        for _ in 0..100 {
            c.advance_clock(Duration::from_millis(100));
            let opacity = c.glow_opacity();
            assert!((0.3..=0.8).contains(&opacity), "opacity {opacity}");
        }
    }

    #[test]
    fn turning_off_stops_flicker() {
        let mut c = controller();
        c.set_setting(SettingChange::Flicker(true));
        c.toggle_light();
        c.advance_clock(Duration::from_millis(250));
        assert!(!c.toggle_light());
        assert!(!c.flicker_running());
        assert!(c.glow_opacity().abs() < f32::EPSILON);
        c.advance_clock(Duration::from_secs(5));
        assert!(c.glow_opacity().abs() < f32::EPSILON, "no leaked ticks");
    }

    #[test]
    fn disabling_flicker_leaves_last_opacity() {
        let mut c = controller();
        c.set_setting(SettingChange::Flicker(true));
        c.toggle_light();
        c.advance_clock(Duration::from_millis(100));
        let last = c.glow_opacity();
        c.set_setting(SettingChange::Flicker(false));
        assert!(!c.flicker_running());
        assert!(c.is_lit());
        assert!((c.glow_opacity() - last).abs() < f32::EPSILON);
    }

    #[test]
    fn toggle_twice_from_off_leaves_no_flicker() {
        let mut c = controller();
        c.set_setting(SettingChange::Flicker(true));
        let before = c.is_lit();
        c.toggle_light();
        c.toggle_light();
        assert_eq!(c.is_lit(), before);
        assert!(!c.flicker_running());
    }

    #[test]
    fn invalid_settings_are_ignored() {
        let mut c = controller();
        c.set_setting(SettingChange::Size(-1.0));
        c.set_setting(SettingChange::Size(f32::NAN));
        c.set_setting(SettingChange::Color("plaid".to_string()));
        assert_eq!(c.settings(), &Settings::default());

        c.set_setting(SettingChange::Size(1.5));
        c.set_setting(SettingChange::Color("purple".to_string()));
        assert_eq!(c.settings().size_label(), "150%");
        assert_eq!(c.settings().container_class(), "pumpkin-container pumpkin-purple");
    }

    #[test]
    fn export_offers_fixed_filename() {
        let mut c = controller();
        c.add_decoration("skull", 100.0, 100.0);
        c.add_decoration("nope", 0.0, 0.0);
        let mut sink = MemorySink::default();
        assert!(c.export(&StubRasterizer { fail: false }, &mut sink));
        assert_eq!(sink.downloads.len(), 1);
        assert_eq!(sink.downloads[0].0, EXPORT_FILENAME);
        assert_eq!(sink.downloads[0].1, vec!["💀".len() as u8, "🎃".len() as u8]);
    }

    #[test]
    fn export_failure_produces_no_download() {
        let c = controller();
        let mut sink = MemorySink::default();
        assert!(!c.export(&StubRasterizer { fail: true }, &mut sink));
        assert!(sink.downloads.is_empty());
    }

    #[test]
    fn export_snapshot_uses_body_color() {
        let mut c = controller();
        c.set_setting(SettingChange::Color("white".to_string()));
        let snapshot = c.export_snapshot(1200, 1350);
        assert_eq!(snapshot.body_color, PumpkinColor::White);
        assert_eq!((snapshot.width, snapshot.height), (1200, 1350));
    }
}
