//! Lighting state machine: lit/unlit, glow and flicker.

use std::time::Duration;

use crate::flicker::{FlickerParams, FlickerScheduler, GlowLevel};
use crate::Settings;

/// Lit flag, glow level and the flicker task.
///
/// After every public method returns, the flicker task is running iff
/// `is_lit && settings.flicker_enabled`.
pub struct LightState {
    is_lit: bool,
    glow: GlowLevel,
    lit_opacity: f32,
    params: FlickerParams,
    scheduler: Box<dyn FlickerScheduler>,
}

impl LightState {
    /// Create an unlit state with a dark glow overlay.
    #[must_use]
    pub fn new(scheduler: Box<dyn FlickerScheduler>, lit_opacity: f32, params: FlickerParams) -> Self {
        Self {
            is_lit: false,
            glow: GlowLevel::new(0.0),
            lit_opacity,
            params,
            scheduler,
        }
    }

    /// Flip the lit flag. Returns the new value.
    pub fn toggle(&mut self, settings: &Settings) -> bool {
        self.is_lit = !self.is_lit;
        if self.is_lit {
            self.glow.set(self.lit_opacity);
            if settings.flicker_enabled {
                self.start_flicker();
            }
        } else {
            self.stop_flicker();
            self.glow.set(0.0);
        }
        tracing::debug!(lit = self.is_lit, "light toggled");
        self.is_lit
    }

    /// Recompute the glow level from the lit flag and the glow checkbox.
    pub fn update_glow(&mut self, settings: &Settings) {
        let opacity = if settings.glow_enabled && self.is_lit {
            self.lit_opacity
        } else {
            0.0
        };
        self.glow.set(opacity);
    }

    /// Start or stop flicker from the lit flag and the flicker checkbox.
    pub fn update_flicker(&mut self, settings: &Settings) {
        if settings.flicker_enabled && self.is_lit {
            self.start_flicker();
        } else {
            self.stop_flicker();
        }
    }

    fn start_flicker(&mut self) {
        self.scheduler.stop();
        self.scheduler.start(self.glow.clone(), self.params);
        tracing::debug!(period = ?self.params.period, "flicker started");
    }

    fn stop_flicker(&mut self) {
        if self.scheduler.is_running() {
            tracing::debug!("flicker stopped");
        }
        self.scheduler.stop();
    }

    /// Forward elapsed time to a clockless scheduler.
    pub fn poll(&mut self, elapsed: Duration) {
        self.scheduler.poll(elapsed);
    }

    /// Whether the pumpkin is lit.
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.is_lit
    }

    /// Current glow-overlay opacity.
    #[must_use]
    pub fn glow_opacity(&self) -> f32 {
        self.glow.get()
    }

    /// Handle to the glow level, for views that poll it.
    #[must_use]
    pub fn glow(&self) -> GlowLevel {
        self.glow.clone()
    }

    /// Whether the flicker task is running.
    #[must_use]
    pub fn flicker_running(&self) -> bool {
        self.scheduler.is_running()
    }
}

impl std::fmt::Debug for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightState")
            .field("is_lit", &self.is_lit)
            .field("glow", &self.glow.get())
            .field("flicker_running", &self.scheduler.is_running())
            .finish_non_exhaustive()
    }
}
