//! Controller configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scene::Zone;

/// How the Delete key is bound to the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteKeyBinding {
    /// Armed by each selection and consumed by the next key press, whatever the key.
    #[default]
    SingleShot,
    /// Delete always removes the current selection.
    Persistent,
}

/// Inclusive opacity range sampled by the flicker effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityBand {
    /// Lowest sampled opacity.
    pub min: f32,
    /// Highest sampled opacity.
    pub max: f32,
}

impl OpacityBand {
    /// The band as a range.
    #[must_use]
    pub fn range(&self) -> RangeInclusive<f32> {
        self.min..=self.max
    }

    /// Whether `opacity` lies inside the band.
    #[must_use]
    pub fn contains(&self, opacity: f32) -> bool {
        self.range().contains(&opacity)
    }
}

impl Default for OpacityBand {
    fn default() -> Self {
        Self { min: 0.3, max: 0.8 }
    }
}

/// Configuration for a [`DecoratorController`](crate::DecoratorController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    /// Initial zone bounding box in client coordinates.
    pub zone: Zone,
    /// Assumed decoration size in pixels, used for drag clamping.
    pub footprint: f32,
    /// Glow opacity while lit.
    pub lit_opacity: f32,
    /// Interval between flicker samples.
    #[serde(with = "duration_ms")]
    pub flicker_period: Duration,
    /// Opacity range sampled while flickering.
    pub flicker_band: OpacityBand,
    /// Delete key behavior.
    pub delete_binding: DeleteKeyBinding,
    /// Seed for deterministic flicker sampling. `None` seeds from entropy.
    pub flicker_seed: Option<u64>,
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            zone: Zone::new(400.0, 450.0),
            footprint: 40.0,
            lit_opacity: 0.6,
            flicker_period: Duration::from_millis(100),
            flicker_band: OpacityBand::default(),
            delete_binding: DeleteKeyBinding::SingleShot,
            flicker_seed: None,
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
