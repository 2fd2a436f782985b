//! Flicker scheduling: a repeating task that writes random glow levels.
//!
//! The lighting state owns one [`FlickerScheduler`]. Which implementation is
//! plugged in decides where the ticks come from:
//!
//! - [`ManualFlicker`] ticks only when polled, with a seedable RNG. Headless
//!   hosts and tests use it.
//! - [`TokioFlicker`] (feature `tokio`) runs a `tokio::time::interval` task.
//! - `BrowserFlicker` (feature `wasm`) uses `window.setInterval`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::OpacityBand;

/// Shared glow-overlay opacity.
///
/// Cloning shares the same cell, so a scheduler task can write while the
/// view reads.
#[derive(Debug, Clone, Default)]
pub struct GlowLevel(Arc<AtomicU32>);

impl GlowLevel {
    /// Create a level holding `opacity`.
    #[must_use]
    pub fn new(opacity: f32) -> Self {
        Self(Arc::new(AtomicU32::new(opacity.to_bits())))
    }

    /// Current opacity.
    #[must_use]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Overwrite the opacity.
    pub fn set(&self, opacity: f32) {
        self.0.store(opacity.to_bits(), Ordering::Relaxed);
    }
}

/// Timing and range of the flicker effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerParams {
    /// Interval between samples.
    pub period: Duration,
    /// Sampled opacity range.
    pub band: OpacityBand,
}

impl Default for FlickerParams {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(100),
            band: OpacityBand::default(),
        }
    }
}

/// Draw one opacity uniformly from `band`.
pub fn sample_opacity<R: Rng + ?Sized>(rng: &mut R, band: OpacityBand) -> f32 {
    if band.max > band.min {
        rng.gen_range(band.range())
    } else {
        band.min
    }
}

/// A cancellable repeating task that drives the glow level.
pub trait FlickerScheduler {
    /// Start writing samples into `glow`. Any running task is stopped first.
    fn start(&mut self, glow: GlowLevel, params: FlickerParams);

    /// Stop the task. Safe to call when nothing is running. The glow keeps its last value.
    fn stop(&mut self);

    /// Whether a task is running.
    fn is_running(&self) -> bool;

    /// Advance a scheduler that has no clock of its own. Timer-backed schedulers ignore this.
    fn poll(&mut self, _elapsed: Duration) {}
}

/// Deterministic scheduler that ticks only when polled.
pub struct ManualFlicker {
    rng: StdRng,
    active: Option<(GlowLevel, FlickerParams)>,
    carry: Duration,
    ticks: u64,
}

impl ManualFlicker {
    /// Create a scheduler. `None` seeds the RNG from entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            active: None,
            carry: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Fire one tick immediately. Returns the sample, or `None` when stopped.
    pub fn tick(&mut self) -> Option<f32> {
        let (glow, params) = self.active.as_ref()?;
        let opacity = sample_opacity(&mut self.rng, params.band);
        glow.set(opacity);
        self.ticks += 1;
        tracing::trace!(opacity, "flicker tick");
        Some(opacity)
    }

    /// Ticks fired since creation.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for ManualFlicker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for ManualFlicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualFlicker")
            .field("running", &self.active.is_some())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl FlickerScheduler for ManualFlicker {
    fn start(&mut self, glow: GlowLevel, params: FlickerParams) {
        self.stop();
        self.active = Some((glow, params));
    }

    fn stop(&mut self) {
        self.active = None;
        self.carry = Duration::ZERO;
    }

    fn is_running(&self) -> bool {
        self.active.is_some()
    }

    fn poll(&mut self, elapsed: Duration) {
        let Some(period) = self.active.as_ref().map(|(_, params)| params.period) else {
            return;
        };
        if period.is_zero() {
            self.tick();
            return;
        }
        // Only the latest sample is observable, so elapsed periods collapse into one draw.
        let carry = self.carry.saturating_add(elapsed).as_nanos();
        let periods = carry / period.as_nanos();
        self.carry = nanos_to_duration(carry % period.as_nanos());
        if periods > 0 && self.tick().is_some() {
            let skipped = u64::try_from(periods - 1).unwrap_or(u64::MAX);
            self.ticks = self.ticks.saturating_add(skipped);
        }
    }
}

/// A nanosecond count below one period back into a [`Duration`].
fn nanos_to_duration(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // Always below one second.
    #[allow(clippy::cast_possible_truncation)]
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}

#[cfg(feature = "tokio")]
pub use self::timer::TokioFlicker;

#[cfg(feature = "tokio")]
mod timer {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::runtime::Handle;
    use tokio::task::JoinHandle;

    use super::{sample_opacity, FlickerParams, FlickerScheduler, GlowLevel};

    /// Flicker driven by a `tokio::time::interval` task.
    ///
    /// The task is aborted on [`FlickerScheduler::stop`] and on drop.
    #[derive(Debug)]
    pub struct TokioFlicker {
        runtime: Handle,
        task: Option<JoinHandle<()>>,
    }

    impl TokioFlicker {
        /// Spawn ticks onto the given runtime.
        #[must_use]
        pub fn new(runtime: Handle) -> Self {
            Self {
                runtime,
                task: None,
            }
        }

        /// Use the runtime of the calling context, if there is one.
        #[must_use]
        pub fn current() -> Option<Self> {
            Handle::try_current().ok().map(Self::new)
        }
    }

    impl FlickerScheduler for TokioFlicker {
        fn start(&mut self, glow: GlowLevel, params: FlickerParams) {
            self.stop();
            let period = params.period.max(Duration::from_millis(1));
            let band = params.band;
            self.task = Some(self.runtime.spawn(async move {
                let mut rng = StdRng::from_entropy();
                let start = tokio::time::Instant::now() + period;
                let mut interval = tokio::time::interval_at(start, period);
                loop {
                    interval.tick().await;
                    let opacity = sample_opacity(&mut rng, band);
                    glow.set(opacity);
                    tracing::trace!(opacity, "flicker tick");
                }
            }));
        }

        fn stop(&mut self) {
            if let Some(task) = self.task.take() {
                task.abort();
            }
        }

        fn is_running(&self) -> bool {
            self.task.as_ref().is_some_and(|task| !task.is_finished())
        }
    }

    impl Drop for TokioFlicker {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FlickerParams {
        FlickerParams::default()
    }

    #[test]
    fn glow_level_is_shared_between_clones() {
        let glow = GlowLevel::new(0.25);
        let view = glow.clone();
        glow.set(0.75);
        assert!((view.get() - 0.75).abs() < f32::EPSILON);
        assert!(GlowLevel::default().get().abs() < f32::EPSILON);
    }

    #[test]
    fn manual_flicker_ticks_once_per_period() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = ManualFlicker::new(Some(7));
        flicker.start(glow.clone(), params());

        flicker.poll(Duration::from_millis(99));
        assert_eq!(flicker.ticks(), 0);
        assert!(glow.get().abs() < f32::EPSILON);

        flicker.poll(Duration::from_millis(1));
        assert_eq!(flicker.ticks(), 1);

        flicker.poll(Duration::from_millis(350));
        assert_eq!(flicker.ticks(), 4);
    }

    #[test]
    fn manual_flicker_samples_stay_in_band() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = ManualFlicker::new(Some(42));
        flicker.start(glow.clone(), params());
        for _ in 0..500 {
            let sample = flicker.tick().expect("running");
            assert!((0.3..=0.8).contains(&sample), "sample {sample} out of band");
            assert!((glow.get() - sample).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn stop_is_idempotent_and_keeps_last_value() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = ManualFlicker::new(Some(1));
        flicker.stop();
        assert!(!flicker.is_running());

        flicker.start(glow.clone(), params());
        let last = flicker.tick().expect("running");
        flicker.stop();
        flicker.stop();
        assert!(!flicker.is_running());
        assert!(flicker.tick().is_none());
        flicker.poll(Duration::from_secs(1));
        assert!((glow.get() - last).abs() < f32::EPSILON);
    }

    #[test]
    fn long_wait_fast_forwards_with_one_sample() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = ManualFlicker::new(Some(5));
        flicker.start(glow.clone(), params());

        let started = std::time::Instant::now();
        flicker.poll(Duration::from_millis(3_600_000_000));
        flicker.poll(Duration::MAX);
        assert!(started.elapsed() < Duration::from_secs(1));

        assert!(flicker.ticks() >= 36_000_000);
        assert!((0.3..=0.8).contains(&glow.get()));
    }

    #[test]
    fn partial_periods_carry_over() {
        let mut flicker = ManualFlicker::new(Some(6));
        flicker.start(GlowLevel::default(), params());
        flicker.poll(Duration::from_millis(250));
        assert_eq!(flicker.ticks(), 2);
        flicker.poll(Duration::from_millis(50));
        assert_eq!(flicker.ticks(), 3);
        flicker.poll(Duration::from_millis(99));
        assert_eq!(flicker.ticks(), 3);
    }

    #[test]
    fn restart_resets_partial_period() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = ManualFlicker::new(Some(3));
        flicker.start(glow.clone(), params());
        flicker.poll(Duration::from_millis(90));
        flicker.start(glow, params());
        flicker.poll(Duration::from_millis(90));
        assert_eq!(flicker.ticks(), 0);
    }

    #[test]
    fn same_seed_same_samples() {
        let mut a = ManualFlicker::new(Some(9));
        let mut b = ManualFlicker::new(Some(9));
        a.start(GlowLevel::default(), params());
        b.start(GlowLevel::default(), params());
        for _ in 0..10 {
            assert_eq!(a.tick(), b.tick());
        }
    }

    #[test]
    fn degenerate_band_returns_min() {
        let mut rng = StdRng::seed_from_u64(0);
        let band = OpacityBand { min: 0.5, max: 0.5 };
        assert!((sample_opacity(&mut rng, band) - 0.5).abs() < f32::EPSILON);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn tokio_flicker_writes_band_samples_until_stopped() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = TokioFlicker::new(tokio::runtime::Handle::current());
        flicker.start(glow.clone(), params());
        assert!(flicker.is_running());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(glow.get().abs() < f32::EPSILON, "no tick before one period");

        tokio::time::sleep(Duration::from_millis(300)).await;
        let sample = glow.get();
        assert!((0.3..=0.8).contains(&sample), "sample {sample} out of band");

        flicker.stop();
        flicker.stop();
        assert!(!flicker.is_running());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!((glow.get() - sample).abs() < f32::EPSILON);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn tokio_flicker_restart_replaces_task() {
        let glow = GlowLevel::new(0.0);
        let mut flicker = TokioFlicker::current().expect("inside runtime");
        flicker.start(glow.clone(), params());
        flicker.start(glow.clone(), params());
        assert!(flicker.is_running());
        drop(flicker);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(glow.get().abs() < f32::EPSILON, "dropped scheduler must not tick");
    }
}
