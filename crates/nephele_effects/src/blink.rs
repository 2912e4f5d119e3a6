//! # Blink Timer
//!
//! Two-state sleep/wake scheduler for props that periodically close up,
//! shut down, or look away. Each state holds for a random duration drawn
//! from its own range; the host shows or hides whatever the state gates.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use nephele_procedural::EffectSeed;

use crate::effect::{AmbientEffect, FrameContext};
use crate::error::{EffectError, EffectResult};

const PURPOSE_TIMER: u64 = 0x00B1_1C01;

/// Tuning for a [`BlinkTimer`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkTimerConfig {
    /// Whether the timer opens in the sleeping state.
    pub start_asleep: bool,
    /// Shortest sleep, in seconds.
    pub sleep_min: f32,
    /// Longest sleep, in seconds.
    pub sleep_max: f32,
    /// Shortest waking stretch, in seconds.
    pub wake_min: f32,
    /// Longest waking stretch, in seconds.
    pub wake_max: f32,
}

impl Default for BlinkTimerConfig {
    fn default() -> Self {
        Self {
            start_asleep: false,
            sleep_min: 5.0,
            sleep_max: 10.0,
            wake_min: 3.0,
            wake_max: 8.0,
        }
    }
}

impl BlinkTimerConfig {
    /// Checks the configuration without building anything.
    ///
    /// # Errors
    ///
    /// [`EffectError::IntervalInverted`] when either range has a
    /// non-positive minimum or runs backwards.
    pub fn validate(&self) -> EffectResult<()> {
        for (name, min, max) in [
            ("sleep", self.sleep_min, self.sleep_max),
            ("wake", self.wake_min, self.wake_max),
        ] {
            if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
                return Err(EffectError::IntervalInverted { name, min, max });
            }
        }
        Ok(())
    }
}

/// The sleep/wake scheduler.
#[derive(Debug)]
pub struct BlinkTimer {
    config: BlinkTimerConfig,
    rng: ChaCha8Rng,
    asleep: bool,
    remaining: f32,
    last_heartbeat: f32,
}

impl BlinkTimer {
    /// Builds the timer and draws the first state's duration.
    ///
    /// # Errors
    ///
    /// Configuration violations per [`BlinkTimerConfig::validate`].
    pub fn new(config: BlinkTimerConfig, seed: EffectSeed) -> EffectResult<Self> {
        config.validate()?;
        let mut rng = seed.derive(PURPOSE_TIMER).rng();
        let asleep = config.start_asleep;
        let remaining = draw_duration(&mut rng, &config, asleep);
        tracing::debug!(asleep, remaining, "blink timer armed");
        Ok(Self {
            config,
            rng,
            asleep,
            remaining,
            last_heartbeat: 0.0,
        })
    }

    /// Counts the state down and flips it on expiry.
    pub fn advance(&mut self, dt: f32, elapsed: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
        if self.remaining <= 0.0 {
            self.asleep = !self.asleep;
            self.remaining = draw_duration(&mut self.rng, &self.config, self.asleep);
            if self.asleep {
                tracing::debug!(duration = self.remaining, "falling asleep");
            } else {
                tracing::debug!(duration = self.remaining, "waking up");
            }
        }

        if elapsed - self.last_heartbeat >= 1.0 {
            self.last_heartbeat = elapsed;
            tracing::trace!(
                asleep = self.asleep,
                remaining = self.remaining,
                "blink heartbeat"
            );
        }
    }

    /// Whether the gated props should currently show.
    #[inline]
    #[must_use]
    pub fn is_awake(&self) -> bool {
        !self.asleep
    }

    /// Seconds left in the current state.
    #[inline]
    #[must_use]
    pub fn time_remaining(&self) -> f32 {
        self.remaining
    }
}

impl AmbientEffect for BlinkTimer {
    fn name(&self) -> &'static str {
        "blink_timer"
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.advance(ctx.dt, ctx.elapsed);
    }
}

fn draw_duration(rng: &mut ChaCha8Rng, config: &BlinkTimerConfig, asleep: bool) -> f32 {
    if asleep {
        rng.gen_range(config.sleep_min..=config.sleep_max)
    } else {
        rng.gen_range(config.wake_min..=config.wake_max)
    }
}
