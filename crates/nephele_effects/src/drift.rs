//! # Bubble Drift
//!
//! Wobbles registered props around their rest position with three
//! independent coherent-noise channels, one per axis. Noise keeps the
//! motion smooth and aimless where a sine would look mechanical.
//!
//! Like [`WindSway`](crate::sway::WindSway), this component drives no
//! renderer resources; hosts query positions after each tick.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use nephele_procedural::{EffectSeed, GradientNoise};
use nephele_shared::Vec3;

use crate::effect::{AmbientEffect, FrameContext};
use crate::targets::{TargetId, TargetSet};

const PURPOSE_SALTS: u64 = 0x00B0_BB01;
const PURPOSE_NOISE: u64 = 0x00B0_BB02;

/// Second noise input per axis, far enough apart to decorrelate them.
const AXIS_CHANNELS: [f32; 3] = [0.0, 100.0, 200.0];

/// Span of the per-target noise salts.
const SALT_SPAN: f32 = 1000.0;

/// Tuning for a [`BubbleDrift`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleDriftConfig {
    /// Peak displacement per axis, in world units.
    pub intensity: f32,
    /// Rate the noise field is traversed at.
    pub speed: f32,
}

impl Default for BubbleDriftConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            speed: 1.0,
        }
    }
}

struct DriftTarget {
    /// Rest position in world space.
    base: Vec3,
    /// Noise-input salt decorrelating this target from its neighbors.
    salt: f32,
}

/// The positional drift component.
pub struct BubbleDrift {
    config: BubbleDriftConfig,
    targets: TargetSet<DriftTarget>,
    noise: GradientNoise,
    rng: ChaCha8Rng,
    time: f32,
}

impl BubbleDrift {
    /// Creates an empty drift field.
    #[must_use]
    pub fn new(config: BubbleDriftConfig, seed: EffectSeed) -> Self {
        Self {
            config,
            targets: TargetSet::new(),
            noise: GradientNoise::new(seed.derive(PURPOSE_NOISE)),
            rng: seed.derive(PURPOSE_SALTS).rng(),
            time: 0.0,
        }
    }

    /// Registers a prop at its rest position.
    pub fn register(&mut self, base_position: Vec3) -> TargetId {
        let salt = self.rng.gen_range(0.0..SALT_SPAN);
        self.targets.register(DriftTarget {
            base: base_position,
            salt,
        })
    }

    /// Forgets a prop. Returns whether the id was live.
    pub fn remove(&mut self, id: TargetId) -> bool {
        self.targets.remove(id).is_some()
    }

    /// Accumulates scaled time; the drift pattern never repeats.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt * self.config.speed;
    }

    /// Current position of a target, rest plus wobble.
    ///
    /// `None` for stale or foreign ids.
    #[must_use]
    pub fn position(&self, id: TargetId) -> Option<Vec3> {
        let target = self.targets.get(id)?;
        let x = self.time + target.salt;
        let wobble = Vec3::new(
            self.noise.sample(x, AXIS_CHANNELS[0]),
            self.noise.sample(x, AXIS_CHANNELS[1]),
            self.noise.sample(x, AXIS_CHANNELS[2]),
        ) * self.config.intensity;
        Some(target.base + wobble)
    }

    /// Number of registered props.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl AmbientEffect for BubbleDrift {
    fn name(&self) -> &'static str {
        "bubble_drift"
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.advance(ctx.dt);
    }
}
