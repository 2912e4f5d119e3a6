//! # Wind Sway
//!
//! Rocks registered props around their rest orientation the way a light
//! breeze would. Three sine oscillators at slightly detuned frequencies
//! drive the enabled axes; a per-target time offset keeps a field of
//! props from swaying in lockstep.
//!
//! This component never touches the renderer. Hosts read the orientation
//! per target after each tick and pose their own scene objects.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use nephele_procedural::EffectSeed;
use nephele_shared::Vec3;

use crate::effect::{AmbientEffect, FrameContext};
use crate::targets::{TargetId, TargetSet};

const PURPOSE_OFFSETS: u64 = 0x0057_AB01;

/// Span of the per-target time offsets, in seconds.
const OFFSET_SPAN: f32 = 1000.0;

/// Tuning for a [`WindSway`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSwayConfig {
    /// Oscillation rate multiplier.
    pub wind_speed: f32,
    /// Peak swing around the X axis, in degrees.
    pub max_angle_x: f32,
    /// Peak swing around the Y axis, in degrees.
    pub max_angle_y: f32,
    /// Peak swing around the Z axis, in degrees.
    pub max_angle_z: f32,
    /// Strength of the slow amplitude wobble.
    pub turbulence: f32,
    /// Whether the X axis swings.
    pub rotate_x: bool,
    /// Whether the Y axis swings.
    pub rotate_y: bool,
    /// Whether the Z axis swings.
    pub rotate_z: bool,
}

impl Default for WindSwayConfig {
    fn default() -> Self {
        Self {
            wind_speed: 2.0,
            max_angle_x: 15.0,
            max_angle_y: 15.0,
            max_angle_z: 15.0,
            turbulence: 1.0,
            rotate_x: false,
            rotate_y: false,
            rotate_z: true,
        }
    }
}

struct SwayTarget {
    /// Rest orientation as euler angles in degrees.
    base: Vec3,
    /// Time offset desynchronizing this target.
    offset: f32,
}

/// The wind sway component.
pub struct WindSway {
    config: WindSwayConfig,
    targets: TargetSet<SwayTarget>,
    rng: ChaCha8Rng,
    elapsed: f32,
}

impl WindSway {
    /// Creates an empty sway field.
    #[must_use]
    pub fn new(config: WindSwayConfig, seed: EffectSeed) -> Self {
        Self {
            config,
            targets: TargetSet::new(),
            rng: seed.derive(PURPOSE_OFFSETS).rng(),
            elapsed: 0.0,
        }
    }

    /// Registers a prop at its rest orientation (euler degrees).
    pub fn register(&mut self, base_orientation: Vec3) -> TargetId {
        let offset = self.rng.gen_range(0.0..OFFSET_SPAN);
        self.targets.register(SwayTarget {
            base: base_orientation,
            offset,
        })
    }

    /// Forgets a prop. Returns whether the id was live.
    pub fn remove(&mut self, id: TargetId) -> bool {
        self.targets.remove(id).is_some()
    }

    /// Advances the shared clock.
    pub fn advance(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
    }

    /// Current orientation of a target as euler degrees, rest plus swing.
    ///
    /// `None` for stale or foreign ids.
    #[must_use]
    pub fn orientation(&self, id: TargetId) -> Option<Vec3> {
        let target = self.targets.get(id)?;
        let config = &self.config;
        let time = (self.elapsed + target.offset) * config.wind_speed;
        let turbulence = 1.0 + (time * 1.3).sin() * 0.5 * config.turbulence;

        let swing = Vec3::new(
            if config.rotate_x {
                time.sin() * config.max_angle_x * turbulence
            } else {
                0.0
            },
            if config.rotate_y {
                (time * 0.9).sin() * config.max_angle_y * turbulence
            } else {
                0.0
            },
            if config.rotate_z {
                (time * 1.1).sin() * config.max_angle_z * turbulence
            } else {
                0.0
            },
        );
        Some(target.base + swing)
    }

    /// Number of registered props.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl AmbientEffect for WindSway {
    fn name(&self) -> &'static str {
        "wind_sway"
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.advance(ctx.elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_axes_never_leave_base() {
        // Default config swings only around Z.
        let mut sway = WindSway::new(WindSwayConfig::default(), EffectSeed::new(3));
        let base = Vec3::new(10.0, 20.0, 30.0);
        let id = sway.register(base);

        for step in 1..=100 {
            sway.advance(step as f32 * 0.1);
            let orientation = sway.orientation(id).unwrap();
            assert_eq!(orientation.x, base.x, "x must stay put");
            assert_eq!(orientation.y, base.y, "y must stay put");
        }
    }

    #[test]
    fn test_swing_stays_within_turbulent_peak() {
        let config = WindSwayConfig {
            rotate_x: true,
            rotate_y: true,
            rotate_z: true,
            ..WindSwayConfig::default()
        };
        let mut sway = WindSway::new(config, EffectSeed::new(5));
        let id = sway.register(Vec3::ZERO);

        // Amplitude can reach max_angle * (1 + 0.5 * turbulence).
        let peak = 15.0 * 1.5 + 1.0e-3;
        for step in 1..=500 {
            sway.advance(step as f32 * 0.05);
            let orientation = sway.orientation(id).unwrap();
            for angle in orientation.to_array() {
                assert!(angle.abs() <= peak, "swing escaped the peak: {angle}");
            }
        }
    }

    #[test]
    fn test_targets_are_desynchronized() {
        let mut sway = WindSway::new(WindSwayConfig::default(), EffectSeed::new(8));
        let a = sway.register(Vec3::ZERO);
        let b = sway.register(Vec3::ZERO);

        sway.advance(1.0);
        let za = sway.orientation(a).unwrap().z;
        let zb = sway.orientation(b).unwrap().z;
        assert_ne!(za, zb, "targets with distinct offsets must not move in lockstep");
    }

    #[test]
    fn test_removed_targets_stop_answering() {
        let mut sway = WindSway::new(WindSwayConfig::default(), EffectSeed::new(13));
        let id = sway.register(Vec3::ZERO);

        assert!(sway.remove(id));
        assert!(!sway.remove(id), "second removal must miss");
        assert!(sway.orientation(id).is_none());
        assert_eq!(sway.target_count(), 0);

        let replacement = sway.register(Vec3::UP);
        assert!(sway.orientation(id).is_none(), "stale id must stay dead");
        assert!(sway.orientation(replacement).is_some());
    }

    #[test]
    fn test_same_seed_replays_the_same_motion() {
        let build = || {
            let mut sway = WindSway::new(WindSwayConfig::default(), EffectSeed::new(21));
            let ids = [
                sway.register(Vec3::ZERO),
                sway.register(Vec3::new(0.0, 90.0, 0.0)),
            ];
            (sway, ids)
        };
        let (mut a, ids_a) = build();
        let (mut b, ids_b) = build();

        for step in 1..=50 {
            let elapsed = step as f32 * 0.016;
            a.advance(elapsed);
            b.advance(elapsed);
            for (ia, ib) in ids_a.iter().zip(&ids_b) {
                assert_eq!(a.orientation(*ia), b.orientation(*ib));
            }
        }
    }
}
