//! # Dust Field
//!
//! A fixed pool of drifting motes that sells the depth of a locked-off
//! shot. Each mote sways on three axes, shimmers, flickers, and breathes
//! through a fade cycle; a configurable response curve weights size and
//! opacity by simulated distance so near motes read sharp and far motes
//! dissolve.
//!
//! ## Design Principles
//!
//! - The pool never grows or shrinks. Motes leaving the tracked envelope
//!   are recycled, not destroyed.
//! - One buffer submission per tick, always the full pool.
//! - Steady state allocates nothing; the sprite scratch buffer is reused.
//! - Every random draw comes from the component's own seeded stream.

use std::f32::consts::TAU;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use nephele_procedural::{EffectSeed, GradientNoise};
use nephele_shared::{clamp01, lerp, smoothstep01, ResponseCurve, Rgba, Vec3};

use crate::effect::{AmbientEffect, FrameContext};
use crate::error::{EffectError, EffectResult};
use crate::observer::{SceneObserver, ViewportPoint};
use crate::renderer::{ParticleBufferId, PointSprite, SceneRenderer};

// Sub-seed purposes, one per random stream this component owns.
const PURPOSE_POOL: u64 = 0x00D0_5701;
const PURPOSE_FLICKER: u64 = 0x00D0_5702;

/// Tuning for a [`DustField`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DustFieldConfig {
    /// Number of pooled motes.
    pub capacity: usize,
    /// Sprite size where the focus response bottoms out.
    pub min_size: f32,
    /// Sprite size where the focus response peaks.
    pub max_size: f32,
    /// Emitter shape extents forwarded to the renderer at allocation.
    pub distribution_extent: Vec3,
    /// World-space offset applied to every sampled rest position.
    pub volume_offset: Vec3,
    /// Scale applied to the emitter shape hint.
    pub volume_scale: f32,
    /// Depth band tracked past the near plane, in world units.
    pub depth_range: f32,
    /// Constant upward drift in world units per second.
    pub base_speed: f32,
    /// Amplitude of the three-axis sway, in world units.
    pub sway_strength: f32,
    /// Base frequency of the sway oscillators.
    pub sway_frequency: f32,
    /// Mote tint; the alpha channel is the base opacity.
    pub base_color: Rgba,
    /// Frequency of the size shimmer.
    pub shimmer_speed: f32,
    /// Fractional size swing of the shimmer.
    pub shimmer_strength: f32,
    /// Depth-of-field response, evaluated at normalized distance.
    pub focus_curve: ResponseCurve,
    /// Base fade cycle rate in levels per second.
    pub fade_speed: f32,
    /// Fractional per-tick jitter on the fade rate.
    pub fade_variation: f32,
    /// Frequency of the opacity flicker noise.
    pub flicker_speed: f32,
    /// Fractional opacity swing of the flicker.
    pub flicker_intensity: f32,
    /// Computed alphas below this cut to exactly zero.
    pub visibility_threshold: f32,
}

impl Default for DustFieldConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            min_size: 0.01,
            max_size: 0.05,
            distribution_extent: Vec3::splat(10.0),
            volume_offset: Vec3::ZERO,
            volume_scale: 1.0,
            depth_range: 5.0,
            base_speed: 0.2,
            sway_strength: 0.3,
            sway_frequency: 0.5,
            base_color: Rgba::new(1.0, 1.0, 1.0, 0.5),
            shimmer_speed: 1.0,
            shimmer_strength: 0.2,
            focus_curve: ResponseCurve::default(),
            fade_speed: 0.5,
            fade_variation: 0.2,
            flicker_speed: 3.0,
            flicker_intensity: 0.3,
            visibility_threshold: 0.2,
        }
    }
}

impl DustFieldConfig {
    /// Checks the configuration without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: capacity at least 1, size
    /// range ordered and non-negative, depth range finite and positive,
    /// visibility threshold within `[0, 1]`, focus curve well formed.
    pub fn validate(&self) -> EffectResult<()> {
        if self.capacity == 0 {
            return Err(EffectError::ZeroCapacity);
        }
        if self.min_size < 0.0 || self.max_size < self.min_size {
            return Err(EffectError::SizeRangeInverted {
                min_size: self.min_size,
                max_size: self.max_size,
            });
        }
        if !self.depth_range.is_finite() || self.depth_range <= 0.0 {
            return Err(EffectError::NonPositiveParameter {
                field: "depth_range",
                got: self.depth_range,
            });
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(EffectError::VisibilityThresholdOutOfRange {
                got: self.visibility_threshold,
            });
        }
        self.focus_curve.validate()?;
        Ok(())
    }
}

/// The particle field component.
///
/// State is kept as parallel arrays indexed by pool slot; the sprite
/// buffer in the same order is rebuilt and submitted whole every tick.
#[derive(Debug)]
pub struct DustField {
    config: DustFieldConfig,
    buffer: ParticleBufferId,
    rest_positions: Vec<Vec3>,
    phases: Vec<f32>,
    fade_levels: Vec<f32>,
    fade_directions: Vec<f32>,
    sprites: Vec<PointSprite>,
    rng: ChaCha8Rng,
    flicker: GradientNoise,
    released: bool,
}

impl DustField {
    /// Builds the field, fills the pool, and submits the initial buffer.
    ///
    /// Rest positions are sampled uniformly inside the frustum between the
    /// observer's near plane and `depth_range`, then shifted by
    /// `volume_offset`. Each slot gets a random phase, fade level, and
    /// fade direction.
    ///
    /// # Errors
    ///
    /// Configuration violations per [`DustFieldConfig::validate`], plus
    /// [`EffectError::DepthRangeBehindNearPlane`] when the tracked band
    /// ends before the observer's near plane.
    pub fn new(
        config: DustFieldConfig,
        seed: EffectSeed,
        renderer: &mut dyn SceneRenderer,
        observer: &dyn SceneObserver,
    ) -> EffectResult<Self> {
        config.validate()?;
        let near = observer.near_plane();
        if config.depth_range <= near {
            return Err(EffectError::DepthRangeBehindNearPlane {
                depth_range: config.depth_range,
                near_plane: near,
            });
        }

        let mut rng = seed.derive(PURPOSE_POOL).rng();
        let flicker = GradientNoise::new(seed.derive(PURPOSE_FLICKER));

        let capacity = config.capacity;
        let mut rest_positions = Vec::with_capacity(capacity);
        let mut phases = Vec::with_capacity(capacity);
        let mut fade_levels = Vec::with_capacity(capacity);
        let mut fade_directions = Vec::with_capacity(capacity);
        let mut sprites = Vec::with_capacity(capacity);

        for _ in 0..capacity {
            let rest = sample_rest_position(&mut rng, observer, &config);
            rest_positions.push(rest);
            phases.push(rng.gen_range(0.0..TAU));
            fade_levels.push(rng.gen_range(0.0..=1.0));
            fade_directions.push(if rng.gen_bool(0.5) { 1.0 } else { -1.0 });
            sprites.push(PointSprite {
                position: rest,
                size: rng.gen_range(config.min_size..=config.max_size),
                color: config.base_color,
            });
        }

        let extents = config.distribution_extent * config.volume_scale;
        let buffer = renderer.allocate_particles(capacity, extents);
        renderer.submit_particles(buffer, &sprites);
        tracing::debug!(capacity, "dust field built");

        Ok(Self {
            config,
            buffer,
            rest_positions,
            phases,
            fade_levels,
            fade_directions,
            sprites,
            rng,
            flicker,
            released: false,
        })
    }

    /// Advances every mote by one frame and submits the whole pool.
    pub fn advance(
        &mut self,
        renderer: &mut dyn SceneRenderer,
        observer: &dyn SceneObserver,
        dt: f32,
        elapsed: f32,
    ) {
        if self.released {
            return;
        }
        let config = &self.config;
        let eye = observer.position();

        for i in 0..self.sprites.len() {
            // Fade breathes between 0 and 1, bouncing at the bounds. The
            // rate jitter is a fresh draw every tick.
            let jitter = self.rng.gen_range(-1.0_f32..=1.0);
            let mut fade = self.fade_levels[i]
                + self.fade_directions[i]
                    * config.fade_speed
                    * dt
                    * (1.0 + jitter * config.fade_variation);
            if fade >= 1.0 {
                fade = 1.0;
                self.fade_directions[i] = -1.0;
            } else if fade <= 0.0 {
                fade = 0.0;
                self.fade_directions[i] = 1.0;
            }
            self.fade_levels[i] = fade;

            // Sway is applied fresh from the rest position every tick, so
            // neither it nor the upward drift accumulates.
            let t = elapsed + self.phases[i];
            let s = t * config.sway_frequency;
            let sway =
                Vec3::new(s.sin(), (s * 0.5).cos(), (s * 0.7).sin()) * config.sway_strength;
            let mut position =
                self.rest_positions[i] + sway + Vec3::UP * (config.base_speed * dt);

            // Out of the tracked envelope: recycle. The mote snaps to a
            // fresh rest position with nothing else added this tick.
            if observer.project(position).is_outside(config.depth_range) {
                let rest = sample_rest_position(&mut self.rng, observer, config);
                self.rest_positions[i] = rest;
                position = rest;
            }

            let normalized_depth = clamp01(position.distance(eye) / config.depth_range);
            let focus = config.focus_curve.evaluate(normalized_depth);

            let size = lerp(config.min_size, config.max_size, focus)
                * (1.0 + (t * config.shimmer_speed).sin() * config.shimmer_strength);

            let flicker = self
                .flicker
                .sample01(t * config.flicker_speed, self.phases[i]);
            let alpha = config.base_color.a
                * focus
                * smoothstep01(fade)
                * (1.0 + flicker * config.flicker_intensity);
            let alpha = if alpha < config.visibility_threshold {
                0.0
            } else {
                alpha.min(1.0)
            };

            self.sprites[i] = PointSprite {
                position,
                size,
                color: config.base_color.with_alpha(alpha),
            };
        }

        renderer.submit_particles(self.buffer, &self.sprites);
    }

    /// Number of pooled motes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.sprites.len()
    }

    /// Current fade level per pool slot.
    #[must_use]
    pub fn fade_levels(&self) -> &[f32] {
        &self.fade_levels
    }

    /// Current rest position per pool slot.
    #[must_use]
    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DustFieldConfig {
        &self.config
    }
}

impl AmbientEffect for DustField {
    fn name(&self) -> &'static str {
        "dust_field"
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.advance(ctx.renderer, ctx.observer, ctx.dt, ctx.elapsed);
    }

    fn teardown(&mut self, renderer: &mut dyn SceneRenderer) {
        if !self.released {
            self.released = true;
            renderer.release_particles(self.buffer);
            tracing::debug!("dust field released");
        }
    }
}

/// Uniform sample inside the visible frustum slab, shifted by the volume
/// offset.
fn sample_rest_position(
    rng: &mut ChaCha8Rng,
    observer: &dyn SceneObserver,
    config: &DustFieldConfig,
) -> Vec3 {
    let point = ViewportPoint::new(
        rng.gen_range(0.0..=1.0),
        rng.gen_range(0.0..=1.0),
        rng.gen_range(observer.near_plane()..=config.depth_range),
    );
    observer.unproject(point) + config.volume_offset
}
