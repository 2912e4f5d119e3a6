//! # God Ray Beam
//!
//! One textured quad stretched from its origin along a rotated direction,
//! pulsing slowly in length and opacity. Cheap enough to scatter several
//! across a shot; each instance owns a single mesh.

use serde::{Deserialize, Serialize};

use nephele_shared::{clamp01, deg_to_rad, lerp, Rgba, Vec2, Vec3};

use crate::effect::{AmbientEffect, FrameContext};
use crate::error::{EffectError, EffectResult};
use crate::renderer::{MeshBuffers, MeshId, SceneRenderer};

/// Tuning for a [`GodRayBeam`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GodRayBeamConfig {
    /// Unscaled beam length in world units.
    pub beam_length: f32,
    /// Beam tint; the alpha channel is the base opacity.
    pub beam_color: Rgba,
    /// Uniform scale baked into every vertex.
    pub global_scale: f32,
    /// Beam direction as a counterclockwise angle from straight up.
    pub rotation_deg: f32,
    /// Whether length and opacity breathe with the clock.
    pub animate: bool,
    /// Opacity at the bottom of the breath, normalized at build.
    pub opacity_min: f32,
    /// Opacity at the top of the breath, normalized at build.
    pub opacity_max: f32,
    /// Fractional length swing of the pulse.
    pub length_pulse_strength: f32,
}

impl Default for GodRayBeamConfig {
    fn default() -> Self {
        Self {
            beam_length: 8.0,
            beam_color: Rgba::new(1.0, 0.9, 0.7, 0.6),
            global_scale: 3.0,
            rotation_deg: 0.0,
            animate: true,
            opacity_min: 0.2,
            opacity_max: 0.8,
            length_pulse_strength: 0.5,
        }
    }
}

impl GodRayBeamConfig {
    /// Checks the configuration without building anything.
    ///
    /// # Errors
    ///
    /// [`EffectError::NonPositiveParameter`] when the beam length or the
    /// global scale is not finite and positive.
    pub fn validate(&self) -> EffectResult<()> {
        for (field, got) in [
            ("beam_length", self.beam_length),
            ("global_scale", self.global_scale),
        ] {
            if !got.is_finite() || got <= 0.0 {
                return Err(EffectError::NonPositiveParameter { field, got });
            }
        }
        Ok(())
    }
}

/// The beam component.
///
/// The quad has a fixed unit half-width before scaling; everything that
/// changes frame to frame is the length and the vertex alpha.
#[derive(Debug)]
pub struct GodRayBeam {
    config: GodRayBeamConfig,
    mesh: MeshId,
    buffers: MeshBuffers,
    released: bool,
}

impl GodRayBeam {
    /// Builds the beam and submits its resting pose.
    ///
    /// Opacity bounds are clamped into `[0, 1]` and the minimum is pulled
    /// down to the maximum when the pair arrives inverted.
    ///
    /// # Errors
    ///
    /// Configuration violations per [`GodRayBeamConfig::validate`].
    pub fn new(config: GodRayBeamConfig, renderer: &mut dyn SceneRenderer) -> EffectResult<Self> {
        config.validate()?;
        let mut config = config;
        config.opacity_max = clamp01(config.opacity_max);
        config.opacity_min = clamp01(config.opacity_min).min(config.opacity_max);

        let mesh = renderer.allocate_mesh();
        let mut beam = Self {
            config,
            mesh,
            buffers: MeshBuffers::default(),
            released: false,
        };
        beam.regenerate(beam.config.beam_length, beam.config.opacity_max);
        renderer.submit_mesh(beam.mesh, &beam.buffers);
        renderer.recompute_bounds(beam.mesh);
        tracing::debug!(rotation = beam.config.rotation_deg, "god ray built");
        Ok(beam)
    }

    /// Re-poses the quad for this frame and resubmits it.
    pub fn advance(&mut self, renderer: &mut dyn SceneRenderer, elapsed: f32) {
        if self.released {
            return;
        }
        let (length, opacity) = if self.config.animate {
            let wave = elapsed.sin();
            (
                self.config.beam_length * (1.0 + wave * self.config.length_pulse_strength),
                lerp(
                    self.config.opacity_min,
                    self.config.opacity_max,
                    (wave + 1.0) * 0.5,
                ),
            )
        } else {
            (self.config.beam_length, self.config.opacity_max)
        };
        self.regenerate(length, opacity);
        renderer.submit_mesh(self.mesh, &self.buffers);
        renderer.recompute_bounds(self.mesh);
    }

    /// The normalized configuration in effect.
    #[must_use]
    pub fn config(&self) -> &GodRayBeamConfig {
        &self.config
    }

    /// The last generated quad.
    #[must_use]
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    fn regenerate(&mut self, length: f32, opacity: f32) {
        let angle = deg_to_rad(self.config.rotation_deg);
        // Straight up, rotated counterclockwise around the view axis.
        let dir = Vec2::new(-angle.sin(), angle.cos());
        let right = Vec3::new(-dir.y, dir.x, 0.0);
        let end = Vec3::new(dir.x, dir.y, 0.0) * length;
        let scale = self.config.global_scale;

        self.buffers.clear();
        self.buffers.positions.extend_from_slice(&[
            -right * scale,
            right * scale,
            (end - right) * scale,
            (end + right) * scale,
        ]);
        self.buffers.uvs.extend_from_slice(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ]);
        let color = self
            .config
            .beam_color
            .with_alpha(self.config.beam_color.a * opacity)
            .to_rgba8();
        self.buffers.colors.extend_from_slice(&[color; 4]);
        self.buffers.indices.extend_from_slice(&[0, 2, 1, 1, 2, 3]);
    }
}

impl AmbientEffect for GodRayBeam {
    fn name(&self) -> &'static str {
        "god_ray_beam"
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.advance(ctx.renderer, ctx.elapsed);
    }

    fn teardown(&mut self, renderer: &mut dyn SceneRenderer) {
        if !self.released {
            self.released = true;
            renderer.release_mesh(self.mesh);
            tracing::debug!("god ray released");
        }
    }
}
