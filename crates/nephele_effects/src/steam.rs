//! # Steam Ribbon
//!
//! A flat lattice strip that reads as a column of rising steam. The strip
//! itself holds still; a sine wave displaces each row sideways by its
//! position along the strip, edge fades soften both ends, and the texture
//! scrolls along the length to carry the motion.
//!
//! The whole lattice is regenerated every tick into a reused buffer.
//! Topology never changes between frames, only attribute values.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use nephele_shared::{clamp01, deg_to_rad, lerp, Rgba8, Vec2, Vec3};

use crate::effect::{AmbientEffect, FrameContext};
use crate::error::{EffectError, EffectResult};
use crate::renderer::{MeshBuffers, MeshId, SceneRenderer};

/// Smallest supported division count per axis.
pub const MIN_DIVISIONS: u32 = 2;
/// Largest supported division count per axis.
pub const MAX_DIVISIONS: u32 = 500;

/// Tuning for a [`SteamRibbon`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamRibbonConfig {
    /// Strip length in world units.
    pub length: f32,
    /// Strip width in world units.
    pub width: f32,
    /// Cell count along the length.
    pub length_divisions: u32,
    /// Cell count across the width.
    pub width_divisions: u32,
    /// Sideways displacement of the wave, in world units.
    pub wave_amplitude: f32,
    /// Full wave cycles over the strip length.
    pub wave_frequency: f32,
    /// Texture repeats along the length.
    pub uv_tiling: f32,
    /// Texture scroll rate in lengths per second.
    pub scroll_speed: f32,
    /// Wave phase shift in degrees.
    pub phase_offset_deg: f32,
    /// Fraction of the length the start fade covers; 0 disables it.
    pub fade_start_amount: f32,
    /// Exponent shaping the start fade.
    pub fade_start_falloff: f32,
    /// Fraction of the length the end fade covers; 0 disables it.
    pub fade_end_amount: f32,
    /// Exponent shaping the end fade.
    pub fade_end_falloff: f32,
    /// Mirrors the texture across the width.
    pub reverse_uv: bool,
    /// Whether the scroll starts running at build time.
    pub autoplay: bool,
}

impl Default for SteamRibbonConfig {
    fn default() -> Self {
        Self {
            length: 10.0,
            width: 5.0,
            length_divisions: 10,
            width_divisions: 2,
            wave_amplitude: 0.5,
            wave_frequency: 1.0,
            uv_tiling: 1.0,
            scroll_speed: 1.0,
            phase_offset_deg: 0.0,
            fade_start_amount: 0.0,
            fade_start_falloff: 1.0,
            fade_end_amount: 0.0,
            fade_end_falloff: 1.0,
            reverse_uv: false,
            autoplay: true,
        }
    }
}

impl SteamRibbonConfig {
    /// Checks the configuration without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: positive extents, divisions
    /// within the supported range, fade amounts within `[0, 1]`, positive
    /// falloff exponents.
    pub fn validate(&self) -> EffectResult<()> {
        for (field, got) in [("length", self.length), ("width", self.width)] {
            if !got.is_finite() || got <= 0.0 {
                return Err(EffectError::NonPositiveParameter { field, got });
            }
        }
        for (axis, got) in [
            ("length", self.length_divisions),
            ("width", self.width_divisions),
        ] {
            if !(MIN_DIVISIONS..=MAX_DIVISIONS).contains(&got) {
                return Err(EffectError::DivisionsOutOfRange {
                    axis,
                    got,
                    min: MIN_DIVISIONS,
                    max: MAX_DIVISIONS,
                });
            }
        }
        for (end, got) in [
            ("start", self.fade_start_amount),
            ("end", self.fade_end_amount),
        ] {
            if !(0.0..=1.0).contains(&got) {
                return Err(EffectError::FadeAmountOutOfRange { end, got });
            }
        }
        for (field, got) in [
            ("fade_start_falloff", self.fade_start_falloff),
            ("fade_end_falloff", self.fade_end_falloff),
        ] {
            if !got.is_finite() || got <= 0.0 {
                return Err(EffectError::NonPositiveParameter { field, got });
            }
        }
        Ok(())
    }
}

/// The ribbon mesh component.
#[derive(Debug)]
pub struct SteamRibbon {
    config: SteamRibbonConfig,
    mesh: MeshId,
    uv_offset: f32,
    playing: bool,
    buffers: MeshBuffers,
    released: bool,
}

impl SteamRibbon {
    /// Builds the ribbon and submits the initial lattice.
    ///
    /// # Errors
    ///
    /// Configuration violations per [`SteamRibbonConfig::validate`].
    pub fn new(config: SteamRibbonConfig, renderer: &mut dyn SceneRenderer) -> EffectResult<Self> {
        config.validate()?;
        let mesh = renderer.allocate_mesh();
        let playing = config.autoplay;
        let mut ribbon = Self {
            config,
            mesh,
            uv_offset: 0.0,
            playing,
            buffers: MeshBuffers::default(),
            released: false,
        };
        ribbon.regenerate();
        renderer.submit_mesh(ribbon.mesh, &ribbon.buffers);
        renderer.recompute_bounds(ribbon.mesh);
        tracing::debug!(
            vertices = ribbon.buffers.vertex_count(),
            triangles = ribbon.buffers.triangle_count(),
            "steam ribbon built"
        );
        Ok(ribbon)
    }

    /// Advances the scroll and resubmits the regenerated lattice.
    pub fn advance(&mut self, renderer: &mut dyn SceneRenderer, dt: f32) {
        if self.released {
            return;
        }
        if self.playing {
            self.uv_offset += self.config.scroll_speed * dt;
        }
        self.regenerate();
        renderer.submit_mesh(self.mesh, &self.buffers);
        renderer.recompute_bounds(self.mesh);
    }

    /// Resumes the texture scroll.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freezes the texture scroll. Geometry keeps submitting.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Whether the scroll is running.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Accumulated scroll offset in lengths.
    #[inline]
    #[must_use]
    pub fn uv_offset(&self) -> f32 {
        self.uv_offset
    }

    /// The last generated lattice.
    #[must_use]
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Rebuilds every vertex attribute and the index list.
    ///
    /// Rows run along the length; each row is displaced sideways by a wave
    /// that depends only on the row's length fraction, so the shape is
    /// fixed in time. Alpha is constant across a row.
    fn regenerate(&mut self) {
        let config = &self.config;
        self.buffers.clear();

        let rows = config.length_divisions;
        let cols = config.width_divisions;
        let phase = deg_to_rad(config.phase_offset_deg);
        let half_width = config.width * 0.5;

        for i in 0..=rows {
            let t = i as f32 / rows as f32;
            let lateral = (t * config.wave_frequency * TAU + phase).sin() * config.wave_amplitude;
            let fade = edge_fade(t, config);
            for j in 0..=cols {
                let width_t = j as f32 / cols as f32;
                self.buffers.positions.push(Vec3::new(
                    config.length * t,
                    0.0,
                    lerp(-half_width, half_width, width_t) + lateral,
                ));
                let u = if config.reverse_uv { 1.0 - width_t } else { width_t };
                self.buffers
                    .uvs
                    .push(Vec2::new(u, (t + self.uv_offset) * config.uv_tiling));
                self.buffers.colors.push(Rgba8::white_with_alpha(fade));
            }
        }

        // Two triangles per cell, consistent winding, row-major cells.
        let stride = cols + 1;
        for i in 0..rows {
            for j in 0..cols {
                let cell = i * stride + j;
                self.buffers.indices.extend_from_slice(&[
                    cell,
                    cell + stride,
                    cell + 1,
                    cell + 1,
                    cell + stride,
                    cell + stride + 1,
                ]);
            }
        }
    }
}

impl AmbientEffect for SteamRibbon {
    fn name(&self) -> &'static str {
        "steam_ribbon"
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.advance(ctx.renderer, ctx.dt);
    }

    fn teardown(&mut self, renderer: &mut dyn SceneRenderer) {
        if !self.released {
            self.released = true;
            renderer.release_mesh(self.mesh);
            tracing::debug!("steam ribbon released");
        }
    }
}

/// Combined end fade for a row at length fraction `t`.
///
/// An amount of zero means that end never fades.
fn edge_fade(t: f32, config: &SteamRibbonConfig) -> f32 {
    let start = if config.fade_start_amount > 0.0 {
        clamp01((t / config.fade_start_amount).powf(config.fade_start_falloff))
    } else {
        1.0
    };
    let end = if config.fade_end_amount > 0.0 {
        clamp01(((1.0 - t) / config.fade_end_amount).powf(config.fade_end_falloff))
    } else {
        1.0
    };
    start.min(end)
}
