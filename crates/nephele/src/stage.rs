//! # The Stage
//!
//! Owns one renderer, one observer, and every effect dressing the shot.
//! The host calls [`Stage::tick`] once per frame; teardown happens on
//! drop and releases every renderer resource synchronously.

use nephele_effects::{AmbientEffect, FrameContext, SceneObserver, SceneRenderer, StaticObserver};
use nephele_procedural::EffectSeed;

use crate::config::SceneConfig;
use crate::error::StageResult;

/// Frame counters exposed for summaries and demos.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageStats {
    /// Ticks run so far.
    pub frames: u64,
    /// Seconds on the stage clock.
    pub elapsed: f32,
}

/// The orchestrator every host embeds.
pub struct Stage {
    renderer: Box<dyn SceneRenderer>,
    observer: Box<dyn SceneObserver>,
    effects: Vec<Box<dyn AmbientEffect>>,
    elapsed: f32,
    frame: u64,
}

impl Stage {
    /// Creates an empty stage over the given collaborators.
    #[must_use]
    pub fn new(renderer: Box<dyn SceneRenderer>, observer: Box<dyn SceneObserver>) -> Self {
        Self {
            renderer,
            observer,
            effects: Vec::new(),
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Builds a stage with every effect the scene document enables.
    ///
    /// Effects tick in the order their sections are listed here: dust,
    /// steam, god ray, wind, drift, blink.
    ///
    /// # Errors
    ///
    /// The first malformed effect section, with any renderer resources
    /// already allocated for earlier sections released again.
    pub fn from_config(
        config: &SceneConfig,
        mut renderer: Box<dyn SceneRenderer>,
    ) -> StageResult<Self> {
        let observer = StaticObserver::from_config(&config.observer)?;
        let seed = EffectSeed::new(config.seed);
        let effects = assemble_effects(config, seed, renderer.as_mut(), &observer)?;
        tracing::debug!(effects = effects.len(), seed = config.seed, "stage assembled");
        Ok(Self {
            renderer,
            observer: Box::new(observer),
            effects,
            elapsed: 0.0,
            frame: 0,
        })
    }

    /// Adds an effect behind the ones already present.
    pub fn add_effect(&mut self, effect: Box<dyn AmbientEffect>) {
        self.effects.push(effect);
    }

    /// Advances the clock, then ticks every effect in order.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.frame += 1;
        let mut ctx = FrameContext {
            renderer: self.renderer.as_mut(),
            observer: self.observer.as_ref(),
            dt,
            elapsed: self.elapsed,
        };
        for effect in &mut self.effects {
            effect.tick(&mut ctx);
        }
    }

    /// Frame counters since construction.
    #[must_use]
    pub fn stats(&self) -> StageStats {
        StageStats {
            frames: self.frame,
            elapsed: self.elapsed,
        }
    }

    /// Names of the mounted effects, in tick order.
    #[must_use]
    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|effect| effect.name()).collect()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        for effect in &mut self.effects {
            effect.teardown(self.renderer.as_mut());
        }
        tracing::debug!(frames = self.frame, "stage torn down");
    }
}

fn assemble_effects(
    config: &SceneConfig,
    seed: EffectSeed,
    renderer: &mut dyn SceneRenderer,
    observer: &StaticObserver,
) -> StageResult<Vec<Box<dyn AmbientEffect>>> {
    let mut effects: Vec<Box<dyn AmbientEffect>> = Vec::new();
    if let Err(error) = push_configured(config, seed, renderer, observer, &mut effects) {
        // A later section failed; give back what earlier sections took.
        for effect in &mut effects {
            effect.teardown(renderer);
        }
        return Err(error);
    }
    Ok(effects)
}

fn push_configured(
    config: &SceneConfig,
    seed: EffectSeed,
    renderer: &mut dyn SceneRenderer,
    observer: &StaticObserver,
    effects: &mut Vec<Box<dyn AmbientEffect>>,
) -> StageResult<()> {
    use nephele_effects::{BlinkTimer, BubbleDrift, DustField, GodRayBeam, SteamRibbon, WindSway};

    if let Some(dust) = &config.dust {
        effects.push(Box::new(DustField::new(
            dust.clone(),
            seed,
            renderer,
            observer,
        )?));
    }
    if let Some(steam) = &config.steam {
        effects.push(Box::new(SteamRibbon::new(steam.clone(), renderer)?));
    }
    if let Some(god_ray) = &config.god_ray {
        effects.push(Box::new(GodRayBeam::new(god_ray.clone(), renderer)?));
    }
    if let Some(wind) = &config.wind {
        effects.push(Box::new(WindSway::new(*wind, seed)));
    }
    if let Some(drift) = &config.drift {
        effects.push(Box::new(BubbleDrift::new(*drift, seed)));
    }
    if let Some(blink) = &config.blink {
        effects.push(Box::new(BlinkTimer::new(*blink, seed)?));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use nephele_effects::{DustFieldConfig, RecordingRenderer, SteamRibbonConfig};

    #[test]
    fn test_empty_stage_ticks_quietly() {
        let renderer = RecordingRenderer::new();
        let observer = nephele_effects::StaticObserver::default();
        let mut stage = Stage::new(Box::new(renderer), Box::new(observer));

        stage.tick(0.016);
        stage.tick(0.016);
        let stats = stage.stats();
        assert_eq!(stats.frames, 2);
        assert!((stats.elapsed - 0.032).abs() < 1.0e-6);
        assert!(stage.effect_names().is_empty());
    }

    #[test]
    fn test_configured_effects_mount_in_order() {
        let config = SceneConfig::showcase();
        let renderer = RecordingRenderer::new();
        let stage = Stage::from_config(&config, Box::new(renderer)).unwrap();

        assert_eq!(
            stage.effect_names(),
            vec![
                "dust_field",
                "steam_ribbon",
                "god_ray_beam",
                "wind_sway",
                "bubble_drift",
                "blink_timer",
            ]
        );
    }

    #[test]
    fn test_drop_releases_every_resource() {
        let renderer = RecordingRenderer::new();
        let captures = renderer.captures();
        {
            let config = SceneConfig::showcase();
            let mut stage = Stage::from_config(&config, Box::new(renderer)).unwrap();
            stage.tick(0.016);
            assert_eq!(captures.live_particle_batches(), 1);
            assert_eq!(captures.live_meshes(), 2, "steam and god ray each hold one");
        }
        assert_eq!(captures.live_particle_batches(), 0);
        assert_eq!(captures.live_meshes(), 0);
    }

    #[test]
    fn test_failed_section_releases_earlier_allocations() {
        let renderer = RecordingRenderer::new();
        let captures = renderer.captures();

        // Dust mounts first and allocates; the broken steam section then
        // has to give that allocation back.
        let config = SceneConfig {
            dust: Some(DustFieldConfig::default()),
            steam: Some(SteamRibbonConfig {
                length: -1.0,
                ..SteamRibbonConfig::default()
            }),
            ..SceneConfig::default()
        };
        assert!(Stage::from_config(&config, Box::new(renderer)).is_err());
        assert_eq!(captures.live_particle_batches(), 0);
        assert_eq!(captures.live_meshes(), 0);
    }
}
