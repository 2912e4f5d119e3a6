//! # Showcase Stage Test
//!
//! Drives a fully dressed stage through simulated scene time and checks
//! the contracts a host relies on: one submission per tick, deterministic
//! replay, and teardown that returns every renderer handle.

use std::time::Instant;

use nephele::effects::{PointSprite, RecordingRenderer};
use nephele::{SceneConfig, Stage};

const TICK_RATE: u32 = 60;

fn run_ticks(stage: &mut Stage, ticks: u32) {
    let dt = 1.0 / TICK_RATE as f32;
    for _ in 0..ticks {
        stage.tick(dt);
    }
}

#[test]
fn test_showcase_submission_cadence() {
    let renderer = RecordingRenderer::new();
    let captures = renderer.captures();
    let scene = SceneConfig::showcase();
    let mut stage = Stage::from_config(&scene, Box::new(renderer)).unwrap();

    run_ticks(&mut stage, 60);

    let particle = captures.only_particle_capture().expect("ONE BATCH EXPECTED");
    assert_eq!(particle.sprites.len(), 100, "POOL MUST STAY FULL");
    assert_eq!(particle.submit_count, 61, "ASSEMBLY PLUS ONE PER TICK");

    let meshes = captures.mesh_captures();
    assert_eq!(meshes.len(), 2, "STEAM AND GOD RAY EXPECTED");
    // Allocation order: the steam lattice, then the god ray quad.
    assert_eq!(meshes[0].buffers.vertex_count(), 33);
    assert_eq!(meshes[0].buffers.triangle_count(), 40);
    assert_eq!(meshes[1].buffers.vertex_count(), 4);
    assert_eq!(meshes[1].buffers.triangle_count(), 2);
    for mesh in &meshes {
        assert_eq!(mesh.submit_count, 61);
        assert_eq!(mesh.bounds_recomputes, 61);
        assert!(mesh.bounds.is_some(), "BOUNDS NEVER COMPUTED");
    }

    let stats = stage.stats();
    assert_eq!(stats.frames, 60);
    assert!((stats.elapsed - 1.0).abs() < 1.0e-4);
}

#[test]
fn test_same_seed_same_frames() {
    let run = || -> Vec<PointSprite> {
        let renderer = RecordingRenderer::new();
        let captures = renderer.captures();
        let scene = SceneConfig::showcase();
        let mut stage = Stage::from_config(&scene, Box::new(renderer)).unwrap();
        run_ticks(&mut stage, 240);
        captures
            .only_particle_capture()
            .expect("ONE BATCH EXPECTED")
            .sprites
    };

    assert_eq!(run(), run(), "REPLAY DIVERGED");
}

#[test]
fn test_different_seeds_diverge() {
    let run = |seed: u64| -> Vec<PointSprite> {
        let renderer = RecordingRenderer::new();
        let captures = renderer.captures();
        let scene = SceneConfig {
            seed,
            ..SceneConfig::showcase()
        };
        let mut stage = Stage::from_config(&scene, Box::new(renderer)).unwrap();
        run_ticks(&mut stage, 60);
        captures
            .only_particle_capture()
            .expect("ONE BATCH EXPECTED")
            .sprites
    };

    assert_ne!(run(11), run(12), "SEED HAS NO EFFECT");
}

#[test]
fn test_teardown_returns_every_handle() {
    let renderer = RecordingRenderer::new();
    let captures = renderer.captures();
    {
        let scene = SceneConfig::showcase();
        let mut stage = Stage::from_config(&scene, Box::new(renderer)).unwrap();
        run_ticks(&mut stage, 30);
    }

    assert_eq!(captures.live_particle_batches(), 0, "BATCH LEAKED");
    assert_eq!(captures.live_meshes(), 0, "MESH LEAKED");
    assert_eq!(captures.released_particle_batches(), 1);
    assert_eq!(captures.released_meshes(), 2);
}

#[test]
fn test_document_driven_scene() {
    let scene = SceneConfig::from_toml_str(
        r#"
        seed = 7

        [dust]
        capacity = 32

        [wind]
        turbulence = 0.5
        "#,
    )
    .unwrap();

    let renderer = RecordingRenderer::new();
    let captures = renderer.captures();
    let mut stage = Stage::from_config(&scene, Box::new(renderer)).unwrap();
    assert_eq!(stage.effect_names(), vec!["dust_field", "wind_sway"]);

    run_ticks(&mut stage, 10);
    let particle = captures.only_particle_capture().expect("ONE BATCH EXPECTED");
    assert_eq!(particle.sprites.len(), 32);
    assert_eq!(captures.live_meshes(), 0);
}

#[test]
fn test_full_stack_soak() {
    let renderer = RecordingRenderer::new();
    let captures = renderer.captures();
    let scene = SceneConfig::showcase();
    let mut stage = Stage::from_config(&scene, Box::new(renderer)).unwrap();

    let start = Instant::now();
    run_ticks(&mut stage, 3600); // one simulated minute
    let elapsed = start.elapsed();

    let stats = stage.stats();
    println!("3600 showcase ticks in {elapsed:?}");
    println!("simulated {:.1} s of scene time", stats.elapsed);

    let particle = captures.only_particle_capture().expect("ONE BATCH EXPECTED");
    assert_eq!(particle.submit_count, 3601);
    for sprite in &particle.sprites {
        assert!(
            (0.0..=1.0).contains(&sprite.color.a),
            "ALPHA OUT OF RANGE: {}",
            sprite.color.a
        );
        assert!(sprite.size > 0.0, "SPRITE SIZE COLLAPSED");
    }

    let ticks_per_sec = 3600.0 / elapsed.as_secs_f64();
    println!("full stack throughput: {ticks_per_sec:.0} ticks/sec");
    assert!(
        ticks_per_sec > 60.0,
        "full stack too slow: {ticks_per_sec:.0} ticks/sec"
    );
}
