//! # Dust Field Soak Test
//!
//! Proves the mote pool survives long runs without drifting out of its
//! invariants: fades bounded, rest positions inside the tracked envelope,
//! sprites never far from their rest.

use std::time::Instant;

use nephele_effects::{
    DustField, DustFieldConfig, RecordingRenderer, SceneObserver, StaticObserver,
};
use nephele_procedural::EffectSeed;

/// Projection round-trip tolerance for rest positions sampled on the
/// viewport boundary.
const EDGE_SLACK: f32 = 1.0e-4;

/// Sprite offset from rest can reach the three-axis sway peak plus one
/// tick of upward drift.
fn sway_envelope(config: &DustFieldConfig, dt: f32) -> f32 {
    config.sway_strength * 3.0_f32.sqrt() + config.base_speed * dt + 1.0e-4
}

/// Test: 1000 ticks at dt = 0.1 with the stock field.
#[test]
fn test_thousand_tick_soak() {
    let config = DustFieldConfig {
        capacity: 100,
        depth_range: 5.0,
        fade_speed: 0.5,
        ..DustFieldConfig::default()
    };
    let envelope = sway_envelope(&config, 0.1);
    let depth_range = config.depth_range;

    let mut renderer = RecordingRenderer::new();
    let captures = renderer.captures();
    let observer = StaticObserver::default();
    let mut field = DustField::new(config, EffectSeed::new(42), &mut renderer, &observer)
        .expect("stock configuration must build");

    let start = Instant::now();
    let mut elapsed = 0.0_f32;
    let mut recycles = 0_usize;
    let mut previous_rest = field.rest_positions().to_vec();

    for tick in 1..=1000 {
        elapsed += 0.1;
        field.advance(&mut renderer, &observer, 0.1, elapsed);

        for slot in 0..previous_rest.len() {
            let new = field.rest_positions()[slot];
            if previous_rest[slot] != new {
                recycles += 1;
                previous_rest[slot] = new;
            }
        }

        if tick % 100 == 0 {
            for (slot, fade) in field.fade_levels().iter().enumerate() {
                assert!(
                    (0.0..=1.0).contains(fade),
                    "FADE ESCAPED at tick {tick} slot {slot}: {fade}"
                );
            }
            let capture = captures.only_particle_capture().unwrap();
            for (slot, sprite) in capture.sprites.iter().enumerate() {
                let rest = field.rest_positions()[slot];
                let point = observer.project(rest);
                let frame = -EDGE_SLACK..=1.0 + EDGE_SLACK;
                assert!(
                    frame.contains(&point.u)
                        && frame.contains(&point.v)
                        && (0.0..=depth_range).contains(&point.depth),
                    "REST OUTSIDE at tick {tick} slot {slot}: {point:?}"
                );
                let offset = sprite.position.distance(rest);
                assert!(
                    offset <= envelope,
                    "SPRITE STRAYED at tick {tick} slot {slot}: {offset} > {envelope}"
                );
            }
        }
    }

    let runtime = start.elapsed();
    let capture = captures.only_particle_capture().unwrap();
    println!("Soaked 1000 ticks in {runtime:?}");
    println!("Submissions: {}", capture.submit_count);
    println!("Recycles: {recycles}");

    assert_eq!(capture.submit_count, 1001, "one submission per tick plus the build");
    assert_eq!(capture.sprites.len(), 100);
}

/// Test: two fields with one seed replay the same 250-tick run.
#[test]
fn test_soak_is_deterministic() {
    let run = || {
        let mut renderer = RecordingRenderer::new();
        let captures = renderer.captures();
        let observer = StaticObserver::default();
        let mut field = DustField::new(
            DustFieldConfig::default(),
            EffectSeed::new(1977),
            &mut renderer,
            &observer,
        )
        .expect("stock configuration must build");

        let mut elapsed = 0.0_f32;
        for _ in 0..250 {
            elapsed += 0.1;
            field.advance(&mut renderer, &observer, 0.1, elapsed);
        }
        captures.only_particle_capture().unwrap().sprites
    };

    assert_eq!(run(), run(), "same seed must reproduce the same frames");
    println!("250-tick replay is bit-identical");
}

/// Benchmark: tick throughput at ten times the stock pool size.
#[test]
fn bench_dust_tick_throughput() {
    let config = DustFieldConfig {
        capacity: 1000,
        ..DustFieldConfig::default()
    };
    let mut renderer = RecordingRenderer::new();
    let observer = StaticObserver::default();
    let mut field = DustField::new(config, EffectSeed::new(7), &mut renderer, &observer)
        .expect("configuration must build");

    let start = Instant::now();
    let mut elapsed = 0.0_f32;
    for _ in 0..600 {
        elapsed += 1.0 / 60.0;
        field.advance(&mut renderer, &observer, 1.0 / 60.0, elapsed);
    }
    let runtime = start.elapsed();
    let ticks_per_sec = 600.0 / runtime.as_secs_f64();

    println!("600 ticks of 1000 motes in {runtime:?}");
    println!("Throughput: {ticks_per_sec:.0} ticks/sec");

    // Conservative floor; one tick is one frame budget slice.
    assert!(ticks_per_sec > 20.0, "dust tick too slow: {ticks_per_sec:.0} ticks/sec");
}
