//! Benchmark for the per-tick hot loops.
//!
//! TARGET: any single effect well under one 60 Hz frame slice
//!
//! Run with: cargo bench --package nephele_effects --bench tick_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use nephele_effects::{
    DustField, DustFieldConfig, GodRayBeam, GodRayBeamConfig, RecordingRenderer, StaticObserver,
    SteamRibbon, SteamRibbonConfig,
};
use nephele_procedural::EffectSeed;

fn benchmark_dust_tick(c: &mut Criterion) {
    let config = DustFieldConfig {
        capacity: 1000,
        ..DustFieldConfig::default()
    };
    let mut renderer = RecordingRenderer::new();
    let observer = StaticObserver::default();
    let mut field = DustField::new(config, EffectSeed::new(42), &mut renderer, &observer)
        .expect("benchmark configuration must build");

    let mut group = c.benchmark_group("dust_tick");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("1000_motes", |b| {
        let mut elapsed = 0.0f32;
        b.iter(|| {
            elapsed += 0.016;
            field.advance(&mut renderer, &observer, black_box(0.016), black_box(elapsed));
        });
    });

    group.finish();
}

fn benchmark_steam_regeneration(c: &mut Criterion) {
    let config = SteamRibbonConfig {
        length_divisions: 64,
        width_divisions: 8,
        ..SteamRibbonConfig::default()
    };
    let mut renderer = RecordingRenderer::new();
    let mut ribbon =
        SteamRibbon::new(config, &mut renderer).expect("benchmark configuration must build");

    let mut group = c.benchmark_group("steam_regeneration");
    // 65 * 9 vertices rebuilt per tick
    group.throughput(Throughput::Elements(585));

    group.bench_function("64x8_lattice", |b| {
        b.iter(|| {
            ribbon.advance(&mut renderer, black_box(0.016));
        });
    });

    group.finish();
}

fn benchmark_godray_repose(c: &mut Criterion) {
    let mut renderer = RecordingRenderer::new();
    let mut beam = GodRayBeam::new(GodRayBeamConfig::default(), &mut renderer)
        .expect("benchmark configuration must build");

    c.bench_function("godray_repose", |b| {
        let mut elapsed = 0.0f32;
        b.iter(|| {
            elapsed += 0.016;
            beam.advance(&mut renderer, black_box(elapsed));
        });
    });
}

criterion_group!(
    benches,
    benchmark_dust_tick,
    benchmark_steam_regeneration,
    benchmark_godray_repose
);
criterion_main!(benches);
