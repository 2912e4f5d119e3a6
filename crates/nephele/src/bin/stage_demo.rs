//! # Stage Demo
//!
//! MISSION: Prove the whole atmosphere stack headless, end to end:
//! - Every effect mounted from one showcase scene document
//! - 600 ticks at 60 Hz on the shared clock
//! - Same seed run twice produces identical final frames
//! - Teardown returns every renderer handle
//!
//! This binary runs the complete showcase and outputs statistics.

use std::time::{Duration, Instant};

use nephele::effects::{PointSprite, RecordingRenderer};
use nephele::{SceneConfig, Stage};

const TICK_RATE: u32 = 60;
const DURATION_SECS: u32 = 10;

struct MeshReport {
    vertices: usize,
    triangles: usize,
    submits: u64,
    bounds_recomputes: u64,
}

struct RunReport {
    elapsed: Duration,
    final_sprites: Vec<PointSprite>,
    particle_submits: u64,
    meshes: Vec<MeshReport>,
    live_after_drop: (usize, usize),
    released: (u64, u64),
}

fn run_showcase(scene: &SceneConfig, total_ticks: u64) -> RunReport {
    let renderer = RecordingRenderer::new();
    let captures = renderer.captures();

    let mut stage = match Stage::from_config(scene, Box::new(renderer)) {
        Ok(stage) => stage,
        Err(error) => {
            eprintln!("stage assembly failed: {error}");
            std::process::exit(1);
        }
    };

    let dt = 1.0 / TICK_RATE as f32;
    let start = Instant::now();
    for _ in 0..total_ticks {
        stage.tick(dt);
    }
    let elapsed = start.elapsed();

    // Snapshot traffic before teardown removes the captures.
    let particle = captures.only_particle_capture().unwrap_or_default();
    let meshes = captures
        .mesh_captures()
        .into_iter()
        .map(|capture| MeshReport {
            vertices: capture.buffers.vertex_count(),
            triangles: capture.buffers.triangle_count(),
            submits: capture.submit_count,
            bounds_recomputes: capture.bounds_recomputes,
        })
        .collect();

    drop(stage);

    RunReport {
        elapsed,
        final_sprites: particle.sprites,
        particle_submits: particle.submit_count,
        meshes,
        live_after_drop: (captures.live_particle_batches(), captures.live_meshes()),
        released: (
            captures.released_particle_batches(),
            captures.released_meshes(),
        ),
    }
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         NEPHELE - STAGE DEMO                                     ║");
    println!("║         Headless showcase of the full effect roster              ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let scene = SceneConfig::showcase();
    let scene_lines = match scene.to_toml_string() {
        Ok(text) => text.lines().count(),
        Err(error) => {
            eprintln!("scene serialization failed: {error}");
            std::process::exit(1);
        }
    };
    let total_ticks = u64::from(DURATION_SECS) * u64::from(TICK_RATE);

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Seed:               {:#018x}                        ", scene.seed);
    println!("│ Effects Mounted:    {}                                           ", scene.effect_count());
    println!("│ Scene Document:     {} lines of TOML                            ", scene_lines);
    println!("│ Tick Rate:          {} Hz                                       ", TICK_RATE);
    println!("│ Duration:           {} seconds ({} ticks)                      ", DURATION_SECS, total_ticks);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    println!("Running pass 1...");
    let first = run_showcase(&scene, total_ticks);
    println!("Running pass 2 (same seed)...");
    let second = run_showcase(&scene, total_ticks);
    println!();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                    SHOWCASE RESULTS                              ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    println!("┌─ TIMING ────────────────────────────────────────────────────────┐");
    println!("│ Real Time:          {:.3} seconds                               ", first.elapsed.as_secs_f64());
    println!("│ Simulated Time:     {} seconds                                   ", DURATION_SECS);
    println!("│ Realtime Factor:    {:.0}x                                       ",
        f64::from(DURATION_SECS) / first.elapsed.as_secs_f64().max(1.0e-9));
    println!("│ Ticks:              {}                                        ", total_ticks);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let expected_submits = total_ticks + 1; // one at assembly, one per tick
    let visible = first
        .final_sprites
        .iter()
        .filter(|sprite| sprite.color.a > 0.0)
        .count();

    println!("┌─ RENDER TRAFFIC ────────────────────────────────────────────────┐");
    println!("│ Particle Batches:   1 ({} motes, {} visible)                    ", first.final_sprites.len(), visible);
    println!("│ Particle Submits:   {}                                          ", first.particle_submits);
    for (index, mesh) in first.meshes.iter().enumerate() {
        println!("│ Mesh {}:             {} verts, {} tris, {} submits             ",
            index, mesh.vertices, mesh.triangles, mesh.submits);
    }

    let submits_ok = first.particle_submits == expected_submits
        && first
            .meshes
            .iter()
            .all(|mesh| mesh.submits == expected_submits && mesh.bounds_recomputes == expected_submits);
    if submits_ok {
        println!("│ Status:             ✓ ONE SUBMISSION PER TICK                 │");
    } else {
        println!("│ Status:             ✗ SUBMISSION CADENCE BROKEN               │");
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    println!("┌─ DETERMINISM (CRITICAL) ────────────────────────────────────────┐");
    let determinism_ok = first.final_sprites == second.final_sprites;
    println!("│ Final Frame:        {} sprites compared                        ", first.final_sprites.len());
    if determinism_ok {
        println!("│ Status:             ✓ SAME SEED, SAME FRAMES                  │");
    } else {
        println!("│ Status:             ✗ RUNS DIVERGED                           │");
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    println!("┌─ TEARDOWN ──────────────────────────────────────────────────────┐");
    println!("│ Live After Drop:    {} batches, {} meshes                       ", first.live_after_drop.0, first.live_after_drop.1);
    println!("│ Released:           {} batches, {} meshes                       ", first.released.0, first.released.1);
    let teardown_ok = first.live_after_drop == (0, 0) && first.released == (1, 2);
    if teardown_ok {
        println!("│ Status:             ✓ EVERY HANDLE RETURNED                   │");
    } else {
        println!("│ Status:             ✗ RENDERER RESOURCES LEAKED               │");
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    if submits_ok && determinism_ok && teardown_ok {
        println!("║  ✓ SHOWCASE PASSED                                              ║");
        println!("║    Six effects, one clock, zero leaks.                          ║");
        println!("║    Same seed, same frames. Always.                              ║");
    } else {
        println!("║  ✗ SHOWCASE FAILED                                              ║");
        if !submits_ok {
            println!("║    Submission cadence is broken                                 ║");
        }
        if !determinism_ok {
            println!("║    Replays diverged                                             ║");
        }
        if !teardown_ok {
            println!("║    Renderer resources leaked                                    ║");
        }
    }
    println!("╚══════════════════════════════════════════════════════════════════╝");

    if submits_ok && determinism_ok && teardown_ok {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
