//! # NEPHELE Effect Components
//!
//! The ambient effects that dress a locked-off 2.5D shot: drifting dust,
//! rising steam, pulsing light beams, swaying and wobbling props, and the
//! sleep/wake timer that gates them.
//!
//! ## Design Principles
//!
//! 1. **Own your pool** - Every component holds its renderer resources
//!    exclusively and releases them synchronously on teardown
//! 2. **Whole buffers only** - One full submission per tick, never a
//!    partial patch
//! 3. **Seeded everything** - All randomness derives from one
//!    [`EffectSeed`](nephele_procedural::EffectSeed); same seed, same frames
//! 4. **Fail at build time** - Constructors validate, ticks are infallible
//!
//! ## Example
//!
//! ```rust,ignore
//! use nephele_effects::{DustField, DustFieldConfig, RecordingRenderer, StaticObserver};
//! use nephele_procedural::EffectSeed;
//!
//! let mut renderer = RecordingRenderer::new();
//! let observer = StaticObserver::default();
//! let mut dust = DustField::new(
//!     DustFieldConfig::default(),
//!     EffectSeed::new(7),
//!     &mut renderer,
//!     &observer,
//! )?;
//!
//! // Once per frame:
//! dust.advance(&mut renderer, &observer, dt, elapsed);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod blink;
pub mod drift;
pub mod dust;
pub mod effect;
pub mod error;
pub mod godray;
pub mod observer;
pub mod renderer;
pub mod steam;
pub mod sway;
pub mod targets;

pub use blink::{BlinkTimer, BlinkTimerConfig};
pub use drift::{BubbleDrift, BubbleDriftConfig};
pub use dust::{DustField, DustFieldConfig};
pub use effect::{AmbientEffect, FrameContext};
pub use error::{EffectError, EffectResult};
pub use godray::{GodRayBeam, GodRayBeamConfig};
pub use observer::{ObserverConfig, SceneObserver, StaticObserver, ViewportPoint};
pub use renderer::{
    Aabb, CaptureHandle, MeshBuffers, MeshCapture, MeshId, ParticleBufferId, ParticleCapture,
    PointSprite, RecordingRenderer, SceneRenderer,
};
pub use steam::{SteamRibbon, SteamRibbonConfig};
pub use sway::{WindSway, WindSwayConfig};
pub use targets::{TargetId, TargetSet};
