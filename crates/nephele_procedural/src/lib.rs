//! # NEPHELE Procedural
//!
//! Deterministic randomness for reproducible ambient animation.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same frames
//! 2. **Derivable**: One root seed fans out into independent streams
//! 3. **Allocation-free**: Nothing on the heap after construction
//! 4. **Fast**: A noise sample costs less than the sin() next to it
//!
//! ## Core Components
//!
//! - `GradientNoise`: 2D coherent noise for flicker and jitter
//! - `EffectSeed`: Sub-seed derivation and ChaCha stream handles
//!
//! ## Example
//!
//! ```rust,ignore
//! use nephele_procedural::{EffectSeed, GradientNoise};
//!
//! let seed = EffectSeed::new(12345);
//! let noise = GradientNoise::new(seed.derive(1));
//!
//! // Brightness flicker channel: time on x, per-particle phase on y
//! let flicker = noise.sample01(elapsed * 3.0, phase);
//! assert!((0.0..=1.0).contains(&flicker));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod noise;

pub use noise::{EffectSeed, GradientNoise};
