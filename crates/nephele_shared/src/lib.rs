//! # NEPHELE Shared
//!
//! Common types used by every crate in the effect stack.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `wgpu`
//! - `raw-window-handle`
//! - Any GPU or window-related crate
//!
//! If you need renderer-facing types, put them in `nephele_effects`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod constants;
pub mod curve;
pub mod math;

pub use color::{Rgba, Rgba8};
pub use constants::{TICK_RATE, TICK_SECONDS, VIEWPORT_MAX, VIEWPORT_MIN};
pub use curve::{CurveError, CurveEase, CurvePoint, ResponseCurve};
pub use math::{clamp01, deg_to_rad, lerp, smoothstep01, Vec2, Vec3};
