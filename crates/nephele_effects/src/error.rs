//! # Effect Error Types
//!
//! All errors that can occur while building an effect component.
//!
//! Construction is the only fallible phase. A component that builds
//! successfully ticks forever without surfacing errors; transient geometry
//! anomalies (a recycle sample landing outside, a degenerate curve lookup)
//! are corrected locally in the same tick.

use nephele_shared::CurveError;
use thiserror::Error;

/// Errors that can occur when building an effect component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// A particle field needs at least one pool slot.
    #[error("particle capacity must be at least 1")]
    ZeroCapacity,

    /// Particle size range is inverted or negative.
    #[error("invalid size range: min {min_size} .. max {max_size}")]
    SizeRangeInverted {
        /// Configured minimum size.
        min_size: f32,
        /// Configured maximum size.
        max_size: f32,
    },

    /// A parameter that must be strictly positive was not.
    #[error("{field} must be positive, got {got}")]
    NonPositiveParameter {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        got: f32,
    },

    /// The tracked depth envelope ends before the near plane begins.
    #[error("depth range {depth_range} does not reach past the near plane at {near_plane}")]
    DepthRangeBehindNearPlane {
        /// Configured depth range.
        depth_range: f32,
        /// The observer's near plane distance.
        near_plane: f32,
    },

    /// Lattice division count outside the supported range.
    #[error("{axis} divisions must be in {min}..={max}, got {got}")]
    DivisionsOutOfRange {
        /// Which axis was misconfigured.
        axis: &'static str,
        /// The rejected value.
        got: u32,
        /// Smallest supported count.
        min: u32,
        /// Largest supported count.
        max: u32,
    },

    /// Edge fade amounts are fractions of the ribbon length.
    #[error("{end} fade amount must be in [0, 1], got {got}")]
    FadeAmountOutOfRange {
        /// Which end was misconfigured.
        end: &'static str,
        /// The rejected value.
        got: f32,
    },

    /// Visibility cutoff is compared against a [0, 1] alpha.
    #[error("visibility threshold must be in [0, 1], got {got}")]
    VisibilityThresholdOutOfRange {
        /// The rejected value.
        got: f32,
    },

    /// A duration interval with min > max or a non-positive bound.
    #[error("{name} interval invalid: {min} .. {max}")]
    IntervalInverted {
        /// Name of the interval.
        name: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Observer frustum parameter out of range.
    #[error("observer {field} out of range: {got}")]
    InvalidFrustum {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        got: f32,
    },

    /// The depth-of-field response curve failed validation.
    #[error("focus curve invalid: {0}")]
    Curve(#[from] CurveError),
}

/// Result type for effect construction.
pub type EffectResult<T> = Result<T, EffectError>;
