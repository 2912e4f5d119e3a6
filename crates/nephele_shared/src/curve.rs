//! Sampled response curves.
//!
//! A curve is an ordered table of control points over the unit domain with a
//! pure evaluation function. The depth-of-field focus lookup is the main
//! consumer: normalized distance in, focus weight out, every particle, every
//! tick. Evaluation never allocates and never panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{lerp, smoothstep01};

/// Validation failures for a [`ResponseCurve`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CurveError {
    /// A curve needs at least two control points to interpolate.
    #[error("curve has {got} control points, need at least 2")]
    TooFewPoints {
        /// Number of points supplied.
        got: usize,
    },

    /// Control point times must be strictly ascending.
    #[error("control point {index} is not after its predecessor (t={time})")]
    UnorderedTimes {
        /// Index of the offending point.
        index: usize,
        /// Its time value.
        time: f32,
    },

    /// Control point times must lie in [0, 1].
    #[error("control point {index} has time {time} outside [0, 1]")]
    TimeOutOfDomain {
        /// Index of the offending point.
        index: usize,
        /// Its time value.
        time: f32,
    },

    /// Control point values must be finite.
    #[error("control point {index} has a non-finite value")]
    NonFiniteValue {
        /// Index of the offending point.
        index: usize,
    },
}

/// How values are interpolated between adjacent control points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveEase {
    /// Straight segment lerp.
    Linear,
    /// Hermite-eased segment lerp, flat tangents at every control point.
    #[default]
    Smooth,
}

/// One control point of a [`ResponseCurve`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Position in the unit domain.
    pub time: f32,
    /// Curve value at that position.
    pub value: f32,
}

impl CurvePoint {
    /// Creates a control point.
    #[must_use]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise interpolated lookup table over the unit domain.
///
/// Fields are public so scene files can carry curves directly; call
/// [`ResponseCurve::validate`] before first use. The provided constructors
/// validate eagerly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    /// Control points, strictly ascending in time.
    pub points: Vec<CurvePoint>,
    /// Segment interpolation mode.
    #[serde(default)]
    pub ease: CurveEase,
}

impl ResponseCurve {
    /// Builds a linear curve from control points, validating them.
    ///
    /// # Errors
    ///
    /// Returns a [`CurveError`] when the points are too few, unordered,
    /// outside the unit domain, or non-finite.
    pub fn linear(points: Vec<CurvePoint>) -> Result<Self, CurveError> {
        let curve = Self {
            points,
            ease: CurveEase::Linear,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Builds a smooth curve from control points, validating them.
    ///
    /// # Errors
    ///
    /// Returns a [`CurveError`] when the points are too few, unordered,
    /// outside the unit domain, or non-finite.
    pub fn smooth(points: Vec<CurvePoint>) -> Result<Self, CurveError> {
        let curve = Self {
            points,
            ease: CurveEase::Smooth,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// The classic two-point ease: `start_value` at t=0, `end_value` at t=1,
    /// flat tangents at both ends.
    #[must_use]
    pub fn ease_in_out(start_value: f32, end_value: f32) -> Self {
        Self {
            points: vec![
                CurvePoint::new(0.0, start_value),
                CurvePoint::new(1.0, end_value),
            ],
            ease: CurveEase::Smooth,
        }
    }

    /// Checks the control-point invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`CurveError`].
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.points.len() < 2 {
            return Err(CurveError::TooFewPoints {
                got: self.points.len(),
            });
        }
        let mut previous = f32::NEG_INFINITY;
        for (index, point) in self.points.iter().enumerate() {
            if !point.time.is_finite() || !(0.0..=1.0).contains(&point.time) {
                return Err(CurveError::TimeOutOfDomain {
                    index,
                    time: point.time,
                });
            }
            if point.time <= previous {
                return Err(CurveError::UnorderedTimes {
                    index,
                    time: point.time,
                });
            }
            if !point.value.is_finite() {
                return Err(CurveError::NonFiniteValue { index });
            }
            previous = point.time;
        }
        Ok(())
    }

    /// Evaluates the curve at `t`, clamping to the covered domain.
    ///
    /// On a validated curve this is total. On an unvalidated degenerate curve
    /// it still returns a clamped endpoint value rather than panicking.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        let Some(last) = self.points.last() else {
            return 0.0;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let mut s = (t - a.time) / span;
                if self.ease == CurveEase::Smooth {
                    s = smoothstep01(s);
                }
                return lerp(a.value, b.value, s);
            }
        }
        last.value
    }
}

impl Default for ResponseCurve {
    /// The stock depth-of-field response: half focus up close, full focus at
    /// the far end of the depth range.
    fn default() -> Self {
        Self::ease_in_out(0.5, 1.0)
    }
}
