//! # The Observer Seam
//!
//! Depth-of-field effects need to know where the eye is and how the world
//! maps onto the screen, nothing more. [`SceneObserver`] narrows the host
//! camera down to exactly that: a projection into normalized viewport
//! coordinates and its inverse.
//!
//! [`StaticObserver`] is the built-in pinhole implementation used by the
//! headless stage and the test suite.

use serde::{Deserialize, Serialize};

use nephele_shared::{deg_to_rad, Vec3, VIEWPORT_MAX, VIEWPORT_MIN};

use crate::error::{EffectError, EffectResult};

/// A world position expressed in viewport terms.
///
/// `u` and `v` are normalized screen coordinates where `[0, 1]` covers the
/// visible frame. `depth` is the signed distance along the view axis, in
/// world units, negative behind the eye.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportPoint {
    /// Horizontal viewport coordinate.
    pub u: f32,
    /// Vertical viewport coordinate.
    pub v: f32,
    /// Signed view-axis distance in world units.
    pub depth: f32,
}

impl ViewportPoint {
    /// Creates a viewport point.
    #[inline]
    #[must_use]
    pub const fn new(u: f32, v: f32, depth: f32) -> Self {
        Self { u, v, depth }
    }

    /// Whether the point lies outside the visible frame or outside the
    /// `[0, depth_range]` depth band.
    ///
    /// Boundary values count as inside.
    #[inline]
    #[must_use]
    pub fn is_outside(&self, depth_range: f32) -> bool {
        self.u < VIEWPORT_MIN
            || self.u > VIEWPORT_MAX
            || self.v < VIEWPORT_MIN
            || self.v > VIEWPORT_MAX
            || self.depth < 0.0
            || self.depth > depth_range
    }
}

/// The view the effects run against.
pub trait SceneObserver {
    /// Maps a world position into viewport coordinates.
    ///
    /// Positions behind or on the eye plane report `u = v = -1.0` with the
    /// true signed depth, so they always test as off-screen.
    fn project(&self, world: Vec3) -> ViewportPoint;

    /// Maps viewport coordinates back to a world position.
    ///
    /// Inverse of [`project`](Self::project) for positive depths.
    fn unproject(&self, point: ViewportPoint) -> Vec3;

    /// Distance from the eye to the near clip plane.
    fn near_plane(&self) -> f32;

    /// World position of the eye.
    fn position(&self) -> Vec3;
}

/// Pinhole parameters for [`StaticObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Eye position in world space.
    pub origin: Vec3,
    /// Vertical field of view in degrees, exclusive `(0, 180)`.
    pub fov_y_deg: f32,
    /// Frame width over height.
    pub aspect: f32,
    /// Near clip distance in world units.
    pub near_plane: f32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            fov_y_deg: 60.0,
            aspect: 16.0 / 9.0,
            near_plane: 0.3,
        }
    }
}

/// A fixed pinhole camera looking down +Z.
///
/// The scene this pack dresses is framed by one locked-off camera, so the
/// observer carries no orientation, only an origin and lens parameters.
#[derive(Clone, Copy, Debug)]
pub struct StaticObserver {
    origin: Vec3,
    tan_half_fov: f32,
    aspect: f32,
    near: f32,
}

impl StaticObserver {
    /// Builds an observer, rejecting degenerate lens parameters.
    ///
    /// # Errors
    ///
    /// [`EffectError::InvalidFrustum`] when the field of view falls outside
    /// `(0, 180)` degrees, or aspect or near plane are not positive.
    pub fn from_config(config: &ObserverConfig) -> EffectResult<Self> {
        if !config.fov_y_deg.is_finite() || config.fov_y_deg <= 0.0 || config.fov_y_deg >= 180.0 {
            return Err(EffectError::InvalidFrustum {
                field: "fov_y_deg",
                got: config.fov_y_deg,
            });
        }
        if !config.aspect.is_finite() || config.aspect <= 0.0 {
            return Err(EffectError::InvalidFrustum {
                field: "aspect",
                got: config.aspect,
            });
        }
        if !config.near_plane.is_finite() || config.near_plane <= 0.0 {
            return Err(EffectError::InvalidFrustum {
                field: "near_plane",
                got: config.near_plane,
            });
        }
        Ok(Self::build(config))
    }

    fn build(config: &ObserverConfig) -> Self {
        Self {
            origin: config.origin,
            tan_half_fov: deg_to_rad(config.fov_y_deg * 0.5).tan(),
            aspect: config.aspect,
            near: config.near_plane,
        }
    }
}

impl Default for StaticObserver {
    fn default() -> Self {
        Self::build(&ObserverConfig::default())
    }
}

impl SceneObserver for StaticObserver {
    fn project(&self, world: Vec3) -> ViewportPoint {
        let rel = world - self.origin;
        let depth = rel.z;
        if depth <= 0.0 {
            return ViewportPoint::new(-1.0, -1.0, depth);
        }
        let half_width = depth * self.tan_half_fov * self.aspect;
        let half_height = depth * self.tan_half_fov;
        ViewportPoint::new(
            0.5 + rel.x / (2.0 * half_width),
            0.5 + rel.y / (2.0 * half_height),
            depth,
        )
    }

    fn unproject(&self, point: ViewportPoint) -> Vec3 {
        let half_width = point.depth * self.tan_half_fov * self.aspect;
        let half_height = point.depth * self.tan_half_fov;
        self.origin
            + Vec3::new(
                (point.u - 0.5) * 2.0 * half_width,
                (point.v - 0.5) * 2.0 * half_height,
                point.depth,
            )
    }

    fn near_plane(&self) -> f32 {
        self.near
    }

    fn position(&self) -> Vec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_center_of_view_projects_to_half_half() {
        let observer = StaticObserver::default();
        let point = observer.project(Vec3::new(0.0, 0.0, 4.0));
        assert!((point.u - 0.5).abs() < EPSILON, "u was {}", point.u);
        assert!((point.v - 0.5).abs() < EPSILON, "v was {}", point.v);
        assert!((point.depth - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let config = ObserverConfig {
            origin: Vec3::new(1.0, -2.0, 3.0),
            ..ObserverConfig::default()
        };
        let observer = StaticObserver::from_config(&config).unwrap();

        let original = ViewportPoint::new(0.25, 0.8, 2.5);
        let world = observer.unproject(original);
        let back = observer.project(world);
        assert!((back.u - original.u).abs() < EPSILON, "u drifted: {}", back.u);
        assert!((back.v - original.v).abs() < EPSILON, "v drifted: {}", back.v);
        assert!((back.depth - original.depth).abs() < EPSILON);
    }

    #[test]
    fn test_behind_eye_reports_sentinel_with_true_depth() {
        let observer = StaticObserver::default();
        let point = observer.project(Vec3::new(0.5, 0.5, -2.0));
        assert_eq!(point.u, -1.0);
        assert_eq!(point.v, -1.0);
        assert_eq!(point.depth, -2.0);
        assert!(point.is_outside(10.0));
    }

    #[test]
    fn test_frustum_edge_lands_on_viewport_edge() {
        let observer = StaticObserver::default();
        let depth = 5.0;
        // Vertical half extent at this depth is depth * tan(30 deg).
        let half_height = depth * deg_to_rad(30.0).tan();
        let point = observer.project(Vec3::new(0.0, half_height, depth));
        assert!((point.v - 1.0).abs() < EPSILON, "v was {}", point.v);
    }

    #[test]
    fn test_is_outside_boundaries_count_as_inside() {
        assert!(!ViewportPoint::new(0.0, 0.0, 0.0).is_outside(5.0));
        assert!(!ViewportPoint::new(1.0, 1.0, 5.0).is_outside(5.0));
        assert!(ViewportPoint::new(1.001, 0.5, 1.0).is_outside(5.0));
        assert!(ViewportPoint::new(0.5, -0.001, 1.0).is_outside(5.0));
        assert!(ViewportPoint::new(0.5, 0.5, 5.001).is_outside(5.0));
        assert!(ViewportPoint::new(0.5, 0.5, -0.001).is_outside(5.0));
    }

    #[test]
    fn test_degenerate_lens_parameters_are_rejected() {
        let flat = ObserverConfig {
            fov_y_deg: 0.0,
            ..ObserverConfig::default()
        };
        assert_eq!(
            StaticObserver::from_config(&flat).unwrap_err(),
            EffectError::InvalidFrustum {
                field: "fov_y_deg",
                got: 0.0
            }
        );

        let wide = ObserverConfig {
            fov_y_deg: 180.0,
            ..ObserverConfig::default()
        };
        assert!(StaticObserver::from_config(&wide).is_err());

        let squashed = ObserverConfig {
            aspect: 0.0,
            ..ObserverConfig::default()
        };
        assert!(StaticObserver::from_config(&squashed).is_err());

        let touching = ObserverConfig {
            near_plane: 0.0,
            ..ObserverConfig::default()
        };
        assert!(StaticObserver::from_config(&touching).is_err());
    }
}
