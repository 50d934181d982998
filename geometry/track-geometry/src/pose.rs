//! Poses and the track's local-to-world transform.
//!
//! Track-local space is Y-up: the authored 2D curve lies in the XZ plane,
//! with curve coordinate `(x, y)` mapped to local `(x, 0, y)`.

use nalgebra::{Matrix4, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Fixed up vector of track-local space.
pub const UP: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);

/// Forward direction reported when a pose cannot be evaluated.
pub const DEFAULT_FORWARD: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// A placement along the track: a position and the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position.
    pub position: Point3<f64>,
    /// Unit world-space direction of travel.
    pub forward: Vector3<f64>,
}

impl Pose {
    /// The pose returned for degenerate input (no curve or no transform).
    pub const ZERO: Self = Self {
        position: Point3::new(0.0, 0.0, 0.0),
        forward: DEFAULT_FORWARD,
    };

    /// Create a pose.
    #[must_use]
    pub const fn new(position: Point3<f64>, forward: Vector3<f64>) -> Self {
        Self { position, forward }
    }

    /// Rotation that points local `+Z` along `forward` with `+Y` as up.
    ///
    /// Placing an entity at `position` with this rotation makes it look
    /// down the track.
    #[must_use]
    pub fn look_rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::face_towards(&self.forward, &UP)
    }

    /// The point `distance` units ahead along `forward`.
    #[must_use]
    pub fn ahead(&self, distance: f64) -> Point3<f64> {
        self.position + self.forward * distance
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Local-to-world transform of a track.
///
/// Wraps a homogeneous matrix so that translation, rotation and scale of the
/// owning scene object are all honoured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldTransform(Matrix4<f64>);

impl WorldTransform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Wrap an existing local-to-world matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }

    /// Build from translation, rotation and uniform scale.
    #[must_use]
    pub fn from_parts(translation: Vector3<f64>, rotation: UnitQuaternion<f64>, scale: f64) -> Self {
        let matrix = Translation3::from(translation).to_homogeneous()
            * rotation.to_homogeneous()
            * Matrix4::new_scaling(scale);
        Self(matrix)
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Map a local point to world space.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.0.transform_point(point)
    }

    /// Map a local direction to world space (translation ignored).
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.0.transform_vector(vector)
    }

    /// World-space direction of local `+Z`.
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        normalize_or(self.transform_vector(&Vector3::z()), DEFAULT_FORWARD)
    }

    /// World-space direction of local `+X`.
    #[must_use]
    pub fn right(&self) -> Vector3<f64> {
        normalize_or(self.transform_vector(&Vector3::x()), Vector3::x())
    }

    /// World-space direction of local `+Y`.
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        normalize_or(self.transform_vector(&Vector3::y()), UP)
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Normalize `v`, or return `fallback` when it has no usable length.
pub(crate) fn normalize_or(v: Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm > 1e-12 && norm.is_finite() {
        v / norm
    } else {
        fallback
    }
}
