//! Arc-length reparameterized pose evaluation.
//!
//! The authored curve's native parameter does not advance at constant
//! speed, so equal race-progress steps would cover unequal distances. The
//! [`PoseCalculator`] samples the curve at a fixed number of native-parameter
//! steps, accumulates chord lengths into a table, and inverts that table on
//! every query so that progress maps linearly onto travelled distance.

use nalgebra::{Point3, Vector3};
use track_curve::{Curve2D, TrackCurve};

use crate::pose::{DEFAULT_FORWARD, Pose, UP, WorldTransform, normalize_or};

/// Number of native-parameter steps in the arc-length table.
pub const SIMULATION_STEPS: usize = 100;

/// One row of the arc-length table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ArcSample {
    /// Native curve parameter.
    t: f64,
    /// Accumulated chord length from the start of the curve.
    distance: f64,
}

/// Maps `(progress, lateral offset, transform)` to a world [`Pose`].
///
/// The calculator owns a snapshot of the curve it was built from. Editing
/// the authored curve afterwards does not affect it until a new calculator
/// is built; [`TrackGeometry::rederive`](crate::TrackGeometry::rederive) does
/// exactly that.
#[derive(Debug, Clone)]
pub struct PoseCalculator {
    curve: TrackCurve,
    table: Vec<ArcSample>,
    length: f64,
}

impl PoseCalculator {
    /// Build a calculator with [`SIMULATION_STEPS`] samples.
    #[must_use]
    pub fn new(curve: &TrackCurve) -> Self {
        Self::with_samples(curve, SIMULATION_STEPS)
    }

    /// Build a calculator with a custom number of samples (at least 1).
    #[must_use]
    pub fn with_samples(curve: &TrackCurve, samples: usize) -> Self {
        let curve = curve.clone();
        if !curve.is_evaluable() {
            return Self {
                curve,
                table: Vec::new(),
                length: 0.0,
            };
        }

        let steps = samples.max(1);
        let mut table = Vec::with_capacity(steps + 1);
        let mut previous = curve.point_at(0.0);
        let mut distance = 0.0;
        table.push(ArcSample { t: 0.0, distance });

        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let point = curve.point_at(t);
            distance += (point - previous).norm();
            table.push(ArcSample { t, distance });
            previous = point;
        }

        Self {
            curve,
            table,
            length: distance,
        }
    }

    /// Total sampled length of the curve.
    #[must_use]
    pub fn track_length(&self) -> f64 {
        self.length
    }

    /// Number of steps in the arc-length table (0 when degenerate).
    #[must_use]
    pub fn samples(&self) -> usize {
        self.table.len().saturating_sub(1)
    }

    /// Whether poses from this calculator are the zero pose.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.table.len() < 2 || self.length <= 0.0
    }

    /// The curve snapshot the table was built from.
    #[must_use]
    pub fn curve(&self) -> &TrackCurve {
        &self.curve
    }

    /// Native curve parameter at which `progress` (clamped to `[0, 1]`) of
    /// the track length has been travelled.
    #[must_use]
    pub fn parameter_at(&self, progress: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }

        let distance = progress.clamp(0.0, 1.0) * self.length;
        let upper = self
            .table
            .partition_point(|s| s.distance <= distance)
            .clamp(1, self.table.len() - 1);
        let a = self.table[upper - 1];
        let b = self.table[upper];

        let span = b.distance - a.distance;
        let f = if span > 0.0 {
            ((distance - a.distance) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        a.t + (b.t - a.t) * f
    }

    /// Pose in track-local space.
    ///
    /// `lateral_offset` is applied along `forward × up`.
    #[must_use]
    pub fn local_pose(&self, progress: f64, lateral_offset: f64) -> Pose {
        if self.is_degenerate() {
            return Pose::ZERO;
        }

        let t = self.parameter_at(progress);
        let p = self.curve.point_at(t);
        let tangent = self.curve.tangent_at(t);

        let forward = normalize_or(Vector3::new(tangent.x, 0.0, tangent.y), DEFAULT_FORWARD);
        let lateral = forward.cross(&UP);
        let position = Point3::new(p.x, 0.0, p.y) + lateral * lateral_offset;

        Pose::new(position, forward)
    }

    /// Pose in world space.
    ///
    /// Returns [`Pose::ZERO`] when the curve is degenerate or no transform
    /// is available.
    #[must_use]
    pub fn pose(
        &self,
        progress: f64,
        lateral_offset: f64,
        transform: Option<&WorldTransform>,
    ) -> Pose {
        let Some(transform) = transform else {
            return Pose::ZERO;
        };
        if self.is_degenerate() {
            return Pose::ZERO;
        }

        let local = self.local_pose(progress, lateral_offset);
        Pose::new(
            transform.transform_point(&local.position),
            normalize_or(transform.transform_vector(&local.forward), DEFAULT_FORWARD),
        )
    }
}
