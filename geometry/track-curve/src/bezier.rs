//! Single cubic segments between two track nodes.

use crate::Curve2D;
use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One cubic piece of a track curve.
///
/// `p0` and `p3` are the anchors of two neighbouring nodes; `p1` and `p2`
/// are the outgoing handle of the first and the incoming handle of the
/// second, both already in absolute coordinates.
///
/// ```
/// use track_curve::{CubicBezier2, Curve2D};
/// use nalgebra::Point2;
///
/// let arch = CubicBezier2::new(
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 3.0),
///     Point2::new(6.0, 3.0),
///     Point2::new(6.0, 0.0),
/// );
/// assert!((arch.point_at(0.5).x - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier2 {
    /// Anchor of the segment's first node.
    pub p0: Point2<f64>,
    /// Outgoing handle of the first node.
    pub p1: Point2<f64>,
    /// Incoming handle of the second node.
    pub p2: Point2<f64>,
    /// Anchor of the segment's second node.
    pub p3: Point2<f64>,
}

impl CubicBezier2 {
    /// Segment from four absolute control points.
    #[must_use]
    pub const fn new(p0: Point2<f64>, p1: Point2<f64>, p2: Point2<f64>, p3: Point2<f64>) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Forward differences of the control polygon, `[P₁-P₀, P₂-P₁, P₃-P₂]`.
    fn legs(&self) -> [Vector2<f64>; 3] {
        [self.p1 - self.p0, self.p2 - self.p1, self.p3 - self.p2]
    }
}

impl Curve2D for CubicBezier2 {
    fn point_at(&self, t: f64) -> Point2<f64> {
        let t = t.clamp(0.0, 1.0);

        // de Casteljau, three rounds of blending
        let mut hull = [self.p0.coords, self.p1.coords, self.p2.coords, self.p3.coords];
        for round in (1..4).rev() {
            for i in 0..round {
                hull[i] = hull[i].lerp(&hull[i + 1], t);
            }
        }
        Point2::from(hull[0])
    }

    fn derivative_at(&self, t: f64) -> Vector2<f64> {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let [d0, d1, d2] = self.legs();

        // Quadratic Bézier over the legs, scaled by the degree
        (d0 * (u * u) + d1 * (2.0 * u * t) + d2 * (t * t)) * 3.0
    }

    fn second_derivative_at(&self, t: f64) -> Vector2<f64> {
        let t = t.clamp(0.0, 1.0);
        let [d0, d1, d2] = self.legs();
        ((d1 - d0) * (1.0 - t) + (d2 - d1) * t) * 6.0
    }

    fn tangent_at(&self, t: f64) -> Vector2<f64> {
        // A handle sitting on its anchor zeroes the velocity there; the
        // acceleration still points along the curve.
        self.derivative_at(t)
            .try_normalize(1e-10)
            .or_else(|| self.second_derivative_at(t).try_normalize(1e-10))
            .unwrap_or_else(Vector2::x)
    }
}
