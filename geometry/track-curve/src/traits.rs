//! The planar curve evaluation trait.
//!
//! Poses, curvature and camera framing downstream are all built from the
//! handful of evaluations declared here.

use nalgebra::{Point2, Vector2};

/// Relative tolerance for the reference arc-length integration.
const ARC_LENGTH_TOLERANCE: f64 = 1e-10;

/// Deepest bisection allowed while integrating arc length.
const ARC_LENGTH_MAX_DEPTH: u32 = 20;

/// Planar curve over its native parameter `t ∈ [0, 1]`.
///
/// The native parameter runs from the first point (`t = 0`) to the last
/// (`t = 1`) but is not proportional to distance travelled.
pub trait Curve2D {
    /// Position at `t`.
    fn point_at(&self, t: f64) -> Point2<f64>;

    /// Velocity `dB/dt` at `t`.
    fn derivative_at(&self, t: f64) -> Vector2<f64>;

    /// Acceleration `d²B/dt²` at `t`.
    fn second_derivative_at(&self, t: f64) -> Vector2<f64>;

    /// Unit direction of travel at `t`, or `+X` where the velocity is zero.
    fn tangent_at(&self, t: f64) -> Vector2<f64> {
        let velocity = self.derivative_at(t);
        velocity
            .try_normalize(1e-10)
            .unwrap_or_else(Vector2::x)
    }

    /// Signed curvature at `t`; left turns are positive.
    fn curvature_at(&self, t: f64) -> f64 {
        let velocity = self.derivative_at(t);
        let speed = velocity.norm();
        if speed <= 1e-10 {
            return 0.0;
        }
        velocity.perp(&self.second_derivative_at(t)) / (speed * speed * speed)
    }

    /// Length of the whole curve.
    ///
    /// This integrates speed numerically and serves as the reference against
    /// which sampled lookup tables are checked.
    fn arc_length(&self) -> f64 {
        self.arc_length_between(0.0, 1.0)
    }

    /// Length between two parameters, in either order.
    fn arc_length_between(&self, t0: f64, t1: f64) -> f64 {
        integrate_speed(self, t0.min(t1), t0.max(t1))
    }

    /// First point of the curve.
    fn start(&self) -> Point2<f64> {
        self.point_at(0.0)
    }

    /// Last point of the curve.
    fn end(&self) -> Point2<f64> {
        self.point_at(1.0)
    }
}

/// One pending interval of the adaptive integration.
struct Panel {
    a: f64,
    b: f64,
    /// Speeds at `a`, the midpoint and `b`.
    f: [f64; 3],
    estimate: f64,
    tolerance: f64,
    depth: u32,
}

impl Panel {
    fn new<C: Curve2D + ?Sized>(curve: &C, a: f64, b: f64, tolerance: f64, depth: u32) -> Self {
        let speed = |t: f64| curve.derivative_at(t).norm();
        let f = [speed(a), speed(0.5 * (a + b)), speed(b)];
        Self::with_samples(a, b, f, tolerance, depth)
    }

    fn with_samples(a: f64, b: f64, f: [f64; 3], tolerance: f64, depth: u32) -> Self {
        let estimate = (b - a) / 6.0 * (f[0] + 4.0 * f[1] + f[2]);
        Self {
            a,
            b,
            f,
            estimate,
            tolerance,
            depth,
        }
    }
}

/// Adaptive Simpson integration of `|B'(t)|` over `[a, b]`.
///
/// Works from an explicit stack and reuses the three speed samples of each
/// panel when it is split.
fn integrate_speed<C: Curve2D + ?Sized>(curve: &C, a: f64, b: f64) -> f64 {
    if b <= a {
        return 0.0;
    }

    let mut total = 0.0;
    let mut stack = vec![Panel::new(curve, a, b, ARC_LENGTH_TOLERANCE, 0)];

    while let Some(panel) = stack.pop() {
        let mid = 0.5 * (panel.a + panel.b);
        let quarter = curve.derivative_at(0.5 * (panel.a + mid)).norm();
        let three_quarter = curve.derivative_at(0.5 * (mid + panel.b)).norm();

        let half_tolerance = panel.tolerance * 0.5;
        let left = Panel::with_samples(
            panel.a,
            mid,
            [panel.f[0], quarter, panel.f[1]],
            half_tolerance,
            panel.depth + 1,
        );
        let right = Panel::with_samples(
            mid,
            panel.b,
            [panel.f[1], three_quarter, panel.f[2]],
            half_tolerance,
            panel.depth + 1,
        );

        let refined = left.estimate + right.estimate;
        let error = refined - panel.estimate;
        if panel.depth >= ARC_LENGTH_MAX_DEPTH || error.abs() < 15.0 * panel.tolerance {
            // Richardson extrapolation
            total += refined + error / 15.0;
        } else {
            stack.push(right);
            stack.push(left);
        }
    }

    total
}
