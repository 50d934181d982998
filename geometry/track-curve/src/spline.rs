//! The authored track shape.
//!
//! A [`TrackCurve`] is an ordered list of [`BezierNode`]s joined by cubic
//! segments, optionally closed into a loop. The native parameter `t ∈ [0, 1]`
//! is split evenly across segments regardless of their lengths; consumers
//! that need distance-uniform evaluation build an arc-length table on top.

use crate::bezier::CubicBezier2;
use crate::{BezierNode, Curve2D, CurveError, Result};
use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An authored 2D track shape.
///
/// The curve is mutable while authoring. Anything handed out at runtime
/// should be an owned copy (`Clone` copies every node), so later edits never
/// alias a runtime consumer's view.
///
/// # Example
///
/// ```
/// use track_curve::{Curve2D, TrackCurve};
/// use nalgebra::Point2;
///
/// let curve = TrackCurve::through_points(
///     &[Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(20.0, 5.0)],
///     false,
/// )
/// .unwrap();
///
/// assert_eq!(curve.segment_count(), 2);
/// assert!((curve.start().x - 0.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackCurve {
    nodes: Vec<BezierNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    closed: bool,
}

impl TrackCurve {
    /// Create a curve from nodes.
    ///
    /// Any node count is accepted so that partially authored tracks can be
    /// represented; fewer than two nodes simply yields no segments.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonFinite`] if any node has a NaN or infinite
    /// coordinate.
    pub fn new(nodes: Vec<BezierNode>, closed: bool) -> Result<Self> {
        if let Some(index) = nodes.iter().position(|n| !n.is_finite()) {
            return Err(CurveError::non_finite(index, "position or handle"));
        }
        Ok(Self { nodes, closed })
    }

    /// Create a curve with no nodes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a curve through the given points with Catmull-Rom style
    /// linked handles.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 2 points are provided or a point is not
    /// finite.
    pub fn through_points(points: &[Point2<f64>], closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(CurveError::insufficient_nodes(2, points.len()));
        }

        let n = points.len();
        let nodes = (0..n)
            .map(|i| {
                let prev = if i > 0 {
                    Some(points[i - 1])
                } else if closed {
                    Some(points[n - 1])
                } else {
                    None
                };
                let next = if i + 1 < n {
                    Some(points[i + 1])
                } else if closed {
                    Some(points[0])
                } else {
                    None
                };

                let tangent = match (prev, next) {
                    (Some(p), Some(q)) => (q - p) * 0.5,
                    (None, Some(q)) => q - points[i],
                    (Some(p), None) => points[i] - p,
                    (None, None) => Vector2::zeros(),
                };

                BezierNode::linked(points[i], tangent / 3.0)
            })
            .collect();

        Self::new(nodes, closed)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the curve has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the last node connects back to the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Open or close the loop.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// All nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[BezierNode] {
        &self.nodes
    }

    /// A single node.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&BezierNode> {
        self.nodes.get(index)
    }

    /// Append a node at the end of the curve.
    pub fn push_node(&mut self, node: BezierNode) {
        self.nodes.push(node);
    }

    /// Insert a node before `index` (`index == len()` appends).
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NodeOutOfRange`] if `index > len()`.
    pub fn insert_node(&mut self, index: usize, node: BezierNode) -> Result<()> {
        if index > self.nodes.len() {
            return Err(CurveError::node_out_of_range(index, self.nodes.len()));
        }
        self.nodes.insert(index, node);
        Ok(())
    }

    /// Remove and return the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NodeOutOfRange`] if there is no such node.
    pub fn remove_node(&mut self, index: usize) -> Result<BezierNode> {
        if index >= self.nodes.len() {
            return Err(CurveError::node_out_of_range(index, self.nodes.len()));
        }
        Ok(self.nodes.remove(index))
    }

    /// Move a node, keeping its handles.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NodeOutOfRange`] if there is no such node.
    pub fn set_node_position(&mut self, index: usize, position: Point2<f64>) -> Result<()> {
        self.node_mut(index)?.position = position;
        Ok(())
    }

    /// Set a node's outgoing handle (mirrored when its handles are linked).
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NodeOutOfRange`] if there is no such node.
    pub fn set_next_handle(&mut self, index: usize, handle: Vector2<f64>) -> Result<()> {
        self.node_mut(index)?.set_next_handle(handle);
        Ok(())
    }

    /// Set a node's incoming handle (mirrored when its handles are linked).
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NodeOutOfRange`] if there is no such node.
    pub fn set_prev_handle(&mut self, index: usize, handle: Vector2<f64>) -> Result<()> {
        self.node_mut(index)?.set_prev_handle(handle);
        Ok(())
    }

    /// Link or unlink a node's handles.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NodeOutOfRange`] if there is no such node.
    pub fn set_link_handles(&mut self, index: usize, linked: bool) -> Result<()> {
        self.node_mut(index)?.link_handles = linked;
        Ok(())
    }

    fn node_mut(&mut self, index: usize) -> Result<&mut BezierNode> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or_else(|| CurveError::node_out_of_range(index, len))
    }

    /// Number of cubic segments.
    ///
    /// Zero with fewer than two nodes; `len()` when closed, `len() - 1` otherwise.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match self.nodes.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Whether the curve has at least one segment to evaluate.
    #[must_use]
    pub fn is_evaluable(&self) -> bool {
        self.segment_count() > 0
    }

    /// The cubic segment leaving node `index`.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<CubicBezier2> {
        if index >= self.segment_count() {
            return None;
        }
        let a = &self.nodes[index];
        let b = &self.nodes[(index + 1) % self.nodes.len()];
        Some(CubicBezier2::new(
            a.position,
            a.next_control_point(),
            b.prev_control_point(),
            b.position,
        ))
    }

    /// Iterate over all segments in order.
    pub fn segments(&self) -> impl Iterator<Item = CubicBezier2> + '_ {
        (0..self.segment_count()).filter_map(|i| self.segment(i))
    }

    /// Find which segment contains parameter `t` and the local parameter.
    fn segment_at(&self, t: f64) -> Option<(CubicBezier2, f64)> {
        let count = self.segment_count();
        if count == 0 {
            return None;
        }

        let scaled = t.clamp(0.0, 1.0) * count as f64;
        let index = (scaled.floor() as usize).min(count - 1);
        let local_t = scaled - index as f64;

        self.segment(index).map(|seg| (seg, local_t))
    }
}

impl Curve2D for TrackCurve {
    fn point_at(&self, t: f64) -> Point2<f64> {
        match self.segment_at(t) {
            Some((seg, local_t)) => seg.point_at(local_t),
            None => self
                .nodes
                .first()
                .map_or_else(Point2::origin, |n| n.position),
        }
    }

    fn tangent_at(&self, t: f64) -> Vector2<f64> {
        self.segment_at(t)
            .map_or_else(Vector2::x, |(seg, local_t)| seg.tangent_at(local_t))
    }

    fn derivative_at(&self, t: f64) -> Vector2<f64> {
        // Chain rule: each segment spans 1/count of the global parameter
        let count = self.segment_count() as f64;
        self.segment_at(t)
            .map_or_else(Vector2::zeros, |(seg, local_t)| {
                seg.derivative_at(local_t) * count
            })
    }

    fn second_derivative_at(&self, t: f64) -> Vector2<f64> {
        let count = self.segment_count() as f64;
        self.segment_at(t)
            .map_or_else(Vector2::zeros, |(seg, local_t)| {
                seg.second_derivative_at(local_t) * (count * count)
            })
    }

    fn arc_length(&self) -> f64 {
        self.segments().map(|seg| seg.arc_length()).sum()
    }
}
