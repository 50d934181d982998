//! Authoring nodes of a track curve.

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A control node of a [`TrackCurve`](crate::TrackCurve).
///
/// Handles are stored as offsets from `position`. The incoming handle
/// (`prev_handle`) shapes the segment arriving at this node, the outgoing
/// handle (`next_handle`) shapes the segment leaving it.
///
/// When `link_handles` is set, editing one handle through
/// [`Self::set_next_handle`] or [`Self::set_prev_handle`] re-aims the other
/// one to point in the opposite direction, which keeps the curve tangent
/// continuous through the node. The other handle keeps its length unless it
/// was zero, in which case it mirrors the edited handle exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BezierNode {
    /// Node position.
    pub position: Point2<f64>,
    /// Whether the two handles are kept collinear.
    pub link_handles: bool,
    /// Incoming tangent handle, relative to `position`.
    pub prev_handle: Vector2<f64>,
    /// Outgoing tangent handle, relative to `position`.
    pub next_handle: Vector2<f64>,
}

impl BezierNode {
    /// Create a node with zero-length, linked handles.
    #[must_use]
    pub fn new(position: Point2<f64>) -> Self {
        Self {
            position,
            link_handles: true,
            prev_handle: Vector2::zeros(),
            next_handle: Vector2::zeros(),
        }
    }

    /// Create a node with independent handles.
    #[must_use]
    pub fn with_handles(
        position: Point2<f64>,
        prev_handle: Vector2<f64>,
        next_handle: Vector2<f64>,
    ) -> Self {
        Self {
            position,
            link_handles: false,
            prev_handle,
            next_handle,
        }
    }

    /// Create a node whose linked handles mirror `next_handle`.
    #[must_use]
    pub fn linked(position: Point2<f64>, next_handle: Vector2<f64>) -> Self {
        Self {
            position,
            link_handles: true,
            prev_handle: -next_handle,
            next_handle,
        }
    }

    /// Absolute position of the outgoing control point.
    #[must_use]
    pub fn next_control_point(&self) -> Point2<f64> {
        self.position + self.next_handle
    }

    /// Absolute position of the incoming control point.
    #[must_use]
    pub fn prev_control_point(&self) -> Point2<f64> {
        self.position + self.prev_handle
    }

    /// Set the outgoing handle, re-aiming the incoming one when linked.
    pub fn set_next_handle(&mut self, handle: Vector2<f64>) {
        self.next_handle = handle;
        if self.link_handles {
            self.prev_handle = mirrored(handle, self.prev_handle.norm());
        }
    }

    /// Set the incoming handle, re-aiming the outgoing one when linked.
    pub fn set_prev_handle(&mut self, handle: Vector2<f64>) {
        self.prev_handle = handle;
        if self.link_handles {
            self.next_handle = mirrored(handle, self.next_handle.norm());
        }
    }

    /// Whether every coordinate of the node is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|v| v.is_finite())
            && self.prev_handle.iter().all(|v| v.is_finite())
            && self.next_handle.iter().all(|v| v.is_finite())
    }
}

/// Opposite of `handle`, scaled to `length` (or full mirror when `length` is zero).
fn mirrored(handle: Vector2<f64>, length: f64) -> Vector2<f64> {
    let norm = handle.norm();
    if length <= 1e-12 || norm <= 1e-12 {
        -handle
    } else {
        -handle * (length / norm)
    }
}
