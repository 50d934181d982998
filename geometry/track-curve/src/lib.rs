//! Authored track shapes for racing circuits.
//!
//! A race track is authored as a planar Bézier spline: an ordered list of
//! control nodes, each carrying a pair of tangent handles that may be linked
//! to keep the curve smooth through the node. This crate provides:
//!
//! - [`TrackCurve`] - The authored shape (open course or closed circuit)
//! - [`BezierNode`] - A control node with incoming/outgoing handles
//! - [`CubicBezier2`] - A single planar cubic segment
//! - [`Curve2D`] - Evaluation trait (position, derivatives, curvature, arc length)
//!
//! # Example
//!
//! ```
//! use track_curve::{BezierNode, Curve2D, TrackCurve};
//! use nalgebra::{Point2, Vector2};
//!
//! let curve = TrackCurve::new(
//!     vec![
//!         BezierNode::linked(Point2::new(0.0, 0.0), Vector2::new(10.0, 0.0)),
//!         BezierNode::linked(Point2::new(30.0, 0.0), Vector2::new(10.0, 0.0)),
//!     ],
//!     false,
//! )
//! .unwrap();
//!
//! let length = curve.arc_length();
//! assert!((length - 30.0).abs() < 1e-6);
//! ```
//!
//! # Parameterization
//!
//! The native parameter `t ∈ [0, 1]` is spread evenly over the segments, so
//! it does not advance at constant speed. Arc-length reparameterization is
//! the job of the consumer (see the `track-geometry` crate).
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::suboptimal_flops
)]

mod bezier;
mod error;
mod node;
mod spline;
mod traits;

pub use bezier::CubicBezier2;
pub use error::CurveError;
pub use node::BezierNode;
pub use spline::TrackCurve;
pub use traits::Curve2D;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

/// Result type for curve operations.
pub type Result<T> = std::result::Result<T, CurveError>;
