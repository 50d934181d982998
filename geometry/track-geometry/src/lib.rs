//! Track geometry for multi-lane racing circuits.
//!
//! Turns an authored [`TrackCurve`] into world-space poses for any race
//! progress and lane, and answers curvature and obstacle queries:
//!
//! - [`TrackGeometry`] - The track facade (lanes, poses, curvature, obstacles)
//! - [`PoseCalculator`] - Arc-length reparameterized pose evaluation
//! - [`ObstacleRegistry`] - Per-lane half-open obstacle intervals
//! - [`TrackAuthoring`] / [`TrackSettings`] - Construction data
//! - [`TrackEvent`] / [`TrackSubscription`] - Change notifications
//!
//! # Quick Start
//!
//! ```
//! use track_geometry::{ObstacleInterval, TrackAuthoring, TrackCurve, TrackGeometry};
//! use nalgebra::Point2;
//!
//! let curve = TrackCurve::through_points(
//!     &[Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
//!     false,
//! )?;
//! let authoring = TrackAuthoring::new(curve, 3)
//!     .with_obstacles(vec![vec![ObstacleInterval::new(1, 0.2, 0.1)?]]);
//! let track = TrackGeometry::new(authoring)?;
//!
//! assert!(track.obstacle_exists_on_lane(1, 0.25));
//! assert!(!track.obstacle_exists_on_lane(1, 0.30));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Coordinates
//!
//! Track-local space is Y-up. Curve point `(x, y)` becomes local
//! `(x, 0, y)`, lateral offsets run along `forward × up`, and the track's
//! [`WorldTransform`] maps the result into world space.
//!
//! # Threading
//!
//! A track is single-threaded: subscriptions use `Rc`, so [`TrackGeometry`]
//! is neither `Send` nor `Sync`.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::suboptimal_flops
)]

mod calculator;
mod error;
mod events;
mod obstacle;
mod pose;
mod settings;
mod track;

pub use calculator::{PoseCalculator, SIMULATION_STEPS};
pub use error::{TrackError, TrackResult};
pub use events::{TrackEvent, TrackEvents, TrackSubscription};
pub use obstacle::{ObstacleInterval, ObstacleRegistry};
pub use pose::{DEFAULT_FORWARD, Pose, UP, WorldTransform};
pub use settings::{Environment, ProgressMode, TrackAuthoring, TrackSettings};
pub use track::{TrackGeometry, TrackInfo};

// Re-export the curve types tracks are authored with
pub use track_curve::{BezierNode, Curve2D, CurveError, TrackCurve};
