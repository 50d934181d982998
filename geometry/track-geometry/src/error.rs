//! Error types for track construction.
//!
//! Queries on a constructed track never fail; these errors only surface
//! while turning authoring data into a [`TrackGeometry`](crate::TrackGeometry).

use thiserror::Error;
use track_curve::CurveError;

/// Errors that can occur while building or authoring a track.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackError {
    /// A track needs at least one lane.
    #[error("invalid lane count {0}: must be at least 1")]
    InvalidLaneCount(usize),

    /// Lane width must be positive and finite.
    #[error("invalid lane width {0}: must be positive")]
    InvalidLaneWidth(f64),

    /// Curvature sampling step must be positive and finite.
    #[error("invalid curvature step delta {0}: must be positive")]
    InvalidCurvatureStep(f64),

    /// Centre offset fraction must be finite.
    #[error("invalid centre offset fraction {0}: must be finite")]
    InvalidCenterOffset(f64),

    /// An obstacle interval is malformed.
    #[error("invalid obstacle on lane {lane}: {reason}")]
    InvalidObstacle {
        /// 1-based lane the obstacle was authored on.
        lane: usize,
        /// What is wrong with the interval.
        reason: String,
    },

    /// Obstacle data addresses a lane the track does not have.
    #[error("obstacle lane {lane} out of range for track with {lane_count} lanes")]
    ObstacleLaneOutOfRange {
        /// 1-based lane index.
        lane: usize,
        /// Number of lanes on the track.
        lane_count: usize,
    },

    /// The authored curve is invalid.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl TrackError {
    /// Create an invalid obstacle error.
    #[must_use]
    pub fn invalid_obstacle(lane: usize, reason: impl Into<String>) -> Self {
        Self::InvalidObstacle {
            lane,
            reason: reason.into(),
        }
    }

    /// Create an obstacle lane out of range error.
    #[must_use]
    pub const fn obstacle_lane_out_of_range(lane: usize, lane_count: usize) -> Self {
        Self::ObstacleLaneOutOfRange { lane, lane_count }
    }

    /// Check if this error concerns obstacle data.
    #[must_use]
    pub fn is_obstacle_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidObstacle { .. } | Self::ObstacleLaneOutOfRange { .. }
        )
    }
}

/// Result type for track operations.
pub type TrackResult<T> = std::result::Result<T, TrackError>;
