//! Per-lane obstacle intervals.

use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};
use crate::settings::ProgressMode;

/// Tolerance on the exclusive end bound, so that authored decimal ends such
/// as `0.2 + 0.1` exclude `0.3`. The start bound is exact.
const BOUND_EPSILON: f64 = 1e-9;

/// A stretch of one lane, in progress units, that holds an obstacle.
///
/// The interval is half-open: `[start_progress, start_progress + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleInterval {
    /// Progress at which the obstacle begins, in `[0, 1)`.
    pub start_progress: f64,
    /// Progress span covered by the obstacle.
    pub length: f64,
}

impl ObstacleInterval {
    /// Create an interval, validating it for `lane` (1-based, for error
    /// reporting only).
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidObstacle`] if the start is outside
    /// `[0, 1)` or the length is not positive and finite.
    pub fn new(lane: usize, start_progress: f64, length: f64) -> TrackResult<Self> {
        let interval = Self {
            start_progress,
            length,
        };
        interval.validate(lane)?;
        Ok(interval)
    }

    /// Check the interval's invariants.
    ///
    /// # Errors
    ///
    /// See [`ObstacleInterval::new`].
    pub fn validate(&self, lane: usize) -> TrackResult<()> {
        if !self.start_progress.is_finite() || !(0.0..1.0).contains(&self.start_progress) {
            return Err(TrackError::invalid_obstacle(
                lane,
                format!("start progress {} outside [0, 1)", self.start_progress),
            ));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(TrackError::invalid_obstacle(
                lane,
                format!("length {} must be positive", self.length),
            ));
        }
        Ok(())
    }

    /// Progress at which the obstacle ends (exclusive).
    #[must_use]
    pub fn end_progress(&self) -> f64 {
        self.start_progress + self.length
    }

    /// Half-open containment test.
    ///
    /// Under [`ProgressMode::Wrap`] an interval reaching past `1.0` also
    /// covers the start of the next lap.
    #[must_use]
    pub fn contains(&self, progress: f64, mode: ProgressMode) -> bool {
        let p = mode.normalize(progress);
        let end = self.end_progress() - BOUND_EPSILON;
        if self.start_progress <= p && p < end {
            return true;
        }
        mode == ProgressMode::Wrap && end > 1.0 && p + 1.0 < end
    }
}

/// Obstacle intervals for every lane of a track.
///
/// Lanes are addressed 1-based. The registry always holds exactly
/// `lane_count` lists, some possibly empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleRegistry {
    lanes: Vec<Vec<ObstacleInterval>>,
}

impl ObstacleRegistry {
    /// An empty registry for `lane_count` lanes.
    #[must_use]
    pub fn new(lane_count: usize) -> Self {
        Self {
            lanes: vec![Vec::new(); lane_count],
        }
    }

    /// Build from authored per-lane lists, padding missing lanes.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::ObstacleLaneOutOfRange`] if more lists than
    /// lanes are given, or [`TrackError::InvalidObstacle`] for a malformed
    /// interval.
    pub fn from_lanes(lane_count: usize, lanes: Vec<Vec<ObstacleInterval>>) -> TrackResult<Self> {
        if lanes.len() > lane_count {
            return Err(TrackError::obstacle_lane_out_of_range(lanes.len(), lane_count));
        }
        for (index, intervals) in lanes.iter().enumerate() {
            for interval in intervals {
                interval.validate(index + 1)?;
            }
        }

        let mut lanes = lanes;
        lanes.resize_with(lane_count, Vec::new);
        Ok(Self { lanes })
    }

    /// Number of lanes tracked.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Add an obstacle to `lane`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::ObstacleLaneOutOfRange`] for an unknown lane.
    pub fn add(&mut self, lane: usize, interval: ObstacleInterval) -> TrackResult<()> {
        let lane_count = self.lanes.len();
        let Some(list) = lane.checked_sub(1).and_then(|i| self.lanes.get_mut(i)) else {
            return Err(TrackError::obstacle_lane_out_of_range(lane, lane_count));
        };
        interval.validate(lane)?;
        list.push(interval);
        Ok(())
    }

    /// The intervals on `lane`, or an empty slice for an unknown lane.
    #[must_use]
    pub fn intervals(&self, lane: usize) -> &[ObstacleInterval] {
        lane.checked_sub(1)
            .and_then(|i| self.lanes.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether any obstacle on `lane` covers `progress`.
    #[must_use]
    pub fn exists_on_lane(&self, lane: usize, progress: f64, mode: ProgressMode) -> bool {
        self.intervals(lane)
            .iter()
            .any(|interval| interval.contains(progress, mode))
    }

    /// Whether any lane has an obstacle covering `progress`.
    #[must_use]
    pub fn exists(&self, progress: f64, mode: ProgressMode) -> bool {
        (1..=self.lanes.len()).any(|lane| self.exists_on_lane(lane, progress, mode))
    }
}
