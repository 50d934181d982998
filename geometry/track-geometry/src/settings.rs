//! Track configuration and authoring data.

use std::fmt;

use serde::{Deserialize, Serialize};
use track_curve::TrackCurve;

use crate::error::{TrackError, TrackResult};
use crate::obstacle::ObstacleInterval;
use crate::pose::WorldTransform;

/// How progress values outside `[0, 1]` are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMode {
    /// Progress wraps at `1.0` (closed circuits, multi-lap races).
    #[default]
    Wrap,
    /// Progress is clamped to `[0, 1]` (open point-to-point courses).
    Clamp,
}

impl ProgressMode {
    /// Map `progress` into `[0, 1]` (or `[0, 1)` when wrapping).
    #[must_use]
    pub fn normalize(self, progress: f64) -> f64 {
        if !progress.is_finite() {
            return 0.0;
        }
        match self {
            Self::Wrap => {
                let p = progress.rem_euclid(1.0);
                // rem_euclid can round up to exactly 1.0 for tiny negatives
                if p >= 1.0 { 0.0 } else { p }
            }
            Self::Clamp => progress.clamp(0.0, 1.0),
        }
    }

    /// Mode implied by the shape alone: closed curves wrap, open ones clamp.
    #[must_use]
    pub const fn for_curve(closed: bool) -> Self {
        if closed { Self::Wrap } else { Self::Clamp }
    }

    /// Signed progress difference `to - from`.
    ///
    /// When wrapping this is the shortest way around the circuit, in
    /// `[-0.5, 0.5)`.
    #[must_use]
    pub fn difference(self, from: f64, to: f64) -> f64 {
        match self {
            Self::Wrap => (to - from + 0.5).rem_euclid(1.0) - 0.5,
            Self::Clamp => to - from,
        }
    }
}

/// Numeric track parameters.
///
/// # Example
///
/// ```
/// use track_geometry::{ProgressMode, TrackSettings};
///
/// let settings = TrackSettings::default();
/// assert!((settings.lane_width - 2.0).abs() < 1e-12);
/// assert_eq!(settings.progress_mode, None);
///
/// let sprint = TrackSettings::point_to_point().with_lane_width(3.5);
/// assert_eq!(sprint.progress_mode, Some(ProgressMode::Clamp));
/// assert!(sprint.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Lateral distance between adjacent lane centres.
    pub lane_width: f64,

    /// Distance ahead sampled when measuring curvature.
    pub curvature_step_delta: f64,

    /// Progress interpretation outside `[0, 1]`.
    ///
    /// `None` follows the curve: closed circuits wrap, open courses clamp.
    pub progress_mode: Option<ProgressMode>,

    /// Shifts every lane by `-lane_width * lane_count * fraction`.
    pub center_offset_fraction: f64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            lane_width: 2.0,
            curvature_step_delta: 1.0,
            progress_mode: None,
            center_offset_fraction: 0.0,
        }
    }
}

impl TrackSettings {
    /// Settings for a closed, lapped circuit. Progress always wraps.
    #[must_use]
    pub const fn circuit() -> Self {
        Self {
            lane_width: 2.0,
            curvature_step_delta: 1.0,
            progress_mode: Some(ProgressMode::Wrap),
            center_offset_fraction: 0.0,
        }
    }

    /// Settings for an open course with a distinct start and finish.
    /// Progress always clamps.
    #[must_use]
    pub const fn point_to_point() -> Self {
        Self {
            lane_width: 2.0,
            curvature_step_delta: 1.0,
            progress_mode: Some(ProgressMode::Clamp),
            center_offset_fraction: 0.0,
        }
    }

    /// Set the lane width.
    #[must_use]
    pub const fn with_lane_width(mut self, width: f64) -> Self {
        self.lane_width = width;
        self
    }

    /// Set the curvature sampling distance.
    #[must_use]
    pub const fn with_curvature_step_delta(mut self, delta: f64) -> Self {
        self.curvature_step_delta = delta;
        self
    }

    /// Force a progress mode regardless of the curve.
    #[must_use]
    pub const fn with_progress_mode(mut self, mode: ProgressMode) -> Self {
        self.progress_mode = Some(mode);
        self
    }

    /// The progress mode in effect for `curve`.
    ///
    /// An explicit mode wins; otherwise it follows
    /// [`TrackCurve::is_closed`]. A track without a curve wraps.
    #[must_use]
    pub fn resolve_progress_mode(&self, curve: Option<&TrackCurve>) -> ProgressMode {
        self.progress_mode.unwrap_or_else(|| {
            curve.map_or(ProgressMode::Wrap, |c| ProgressMode::for_curve(c.is_closed()))
        })
    }

    /// Set the centre offset fraction.
    #[must_use]
    pub const fn with_center_offset_fraction(mut self, fraction: f64) -> Self {
        self.center_offset_fraction = fraction;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the matching [`TrackError`] variant for a non-positive or
    /// non-finite lane width or curvature step, or a non-finite centre
    /// offset fraction.
    pub fn validate(&self) -> TrackResult<()> {
        if !self.lane_width.is_finite() || self.lane_width <= 0.0 {
            return Err(TrackError::InvalidLaneWidth(self.lane_width));
        }
        if !self.curvature_step_delta.is_finite() || self.curvature_step_delta <= 0.0 {
            return Err(TrackError::InvalidCurvatureStep(self.curvature_step_delta));
        }
        if !self.center_offset_fraction.is_finite() {
            return Err(TrackError::InvalidCenterOffset(self.center_offset_fraction));
        }
        Ok(())
    }
}

/// Name of the scenery set a track is raced in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    /// Create an environment tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to build a [`TrackGeometry`](crate::TrackGeometry).
///
/// This is the form a content pipeline hands over; it is deserializable but
/// no file format is prescribed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackAuthoring {
    /// The authored shape. `None` yields a track whose poses are all zero.
    pub curve: Option<TrackCurve>,

    /// Number of lanes (at least 1).
    pub lane_count: usize,

    /// Numeric parameters.
    pub settings: TrackSettings,

    /// Obstacle intervals per lane, lane 1 first. Missing lanes are empty.
    pub obstacles: Vec<Vec<ObstacleInterval>>,

    /// Environment tag.
    pub environment: Environment,

    /// Local-to-world transform. `None` yields zero poses until one is set.
    pub transform: Option<WorldTransform>,
}

impl Default for TrackAuthoring {
    fn default() -> Self {
        Self {
            curve: None,
            lane_count: 1,
            settings: TrackSettings::default(),
            obstacles: Vec::new(),
            environment: Environment::default(),
            transform: Some(WorldTransform::identity()),
        }
    }
}

impl TrackAuthoring {
    /// Authoring data for `curve` with `lane_count` lanes and defaults
    /// elsewhere.
    #[must_use]
    pub fn new(curve: TrackCurve, lane_count: usize) -> Self {
        Self {
            curve: Some(curve),
            lane_count,
            ..Self::default()
        }
    }

    /// Set the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: TrackSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the per-lane obstacle lists.
    #[must_use]
    pub fn with_obstacles(mut self, obstacles: Vec<Vec<ObstacleInterval>>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Set the environment tag.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set (or clear) the world transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Option<WorldTransform>) -> Self {
        self.transform = transform;
        self
    }
}
