//! The track facade: poses by lane, curvature and obstacles.

use nalgebra::Vector3;
use tracing::{debug, info, warn};
use track_curve::{CurveError, TrackCurve};

use crate::calculator::{PoseCalculator, SIMULATION_STEPS};
use crate::error::{TrackError, TrackResult};
use crate::events::{TrackEvent, TrackEvents, TrackSubscription};
use crate::obstacle::{ObstacleInterval, ObstacleRegistry};
use crate::pose::{DEFAULT_FORWARD, Pose, WorldTransform};
use crate::settings::{Environment, ProgressMode, TrackAuthoring, TrackSettings};

/// Summary data about a track.
///
/// Consumers that only need lane layout and obstacle data can depend on
/// this instead of the full [`TrackGeometry`].
pub trait TrackInfo {
    /// Number of lanes.
    fn lane_count(&self) -> usize;

    /// Track length in local units.
    fn length(&self) -> f64;

    /// Obstacle intervals on a 1-based lane (empty for unknown lanes).
    fn obstacle_intervals(&self, lane: usize) -> &[ObstacleInterval];
}

/// A race track built from authoring data.
///
/// Progress is the fraction of the track length travelled, so equal
/// progress increments cover equal distance. Lanes are numbered from 1.
///
/// # Cache contract
///
/// Curve edits made through [`edit_curve`](Self::edit_curve) or
/// [`set_curve`](Self::set_curve) raise [`TrackEvent::Dirty`] but do not
/// rebuild the arc-length table. Until [`rederive`](Self::rederive) is
/// called, [`length`](Self::length) and every pose query keep answering
/// for the previous shape. [`is_stale`](Self::is_stale) reports whether a
/// rederive is pending.
///
/// # Example
///
/// ```
/// use track_geometry::{TrackAuthoring, TrackCurve, TrackGeometry};
/// use nalgebra::Point2;
///
/// let curve = TrackCurve::through_points(
///     &[Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
///     false,
/// )?;
/// let track = TrackGeometry::new(TrackAuthoring::new(curve, 3))?;
///
/// assert!((track.length() - 100.0).abs() < 1e-6);
/// let pose = track.pose_on_lane(2, 0.5);
/// assert!((pose.position.x - 50.0).abs() < 1e-6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct TrackGeometry {
    curve: Option<TrackCurve>,
    lane_count: usize,
    settings: TrackSettings,
    progress_mode: ProgressMode,
    transform: Option<WorldTransform>,
    obstacles: ObstacleRegistry,
    environment: Environment,
    calculator: PoseCalculator,
    stale: bool,
    events: TrackEvents,
}

impl TrackGeometry {
    /// Build a track from authoring data.
    ///
    /// A missing or single-node curve, or a missing transform, is accepted:
    /// such a track answers every pose query with [`Pose::ZERO`].
    ///
    /// # Errors
    ///
    /// Returns an error if the lane count is zero, a setting is out of
    /// range, a curve node is non-finite, or the obstacle data is malformed.
    pub fn new(authoring: TrackAuthoring) -> TrackResult<Self> {
        let TrackAuthoring {
            curve,
            lane_count,
            settings,
            obstacles,
            environment,
            transform,
        } = authoring;

        if lane_count == 0 {
            return Err(TrackError::InvalidLaneCount(lane_count));
        }
        settings.validate()?;
        if let Some(curve) = &curve {
            validate_curve(curve)?;
        }
        let obstacles = ObstacleRegistry::from_lanes(lane_count, obstacles)?;

        let calculator = build_calculator(curve.as_ref());
        let progress_mode = settings.resolve_progress_mode(curve.as_ref());

        if calculator.is_degenerate() {
            warn!(
                nodes = curve.as_ref().map_or(0, TrackCurve::len),
                "Track curve is degenerate, poses will be zero"
            );
        }
        if transform.is_none() {
            warn!("Track has no world transform, poses will be zero");
        }

        info!(
            lane_count,
            lane_width = settings.lane_width,
            ?progress_mode,
            length = calculator.track_length(),
            environment = %environment,
            "Track geometry built"
        );

        Ok(Self {
            curve,
            lane_count,
            settings,
            progress_mode,
            transform,
            obstacles,
            environment,
            calculator,
            stale: false,
            events: TrackEvents::new(),
        })
    }

    /// Build a track from a curve with default settings and the identity
    /// transform.
    ///
    /// Progress wraps on a closed curve and clamps on an open one.
    ///
    /// # Errors
    ///
    /// See [`TrackGeometry::new`].
    pub fn from_curve(curve: TrackCurve, lane_count: usize) -> TrackResult<Self> {
        Self::new(TrackAuthoring::new(curve, lane_count))
    }

    // ---- Layout ----

    /// Number of lanes.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Distance between adjacent lane centres.
    #[must_use]
    pub fn lane_width(&self) -> f64 {
        self.settings.lane_width
    }

    /// Numeric track parameters.
    #[must_use]
    pub fn settings(&self) -> &TrackSettings {
        &self.settings
    }

    /// How out-of-range progress is interpreted.
    ///
    /// Resolved from the settings, or from whether the curve is closed when
    /// the settings leave it open.
    #[must_use]
    pub fn progress_mode(&self) -> ProgressMode {
        self.progress_mode
    }

    /// Environment tag.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Progress spanned by one row of the arc-length table.
    #[must_use]
    pub fn step(&self) -> f64 {
        1.0 / SIMULATION_STEPS as f64
    }

    /// Lateral offset of a 1-based lane, fractional lanes included.
    ///
    /// The mapping is linear in `lane`, so a fractional lane lies between
    /// its two bracketing integer lanes. Lanes outside `[1, lane_count]`
    /// extrapolate past the outermost lanes.
    #[must_use]
    pub fn lane_offset(&self, lane: f64) -> f64 {
        let n = self.lane_count as f64;
        (lane - 0.5 - n / 2.0) * self.settings.lane_width + self.center_offset()
    }

    /// Lateral offset of the track centerline.
    #[must_use]
    pub fn center_offset(&self) -> f64 {
        -self.settings.lane_width * self.lane_count as f64 * self.settings.center_offset_fraction
    }

    // ---- Poses ----

    /// Track length in local units.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.calculator.track_length()
    }

    /// Pose on the centerline.
    #[must_use]
    pub fn pose(&self, progress: f64) -> Pose {
        self.pose_with_offset(progress, self.center_offset())
    }

    /// Pose on a 1-based lane.
    #[must_use]
    pub fn pose_on_lane(&self, lane: usize, progress: f64) -> Pose {
        self.pose_on_fractional_lane(lane as f64, progress)
    }

    /// Pose on a fractional lane, blending neighbouring lane offsets.
    #[must_use]
    pub fn pose_on_fractional_lane(&self, lane: f64, progress: f64) -> Pose {
        self.pose_with_offset(progress, self.lane_offset(lane))
    }

    /// Pose at an explicit lateral offset from the curve.
    #[must_use]
    pub fn pose_with_offset(&self, progress: f64, lateral_offset: f64) -> Pose {
        let progress = self.progress_mode.normalize(progress);
        self.calculator
            .pose(progress, lateral_offset, self.transform.as_ref())
    }

    // ---- Curvature ----

    /// How sharply the track turns just after `progress`, in `[0, 1]`.
    ///
    /// Compares the direction of travel at `progress` with the direction
    /// `curvature_step_delta` further on: `0` is straight, `1` a full
    /// reversal. Measured in track-local space, so the world transform does
    /// not affect it.
    #[must_use]
    pub fn curvature(&self, progress: f64) -> f64 {
        if self.calculator.is_degenerate() {
            return 0.0;
        }
        let mode = self.progress_mode;
        let epsilon = self.settings.curvature_step_delta / self.length().max(f64::EPSILON);

        let here = self.calculator.local_pose(mode.normalize(progress), 0.0);
        let ahead = self
            .calculator
            .local_pose(mode.normalize(progress + epsilon), 0.0);

        (0.5 - 0.5 * here.forward.dot(&ahead.forward)).clamp(0.0, 1.0)
    }

    /// Turn rate just after `progress`, in degrees per unit distance.
    #[must_use]
    pub fn curvature_angle(&self, progress: f64) -> f64 {
        let cosine = (1.0 - 2.0 * self.curvature(progress)).clamp(-1.0, 1.0);
        cosine.acos().to_degrees() / self.settings.curvature_step_delta
    }

    // ---- Obstacles ----

    /// Whether an obstacle on `lane` covers `progress`.
    ///
    /// Unknown lanes have no obstacles.
    #[must_use]
    pub fn obstacle_exists_on_lane(&self, lane: usize, progress: f64) -> bool {
        self.obstacles
            .exists_on_lane(lane, progress, self.progress_mode)
    }

    /// Whether an obstacle on any lane covers `progress`.
    #[must_use]
    pub fn obstacle_exists(&self, progress: f64) -> bool {
        self.obstacles.exists(progress, self.progress_mode)
    }

    /// Obstacle intervals on a 1-based lane.
    #[must_use]
    pub fn obstacle_intervals(&self, lane: usize) -> &[ObstacleInterval] {
        self.obstacles.intervals(lane)
    }

    /// Place an obstacle on a 1-based lane.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown lane or a malformed interval.
    pub fn add_obstacle(&mut self, lane: usize, interval: ObstacleInterval) -> TrackResult<()> {
        self.obstacles.add(lane, interval)
    }

    // ---- Shape and transform ----

    /// An owned copy of the authored curve.
    #[must_use]
    pub fn track_shape(&self) -> Option<TrackCurve> {
        self.curve.clone()
    }

    /// Edit the authored curve in place.
    ///
    /// Subscribers receive [`TrackEvent::Dirty`]; the arc-length table is
    /// left stale until [`rederive`](Self::rederive).
    pub fn edit_curve<R>(&mut self, edit: impl FnOnce(&mut TrackCurve) -> R) -> R {
        let result = edit(self.curve.get_or_insert_with(TrackCurve::empty));
        self.progress_mode = self.settings.resolve_progress_mode(self.curve.as_ref());
        self.mark_dirty();
        result
    }

    /// Replace the authored curve.
    ///
    /// # Errors
    ///
    /// Returns an error if a node of the new curve is non-finite; the track
    /// is left unchanged in that case.
    pub fn set_curve(&mut self, curve: Option<TrackCurve>) -> TrackResult<()> {
        if let Some(curve) = &curve {
            validate_curve(curve)?;
        }
        self.curve = curve;
        self.progress_mode = self.settings.resolve_progress_mode(self.curve.as_ref());
        self.mark_dirty();
        Ok(())
    }

    /// Rebuild the arc-length table from the current curve.
    ///
    /// A curve left with a non-finite node by [`edit_curve`](Self::edit_curve)
    /// is treated as degenerate, so every pose is [`Pose::ZERO`] and the
    /// length is zero until the node is repaired.
    pub fn rederive(&mut self) {
        if let Some(Err(err)) = self.curve.as_ref().map(validate_curve) {
            warn!(%err, "Edited track curve is not finite, poses will be zero");
        }
        self.calculator = build_calculator(self.curve.as_ref());
        self.stale = false;
        debug!(
            length = self.calculator.track_length(),
            samples = self.calculator.samples(),
            "Track rederived"
        );
    }

    /// Whether the curve changed since the arc-length table was built.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The pose evaluator currently in use.
    #[must_use]
    pub fn calculator(&self) -> &PoseCalculator {
        &self.calculator
    }

    /// Local-to-world transform, if any.
    #[must_use]
    pub fn transform(&self) -> Option<&WorldTransform> {
        self.transform.as_ref()
    }

    /// Replace the world transform. Takes effect on the next query.
    pub fn set_transform(&mut self, transform: Option<WorldTransform>) {
        self.transform = transform;
    }

    /// World-space direction of the track's local `+Z` axis.
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.transform
            .as_ref()
            .map_or(DEFAULT_FORWARD, WorldTransform::forward)
    }

    /// World-space direction of the track's local `+X` axis.
    #[must_use]
    pub fn right(&self) -> Vector3<f64> {
        self.transform
            .as_ref()
            .map_or_else(Vector3::x, WorldTransform::right)
    }

    // ---- Notifications ----

    /// Subscribe to [`TrackEvent`]s for this track.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe<F>(&self, listener: F) -> TrackSubscription
    where
        F: FnMut(TrackEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    fn mark_dirty(&mut self) {
        self.stale = true;
        self.events.emit(TrackEvent::Dirty);
    }
}

impl TrackInfo for TrackGeometry {
    fn lane_count(&self) -> usize {
        self.lane_count
    }

    fn length(&self) -> f64 {
        self.calculator.track_length()
    }

    fn obstacle_intervals(&self, lane: usize) -> &[ObstacleInterval] {
        self.obstacles.intervals(lane)
    }
}

impl Drop for TrackGeometry {
    fn drop(&mut self) {
        self.events.emit(TrackEvent::Destroyed);
    }
}

/// Arc-length table for `curve`; missing or non-finite curves get the
/// degenerate table.
fn build_calculator(curve: Option<&TrackCurve>) -> PoseCalculator {
    match curve {
        Some(curve) if validate_curve(curve).is_ok() => PoseCalculator::new(curve),
        _ => PoseCalculator::new(&TrackCurve::empty()),
    }
}

fn validate_curve(curve: &TrackCurve) -> TrackResult<()> {
    match curve.nodes().iter().position(|node| !node.is_finite()) {
        Some(index) => Err(CurveError::non_finite(index, "node has non-finite coordinates").into()),
        None => Ok(()),
    }
}
