//! The adaptive framing camera.

use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use tracing::{debug, info};
use track_geometry::TrackGeometry;

use crate::entity::{EntityInfo, EntitySample};
use crate::error::CameraResult;
use crate::settings::{CameraSettings, EPSILON, Lens};
use crate::state::{CameraFrameState, FollowPhase, SyncDiagnostics};

/// Axis-aligned box in the camera's right/up plane.
#[derive(Debug, Clone, Copy)]
struct Bounds2 {
    min: Vector2<f64>,
    max: Vector2<f64>,
}

impl Bounds2 {
    fn new(point: Vector2<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn include(&mut self, point: Vector2<f64>) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    fn half_extents(&self) -> Vector2<f64> {
        (self.max - self.min) * 0.5
    }
}

/// A camera that keeps a pack of racers in frame while chasing one of them.
///
/// Each tick the camera:
///
/// 1. Fits a zoom distance around the focal entity, every entity within
///    [`inclusion_radius`](CameraSettings::inclusion_radius) of it, a
///    lookahead point on each of their lanes, and padding corners around
///    their centroid. The first fit seeds the zoom; later fits are
///    approached exponentially.
/// 2. Moves its own track progress toward the focal entity's progress with
///    a speed-matched catch-up law, snapping when the gap reaches
///    [`max_tween_length`](CameraSettings::max_tween_length).
/// 3. Places itself on the track centerline at its progress, backed off
///    along its forward axis by the zoom distance.
///
/// The camera does nothing until [`start_follow`](Self::start_follow) is
/// called, and skips ticks without a focal entity or without entities.
///
/// # Example
///
/// ```
/// use framing_camera::{CameraSettings, EntityState, FramingCamera, Lens};
/// use track_geometry::{TrackCurve, TrackGeometry};
/// use nalgebra::Point2;
///
/// let curve = TrackCurve::through_points(
///     &[Point2::new(0.0, 0.0), Point2::new(200.0, 0.0)],
///     false,
/// )?;
/// let track = TrackGeometry::from_curve(curve, 3)?;
///
/// let racer = EntityState::new(2, 30.0).with_motion(0.1, 12.0);
/// let entities = [racer];
///
/// let mut camera = FramingCamera::new(CameraSettings::default())?;
/// camera.start_follow();
/// camera.update(1.0 / 60.0, &track, &entities, entities.first(), &Lens::default());
///
/// assert!(camera.zoom().is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FramingCamera {
    settings: CameraSettings,
    rotation: UnitQuaternion<f64>,
    phase: FollowPhase,
    state: CameraFrameState,
}

impl FramingCamera {
    /// Create an idle camera looking straight down.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` fails validation.
    pub fn new(settings: CameraSettings) -> CameraResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            rotation: Self::top_down(),
            phase: FollowPhase::Idle,
            state: CameraFrameState::default(),
        })
    }

    /// Orientation looking down `-Y`, with screen right along `+X` and
    /// screen up along `+Z`.
    #[must_use]
    pub fn top_down() -> UnitQuaternion<f64> {
        UnitQuaternion::face_towards(&-Vector3::y(), &Vector3::z())
    }

    /// Set the camera orientation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Change the camera orientation. Takes effect on the next tick.
    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.rotation = rotation;
    }

    /// Camera orientation.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    /// World-space screen-right axis.
    #[must_use]
    pub fn right(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    /// World-space screen-up axis.
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// World-space viewing direction.
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Tuning in use.
    #[must_use]
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Begin framing and following. Idempotent.
    pub fn start_follow(&mut self) {
        if self.phase == FollowPhase::Idle {
            info!(
                max_tween_length = self.settings.max_tween_length,
                inclusion_radius = self.settings.inclusion_radius,
                "Framing camera following"
            );
        }
        self.phase = FollowPhase::Following;
    }

    /// Forget all smoothing state, as if freshly created. The follow phase
    /// is kept.
    pub fn reinitialize(&mut self) {
        self.state = CameraFrameState::default();
        debug!("Framing camera reinitialized");
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> FollowPhase {
        self.phase
    }

    /// Whether [`start_follow`](Self::start_follow) has been called.
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.phase == FollowPhase::Following
    }

    // ---- Tick ----

    /// Advance the camera by `dt` seconds.
    ///
    /// Call once per tick, after every entity has moved. Skipped without
    /// effect while idle, without a focal entity, with no entities, with a
    /// negative or non-finite `dt`, on a track whose length is zero or not
    /// finite, or with an invalid lens.
    pub fn update<E: EntityInfo>(
        &mut self,
        dt: f64,
        track: &TrackGeometry,
        entities: &[E],
        focal: Option<&E>,
        lens: &Lens,
    ) {
        if self.phase == FollowPhase::Idle || entities.is_empty() {
            return;
        }
        let Some(focal) = focal else {
            return;
        };
        let length = track.length();
        if !dt.is_finite() || dt < 0.0 || !length.is_finite() || length <= 0.0 {
            return;
        }
        if lens.validate().is_err() {
            return;
        }

        self.update_zoom(dt, track, entities, focal, lens);
        self.follow(dt, track, focal);
    }

    fn update_zoom<E: EntityInfo>(
        &mut self,
        dt: f64,
        track: &TrackGeometry,
        entities: &[E],
        focal: &E,
        lens: &Lens,
    ) {
        let target = self.target_zoom(track, entities, focal, lens);
        let zoom = match self.state.camera_zoom {
            None => target,
            Some(current) => {
                let blend = 1.0 - (-dt * self.settings.zoom_smoothing_rate).exp();
                current + (target - current) * blend
            }
        };
        self.state.camera_zoom = Some(zoom);
    }

    /// Zoom distance that frames the pack this tick, before smoothing.
    #[must_use]
    pub fn target_zoom<E: EntityInfo>(
        &self,
        track: &TrackGeometry,
        entities: &[E],
        focal: &E,
        lens: &Lens,
    ) -> f64 {
        let right = self.right();
        let up = self.up();
        let project = |p: &Point3<f64>| Vector2::new(p.coords.dot(&right), p.coords.dot(&up));

        let focal_position = focal.world_position();
        let lookahead = self.settings.lookahead / track.length().max(EPSILON);

        let mut bounds = Bounds2::new(project(&focal_position));
        let mut centroid = focal_position;
        let mut included = 0_u32;

        for entity in entities {
            let sample = EntitySample::read(entity);
            if (sample.position - focal_position).norm() > self.settings.inclusion_radius {
                continue;
            }

            included += 1;
            centroid += (sample.position - centroid) / f64::from(included);
            bounds.include(project(&sample.position));

            let ahead = track.pose_on_lane(sample.lane, sample.progress + lookahead);
            bounds.include(project(&ahead.position));
        }

        let pad = self.settings.min_framing_distance;
        for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            let corner = centroid + (right * sx + up * sy) * pad;
            bounds.include(project(&corner));
        }

        let half = bounds.half_extents();
        lens.fit_distance(half.x, half.y)
            * self.settings.zoom_out_multiplier
            * self
                .settings
                .speed_zoom_multiplier(focal.speed(), focal.top_speed())
    }

    fn follow<E: EntityInfo>(&mut self, dt: f64, track: &TrackGeometry, focal: &E) {
        let sample = EntitySample::read(focal);
        let mode = track.progress_mode();
        let length = track.length();
        let target = mode.normalize(sample.progress);

        if dt > 0.0 {
            if let Some(previous) = self.state.previous_focal_progress {
                let travelled = (track.pose(target).position - track.pose(previous).position).norm();
                self.state.diagnostics.record(sample.speed, travelled / dt);
            }
        }
        self.state.previous_focal_progress = Some(target);

        let gap = mode.difference(self.state.camera_progress, target);
        let position_delta = gap * length;
        let distance = position_delta.abs();

        if distance >= self.settings.max_tween_length {
            debug!(distance, progress = target, "Framing camera snapped to focal entity");
            self.state.camera_progress = target;
            self.state.camera_speed = sample.speed;
        } else {
            let min_multiplier = focal
                .min_speed_multiplier()
                .unwrap_or(self.settings.min_speed_multiplier);
            let max_multiplier = focal
                .max_speed_multiplier()
                .unwrap_or(self.settings.max_speed_multiplier);
            let slowest = sample.speed * min_multiplier;
            let fastest = sample.speed * max_multiplier;

            let current = self.state.camera_speed;
            let catch_up = if dt > 0.0 {
                (position_delta / dt).max(slowest).min(fastest)
            } else {
                current
            };
            let blend = 1.0 - (-dt * self.settings.follow_rate * distance).exp();
            let speed = (current + (catch_up - current) * blend).min(fastest);

            self.state.camera_speed = speed;
            self.state.camera_progress =
                mode.normalize(self.state.camera_progress + speed * dt / length);
        }

        let zoom = self.state.camera_zoom.unwrap_or(0.0);
        let anchor = track.pose(self.state.camera_progress).position;
        self.state.position = anchor - self.forward() * zoom;
    }

    // ---- Accessors ----

    /// World-space camera position after the last tick.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.state.position
    }

    /// Smoothed zoom distance, `None` before the first framed tick.
    #[must_use]
    pub fn zoom(&self) -> Option<f64> {
        self.state.camera_zoom
    }

    /// Progress the camera is centred on.
    #[must_use]
    pub fn camera_progress(&self) -> f64 {
        self.state.camera_progress
    }

    /// Camera speed along the track.
    #[must_use]
    pub fn camera_speed(&self) -> f64 {
        self.state.camera_speed
    }

    /// Reported versus observed focal speed.
    #[must_use]
    pub fn diagnostics(&self) -> &SyncDiagnostics {
        &self.state.diagnostics
    }

    /// Full per-tick state.
    #[must_use]
    pub fn state(&self) -> &CameraFrameState {
        &self.state
    }
}
