//! Per-camera mutable state and sync diagnostics.

use nalgebra::Point3;

/// Speeds below this are too noisy to compare.
const MIN_COMPARABLE_SPEED: f64 = 0.1;

/// Whether the camera has been told to follow yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FollowPhase {
    /// Waiting for [`FramingCamera::start_follow`](crate::FramingCamera::start_follow).
    #[default]
    Idle,
    /// Framing and chasing every tick.
    Following,
}

/// How well the focal entity's reported speed matches its observed motion.
///
/// Server corrections make an entity's progress move faster or slower than
/// its reported speed implies. These numbers describe that mismatch; they
/// never feed back into the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncDiagnostics {
    /// Speed the focal entity reported this tick.
    pub reported_speed: f64,
    /// Distance between the focal entity's last two track poses over `dt`.
    pub observed_speed: f64,
    /// Last `observed / reported` ratio that passed the speed threshold.
    pub speed_ratio: f64,
    /// Smallest ratio seen.
    pub min_speed_ratio: f64,
    /// Largest ratio seen.
    pub max_speed_ratio: f64,
    /// Number of ticks that contributed a ratio.
    pub samples: u64,
}

impl Default for SyncDiagnostics {
    fn default() -> Self {
        Self {
            reported_speed: 0.0,
            observed_speed: 0.0,
            speed_ratio: 1.0,
            min_speed_ratio: 1.0,
            max_speed_ratio: 1.0,
            samples: 0,
        }
    }
}

impl SyncDiagnostics {
    /// Record one tick's speeds.
    ///
    /// The ratio envelope only widens when both speeds exceed 0.1.
    pub fn record(&mut self, reported_speed: f64, observed_speed: f64) {
        self.reported_speed = reported_speed;
        self.observed_speed = observed_speed;

        if reported_speed > MIN_COMPARABLE_SPEED && observed_speed > MIN_COMPARABLE_SPEED {
            let ratio = observed_speed / reported_speed;
            self.speed_ratio = ratio;
            self.min_speed_ratio = self.min_speed_ratio.min(ratio);
            self.max_speed_ratio = self.max_speed_ratio.max(ratio);
            self.samples += 1;
        }
    }
}

/// Everything a framing camera carries between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrameState {
    /// Smoothed progress the camera is centred on.
    pub camera_progress: f64,
    /// Camera speed along the track, in track units per second.
    pub camera_speed: f64,
    /// Smoothed zoom distance, `None` until the first framed tick.
    pub camera_zoom: Option<f64>,
    /// Focal progress seen on the previous tick.
    pub previous_focal_progress: Option<f64>,
    /// World-space camera position after the last tick.
    pub position: Point3<f64>,
    /// Reported versus observed focal speed.
    pub diagnostics: SyncDiagnostics,
}

impl Default for CameraFrameState {
    fn default() -> Self {
        Self {
            camera_progress: 0.0,
            camera_speed: 0.0,
            camera_zoom: None,
            previous_focal_progress: None,
            position: Point3::origin(),
            diagnostics: SyncDiagnostics::default(),
        }
    }
}
