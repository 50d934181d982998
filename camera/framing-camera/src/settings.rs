//! Camera tuning and lens parameters.

use serde::{Deserialize, Serialize};

use crate::error::{CameraError, CameraResult};

/// Smallest divisor used when converting extents into distances.
pub(crate) const EPSILON: f64 = 1e-9;

/// Perspective lens used to turn framed extents into a camera distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lens {
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    /// Viewport width divided by height.
    pub aspect: f64,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Lens {
    /// Create a lens.
    #[must_use]
    pub const fn new(fov_degrees: f64, aspect: f64) -> Self {
        Self {
            fov_degrees,
            aspect,
        }
    }

    /// Lens for a viewport in pixels. A zero height is treated as 1.
    #[must_use]
    pub fn for_viewport(fov_degrees: f64, width: u32, height: u32) -> Self {
        Self {
            fov_degrees,
            aspect: f64::from(width) / f64::from(height.max(1)),
        }
    }

    /// Tangent of half the vertical field of view.
    #[must_use]
    pub fn half_tan(&self) -> f64 {
        (self.fov_degrees.to_radians() * 0.5).tan()
    }

    /// Camera distance at which a box with the given half extents
    /// (horizontal, vertical) just fits the view.
    #[must_use]
    pub fn fit_distance(&self, half_width: f64, half_height: f64) -> f64 {
        let tan = self.half_tan();
        let dx = half_width / (tan * self.aspect).max(EPSILON);
        let dy = half_height / tan.max(EPSILON);
        dx.max(dy)
    }

    /// Check the lens can project.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidLens`] unless the field of view is in
    /// `(0, 180)` degrees and the aspect is positive.
    pub fn validate(&self) -> CameraResult<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(CameraError::invalid_lens(format!(
                "field of view {} outside (0, 180) degrees",
                self.fov_degrees
            )));
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(CameraError::invalid_lens(format!(
                "aspect {} must be positive",
                self.aspect
            )));
        }
        Ok(())
    }
}

/// Tuning for the framing camera.
///
/// # Example
///
/// ```
/// use framing_camera::CameraSettings;
///
/// let settings = CameraSettings::default();
/// assert!((settings.max_tween_length - 20.0).abs() < 1e-12);
///
/// let wide = CameraSettings::wide_pack().with_lookahead(25.0);
/// assert!(wide.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Base factor applied to the fitted distance (at least 1).
    pub zoom_out_multiplier: f64,

    /// Extra zoom factor reached when the focal entity is at top speed
    /// (at least 1).
    pub zoom_out_speed_multiplier: f64,

    /// How quickly camera speed converges on the catch-up speed, per unit
    /// of distance to the target.
    pub follow_rate: f64,

    /// Catch-up speed lower bound, as a multiple of the focal speed.
    pub min_speed_multiplier: f64,

    /// Catch-up speed upper bound, as a multiple of the focal speed.
    pub max_speed_multiplier: f64,

    /// Distance at or beyond which the camera snaps to its target.
    pub max_tween_length: f64,

    /// Exponential smoothing rate for the zoom distance.
    pub zoom_smoothing_rate: f64,

    /// Distance ahead along each lane that is kept in frame.
    pub lookahead: f64,

    /// Half size of the smallest framed area around the pack centroid.
    pub min_framing_distance: f64,

    /// Entities further than this from the focal entity are not framed.
    pub inclusion_radius: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom_out_multiplier: 1.5,
            zoom_out_speed_multiplier: 2.0,
            follow_rate: 1.0,
            min_speed_multiplier: 0.8,
            max_speed_multiplier: 2.0,
            max_tween_length: 20.0,
            zoom_smoothing_rate: 1.0,
            lookahead: 10.0,
            min_framing_distance: 5.0,
            inclusion_radius: 40.0,
        }
    }
}

impl CameraSettings {
    /// Settings for following a spread-out field from further back.
    #[must_use]
    pub const fn wide_pack() -> Self {
        Self {
            zoom_out_multiplier: 1.8,
            zoom_out_speed_multiplier: 1.5,
            follow_rate: 1.0,
            min_speed_multiplier: 0.8,
            max_speed_multiplier: 2.0,
            max_tween_length: 40.0,
            zoom_smoothing_rate: 0.5,
            lookahead: 15.0,
            min_framing_distance: 10.0,
            inclusion_radius: 120.0,
        }
    }

    /// Set the base zoom-out factor.
    #[must_use]
    pub const fn with_zoom_out_multiplier(mut self, multiplier: f64) -> Self {
        self.zoom_out_multiplier = multiplier;
        self
    }

    /// Set the top-speed zoom-out factor.
    #[must_use]
    pub const fn with_zoom_out_speed_multiplier(mut self, multiplier: f64) -> Self {
        self.zoom_out_speed_multiplier = multiplier;
        self
    }

    /// Set the follow rate.
    #[must_use]
    pub const fn with_follow_rate(mut self, rate: f64) -> Self {
        self.follow_rate = rate;
        self
    }

    /// Set the catch-up speed bounds.
    #[must_use]
    pub const fn with_speed_multipliers(mut self, min: f64, max: f64) -> Self {
        self.min_speed_multiplier = min;
        self.max_speed_multiplier = max;
        self
    }

    /// Set the snap distance.
    #[must_use]
    pub const fn with_max_tween_length(mut self, length: f64) -> Self {
        self.max_tween_length = length;
        self
    }

    /// Set the zoom smoothing rate.
    #[must_use]
    pub const fn with_zoom_smoothing_rate(mut self, rate: f64) -> Self {
        self.zoom_smoothing_rate = rate;
        self
    }

    /// Set the lookahead distance.
    #[must_use]
    pub const fn with_lookahead(mut self, distance: f64) -> Self {
        self.lookahead = distance;
        self
    }

    /// Set the minimum framing distance and inclusion radius.
    #[must_use]
    pub const fn with_zoom_range(mut self, min_framing_distance: f64, inclusion_radius: f64) -> Self {
        self.min_framing_distance = min_framing_distance;
        self.inclusion_radius = inclusion_radius;
        self
    }

    /// Zoom-out factor for a focal entity at `speed` with `top_speed`.
    ///
    /// Maps `[0, top_speed]` linearly onto `[1, zoom_out_speed_multiplier]`,
    /// clamping outside that range.
    #[must_use]
    pub fn speed_zoom_multiplier(&self, speed: f64, top_speed: f64) -> f64 {
        let fraction = if top_speed > EPSILON {
            (speed / top_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        1.0 + (self.zoom_out_speed_multiplier - 1.0) * fraction
    }

    /// The smallest zoom a valid tick can produce with `lens`: a single
    /// stationary entity framed by the padding corners alone.
    #[must_use]
    pub fn minimum_zoom(&self, lens: &Lens) -> f64 {
        lens.fit_distance(self.min_framing_distance, self.min_framing_distance)
            * self.zoom_out_multiplier
    }

    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidSetting`] naming the first offending
    /// setting.
    pub fn validate(&self) -> CameraResult<()> {
        let checks: [(&'static str, f64, bool, &'static str); 10] = [
            (
                "zoom_out_multiplier",
                self.zoom_out_multiplier,
                self.zoom_out_multiplier >= 1.0,
                "must be at least 1",
            ),
            (
                "zoom_out_speed_multiplier",
                self.zoom_out_speed_multiplier,
                self.zoom_out_speed_multiplier >= 1.0,
                "must be at least 1",
            ),
            (
                "follow_rate",
                self.follow_rate,
                self.follow_rate >= 0.0,
                "must not be negative",
            ),
            (
                "min_speed_multiplier",
                self.min_speed_multiplier,
                self.min_speed_multiplier >= 0.0,
                "must not be negative",
            ),
            (
                "max_speed_multiplier",
                self.max_speed_multiplier,
                self.max_speed_multiplier >= self.min_speed_multiplier,
                "must not be below min_speed_multiplier",
            ),
            (
                "max_tween_length",
                self.max_tween_length,
                self.max_tween_length > 0.0,
                "must be positive",
            ),
            (
                "zoom_smoothing_rate",
                self.zoom_smoothing_rate,
                self.zoom_smoothing_rate >= 0.0,
                "must not be negative",
            ),
            (
                "lookahead",
                self.lookahead,
                self.lookahead >= 0.0,
                "must not be negative",
            ),
            (
                "min_framing_distance",
                self.min_framing_distance,
                self.min_framing_distance >= 0.0,
                "must not be negative",
            ),
            (
                "inclusion_radius",
                self.inclusion_radius,
                self.inclusion_radius >= 0.0,
                "must not be negative",
            ),
        ];

        for (name, value, ok, reason) in checks {
            if !value.is_finite() || !ok {
                return Err(CameraError::invalid_setting(name, value, reason));
            }
        }
        Ok(())
    }
}
