//! Read access to the racers a camera frames.

use nalgebra::{Point3, UnitQuaternion};

/// Live state of one racing entity, polled by the camera every tick.
///
/// Implementations typically forward to a simulation object whose progress
/// and speed are periodically corrected from server-reported state.
pub trait EntityInfo {
    /// World-space position.
    fn world_position(&self) -> Point3<f64>;

    /// World-space orientation. Framing does not use it.
    fn world_rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::identity()
    }

    /// Race progress (fraction of a lap).
    fn progress(&self) -> f64;

    /// Current speed in track units per second.
    fn speed(&self) -> f64;

    /// 1-based lane the entity races on.
    fn lane(&self) -> usize;

    /// Speed at which the zoom-out multiplier reaches its maximum.
    fn top_speed(&self) -> f64;

    /// Per-entity lower bound on camera catch-up speed, as a multiple of
    /// this entity's speed. `None` defers to the camera settings.
    fn min_speed_multiplier(&self) -> Option<f64> {
        None
    }

    /// Per-entity upper bound on camera catch-up speed, as a multiple of
    /// this entity's speed. `None` defers to the camera settings.
    fn max_speed_multiplier(&self) -> Option<f64> {
        None
    }
}

impl<T: EntityInfo + ?Sized> EntityInfo for &T {
    fn world_position(&self) -> Point3<f64> {
        (**self).world_position()
    }

    fn world_rotation(&self) -> UnitQuaternion<f64> {
        (**self).world_rotation()
    }

    fn progress(&self) -> f64 {
        (**self).progress()
    }

    fn speed(&self) -> f64 {
        (**self).speed()
    }

    fn lane(&self) -> usize {
        (**self).lane()
    }

    fn top_speed(&self) -> f64 {
        (**self).top_speed()
    }

    fn min_speed_multiplier(&self) -> Option<f64> {
        (**self).min_speed_multiplier()
    }

    fn max_speed_multiplier(&self) -> Option<f64> {
        (**self).max_speed_multiplier()
    }
}

impl<T: EntityInfo + ?Sized> EntityInfo for Box<T> {
    fn world_position(&self) -> Point3<f64> {
        (**self).world_position()
    }

    fn world_rotation(&self) -> UnitQuaternion<f64> {
        (**self).world_rotation()
    }

    fn progress(&self) -> f64 {
        (**self).progress()
    }

    fn speed(&self) -> f64 {
        (**self).speed()
    }

    fn lane(&self) -> usize {
        (**self).lane()
    }

    fn top_speed(&self) -> f64 {
        (**self).top_speed()
    }

    fn min_speed_multiplier(&self) -> Option<f64> {
        (**self).min_speed_multiplier()
    }

    fn max_speed_multiplier(&self) -> Option<f64> {
        (**self).max_speed_multiplier()
    }
}

/// The values a camera reads from an entity in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySample {
    /// World-space position.
    pub position: Point3<f64>,
    /// Race progress.
    pub progress: f64,
    /// Current speed.
    pub speed: f64,
    /// 1-based lane.
    pub lane: usize,
}

impl EntitySample {
    /// Poll `entity` once.
    #[must_use]
    pub fn read(entity: &(impl EntityInfo + ?Sized)) -> Self {
        Self {
            position: entity.world_position(),
            progress: entity.progress(),
            speed: entity.speed(),
            lane: entity.lane(),
        }
    }
}

/// A plain-data [`EntityInfo`], for entities whose state is pushed rather
/// than computed (replays, server snapshots, tests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityState {
    /// World-space position.
    pub position: Point3<f64>,
    /// World-space orientation.
    pub rotation: UnitQuaternion<f64>,
    /// Race progress.
    pub progress: f64,
    /// Current speed.
    pub speed: f64,
    /// 1-based lane.
    pub lane: usize,
    /// Speed that maps to the full zoom-out multiplier.
    pub top_speed: f64,
    /// Catch-up lower bound override.
    pub min_speed_multiplier: Option<f64>,
    /// Catch-up upper bound override.
    pub max_speed_multiplier: Option<f64>,
}

impl EntityState {
    /// An entity on `lane` at the origin, standing still.
    #[must_use]
    pub fn new(lane: usize, top_speed: f64) -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            progress: 0.0,
            speed: 0.0,
            lane,
            top_speed,
            min_speed_multiplier: None,
            max_speed_multiplier: None,
        }
    }

    /// Set progress and speed.
    #[must_use]
    pub fn with_motion(mut self, progress: f64, speed: f64) -> Self {
        self.progress = progress;
        self.speed = speed;
        self
    }

    /// Set the world position.
    #[must_use]
    pub fn with_position(mut self, position: Point3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Override the camera's catch-up speed multipliers for this entity.
    #[must_use]
    pub fn with_speed_multipliers(mut self, min: f64, max: f64) -> Self {
        self.min_speed_multiplier = Some(min);
        self.max_speed_multiplier = Some(max);
        self
    }
}

impl EntityInfo for EntityState {
    fn world_position(&self) -> Point3<f64> {
        self.position
    }

    fn world_rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    fn progress(&self) -> f64 {
        self.progress
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn lane(&self) -> usize {
        self.lane
    }

    fn top_speed(&self) -> f64 {
        self.top_speed
    }

    fn min_speed_multiplier(&self) -> Option<f64> {
        self.min_speed_multiplier
    }

    fn max_speed_multiplier(&self) -> Option<f64> {
        self.max_speed_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Minimal;

    impl EntityInfo for Minimal {
        fn world_position(&self) -> Point3<f64> {
            Point3::new(1.0, 2.0, 3.0)
        }
        fn progress(&self) -> f64 {
            0.5
        }
        fn speed(&self) -> f64 {
            12.0
        }
        fn lane(&self) -> usize {
            2
        }
        fn top_speed(&self) -> f64 {
            20.0
        }
    }

    #[test]
    fn test_defaults() {
        let entity = Minimal;
        assert_eq!(entity.world_rotation(), UnitQuaternion::identity());
        assert_eq!(entity.min_speed_multiplier(), None);
        assert_eq!(entity.max_speed_multiplier(), None);
    }

    #[test]
    fn test_sample_through_indirection() {
        let direct = EntitySample::read(&Minimal);
        let boxed: Box<dyn EntityInfo> = Box::new(Minimal);
        let by_ref = &Minimal;

        assert_eq!(EntitySample::read(&boxed), direct);
        assert_eq!(EntitySample::read(&by_ref), direct);
        assert_eq!(direct.lane, 2);
        assert_eq!(direct.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_state_builder() {
        let state = EntityState::new(3, 30.0)
            .with_motion(0.25, 10.0)
            .with_position(Point3::new(4.0, 0.0, 1.0))
            .with_speed_multipliers(0.5, 3.0);
        assert_eq!(state.lane(), 3);
        assert_relative_eq!(state.progress(), 0.25);
        assert_relative_eq!(state.speed(), 10.0);
        assert_eq!(state.world_position(), Point3::new(4.0, 0.0, 1.0));
        assert_eq!(state.max_speed_multiplier(), Some(3.0));
    }
}
