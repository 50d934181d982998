//! Property-based tests for the framing camera.
//!
//! Run with: cargo test -p framing-camera -- proptest

#![allow(clippy::unwrap_used)]

use framing_camera::{CameraSettings, EntityState, FramingCamera, Lens};
use nalgebra::Point2;
use proptest::prelude::*;
use track_geometry::{TrackAuthoring, TrackCurve, TrackGeometry, TrackSettings};

fn course() -> TrackGeometry {
    let curve = TrackCurve::through_points(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(300.0, 80.0),
            Point2::new(600.0, -40.0),
            Point2::new(900.0, 0.0),
        ],
        false,
    )
    .unwrap();
    TrackGeometry::new(
        TrackAuthoring::new(curve, 4).with_settings(TrackSettings::point_to_point()),
    )
    .unwrap()
}

/// Lane, progress and speed for one racer.
fn arb_racer() -> impl Strategy<Value = (usize, f64, f64)> {
    (1usize..=4, 0.0..1.0f64, 0.0..40.0f64)
}

fn arb_lens() -> impl Strategy<Value = Lens> {
    (20.0..100.0f64, 0.5..2.5f64).prop_map(|(fov, aspect)| Lens::new(fov, aspect))
}

fn place(track: &TrackGeometry, (lane, progress, speed): (usize, f64, f64)) -> EntityState {
    EntityState::new(lane, 30.0)
        .with_motion(progress, speed)
        .with_position(track.pose_on_lane(lane, progress).position)
}

proptest! {
    /// No pack, lens or speed frames tighter than the padding alone.
    #[test]
    fn target_zoom_respects_minimum(
        racers in prop::collection::vec(arb_racer(), 1..8),
        lens in arb_lens(),
    ) {
        let track = course();
        let camera = FramingCamera::new(CameraSettings::default()).unwrap();
        let entities: Vec<EntityState> = racers.into_iter().map(|r| place(&track, r)).collect();

        let zoom = camera.target_zoom(&track, &entities, &entities[0], &lens);
        prop_assert!(zoom.is_finite());
        prop_assert!(zoom >= camera.settings().minimum_zoom(&lens) - 1e-9);
    }

    /// Outside a snap, one tick moves the camera no further than the focal
    /// speed bound allows.
    #[test]
    fn tick_displacement_is_bounded(
        start in 0.05..0.9f64,
        lead in -15.0..15.0f64,
        speed in 0.0..40.0f64,
        dt in 0.001..0.1f64,
    ) {
        let track = course();
        let settings = CameraSettings::default();
        let mut camera = FramingCamera::new(settings).unwrap();
        camera.start_follow();
        let lens = Lens::default();

        let first = [place(&track, (2, start, speed))];
        camera.update(dt, &track, &first, first.first(), &lens);
        let before = camera.camera_progress();

        let target = (start + lead / track.length()).clamp(0.0, 1.0);
        let second = [place(&track, (2, target, speed))];
        camera.update(dt, &track, &second, second.first(), &lens);

        let moved = (camera.camera_progress() - before) * track.length();
        prop_assert!(moved <= speed * settings.max_speed_multiplier * dt + 1e-9);
        prop_assert!(moved >= -1e-9);
    }

    /// Zoom only ever moves toward its target after the first frame.
    #[test]
    fn zoom_moves_toward_target(
        a in arb_racer(),
        b in arb_racer(),
        dt in 0.001..0.2f64,
    ) {
        let track = course();
        let mut camera = FramingCamera::new(CameraSettings::default()).unwrap();
        camera.start_follow();
        let lens = Lens::default();

        let first = [place(&track, a)];
        camera.update(dt, &track, &first, first.first(), &lens);
        let before = camera.zoom().unwrap();

        let second = [place(&track, b)];
        let target = camera.target_zoom(&track, &second, &second[0], &lens);
        camera.update(dt, &track, &second, second.first(), &lens);
        let after = camera.zoom().unwrap();

        let (low, high) = if before <= target { (before, target) } else { (target, before) };
        prop_assert!(after >= low - 1e-9 && after <= high + 1e-9);
    }
}
