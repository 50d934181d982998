//! Property-based tests for track queries.
//!
//! Run with: cargo test -p track-geometry -- proptest

#![allow(clippy::unwrap_used)]

use nalgebra::Point2;
use proptest::prelude::*;
use track_geometry::{
    ObstacleInterval, ObstacleRegistry, ProgressMode, TrackAuthoring, TrackCurve, TrackGeometry,
    TrackSettings,
};

// =============================================================================
// Strategies
// =============================================================================

/// A valid obstacle interval that stays inside one lap.
fn arb_interval() -> impl Strategy<Value = ObstacleInterval> {
    (0.0..0.89f64, 0.001..0.1f64).prop_map(|(start_progress, length)| ObstacleInterval {
        start_progress,
        length,
    })
}

/// An open polyline-like curve with 2 to 6 well-separated points.
fn arb_curve() -> impl Strategy<Value = TrackCurve> {
    prop::collection::vec((5.0..50.0f64, -20.0..20.0f64), 1..6).prop_map(|steps| {
        let mut points = vec![Point2::new(0.0, 0.0)];
        let mut x = 0.0;
        for (dx, y) in steps {
            x += dx;
            points.push(Point2::new(x, y));
        }
        TrackCurve::through_points(&points, false).unwrap()
    })
}

fn track_for(curve: TrackCurve, lanes: usize, width: f64) -> TrackGeometry {
    let settings = TrackSettings::point_to_point().with_lane_width(width);
    TrackGeometry::new(TrackAuthoring::new(curve, lanes).with_settings(settings)).unwrap()
}

// =============================================================================
// Property Tests: Obstacles
// =============================================================================

proptest! {
    /// Containment agrees with the half-open interval away from its bounds.
    #[test]
    fn obstacle_containment_is_half_open(interval in arb_interval(), progress in 0.0..1.0f64) {
        let start = interval.start_progress;
        let end = interval.end_progress();
        prop_assume!((progress - start).abs() > 1e-6 && (progress - end).abs() > 1e-6);

        let expected = start <= progress && progress < end;
        prop_assert_eq!(interval.contains(progress, ProgressMode::Clamp), expected);
        prop_assert_eq!(interval.contains(progress, ProgressMode::Wrap), expected);
    }

    /// Interval order never changes the answer.
    #[test]
    fn obstacle_queries_ignore_order(
        intervals in prop::collection::vec(arb_interval(), 0..8),
        progress in 0.0..1.0f64,
    ) {
        let forward = ObstacleRegistry::from_lanes(1, vec![intervals.clone()]).unwrap();
        let mut reversed_list = intervals;
        reversed_list.reverse();
        let reversed = ObstacleRegistry::from_lanes(1, vec![reversed_list]).unwrap();

        prop_assert_eq!(
            forward.exists_on_lane(1, progress, ProgressMode::Wrap),
            reversed.exists_on_lane(1, progress, ProgressMode::Wrap)
        );
    }

    /// Lanes outside the track never report an obstacle.
    #[test]
    fn invalid_lanes_have_no_obstacles(lane in 4usize..100, progress in 0.0..1.0f64) {
        let registry = ObstacleRegistry::from_lanes(
            3,
            vec![vec![ObstacleInterval { start_progress: 0.0, length: 0.99 }]; 3],
        )
        .unwrap();
        prop_assert!(!registry.exists_on_lane(lane, progress, ProgressMode::Wrap));
        prop_assert!(!registry.exists_on_lane(0, progress, ProgressMode::Wrap));
    }
}

// =============================================================================
// Property Tests: Poses
// =============================================================================

proptest! {
    /// Lane poses are a pure function of lane and progress.
    #[test]
    fn lane_pose_is_deterministic(
        curve in arb_curve(),
        lanes in 1usize..6,
        progress in 0.0..1.0f64,
    ) {
        let track = track_for(curve, lanes, 2.5);
        for lane in 1..=lanes {
            prop_assert_eq!(track.pose_on_lane(lane, progress), track.pose_on_lane(lane, progress));
        }
    }

    /// Every pose has a unit forward vector and a finite position.
    #[test]
    fn poses_are_well_formed(curve in arb_curve(), progress in -2.0..2.0f64, offset in -10.0..10.0f64) {
        let track = track_for(curve, 1, 2.0);
        let pose = track.pose_with_offset(progress, offset);
        prop_assert!((pose.forward.norm() - 1.0).abs() < 1e-9);
        prop_assert!(pose.position.coords.iter().all(|c| c.is_finite()));
    }

    /// A lane pose sits exactly its lane offset away from the curve.
    #[test]
    fn lane_offset_is_lateral_distance(
        curve in arb_curve(),
        lanes in 1usize..6,
        width in 0.5..5.0f64,
        progress in 0.0..1.0f64,
    ) {
        let track = track_for(curve, lanes, width);
        let on_curve = track.pose_with_offset(progress, 0.0);
        for lane in 1..=lanes {
            let pose = track.pose_on_lane(lane, progress);
            let distance = (pose.position - on_curve.position).norm();
            prop_assert!((distance - track.lane_offset(lane as f64).abs()).abs() < 1e-9);
        }
    }

    /// Lane offsets are symmetric about the centerline.
    #[test]
    fn lane_offsets_are_symmetric(lanes in 1usize..10, width in 0.5..5.0f64) {
        let track = track_for(
            TrackCurve::through_points(&[Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)], false)
                .unwrap(),
            lanes,
            width,
        );
        for lane in 1..=lanes {
            let mirror = lanes + 1 - lane;
            prop_assert!(
                (track.lane_offset(lane as f64) + track.lane_offset(mirror as f64)).abs() < 1e-9
            );
        }
    }

    /// Curvature stays inside its documented range.
    #[test]
    fn curvature_in_unit_range(curve in arb_curve(), progress in 0.0..1.0f64) {
        let track = track_for(curve, 1, 2.0);
        let c = track.curvature(progress);
        prop_assert!((0.0..=1.0).contains(&c));
        prop_assert!(track.curvature_angle(progress) >= 0.0);
    }
}
