//! End-to-end track scenarios.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use nalgebra::{Point2, UnitQuaternion, Vector2, Vector3};
use track_geometry::{
    BezierNode, ObstacleInterval, PoseCalculator, ProgressMode, TrackAuthoring, TrackCurve,
    TrackEvent, TrackGeometry, TrackSettings, WorldTransform,
};

// =============================================================================
// Fixtures
// =============================================================================

fn straight_curve(length: f64) -> TrackCurve {
    TrackCurve::through_points(&[Point2::new(0.0, 0.0), Point2::new(length, 0.0)], false).unwrap()
}

/// Four-node Bézier approximation of a circle, counter-clockwise.
fn bezier_circle(radius: f64) -> TrackCurve {
    let k = 0.552_284_749_831 * radius;
    TrackCurve::new(
        vec![
            BezierNode::linked(Point2::new(radius, 0.0), Vector2::new(0.0, k)),
            BezierNode::linked(Point2::new(0.0, radius), Vector2::new(-k, 0.0)),
            BezierNode::linked(Point2::new(-radius, 0.0), Vector2::new(0.0, -k)),
            BezierNode::linked(Point2::new(0.0, -radius), Vector2::new(k, 0.0)),
        ],
        true,
    )
    .unwrap()
}

fn straight_track(length: f64, lanes: usize) -> TrackGeometry {
    let authoring = TrackAuthoring::new(straight_curve(length), lanes)
        .with_settings(TrackSettings::point_to_point().with_lane_width(2.0));
    TrackGeometry::new(authoring).unwrap()
}

fn circuit(radius: f64) -> TrackGeometry {
    TrackGeometry::from_curve(bezier_circle(radius), 1).unwrap()
}

// =============================================================================
// Poses
// =============================================================================

#[test]
fn middle_lane_of_three_is_the_centerline() {
    let track = straight_track(100.0, 3);
    let pose = track.pose_on_lane(2, 0.5);

    assert_relative_eq!(pose.position.coords, Vector3::new(50.0, 0.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(pose.forward, Vector3::x(), epsilon = 1e-12);
    assert_relative_eq!(track.lane_offset(2.0), 0.0);
}

#[test]
fn outer_lanes_sit_one_width_either_side() {
    let track = straight_track(100.0, 3);
    let left = track.pose_on_lane(1, 0.5).position;
    let right = track.pose_on_lane(3, 0.5).position;

    assert_relative_eq!((right - left).norm(), 4.0, epsilon = 1e-9);
    assert_relative_eq!(left.z, -2.0, epsilon = 1e-9);
    assert_relative_eq!(right.z, 2.0, epsilon = 1e-9);
}

#[test]
fn lane_pose_is_deterministic() {
    let track = circuit(30.0);
    for i in 0..20 {
        let progress = f64::from(i) / 20.0;
        assert_eq!(track.pose_on_lane(1, progress), track.pose_on_lane(1, progress));
    }
}

#[test]
fn circuit_progress_wraps() {
    let track = circuit(30.0);
    assert_eq!(track.progress_mode(), ProgressMode::Wrap);

    let a = track.pose(0.25);
    let b = track.pose(1.25);
    let c = track.pose(-0.75);
    assert_relative_eq!(a.position.coords, b.position.coords, epsilon = 1e-9);
    assert_relative_eq!(a.position.coords, c.position.coords, epsilon = 1e-9);
}

#[test]
fn open_course_progress_clamps() {
    let track = straight_track(100.0, 1);
    let end = track.pose(1.0);
    assert_relative_eq!(track.pose(1.5).position.coords, end.position.coords);
    assert_relative_eq!(track.pose(-0.5).position.coords, track.pose(0.0).position.coords);
}

#[test]
fn open_curve_clamps_without_explicit_mode() {
    let track = TrackGeometry::from_curve(straight_curve(200.0), 2).unwrap();
    assert_eq!(track.progress_mode(), ProgressMode::Clamp);

    // The finish line stays at the far end instead of wrapping to the start
    assert_relative_eq!(track.pose(1.0).position.x, 200.0, epsilon = 1e-6);
    assert_relative_eq!(track.pose(1.1).position.x, 200.0, epsilon = 1e-6);
}

#[test]
fn closing_the_curve_switches_to_wrap() {
    let mut track = TrackGeometry::from_curve(straight_curve(200.0), 1).unwrap();
    track.edit_curve(|curve| curve.set_closed(true));
    track.rederive();
    assert_eq!(track.progress_mode(), ProgressMode::Wrap);

    let forced = TrackGeometry::new(
        TrackAuthoring::new(straight_curve(200.0), 1).with_settings(TrackSettings::circuit()),
    )
    .unwrap();
    assert_eq!(forced.progress_mode(), ProgressMode::Wrap);
}

#[test]
fn world_transform_moves_every_lane() {
    let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f64::consts::PI);
    let transform = WorldTransform::from_parts(Vector3::new(0.0, 3.0, 0.0), rotation, 1.0);
    let authoring = TrackAuthoring::new(straight_curve(100.0), 3).with_transform(Some(transform));
    let track = TrackGeometry::new(authoring).unwrap();

    let pose = track.pose_on_lane(3, 0.25);
    // Local (25, 0, 2) rotated half a turn about Y, then lifted by 3
    assert_relative_eq!(pose.position.coords, Vector3::new(-25.0, 3.0, -2.0), epsilon = 1e-9);
    assert_relative_eq!(pose.forward, -Vector3::x(), epsilon = 1e-12);
    assert_relative_eq!(track.right(), -Vector3::x(), epsilon = 1e-12);
}

// =============================================================================
// Arc length
// =============================================================================

#[test]
fn circle_length_converges_with_samples() {
    let radius = 40.0;
    let curve = bezier_circle(radius);
    let expected = std::f64::consts::TAU * radius;

    let lengths: Vec<f64> = [25, 50, 100, 200]
        .iter()
        .map(|&n| PoseCalculator::with_samples(&curve, n).track_length())
        .collect();

    for pair in lengths.windows(2) {
        assert!(pair[1] >= pair[0], "length must not shrink: {lengths:?}");
    }
    assert_relative_eq!(lengths[2], expected, max_relative = 5e-3);
    assert!((lengths[3] - expected).abs() < (lengths[0] - expected).abs());
}

#[test]
fn default_calculator_matches_length() {
    let track = circuit(40.0);
    let expected = std::f64::consts::TAU * 40.0;
    assert_relative_eq!(track.length(), expected, max_relative = 5e-3);
    assert!(track.length() > 0.0);
}

#[test]
fn equal_progress_covers_equal_distance_on_circle() {
    let track = circuit(25.0);
    let step = 0.05;
    let chords: Vec<f64> = (0..20)
        .map(|i| {
            let p = f64::from(i) * step;
            (track.pose(p + step).position - track.pose(p).position).norm()
        })
        .collect();

    let first = chords[0];
    for chord in &chords {
        assert_relative_eq!(*chord, first, max_relative = 0.02);
    }
}

// =============================================================================
// Curvature
// =============================================================================

#[test]
fn straight_track_has_zero_curvature() {
    let track = straight_track(100.0, 2);
    for i in 0..10 {
        let progress = f64::from(i) / 10.0;
        assert_relative_eq!(track.curvature(progress), 0.0, epsilon = 1e-12);
        assert_relative_eq!(track.curvature_angle(progress), 0.0, epsilon = 1e-4);
    }
}

#[test]
fn curvature_grows_as_radius_shrinks() {
    let radii = [80.0, 40.0, 20.0, 10.0];
    let values: Vec<f64> = radii.iter().map(|&r| circuit(r).curvature(0.1)).collect();

    for pair in values.windows(2) {
        assert!(pair[1] > pair[0], "curvature must increase: {values:?}");
    }
    for value in &values {
        assert!((0.0..=1.0).contains(value));
    }
}

#[test]
fn curvature_angle_is_turn_rate_in_degrees() {
    let radius = 20.0;
    let track = circuit(radius);
    // One unit of distance on a circle of radius r turns 1/r radians
    let expected = (1.0_f64 / radius).to_degrees();
    assert_relative_eq!(track.curvature_angle(0.3), expected, max_relative = 0.05);
}

// =============================================================================
// Obstacles
// =============================================================================

#[test]
fn obstacle_scenario() {
    let authoring = TrackAuthoring::new(straight_curve(100.0), 3)
        .with_obstacles(vec![vec![ObstacleInterval::new(1, 0.2, 0.1).unwrap()]]);
    let track = TrackGeometry::new(authoring).unwrap();

    assert!(track.obstacle_exists_on_lane(1, 0.25));
    assert!(!track.obstacle_exists_on_lane(1, 0.30));
    assert!(!track.obstacle_exists_on_lane(1, 0.15));
    assert!(track.obstacle_exists(0.25));
    assert!(!track.obstacle_exists_on_lane(2, 0.25));

    // Unknown lanes never hold obstacles
    assert!(!track.obstacle_exists_on_lane(0, 0.25));
    assert!(!track.obstacle_exists_on_lane(4, 0.25));
    assert_eq!(track.obstacle_intervals(3).len(), 0);
}

#[test]
fn obstacle_across_the_finish_line() {
    let authoring = TrackAuthoring::new(bezier_circle(30.0), 2)
        .with_obstacles(vec![vec![], vec![ObstacleInterval::new(2, 0.95, 0.1).unwrap()]]);
    let track = TrackGeometry::new(authoring).unwrap();

    assert!(track.obstacle_exists_on_lane(2, 0.98));
    assert!(track.obstacle_exists_on_lane(2, 0.03));
    assert!(!track.obstacle_exists_on_lane(2, 0.06));
}

// =============================================================================
// Notifications
// =============================================================================

#[test]
fn edits_notify_and_drop_destroys() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut track = straight_track(100.0, 1);

    let sink = Rc::clone(&seen);
    let subscription = track.subscribe(move |event| sink.borrow_mut().push(event));

    track
        .edit_curve(|curve| curve.push_node(BezierNode::new(Point2::new(150.0, 50.0))));
    assert!(track.is_stale());
    track.rederive();
    assert!(track.length() > 100.0);

    drop(track);
    assert_eq!(*seen.borrow(), vec![TrackEvent::Dirty, TrackEvent::Destroyed]);
    assert!(!subscription.is_active());
}

#[test]
fn released_subscription_hears_nothing() {
    let count = Rc::new(RefCell::new(0_u32));
    let mut track = straight_track(100.0, 1);

    let sink = Rc::clone(&count);
    let subscription = track.subscribe(move |_| *sink.borrow_mut() += 1);
    subscription.release();

    track.set_curve(Some(straight_curve(50.0))).unwrap();
    drop(track);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn transform_change_is_not_dirty() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut track = straight_track(100.0, 1);
    let sink = Rc::clone(&seen);
    let _subscription = track.subscribe(move |event| sink.borrow_mut().push(event));

    track.set_transform(Some(WorldTransform::from_parts(
        Vector3::new(1.0, 0.0, 0.0),
        UnitQuaternion::identity(),
        1.0,
    )));
    assert!(!track.is_stale());
    assert!(seen.borrow().is_empty());
    assert_relative_eq!(track.pose(0.0).position.x, 1.0, epsilon = 1e-9);
}
