use std::io::Cursor;
use std::sync::mpsc::Receiver;

use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeZone, Utc};
use geotracker::{
    Direction, EarthModel, EntityId, GeodeticCoordinate, GeotrackerError, LogFilePositionSource,
    PositionInfo, Target, Tracker, TrackerConfig, TrackerEvent,
};

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap()
}

fn fix(lat: f64, lon: f64, h: f64) -> PositionInfo {
    PositionInfo::new(GeodeticCoordinate::new(lat, lon, h).unwrap(), at(0))
}

fn look_angles(events: &Receiver<TrackerEvent>) -> Vec<(EntityId, Direction)> {
    events
        .try_iter()
        .filter_map(|event| match event {
            TrackerEvent::LookAngleChanged {
                observer,
                direction,
            } => Some((observer, direction)),
            _ => None,
        })
        .collect()
}

#[test]
fn switching_entity_targets_moves_the_subscription() {
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let e1 = tracker.add_entity();
    let e2 = tracker.add_entity();
    tracker.set_position(observer, fix(0.0, 0.0, 0.0)).unwrap();
    tracker.set_position(e1, fix(0.0, 1.0, 0.0)).unwrap();
    tracker.set_position(e2, fix(1.0, 0.0, 0.0)).unwrap();

    tracker.set_target(observer, Target::Entity(e1)).unwrap();
    assert_eq!(tracker.subscribers(e1), vec![observer]);
    let events = tracker.event_channel();

    tracker.set_target(observer, Target::Entity(e2)).unwrap();
    assert!(tracker.subscribers(e1).is_empty());
    assert_eq!(tracker.subscribers(e2), vec![observer]);
    let angles = look_angles(&events);
    assert_eq!(angles.len(), 1);
    assert_abs_diff_eq!(angles[0].1.azimuth, 0.0, epsilon = 1e-9);

    // e1 moving no longer triggers anything
    tracker.set_position(e1, fix(0.0, -1.0, 0.0)).unwrap();
    assert!(look_angles(&events).is_empty());

    // e2 moving does
    tracker.set_position(e2, fix(-1.0, 0.0, 0.0)).unwrap();
    let angles = look_angles(&events);
    assert_eq!(angles.len(), 1);
    assert_abs_diff_eq!(angles[0].1.azimuth, 180.0, epsilon = 1e-9);
}

#[test]
fn target_change_is_announced_before_recompute() {
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.set_position(observer, fix(39.0, -75.0, 4000.0)).unwrap();
    tracker.set_position(target, fix(39.0, -76.0, 12000.0)).unwrap();
    let events = tracker.event_channel();

    tracker.set_target(observer, Target::Entity(target)).unwrap();
    let received: Vec<TrackerEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received[0],
        TrackerEvent::TargetChanged {
            observer,
            target: Target::Entity(target)
        }
    );
    match received[1] {
        TrackerEvent::LookAngleChanged { direction, .. } => {
            assert_abs_diff_eq!(direction.elevation, 4.88, epsilon = 0.01);
            assert_abs_diff_eq!(direction.azimuth, 270.34, epsilon = 0.01);
        }
        ref other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn every_subscriber_recomputes_in_order() {
    let mut tracker = Tracker::new();
    let target = tracker.add_entity();
    let first = tracker.add_observer();
    let second = tracker.add_observer();
    tracker.set_position(first, fix(0.0, -1.0, 0.0)).unwrap();
    tracker.set_position(second, fix(0.0, 1.0, 0.0)).unwrap();
    tracker.set_target(first, Target::Entity(target)).unwrap();
    tracker.set_target(second, Target::Entity(target)).unwrap();
    let events = tracker.event_channel();

    tracker.set_position(target, fix(0.0, 0.0, 0.0)).unwrap();
    let angles = look_angles(&events);
    assert_eq!(angles.len(), 2);
    assert_eq!(angles[0].0, first);
    assert_abs_diff_eq!(angles[0].1.azimuth, 90.0, epsilon = 1e-9);
    assert_eq!(angles[1].0, second);
    assert_abs_diff_eq!(angles[1].1.azimuth, 270.0, epsilon = 1e-9);
}

#[test]
fn unchanged_look_angle_is_still_emitted() {
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.set_position(observer, fix(10.0, 10.0, 0.0)).unwrap();
    tracker.set_target(observer, Target::Entity(target)).unwrap();
    let events = tracker.event_channel();

    tracker.set_position(target, fix(10.5, 10.5, 500.0)).unwrap();
    tracker.set_position(target, fix(10.5, 10.5, 500.0)).unwrap();
    let angles = look_angles(&events);
    assert_eq!(angles.len(), 2);
    assert_eq!(angles[0], angles[1]);
}

#[test]
fn degenerate_geometry_keeps_prior_values() {
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.set_position(observer, fix(0.0, 30.0, 0.0)).unwrap();
    tracker.set_position(target, fix(0.0, 31.0, 0.0)).unwrap();
    tracker.set_target(observer, Target::Entity(target)).unwrap();
    let east = tracker.observer(observer).unwrap().look_angle().unwrap();
    assert_abs_diff_eq!(east.azimuth, 90.0, epsilon = 1e-9);

    // straight overhead: azimuth is not computed and stays east
    tracker.set_position(target, fix(0.0, 30.0, 10_000.0)).unwrap();
    let zenith = tracker.observer(observer).unwrap().look_angle().unwrap();
    assert_eq!(zenith.azimuth, east.azimuth);
    assert_abs_diff_eq!(zenith.elevation, 90.0, epsilon = 1e-6);

    // coincident: nothing is computed, nothing turns into NaN
    tracker.set_position(target, fix(0.0, 30.0, 0.0)).unwrap();
    let same = tracker.observer(observer).unwrap().look_angle().unwrap();
    assert_eq!(same, zenith);
}

#[test]
fn removing_a_target_resets_observers() {
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.set_target(observer, Target::Entity(target)).unwrap();
    let events = tracker.event_channel();

    tracker.remove_entity(target).unwrap();
    assert!(!tracker.contains(target));
    assert_eq!(tracker.observer(observer).unwrap().target(), &Target::None);

    let received: Vec<TrackerEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            TrackerEvent::TargetChanged {
                observer,
                target: Target::None
            },
            TrackerEvent::EntityRemoved { entity: target },
        ]
    );

    assert!(matches!(
        tracker.set_position(target, fix(0.0, 0.0, 0.0)),
        Err(GeotrackerError::UnknownEntity(_))
    ));
    assert!(matches!(
        tracker.remove_entity(target),
        Err(GeotrackerError::UnknownEntity(_))
    ));
}

#[test]
fn removing_an_observer_drops_its_subscriptions() {
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.set_target(observer, Target::Entity(target)).unwrap();

    tracker.remove_entity(observer).unwrap();
    assert!(tracker.observer(observer).is_none());
    assert!(tracker.subscribers(target).is_empty());

    let events = tracker.event_channel();
    tracker.set_position(target, fix(0.0, 0.0, 0.0)).unwrap();
    assert!(look_angles(&events).is_empty());
}

#[test]
fn mirrored_identities() {
    let mut tracker = Tracker::new();
    let remote = EntityId::from_uuid(uuid_from_str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"));
    tracker.add_entity_with_id(remote).unwrap();
    assert!(tracker.contains(remote));
    assert_eq!(tracker.entity(remote).unwrap().id(), remote);
}

fn uuid_from_str(text: &str) -> uuid::Uuid {
    uuid::Uuid::parse_str(text).unwrap()
}

#[test]
fn replaying_a_log_drives_the_observer() {
    let log = "\
2024-05-01T12:00:01 39.0 -76.0 12000
2024-05-01T12:00:02 95.0 -76.0 12000
2024-05-01T12:00:03 39.0 -74.0 12000
";
    let mut tracker = Tracker::new();
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.set_position(observer, fix(39.0, -75.0, 4000.0)).unwrap();
    tracker.set_target(observer, Target::Entity(target)).unwrap();
    let events = tracker.event_channel();

    let mut source = LogFilePositionSource::new(Cursor::new(log));
    assert_eq!(tracker.drain_source(target, &mut source).unwrap(), 2);

    let angles = look_angles(&events);
    assert_eq!(angles.len(), 2);
    assert!(angles[0].1.azimuth > 269.0);
    assert!(angles[1].1.azimuth < 91.0);

    let latest = tracker.entity(target).unwrap().position().unwrap();
    assert_eq!(latest.timestamp, at(3));
    assert_eq!(latest.coordinate.longitude(), -74.0);
}

#[test]
fn spherical_configuration() {
    let config = TrackerConfig {
        earth_model: EarthModel::Spherical,
        ..TrackerConfig::default()
    };
    let mut tracker = Tracker::with_config(&config);
    let observer = tracker.add_observer();
    tracker
        .set_target(
            observer,
            Target::Coordinate(GeodeticCoordinate::new(39.0, -76.0, 12000.0).unwrap()),
        )
        .unwrap();
    tracker.set_position(observer, fix(39.0, -75.0, 4000.0)).unwrap();

    let direction = tracker.observer(observer).unwrap().look_angle().unwrap();
    assert_abs_diff_eq!(direction.azimuth, 270.315, epsilon = 0.01);
    assert_abs_diff_eq!(direction.elevation, 4.894, epsilon = 0.01);
}
