//! Simulation core validation tests
//!
//! Exercises vehicles, signals and intersection checkers directly, then the
//! world that drives them.

use std::sync::Arc;

use lane_sim::simulation::{
    CrossingOutcome, IntersectionChecker, PhaseDurations, RoadLayout, SignalPhase,
    SignalRegistry, SimConfig, SimError, SimEvent, SimSignal, SimVehicle, SimWorld, VehicleKind,
    VehicleStepResult, CROSSING_COUNT, LANE_LABELS, TIME_INTERVAL,
};

#[test]
fn test_vehicle_initial_state() {
    let vehicle = SimVehicle::new("CAR-1", VehicleKind::Car);
    assert_eq!(vehicle.id(), "CAR-1");
    assert_eq!(vehicle.position().into_inner(), 0.0);
    assert_eq!(vehicle.lane(), 1);
    assert_eq!(vehicle.velocity(), 20.0);
    assert_eq!(vehicle.move_count(), 0);
}

#[test]
fn test_car_three_steps() {
    let mut vehicle = SimVehicle::new("CAR-1", VehicleKind::Car);
    for _ in 0..3 {
        vehicle.step();
        assert_eq!(vehicle.velocity(), 20.0);
    }
    assert_eq!(vehicle.position().into_inner(), 300.0);
    assert_eq!(vehicle.move_count(), 3);
}

#[test]
fn test_position_and_lane_after_n_steps() {
    for kind in [VehicleKind::Car, VehicleKind::Truck, VehicleKind::Bus] {
        let mut vehicle = SimVehicle::new("V", kind);
        for n in 1..=10u32 {
            vehicle.step();
            assert_eq!(vehicle.position().into_inner(), n as f64 * kind.speed());
            assert_eq!(vehicle.lane(), LANE_LABELS[n as usize % LANE_LABELS.len()]);
            assert_eq!(vehicle.velocity(), kind.speed() / TIME_INTERVAL);
        }
    }
}

#[test]
fn test_vehicle_kind_speeds() {
    assert_eq!(VehicleKind::Car.speed(), 100.0);
    assert_eq!(VehicleKind::Truck.speed(), 90.0);
    assert_eq!(VehicleKind::Bus.speed(), 80.0);
}

#[test]
fn test_snapshot_due_only_on_second_step() {
    let mut vehicle = SimVehicle::new("BUS-1", VehicleKind::Bus);

    assert_eq!(vehicle.step(), VehicleStepResult::Moved);

    let VehicleStepResult::SnapshotDue(snapshot) = vehicle.step() else {
        panic!("second step should report a snapshot");
    };
    // Lane shown is the one driven during the second step
    assert_eq!(snapshot.lane, 2);
    assert_eq!(snapshot.position, 160.0);
    assert_eq!(snapshot.velocity, 16.0);
    assert_eq!(
        snapshot.to_string(),
        "Vehicle BUS-1: lane 2, current position 160.00, velocity 16.00"
    );

    for _ in 0..5 {
        assert_eq!(vehicle.step(), VehicleStepResult::Moved);
    }
}

#[test]
fn test_snapshot_does_not_mutate() {
    let mut vehicle = SimVehicle::new("TRUCK-1", VehicleKind::Truck);
    vehicle.step();
    let first = vehicle.snapshot();
    let second = vehicle.snapshot();
    assert_eq!(first, second);
    assert_eq!(vehicle.move_count(), 1);
}

#[test]
fn test_signal_rejects_empty_id() {
    assert_eq!(SimSignal::new("").unwrap_err(), SimError::InvalidIdentifier);

    let mut registry = SignalRegistry::new();
    assert!(registry.register("").is_err());
    assert!(registry.is_empty());
}

#[test]
fn test_signal_cycle() {
    let mut signal = SimSignal::new("A").unwrap();
    assert_eq!(signal.current_state(), SignalPhase::Red);

    for n in 1..=9 {
        signal.advance();
        assert_eq!(signal.current_state(), SignalPhase::CYCLE[n % 3]);
    }
}

#[test]
fn test_signal_returns_to_red_after_three_advances() {
    let mut signal = SimSignal::new("A").unwrap();
    signal.advance();
    assert_eq!(signal.current_state(), SignalPhase::Yellow);
    assert_eq!(signal.current_duration(), 2);
    signal.advance();
    assert_eq!(signal.current_state(), SignalPhase::Green);
    assert_eq!(signal.current_duration(), 15);
    signal.advance();
    assert_eq!(signal.current_state(), SignalPhase::Red);
    assert_eq!(signal.current_duration(), 10);
}

#[test]
fn test_reconfigure_durations() {
    let mut signal = SimSignal::new("A").unwrap();
    signal.advance();

    signal.reconfigure_durations(20, 4, 30).unwrap();
    assert_eq!(signal.current_state(), SignalPhase::Yellow);
    assert_eq!(signal.current_duration(), 4);
    assert_eq!(signal.durations(), PhaseDurations::new(20, 4, 30).unwrap());
}

#[test]
fn test_reconfigure_rejects_non_positive() {
    let mut signal = SimSignal::new("A").unwrap();
    let before = signal.durations();

    for (red, yellow, green) in [(0, 2, 15), (10, -2, 15), (10, 2, 0), (-1, -1, -1)] {
        let err = signal.reconfigure_durations(red, yellow, green).unwrap_err();
        assert_eq!(err, SimError::InvalidDuration { red, yellow, green });
        assert_eq!(signal.durations(), before);
    }
}

#[test]
fn test_registry_lists_in_construction_order() {
    let mut registry = SignalRegistry::new();
    let a = registry.register("A").unwrap();
    registry.register("B").unwrap();
    registry.register("C").unwrap();

    registry.get_mut(a).unwrap().advance();

    let listed = registry.list_all();
    let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(listed[0].phase, SignalPhase::Yellow);
    assert_eq!(listed[1].phase, SignalPhase::Red);
    assert_eq!(listed[0].to_string(), "Signal A: yellow (2s)");
    assert_eq!(registry.get(a).unwrap().id(), "A");
}

#[test]
fn test_registry_index_out_of_range() {
    let mut registry = SignalRegistry::new();
    registry.register("A").unwrap();
    assert_eq!(
        registry.by_index_mut(3).unwrap_err(),
        SimError::SignalIndexOutOfRange { index: 3, len: 1 }
    );
}

#[test]
fn test_checker_rejects_invalid_lane() {
    let layout = Arc::new(RoadLayout::reference());
    let err = IntersectionChecker::new("V9", 3, layout).unwrap_err();
    assert_eq!(err, SimError::InvalidLane { lane: 3, lane_count: 3 });
    assert_eq!(err.to_string(), "Lane must be between 0 and 2, received 3");
}

#[test]
fn test_checker_intent_pattern_alternates() {
    let layout = Arc::new(RoadLayout::reference());
    let checker = IntersectionChecker::new("V1", 0, layout).unwrap();
    assert_eq!(checker.intent().len(), CROSSING_COUNT);
    for (i, attempt) in checker.intent().iter().enumerate() {
        assert_eq!(*attempt, i % 2 == 0);
    }
    assert_eq!(checker.next_crossing(), Some(0));
}

#[test]
fn test_checker_middle_lane_fails_on_attempted_crossings() {
    let layout = Arc::new(RoadLayout::reference());
    let mut checker = IntersectionChecker::new("V2", 1, layout).unwrap();

    let mut failed = Vec::new();
    for index in 0..CROSSING_COUNT {
        match checker.check_next() {
            Ok(outcome) => assert_eq!(outcome, CrossingOutcome::Skipped),
            Err(SimError::NoSuchCrossing {
                vehicle_id,
                crossing,
                lane,
            }) => {
                assert_eq!(vehicle_id, "V2");
                assert_eq!(crossing, index + 1);
                assert_eq!(lane, 2);
                failed.push(index);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(failed, vec![0, 2, 4, 6, 8]);
    assert!(checker.is_exhausted());
    assert_eq!(checker.status_report().next_crossing, None);
    assert!(checker.status_report().to_string().contains("Next Crossing: completed"));
}

#[test]
fn test_checker_outer_lanes_pass() {
    let layout = Arc::new(RoadLayout::reference());
    for lane in [0, 2] {
        let mut checker = IntersectionChecker::new("V", lane, Arc::clone(&layout)).unwrap();
        for index in 0..CROSSING_COUNT {
            let expected = if index % 2 == 0 {
                CrossingOutcome::Passed
            } else {
                CrossingOutcome::Skipped
            };
            assert_eq!(checker.check_next().unwrap(), expected);
        }
    }
}

#[test]
fn test_failed_crossing_still_advances_cursor() {
    let layout = Arc::new(RoadLayout::reference());
    let mut checker = IntersectionChecker::new("V2", 1, layout).unwrap();

    assert!(checker.check_next().is_err());
    assert_eq!(checker.next_crossing(), Some(1));
    assert_eq!(checker.log().len(), 1);
    assert_eq!(
        checker.log()[0],
        "V2 at crossing 1 on lane 2: Attempted to pass a non-existent crossing."
    );
}

#[test]
fn test_check_after_exhaustion_is_noop() {
    let layout = Arc::new(RoadLayout::reference());
    let mut checker = IntersectionChecker::new("V2", 1, layout).unwrap();
    for _ in 0..CROSSING_COUNT {
        let _ = checker.check_next();
    }
    let entries = checker.log().len();

    for _ in 0..3 {
        assert_eq!(checker.check_next().unwrap(), CrossingOutcome::Completed);
    }
    // Completion is logged once
    assert_eq!(checker.log().len(), entries + 1);
    assert_eq!(checker.log()[entries], "V2: All crossings processed.");
}

#[test]
fn test_status_report_rendering() {
    let layout = Arc::new(RoadLayout::reference());
    let mut checker = IntersectionChecker::new("V1", 0, layout).unwrap();
    assert!(checker
        .status_report()
        .to_string()
        .contains("No activity recorded yet."));

    checker.check_next().unwrap();
    let text = checker.status_report().to_string();
    assert!(text.contains("Lane: 1"));
    assert!(text.contains("Intent Pattern: [1, 0, 1, 0, 1, 0, 1, 0, 1, 0]"));
    assert!(text.contains("Next Crossing: 2"));
    assert!(text.contains("V1 at crossing 1 on lane 1: Successfully passed."));
}

#[test]
fn test_custom_layout() {
    let layout = RoadLayout::new(vec![vec![false, true, true], vec![true, true, true]]).unwrap();
    assert_eq!(layout.lane_count(), 2);
    assert_eq!(layout.crossing_count(), 3);

    let mut checker = IntersectionChecker::new("V1", 0, Arc::new(layout)).unwrap();
    assert!(checker.check_next().is_err());
    assert_eq!(checker.check_next().unwrap(), CrossingOutcome::Skipped);
    assert_eq!(checker.check_next().unwrap(), CrossingOutcome::Passed);

    assert!(RoadLayout::new(vec![]).is_err());
    assert!(RoadLayout::new(vec![vec![true], vec![true, false]]).is_err());
}

#[test]
fn test_world_default_run() {
    let mut world = SimWorld::new();
    world.add_vehicle("CAR-1", VehicleKind::Car);
    world.add_signal("A").unwrap();

    let events = world.run().unwrap();

    let minutes: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::MinuteCompleted(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(minutes, vec![1, 2, 3, 4, 5]);

    let snapshots: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Snapshot(_)))
        .collect();
    assert_eq!(snapshots.len(), 1);

    assert_eq!(world.step_count, 60);
    let snapshot = &world.vehicle_snapshots()[0];
    assert_eq!(snapshot.position, 6000.0);
    assert_eq!(snapshot.lane, 1);

    let status = &world.signal_statuses()[0];
    assert_eq!(status.phase, SignalPhase::Red);
    assert_eq!(status.duration, 10);
}

#[test]
fn test_world_snapshot_event_per_vehicle() {
    let mut world = SimWorld::with_config(SimConfig {
        steps: 3,
        steps_per_minute: 12,
    });
    world.add_vehicle("CAR-1", VehicleKind::Car);
    world.add_vehicle("TRUCK-1", VehicleKind::Truck);

    let events = world.run().unwrap();
    assert_eq!(events.len(), 2);
    let SimEvent::Snapshot(first) = &events[0] else {
        panic!("expected snapshot");
    };
    assert_eq!(first.id, "CAR-1");
    assert_eq!(first.position, 200.0);
}

#[test]
fn test_world_rejects_zero_steps_per_minute() {
    let mut world = SimWorld::with_config(SimConfig {
        steps: 10,
        steps_per_minute: 0,
    });
    assert!(world.run().is_err());
    assert_eq!(world.step_count, 0);
}

#[test]
fn test_world_vehicle_management() {
    let mut world = SimWorld::new();
    world.add_vehicle("CAR-1", VehicleKind::Car);
    world.add_vehicle("BUS-1", VehicleKind::Bus);

    let listing = world.list_vehicles();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[1].index, 1);
    assert_eq!(listing[1].id, "BUS-1");

    assert_eq!(
        world.remove_vehicle(5).unwrap_err(),
        SimError::VehicleIndexOutOfRange { index: 5, len: 2 }
    );

    let removed = world.remove_vehicle(0).unwrap();
    assert_eq!(removed.id(), "CAR-1");
    assert_eq!(world.list_vehicles()[0].id, "BUS-1");
}

#[test]
fn test_world_signal_durations_by_index() {
    let mut world = SimWorld::new();
    world.add_signal("A").unwrap();
    world.add_signal("B").unwrap();

    world.set_signal_durations(1, 5, 1, 5).unwrap();
    assert_eq!(world.signal_statuses()[1].duration, 5);
    assert_eq!(world.signal_statuses()[0].duration, 10);

    assert!(world.set_signal_durations(1, 5, 0, 5).is_err());
    assert_eq!(world.signal_statuses()[1].duration, 5);

    assert!(matches!(
        world.set_signal_durations(2, 1, 1, 1),
        Err(SimError::SignalIndexOutOfRange { .. })
    ));
}

#[test]
fn test_world_ranking() {
    let mut world = SimWorld::with_config(SimConfig {
        steps: 4,
        steps_per_minute: 12,
    });
    world.add_vehicle("BUS-1", VehicleKind::Bus);
    world.add_vehicle("CAR-1", VehicleKind::Car);
    world.add_vehicle("TRUCK-1", VehicleKind::Truck);
    world.run().unwrap();

    let ids: Vec<&str> = world.ranking().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["CAR-1", "TRUCK-1", "BUS-1"]);
}

#[test]
fn test_world_crossing_survey() {
    let mut world = SimWorld::create_test_world().unwrap();
    assert_eq!(world.checkers.len(), 3);

    let failures = world.check_crossings();
    assert_eq!(failures.len(), 5);
    assert!(failures
        .iter()
        .all(|e| matches!(e, SimError::NoSuchCrossing { vehicle_id, .. } if vehicle_id == "V2")));

    for status in world.checker_statuses() {
        assert_eq!(status.next_crossing, None);
        assert_eq!(status.log.len(), CROSSING_COUNT);
    }

    assert!(world.track_vehicle("V4", 7).is_err());
    assert_eq!(world.checkers.len(), 3);
}
