//! Dispatch tests: priority order, nearest-team selection, requeue when
//! every team is busy, and fail-fast on bad input.

use dispatch_core::{
    config::{Domain, SimConfig, TeamConfig},
    engine::{DispatchEngine, DispatchOutcome},
    error::DispatchError,
    point::Priority,
    team::TeamStatus,
    type_selector::FixedTypeSelector,
    types::TeamId,
};

fn build(run_id: &str) -> DispatchEngine {
    DispatchEngine::build_test(run_id.to_string(), 42).expect("build test engine")
}

/// Alpha sits at (0,0), Beta at (100,100).
#[test]
fn end_to_end_priority_then_nearest() {
    let mut engine = build("e2e");
    let near = engine.submit_incident_at(1.0, 1.0, 3).unwrap();
    let mid = engine.submit_incident_at(50.0, 50.0, 1).unwrap();
    assert_eq!(engine.queue_len(), 2);

    let first = engine.dispatch_next_as("Small Fire").unwrap();
    match first {
        DispatchOutcome::Dispatched { point_id, team, ref team_name, .. } => {
            assert_eq!(point_id, near);
            assert_eq!(team, TeamId(0));
            assert_eq!(team_name, "Team Alpha");
        }
        other => panic!("expected dispatch, got {other:?}"),
    }

    let second = engine.dispatch_next_as("Small Fire").unwrap();
    match second {
        DispatchOutcome::Dispatched { point_id, ref team_name, .. } => {
            assert_eq!(point_id, mid);
            assert_eq!(team_name, "Team Beta");
        }
        other => panic!("expected dispatch, got {other:?}"),
    }

    assert_eq!(engine.queue_len(), 0);
    assert_eq!(engine.active_incident_count(), 2);
    assert_eq!(engine.available_team_count(), 0);
}

#[test]
fn empty_queue_reports_no_incident_pending() {
    let mut engine = build("empty");
    let before = engine.stats();

    assert_eq!(engine.dispatch_next().unwrap(), DispatchOutcome::NoIncidentPending);
    assert_eq!(engine.dispatch_next_as("Small Fire").unwrap(), DispatchOutcome::NoIncidentPending);

    assert_eq!(engine.stats(), before);
    assert!(engine.action_log().is_empty());
}

#[test]
fn no_team_available_requeues_at_same_priority() {
    let mut engine = build("requeue");
    engine.submit_incident_at(10.0, 10.0, 1).unwrap();
    engine.submit_incident_at(90.0, 90.0, 1).unwrap();
    assert!(engine.dispatch_next_as("Large Fire").unwrap().is_dispatched());
    assert!(engine.dispatch_next_as("Large Fire").unwrap().is_dispatched());

    let waiting = engine.submit_incident_at(50.0, 50.0, 3).unwrap();
    assert_eq!(engine.queue_len(), 1);

    let outcome = engine.dispatch_next_as("Small Fire").unwrap();
    assert_eq!(outcome, DispatchOutcome::NoTeamAvailable { point_id: waiting });
    assert_eq!(engine.queue_len(), 1, "pop + reinsert must net to zero");
    assert_eq!(engine.next_priority(), Some(Priority::High));
    assert!(engine.active_incident(waiting).is_none());
    assert_eq!(engine.stats().deferred_dispatches, 1);

    // The engine stays usable: once a team frees up the same point goes out.
    engine.run_ticks(15).unwrap();
    assert_eq!(engine.available_team_count(), 2);
    let outcome = engine.dispatch_next_as("Small Fire").unwrap();
    assert!(matches!(outcome, DispatchOutcome::Dispatched { point_id, .. } if point_id == waiting));
}

#[test]
fn unknown_incident_type_fails_before_popping() {
    let mut engine = build("unknown-type");
    engine.submit_incident_at(5.0, 5.0, 2).unwrap();

    let err = engine.dispatch_next_as("Volcano").unwrap_err();
    assert!(matches!(err, DispatchError::UnknownIncidentType { ref name } if name == "Volcano"));
    assert_eq!(engine.queue_len(), 1);
    assert_eq!(engine.active_incident_count(), 0);

    engine.set_type_selector(Box::new(FixedTypeSelector("Meteor".into())));
    assert!(engine.dispatch_next().is_err());
    assert_eq!(engine.queue_len(), 1);
}

#[test]
fn selector_drives_dispatch_next() {
    let mut engine = build("selector");
    engine.set_type_selector(Box::new(FixedTypeSelector("Suspicious Smoke".into())));
    let id = engine.submit_incident_at(20.0, 20.0, 2).unwrap();

    let outcome = engine.dispatch_next().unwrap();
    assert!(
        matches!(outcome, DispatchOutcome::Dispatched { ref incident_type, .. } if incident_type == "Suspicious Smoke")
    );
    let active = engine.active_incident(id).expect("active record");
    assert_eq!(active.incident_type, "Suspicious Smoke");
    assert_eq!(active.started_at, 0);
}

#[test]
fn invalid_intake_is_rejected() {
    let mut engine = build("bad-intake");
    assert!(matches!(
        engine.submit_incident_at(1.0, 1.0, 0),
        Err(DispatchError::InvalidPriority { value: 0 })
    ));
    assert!(matches!(
        engine.submit_incident_at(1.0, 1.0, 4),
        Err(DispatchError::InvalidPriority { value: 4 })
    ));
    assert!(matches!(
        engine.submit_incident_at(f64::NAN, 1.0, 2),
        Err(DispatchError::InvalidCoordinate { .. })
    ));
    assert_eq!(engine.queue_len(), 0);
    assert_eq!(engine.stats().incidents_submitted, 0);
}

#[test]
fn random_intake_stays_in_domain() {
    let mut engine = build("random-intake");
    for _ in 0..50 {
        engine.submit_incident().unwrap();
    }
    assert_eq!(engine.queue_len(), 50);

    engine.set_type_selector(Box::new(FixedTypeSelector("Large Fire".into())));
    let mut last = Priority::High;
    while engine.queue_len() > 0 {
        let p = engine.next_priority().unwrap();
        assert!(p <= last, "queue priority rose from {last} to {p}");
        last = p;
        if !engine.dispatch_next().unwrap().is_dispatched() {
            engine.run_ticks(15).unwrap();
            last = Priority::High;
        }
    }
    for incident in engine.active_incidents() {
        let (x, y) = (incident.point.x(), incident.point.y());
        assert!((0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y));
    }
}

#[test]
fn team_with_no_roster_defers_everything() {
    let mut cfg = SimConfig::default_test();
    cfg.teams.clear();
    let mut engine = DispatchEngine::new("no-teams".into(), 1, cfg).unwrap();
    engine.submit_incident_at(1.0, 1.0, 1).unwrap();
    assert!(matches!(
        engine.dispatch_next().unwrap(),
        DispatchOutcome::NoTeamAvailable { .. }
    ));
    assert_eq!(engine.queue_len(), 1);
}

#[test]
fn configured_positions_are_kept() {
    let mut cfg = SimConfig::default_test();
    cfg.teams.push(TeamConfig::at("Team Gamma", 40.0, 60.0));
    let engine = DispatchEngine::new("positions".into(), 3, cfg).unwrap();
    let gamma = engine.team_by_name("Team Gamma").unwrap();
    assert_eq!((gamma.location().x(), gamma.location().y()), (40.0, 60.0));
    assert_eq!(gamma.status(), TeamStatus::Available);
    assert!(matches!(
        engine.team_by_name("Team Zulu"),
        Err(DispatchError::TeamNotFound { .. })
    ));
}

#[test]
fn bundled_data_config_loads() {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
    let cfg = SimConfig::load(data_dir).expect("load data/dispatch.json");
    assert_eq!(cfg.teams.len(), 5);
    assert_eq!(cfg.catalog().require("Large Fire").unwrap().duration, 15);

    let engine = DispatchEngine::new("bundled".into(), 12345, cfg).unwrap();
    assert_eq!(engine.queue_len(), 5);
    for team in engine.teams() {
        let (x, y) = (team.location().x(), team.location().y());
        assert!((10.0..=90.0).contains(&x) && (10.0..=90.0).contains(&y));
    }

    assert!(SimConfig::load("/nonexistent/dir").is_err());
}

#[test]
fn random_intake_respects_fractional_domain_bounds() {
    let mut cfg = SimConfig::default_test();
    cfg.domain = Domain { min: 0.5, max: 2.9 };
    cfg.team_spawn = Domain { min: -3.5, max: -1.2 };
    cfg.teams.push(TeamConfig::spawned("Team Gamma"));
    cfg.initial_incidents = 20;
    let mut engine = DispatchEngine::new("fractional".into(), 11, cfg).unwrap();

    let gamma = engine.team_by_name("Team Gamma").unwrap();
    for v in [gamma.location().x(), gamma.location().y()] {
        assert!([-3.0, -2.0].contains(&v), "spawn coordinate {v}");
    }

    engine.set_type_selector(Box::new(FixedTypeSelector("Large Fire".into())));
    let mut seen = 0;
    while engine.dispatch_next().unwrap().is_dispatched() {
        seen += 1;
    }
    assert_eq!(seen, 3);
    for incident in engine.active_incidents() {
        let (x, y) = (incident.point.x(), incident.point.y());
        assert!([1.0, 2.0].contains(&x) && [1.0, 2.0].contains(&y), "({x}, {y})");
    }
}

#[test]
fn domains_without_whole_coordinates_are_rejected() {
    for domain in [Domain { min: 0.5, max: 0.9 }, Domain { min: -1e300, max: 1e300 }] {
        let mut cfg = SimConfig::default_test();
        cfg.domain = domain;
        assert!(matches!(
            DispatchEngine::new("bad-domain".into(), 1, cfg),
            Err(DispatchError::InvalidConfig(_))
        ));
    }
}
