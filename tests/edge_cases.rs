//! Edge case tests and robustness validation
//!
//! Unknown names, empty inputs and odd parameters must degrade to a usable
//! value with a diagnostic instead of failing.

use easyjam::command::{Command, Reply, execute};
use easyjam::config::AppConfig;
use easyjam::diagnostics::Diagnostic;
use easyjam::environment::NullEnvironment;
use easyjam::kinematics::arm::{ArmSimulator, Point2};
use easyjam::kinematics::trajectory::{MAX_POINT_COUNT, MIN_STRUM_SPEED, point_count};
use easyjam::music::chord::{DEFAULT_CHORD, resolve_chord};
use easyjam::playback::SessionManager;
use easyjam::sequencer::{ChordProgression, StrumStep};

/// Scenario: [down, rest, up, rest] at 120 BPM
#[test]
fn test_pattern_scenario_cycles_and_advances_chords() {
    let mut progression =
        ChordProgression::from_names(&["G", "C", "D"], "basic_down").into_value();
    assert_eq!(progression.pattern().seconds_per_beat(), 0.5);

    let mut chords_seen = vec![progression.current_chord().name];
    let mut steps = Vec::new();
    for _ in 0..12 {
        steps.push(progression.next_strum());
        if progression.is_at_pattern_start() {
            progression.advance_chord();
            chords_seen.push(progression.current_chord().name);
        }
    }

    assert_eq!(&steps[..4], &[StrumStep::Down, StrumStep::Rest, StrumStep::Down, StrumStep::Rest]);
    assert_eq!(&steps[..4], &steps[4..8]);
    assert_eq!(chords_seen, vec!["G", "C", "D", "G"]);
}

#[test]
fn test_empty_progression_plays_default_chord() {
    let empty: [&str; 0] = [];
    let progression = ChordProgression::from_names(&empty, "basic_alternating");

    assert_eq!(progression.diagnostics, vec![Diagnostic::EmptyProgression]);
    assert_eq!(progression.value.chords().len(), 1);
    assert_eq!(progression.value.current_chord().name, DEFAULT_CHORD);
}

#[test]
fn test_unknown_names_fall_back() {
    let chord = resolve_chord("Xm7b13");
    assert_eq!(chord.value.name, DEFAULT_CHORD);
    assert!(chord.is_degraded());

    // Names are case sensitive
    assert!(resolve_chord("am").is_degraded());
    assert!(!resolve_chord("Am").is_degraded());

    let progression = ChordProgression::from_names(&["Am", "nope"], "");
    assert_eq!(progression.diagnostics.len(), 2);
    assert_eq!(progression.value.pattern().name, "Basic Alternating");
}

#[test]
fn test_ik_degenerate_targets_stay_finite() {
    let arm = ArmSimulator::default();
    for target in [
        Point2::ORIGIN,
        Point2::new(1e-12, 0.0),
        Point2::new(0.0, -0.25),
        Point2::new(1e9, -1e9),
    ] {
        let solution = arm.inverse_kinematics_2d(target);
        assert!(solution.value.iter().all(|a| a.is_finite()), "{:?}", target);
    }
}

#[test]
fn test_point_count_odd_speeds() {
    assert_eq!(point_count(-1.0), 20);
    assert_eq!(point_count(f64::INFINITY), 20);
    assert_eq!(point_count(1e6), 2);
    assert_eq!(point_count(0.5), 40);

    // Tiny speeds are capped instead of asking for billions of waypoints
    assert_eq!(point_count(1e-12), MAX_POINT_COUNT);
    assert_eq!(point_count(MIN_STRUM_SPEED), MAX_POINT_COUNT);
}

#[test]
fn test_command_round_trip_through_dispatch() {
    let manager = SessionManager::new(AppConfig::default(), Box::new(NullEnvironment::new()));

    let reply = execute(&manager, "play G,Bogus nope 1".parse::<Command>().unwrap()).unwrap();
    let Reply::Json(value) = reply else {
        panic!("expected json");
    };
    assert_eq!(value["value"]["chords"], serde_json::json!(["G", "C"]));
    assert_eq!(value["value"]["pattern"], "basic_alternating");

    let kinds: Vec<&str> = value["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"environment_unavailable"));
    assert!(kinds.contains(&"unknown_chord"));
    assert!(kinds.contains(&"unknown_pattern"));

    let Reply::Json(stop) = execute(&manager, Command::Stop).unwrap() else {
        panic!("expected json");
    };
    assert!(stop["value"]["steps_played"].is_u64());
}
