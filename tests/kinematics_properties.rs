// Integration test: Randomized kinematics properties
//
// Inverse/forward kinematics round trips, reach rescaling and joint limits
// checked over many random targets with a fixed seed.

use approx::assert_relative_eq;
use easyjam::kinematics::arm::{ArmSimulator, Point2, REACH_MARGIN};
use easyjam::kinematics::config::RobotConfig;
use easyjam::kinematics::trajectory::{GuitarGeometry, strum_trajectory};
use easyjam::sequencer::StrumDirection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const SAMPLES: usize = 2_000;

fn polar(radius: f64, angle: f64) -> Point2 {
    Point2::new(radius * angle.cos(), radius * angle.sin())
}

/// Reachable targets come back within 1e-6 through forward kinematics
#[test]
fn test_ik_fk_round_trip_random_targets() {
    let arm = ArmSimulator::default();
    let (l1, l2) = (arm.config().link_lengths[0], arm.config().link_lengths[1]);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..SAMPLES {
        // Stay away from the singular inner and outer rims
        let radius = rng.gen_range((l2 - l1) * 1.01..(l1 + l2) * 0.999);
        let target = polar(radius, rng.gen_range(-PI..PI));

        let solution = arm.inverse_kinematics_2d(target);
        assert!(!solution.is_degraded(), "target {:?} flagged unreachable", target);

        let tip = arm.forward_kinematics(&solution.value[..2])[2];
        assert!(
            tip.distance(&target) < 1e-6,
            "target {:?} reached {:?}",
            target,
            tip
        );
    }
}

/// Unreachable targets are pulled back onto 99% of the reach, same direction
#[test]
fn test_unreachable_targets_rescaled() {
    let arm = ArmSimulator::default();
    let max_reach = arm.config().two_link_reach();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..SAMPLES {
        let angle = rng.gen_range(-PI..PI);
        let target = polar(rng.gen_range(max_reach * 1.001..max_reach * 10.0), angle);

        let solution = arm.inverse_kinematics_2d(target);
        assert!(solution.is_degraded());

        let tip = arm.forward_kinematics(&solution.value[..2])[2];
        assert!(tip.norm() <= max_reach * REACH_MARGIN + 1e-9);
        assert_relative_eq!(tip.norm(), max_reach * REACH_MARGIN, epsilon = 1e-9);

        let expected = target.scale(max_reach * REACH_MARGIN / target.norm());
        assert!(tip.distance(&expected) < 1e-6);
    }
}

/// No sequence of targets and time steps drives a joint outside its limits
#[test]
fn test_joint_limits_hold_under_random_targets() {
    let mut arm = ArmSimulator::new(RobotConfig::default());
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..200 {
        let target: Vec<f64> = (0..arm.config().n_joints)
            .map(|_| rng.gen_range(-10.0..10.0))
            .collect();
        arm.set_target(&target);

        for _ in 0..20 {
            arm.update(rng.gen_range(0.001..0.1));
            for (angle, limits) in arm.joint_angles().iter().zip(&arm.config().joint_limits) {
                assert!(angle.is_finite());
                assert!(limits.contains(*angle), "{} outside {:?}", angle, limits);
            }
        }
    }
}

/// Down and up strums reflect each other for any guitar placement
#[test]
fn test_strum_mirror_random_guitars() {
    let mut rng = StdRng::seed_from_u64(31);

    for _ in 0..200 {
        let guitar = GuitarGeometry {
            position: Point2::new(rng.gen_range(0.0..0.5), rng.gen_range(-0.2..0.2)),
            strum_height: rng.gen_range(0.01..0.3),
            strum_depth: rng.gen_range(0.01..0.3),
        };
        let speed = rng.gen_range(0.25..5.0);

        let down = strum_trajectory(&guitar, StrumDirection::Down, speed);
        let up = strum_trajectory(&guitar, StrumDirection::Up, speed);
        assert_eq!(down.len(), up.len());
        assert!(down.len() >= 2);

        for (d, u) in down.iter().zip(up.iter().rev()) {
            assert_eq!(d.x, u.x);
            assert_relative_eq!(d.y, u.y, epsilon = 1e-12);
        }
    }
}

/// Scenario: target (0.5, 0.5) with links 0.1 and 0.15
#[test]
fn test_far_diagonal_target_scenario() {
    let arm = ArmSimulator::default();
    let solution = arm.inverse_kinematics_2d(Point2::new(0.5, 0.5));
    assert!(solution.is_degraded());

    let tip = arm.forward_kinematics(&solution.value)[2];
    assert_relative_eq!(tip.norm(), 0.2475, epsilon = 1e-9);
    assert_relative_eq!(tip.x, tip.y, epsilon = 1e-9);
}
