// Trajectory generator - Strum motions in Cartesian or joint space
//
// Cartesian strums move the planar arm's tip vertically across the string
// plane with a raised-cosine ease so velocity is zero at both ends. Joint-space
// strums drive the dual-arm robot's strumming joint directly with a half-sine
// offset over the strum phase.

use crate::kinematics::arm::Point2;
use crate::sequencer::pattern::StrumDirection;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of points in a strum at speed 1.0
pub const BASE_POINT_COUNT: f64 = 20.0;

/// Upper bound on points in one strum
pub const MAX_POINT_COUNT: usize = 1000;

/// Slowest strum speed that stays within [`MAX_POINT_COUNT`]
pub const MIN_STRUM_SPEED: f64 = BASE_POINT_COUNT / MAX_POINT_COUNT as f64;

/// Degrees of freedom of the dual-arm robot (7 per arm)
pub const DUAL_ARM_DOF: usize = 14;

/// Degrees of freedom of one arm
pub const ARM_DOF: usize = 7;

/// Where the guitar strings sit relative to the planar arm base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuitarGeometry {
    pub position: Point2,
    /// How far above the strings a strum starts or ends
    pub strum_height: f64,
    /// How far below the strings a strum starts or ends
    pub strum_depth: f64,
}

impl GuitarGeometry {
    /// Y coordinate above the strings
    pub fn top(&self) -> f64 {
        self.position.y + self.strum_height
    }

    /// Y coordinate below the strings
    pub fn bottom(&self) -> f64 {
        self.position.y - self.strum_depth
    }
}

impl Default for GuitarGeometry {
    fn default() -> Self {
        Self {
            position: Point2::new(0.3, 0.0),
            strum_height: 0.15,
            strum_depth: 0.05,
        }
    }
}

/// Raised-cosine ease: s(0) = 0, s(1) = 1, zero slope at both ends
pub fn ease_in_out(t: f64) -> f64 {
    0.5 - 0.5 * (PI * t).cos()
}

/// Number of trajectory points for a strum speed multiplier
///
/// `round(20 / speed)`, clamped to `2..=MAX_POINT_COUNT`. Non-positive or
/// non-finite speeds are treated as 1.0.
pub fn point_count(speed: f64) -> usize {
    let speed = if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        1.0
    };
    ((BASE_POINT_COUNT / speed).round() as usize).clamp(2, MAX_POINT_COUNT)
}

/// Tip positions for one strum over the strings
///
/// X stays at the guitar's X; Y eases between [`GuitarGeometry::top`] and
/// [`GuitarGeometry::bottom`], downward for a down strum.
pub fn strum_trajectory(
    guitar: &GuitarGeometry,
    direction: StrumDirection,
    speed: f64,
) -> Vec<Point2> {
    let (start_y, end_y) = match direction {
        StrumDirection::Down => (guitar.top(), guitar.bottom()),
        StrumDirection::Up => (guitar.bottom(), guitar.top()),
    };

    let n = point_count(speed);
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let s = ease_in_out(t);
            Point2::new(guitar.position.x, start_y + (end_y - start_y) * s)
        })
        .collect()
}

/// Pose and motion parameters of the dual-arm robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualArmPose {
    /// Left arm (chord hand) joint targets, held still
    pub left_hold: [f64; ARM_DOF],
    /// Right arm (strumming hand) rest joint targets
    pub right_base: [f64; ARM_DOF],
    /// Index of the strumming joint in the 14-value action
    pub strum_joint: usize,
    /// Peak offset of the strumming joint, in radians
    pub amplitude: f64,
    /// Phase increment per tick within a strum
    pub phase_step: f64,
    /// Steps spent settling into the hold pose after a reset
    pub settle_steps: usize,
}

impl Default for DualArmPose {
    fn default() -> Self {
        Self {
            left_hold: [0.2, -0.3, 0.2, -1.5, 0.0, 1.0, 0.0],
            right_base: [0.3, 0.1, 0.15, -1.2, 0.0, 0.8, 0.0],
            strum_joint: 10,
            amplitude: 0.4,
            phase_step: 0.05,
            settle_steps: 50,
        }
    }
}

impl DualArmPose {
    /// Both arms at rest: left arm holding, right arm at its base pose
    pub fn hold_action(&self) -> Vec<f64> {
        let mut action = Vec::with_capacity(DUAL_ARM_DOF);
        action.extend_from_slice(&self.left_hold);
        action.extend_from_slice(&self.right_base);
        action
    }

    /// Action at `phase` (0..1) through a strum
    ///
    /// The strumming joint is offset by `amplitude * sign * sin(phase * pi)`;
    /// every other joint stays at the hold pose.
    pub fn strum_action(&self, direction: StrumDirection, phase: f64) -> Vec<f64> {
        let mut action = self.hold_action();
        if let Some(joint) = action.get_mut(self.strum_joint) {
            *joint += self.amplitude * direction.sign() * (phase * PI).sin();
        }
        action
    }

    /// Phases visited during one strum: 0, step, 2*step, ... below 1
    pub fn strum_phases(&self) -> Vec<f64> {
        let step = if self.phase_step.is_finite() && self.phase_step > 0.0 {
            self.phase_step.min(1.0)
        } else {
            0.05
        };
        let count = ((1.0 / step) - 1e-9).ceil() as usize;
        (0..count).map(|i| i as f64 * step).collect()
    }

    /// Full joint-space trajectory for one strum
    pub fn strum_trajectory(&self, direction: StrumDirection) -> Vec<Vec<f64>> {
        self.strum_phases()
            .into_iter()
            .map(|phase| self.strum_action(direction, phase))
            .collect()
    }
}

/// One target consumed by a rig per tick
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    /// Planar tip position, converted to joint angles by inverse kinematics
    Position(Point2),
    /// Complete joint-space action
    Joints(Vec<f64>),
}

/// Ordered waypoints for one strum, consumed once and discarded
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub direction: StrumDirection,
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    /// Cartesian trajectory from tip positions
    pub fn cartesian(direction: StrumDirection, points: Vec<Point2>) -> Self {
        Self {
            direction,
            waypoints: points.into_iter().map(Waypoint::Position).collect(),
        }
    }

    /// Joint-space trajectory from full actions
    pub fn joint_space(direction: StrumDirection, actions: Vec<Vec<f64>>) -> Self {
        Self {
            direction,
            waypoints: actions.into_iter().map(Waypoint::Joints).collect(),
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl IntoIterator for Trajectory {
    type Item = Waypoint;
    type IntoIter = std::vec::IntoIter<Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ease_endpoints() {
        assert_relative_eq!(ease_in_out(0.0), 0.0);
        assert_relative_eq!(ease_in_out(0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(ease_in_out(1.0), 1.0);
    }

    #[test]
    fn test_point_count() {
        assert_eq!(point_count(1.0), 20);
        assert_eq!(point_count(2.0), 10);
        assert_eq!(point_count(3.0), 7);
        assert_eq!(point_count(100.0), 2);
        assert_eq!(point_count(0.0), 20);
        assert_eq!(point_count(f64::NAN), 20);
    }

    #[test]
    fn test_down_strum_path() {
        let guitar = GuitarGeometry::default();
        let path = strum_trajectory(&guitar, StrumDirection::Down, 2.0);

        assert_eq!(path.len(), 10);
        assert!(path.iter().all(|p| p.x == 0.3));
        assert_relative_eq!(path[0].y, 0.15, epsilon = 1e-12);
        assert_relative_eq!(path[9].y, -0.05, epsilon = 1e-12);
        assert!(path.windows(2).all(|w| w[1].y < w[0].y));
    }

    #[test]
    fn test_strum_eases_at_ends() {
        let guitar = GuitarGeometry::default();
        let path = strum_trajectory(&guitar, StrumDirection::Up, 1.0);

        let first_step = (path[1].y - path[0].y).abs();
        let middle_step = (path[10].y - path[9].y).abs();
        assert!(first_step < middle_step / 5.0);
    }

    #[test]
    fn test_up_mirrors_down() {
        let guitar = GuitarGeometry::default();
        for speed in [0.5, 1.0, 2.0, 3.0] {
            let down = strum_trajectory(&guitar, StrumDirection::Down, speed);
            let up = strum_trajectory(&guitar, StrumDirection::Up, speed);
            assert_eq!(down.len(), up.len());

            let axis_sum = guitar.top() + guitar.bottom();
            for (d, u) in down.iter().zip(&up) {
                assert_eq!(d.x, u.x);
                assert_relative_eq!(d.y + u.y, axis_sum, epsilon = 1e-12);
            }
            for (d, u) in down.iter().zip(up.iter().rev()) {
                assert_relative_eq!(d.y, u.y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_dual_arm_hold_action() {
        let pose = DualArmPose::default();
        let action = pose.hold_action();
        assert_eq!(action.len(), DUAL_ARM_DOF);
        assert_eq!(action[3], -1.5);
        assert_eq!(action[10], -1.2);
    }

    #[test]
    fn test_dual_arm_strum_action() {
        let pose = DualArmPose::default();
        let hold = pose.hold_action();

        let down = pose.strum_action(StrumDirection::Down, 0.5);
        let up = pose.strum_action(StrumDirection::Up, 0.5);
        assert_relative_eq!(down[10], -1.2 + 0.4, epsilon = 1e-12);
        assert_relative_eq!(up[10], -1.2 - 0.4, epsilon = 1e-12);

        for (i, (d, h)) in down.iter().zip(&hold).enumerate() {
            if i != pose.strum_joint {
                assert_eq!(d, h);
            }
        }

        let start = pose.strum_action(StrumDirection::Down, 0.0);
        assert_relative_eq!(start[10], hold[10], epsilon = 1e-12);
    }

    #[test]
    fn test_dual_arm_phases() {
        let pose = DualArmPose::default();
        let phases = pose.strum_phases();
        assert_eq!(phases.len(), 20);
        assert_eq!(phases[0], 0.0);
        assert!(*phases.last().unwrap() < 1.0);

        let trajectory = pose.strum_trajectory(StrumDirection::Up);
        assert_eq!(trajectory.len(), 20);
        assert!(trajectory.iter().all(|a| a.len() == DUAL_ARM_DOF));
    }

    #[test]
    fn test_trajectory_wrappers() {
        let guitar = GuitarGeometry::default();
        let points = strum_trajectory(&guitar, StrumDirection::Down, 2.0);
        let trajectory = Trajectory::cartesian(StrumDirection::Down, points.clone());
        assert_eq!(trajectory.len(), points.len());
        assert_eq!(trajectory.waypoints()[0], Waypoint::Position(points[0]));

        let pose = DualArmPose::default();
        let joints = Trajectory::joint_space(StrumDirection::Up, pose.strum_trajectory(StrumDirection::Up));
        assert!(matches!(joints.waypoints()[0], Waypoint::Joints(_)));
        assert_eq!(joints.into_iter().count(), 20);
    }
}
