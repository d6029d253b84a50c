// Arm simulator - Planar serial arm with PD joint tracking
// Forward kinematics over the first three joints, analytic 2-link inverse
// kinematics, and per-tick joint limit enforcement

use crate::diagnostics::{Diagnostic, Resolution};
use crate::kinematics::config::RobotConfig;
use serde::{Deserialize, Serialize};

/// Joints projected onto the plane by forward kinematics
pub const PLANAR_JOINTS: usize = 3;

/// Fraction of the maximum reach an unreachable target is pulled back to
pub const REACH_MARGIN: f64 = 0.99;

/// Default integration step for [`ArmSimulator::update`], in seconds
pub const DEFAULT_DT: f64 = 0.01;

/// A point in the arm's plane, in metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the origin
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Same direction, scaled by `factor`
    pub fn scale(&self, factor: f64) -> Point2 {
        Point2::new(self.x * factor, self.y * factor)
    }
}

/// Read-only view of the arm state published to status queries
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ArmSnapshot {
    pub joint_angles: Vec<f64>,
    /// Planar tip position, `None` for arms without a planar model
    pub end_effector: Option<Point2>,
}

/// Simplified planar arm
#[derive(Debug, Clone)]
pub struct ArmSimulator {
    config: RobotConfig,
    joint_angles: Vec<f64>,
    target_angles: Vec<f64>,
    velocity: Vec<f64>,
}

impl ArmSimulator {
    /// Create an arm at the zero pose
    pub fn new(config: RobotConfig) -> Self {
        assert!(
            config.is_consistent(),
            "Robot config needs at least 2 joints and one length and limit per joint"
        );

        let n = config.n_joints;
        Self {
            config,
            joint_angles: vec![0.0; n],
            target_angles: vec![0.0; n],
            velocity: vec![0.0; n],
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn joint_angles(&self) -> &[f64] {
        &self.joint_angles
    }

    pub fn target_angles(&self) -> &[f64] {
        &self.target_angles
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Overwrite the current joint angles (clamped into limits)
    pub fn set_joint_angles(&mut self, angles: &[f64]) {
        for (i, angle) in angles.iter().take(self.config.n_joints).enumerate() {
            self.joint_angles[i] = self.config.joint_limits[i].clamp(*angle);
        }
    }

    /// Set the joint targets tracked by [`ArmSimulator::update`]
    pub fn set_target(&mut self, target: &[f64]) {
        for (slot, value) in self.target_angles.iter_mut().zip(target) {
            *slot = *value;
        }
    }

    /// Link endpoint positions for the given joint angles
    ///
    /// Only the first [`PLANAR_JOINTS`] joints are used. The first point is the
    /// base at the origin, so the result has one more point than joints used.
    pub fn forward_kinematics(&self, angles: &[f64]) -> Vec<Point2> {
        let used = angles
            .len()
            .min(PLANAR_JOINTS)
            .min(self.config.link_lengths.len());

        let mut positions = Vec::with_capacity(used + 1);
        positions.push(Point2::ORIGIN);

        let mut cumulative_angle = 0.0;
        let mut current = Point2::ORIGIN;
        for (angle, length) in angles.iter().zip(&self.config.link_lengths).take(used) {
            cumulative_angle += angle;
            current = Point2::new(
                current.x + length * cumulative_angle.cos(),
                current.y + length * cumulative_angle.sin(),
            );
            positions.push(current);
        }

        positions
    }

    /// Forward kinematics of the current joint angles
    pub fn link_positions(&self) -> Vec<Point2> {
        self.forward_kinematics(&self.joint_angles)
    }

    /// Current end effector position
    pub fn end_effector(&self) -> Point2 {
        self.link_positions()
            .last()
            .copied()
            .unwrap_or(Point2::ORIGIN)
    }

    /// Joint angles placing the tip of the first two links at `target`
    ///
    /// Targets beyond reach are pulled back along their direction to
    /// [`REACH_MARGIN`] of the maximum reach and reported as a diagnostic.
    /// Only the elbow-down branch (non-negative elbow angle) is produced.
    /// Joints past the second are set to zero.
    pub fn inverse_kinematics_2d(&self, target: Point2) -> Resolution<Vec<f64>> {
        let l1 = self.config.link_lengths[0];
        let l2 = self.config.link_lengths[1];
        let max_reach = l1 + l2;

        let mut diagnostics = Vec::new();
        let mut point = target;
        let mut dist = point.norm();
        if dist > max_reach {
            diagnostics.push(Diagnostic::UnreachableTarget {
                distance: dist,
                max_reach,
            });
            point = point.scale(max_reach * REACH_MARGIN / dist);
            dist = point.norm();
        }

        // Law of cosines, clipped against floating-point overshoot
        let cos_angle2 = ((dist * dist - l1 * l1 - l2 * l2) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
        let angle2 = cos_angle2.acos();
        let angle1 =
            point.y.atan2(point.x) - (l2 * angle2.sin()).atan2(l1 + l2 * angle2.cos());

        let mut angles = vec![0.0; self.config.n_joints];
        angles[0] = angle1;
        angles[1] = angle2;

        Resolution {
            value: angles,
            diagnostics,
        }
    }

    /// Advance the arm one tick toward its targets
    ///
    /// PD update followed by clamping every joint into its limits.
    pub fn update(&mut self, dt: f64) {
        let gains = self.config.gains;

        for i in 0..self.config.n_joints {
            let error = self.target_angles[i] - self.joint_angles[i];
            self.velocity[i] = gains.kp * error - gains.kd * self.velocity[i];
            self.joint_angles[i] += self.velocity[i] * dt;
            self.joint_angles[i] = self.config.joint_limits[i].clamp(self.joint_angles[i]);
        }
    }

    /// Snapshot for status queries
    pub fn snapshot(&self) -> ArmSnapshot {
        ArmSnapshot {
            joint_angles: self.joint_angles.clone(),
            end_effector: Some(self.end_effector()),
        }
    }

    /// Back to the zero pose with no motion
    pub fn reset(&mut self) {
        self.joint_angles.iter_mut().for_each(|a| *a = 0.0);
        self.target_angles.iter_mut().for_each(|a| *a = 0.0);
        self.velocity.iter_mut().for_each(|v| *v = 0.0);
    }
}

impl Default for ArmSimulator {
    fn default() -> Self {
        Self::new(RobotConfig::default())
    }
}
