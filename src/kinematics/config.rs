// Robot configuration - Link lengths, joint limits and controller gains

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Angle limits for one joint, in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    pub min: f64,
    pub max: f64,
}

impl JointLimits {
    /// Create limits; bounds given in the wrong order are swapped
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Symmetric limits around zero
    pub fn symmetric(bound: f64) -> Self {
        Self::new(-bound.abs(), bound.abs())
    }

    /// Clamp an angle into these limits
    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.min, self.max)
    }

    /// Check if an angle is within limits
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Proportional-derivative gains used to track joint targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    pub kp: f64,
    pub kd: f64,
}

impl Default for PdGains {
    fn default() -> Self {
        Self { kp: 5.0, kd: 0.5 }
    }
}

/// Static configuration of the simulated serial arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub n_joints: usize,
    /// Link length per joint, in metres
    pub link_lengths: Vec<f64>,
    pub joint_limits: Vec<JointLimits>,
    pub gains: PdGains,
}

impl RobotConfig {
    /// Maximum distance reachable by the first two links
    pub fn two_link_reach(&self) -> f64 {
        self.link_lengths.iter().take(2).sum()
    }

    /// Check that the per-joint tables match the joint count
    ///
    /// The inverse kinematics solver needs at least two links.
    pub fn is_consistent(&self) -> bool {
        self.n_joints >= 2
            && self.link_lengths.len() == self.n_joints
            && self.joint_limits.len() == self.n_joints
            && self.link_lengths.iter().all(|l| *l > 0.0)
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            n_joints: 6,
            link_lengths: vec![0.1, 0.15, 0.15, 0.1, 0.05, 0.05],
            joint_limits: vec![
                JointLimits::symmetric(PI),        // shoulder_pan
                JointLimits::symmetric(FRAC_PI_2), // shoulder_lift
                JointLimits::symmetric(FRAC_PI_2), // elbow_flex
                JointLimits::symmetric(PI),        // wrist_roll
                JointLimits::symmetric(FRAC_PI_2), // wrist_flex
                JointLimits::new(0.0, FRAC_PI_2),  // gripper
            ],
            gains: PdGains::default(),
        }
    }
}
