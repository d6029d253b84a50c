// Rig - Consumer of strum trajectories
// A rig turns strum directions into trajectories and each waypoint into the
// action vector handed to the environment.

use crate::config::{AppConfig, SimulationMode};
use crate::environment::Environment;
use crate::kinematics::arm::{ArmSimulator, ArmSnapshot};
use crate::kinematics::trajectory::{
    DualArmPose, GuitarGeometry, Trajectory, Waypoint, strum_trajectory,
};
use crate::sequencer::pattern::StrumDirection;

/// An arm model driven by the playback loop
pub trait StrumRig: Send {
    /// Which trajectory representation this rig consumes
    fn mode(&self) -> SimulationMode;

    /// Fresh arm state and playing position before the first strum of a session
    fn prepare(&mut self, env: &mut dyn Environment);

    /// Trajectory for one strum
    fn plan(&self, direction: StrumDirection) -> Trajectory;

    /// Apply one waypoint to the arm and return the action for the environment
    fn track(&mut self, waypoint: &Waypoint) -> Vec<f64>;

    /// Current arm state for status queries
    fn snapshot(&self) -> ArmSnapshot;
}

/// Build the rig selected by the configuration
pub fn rig_for(config: &AppConfig) -> Box<dyn StrumRig> {
    match config.mode {
        SimulationMode::Planar => Box::new(PlanarRig::new(
            ArmSimulator::new(config.robot.clone()),
            config.guitar,
            config.playback.strum_speed,
            config.playback.dt,
        )),
        SimulationMode::DualArm => Box::new(DualArmRig::new(config.dual_arm.clone())),
    }
}

/// Planar arm following Cartesian strums through inverse kinematics
pub struct PlanarRig {
    arm: ArmSimulator,
    guitar: GuitarGeometry,
    speed: f64,
    dt: f64,
    clamped_targets: u64,
}

impl PlanarRig {
    pub fn new(arm: ArmSimulator, guitar: GuitarGeometry, speed: f64, dt: f64) -> Self {
        Self {
            arm,
            guitar,
            speed,
            dt,
            clamped_targets: 0,
        }
    }

    pub fn arm(&self) -> &ArmSimulator {
        &self.arm
    }

    /// Waypoints that were out of reach and had to be rescaled
    pub fn clamped_targets(&self) -> u64 {
        self.clamped_targets
    }
}

impl StrumRig for PlanarRig {
    fn mode(&self) -> SimulationMode {
        SimulationMode::Planar
    }

    fn prepare(&mut self, env: &mut dyn Environment) {
        self.arm.reset();
        env.reset();
    }

    fn plan(&self, direction: StrumDirection) -> Trajectory {
        Trajectory::cartesian(
            direction,
            strum_trajectory(&self.guitar, direction, self.speed),
        )
    }

    fn track(&mut self, waypoint: &Waypoint) -> Vec<f64> {
        match waypoint {
            Waypoint::Position(target) => {
                let solution = self.arm.inverse_kinematics_2d(*target);
                if solution.is_degraded() {
                    self.clamped_targets += 1;
                    for diagnostic in &solution.diagnostics {
                        log::debug!("Planar rig: {}", diagnostic);
                    }
                }
                self.arm.set_target(&solution.value);
            }
            Waypoint::Joints(angles) => self.arm.set_target(angles),
        }

        self.arm.update(self.dt);
        self.arm.joint_angles().to_vec()
    }

    fn snapshot(&self) -> ArmSnapshot {
        self.arm.snapshot()
    }
}

/// Dual-arm robot driven directly in joint space
pub struct DualArmRig {
    pose: DualArmPose,
    last_action: Vec<f64>,
}

impl DualArmRig {
    pub fn new(pose: DualArmPose) -> Self {
        let last_action = pose.hold_action();
        Self { pose, last_action }
    }

    pub fn pose(&self) -> &DualArmPose {
        &self.pose
    }
}

impl StrumRig for DualArmRig {
    fn mode(&self) -> SimulationMode {
        SimulationMode::DualArm
    }

    fn prepare(&mut self, env: &mut dyn Environment) {
        env.reset();

        // Left arm to the chord position, right arm to the strumming position
        let hold = self.pose.hold_action();
        for _ in 0..self.pose.settle_steps {
            env.step(&hold);
        }
        self.last_action = hold;
    }

    fn plan(&self, direction: StrumDirection) -> Trajectory {
        Trajectory::joint_space(direction, self.pose.strum_trajectory(direction))
    }

    fn track(&mut self, waypoint: &Waypoint) -> Vec<f64> {
        self.last_action = match waypoint {
            Waypoint::Joints(action) => action.clone(),
            // No planar model on this robot; hold still
            Waypoint::Position(_) => self.pose.hold_action(),
        };
        self.last_action.clone()
    }

    fn snapshot(&self) -> ArmSnapshot {
        ArmSnapshot {
            joint_angles: self.last_action.clone(),
            end_effector: None,
        }
    }
}
