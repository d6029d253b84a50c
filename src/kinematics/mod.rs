// Kinematics module
// Planar arm model and strum trajectory generation

pub mod arm;
pub mod config;
pub mod trajectory;

pub use arm::{ArmSimulator, ArmSnapshot, Point2};
pub use config::{JointLimits, PdGains, RobotConfig};
pub use trajectory::{DualArmPose, GuitarGeometry, Trajectory, Waypoint, strum_trajectory};
