// EasyJam - Library exports for the CLI, tests and benchmarks

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod kinematics;
pub mod messaging;
pub mod music;
pub mod playback;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use command::{Command, PlayRequest, Reply, execute};
pub use config::{AppConfig, ConfigError, SimulationMode};
pub use diagnostics::{Diagnostic, Resolution};
pub use environment::{Environment, Frame, NullEnvironment, StepOutcome};
pub use kinematics::{ArmSimulator, Point2, RobotConfig};
pub use messaging::create_notification_channel;
pub use music::{Chord, find_chord};
pub use playback::{CancellationToken, SessionManager};
pub use sequencer::{ChordProgression, StrumStep, StrummingPattern, Tempo, TimeSignature};
