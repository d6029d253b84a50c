// Configuration - Application settings loaded from a RON file
// Every field has a default so partial files are accepted.

use crate::kinematics::config::RobotConfig;
use crate::kinematics::trajectory::{DualArmPose, GuitarGeometry, MIN_STRUM_SPEED};
use crate::sequencer::pattern::DEFAULT_PATTERN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    RonSerialize(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which arm model consumes the strum trajectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Toy planar arm: Cartesian trajectories through inverse kinematics
    #[default]
    Planar,
    /// 14-joint dual-arm robot: joint-space trajectories
    DualArm,
}

/// Slowest accepted playback tick rate
pub const MIN_TICK_RATE_HZ: f64 = 0.1;

/// Fastest accepted playback tick rate
pub const MAX_TICK_RATE_HZ: f64 = 10_000.0;

pub const DEFAULT_TICK_RATE_HZ: f64 = 50.0;

/// Timing of the playback loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Waypoints applied per second
    pub tick_rate_hz: f64,
    /// Strum speed multiplier for Cartesian trajectories
    pub strum_speed: f64,
    /// Integration step of the PD update, in seconds
    pub dt: f64,
}

impl PlaybackConfig {
    /// Wall-clock time between two ticks
    pub fn tick_interval(&self) -> Duration {
        if (MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            Duration::from_secs_f64(1.0 / self.tick_rate_hz)
        } else {
            Duration::from_secs_f64(1.0 / DEFAULT_TICK_RATE_HZ)
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            strum_speed: 2.0,
            dt: 0.01,
        }
    }
}

/// Progression used by `play` when the request leaves fields out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub chords: Vec<String>,
    pub pattern: String,
    /// Difficulty filter for chord and pattern listings
    pub difficulty: u8,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            chords: ["G", "C", "D", "Em"].iter().map(|s| s.to_string()).collect(),
            pattern: DEFAULT_PATTERN.to_string(),
            difficulty: 3,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: SimulationMode,
    pub robot: RobotConfig,
    pub guitar: GuitarGeometry,
    pub dual_arm: DualArmPose,
    pub playback: PlaybackConfig,
    pub defaults: SessionDefaults,
}

impl AppConfig {
    /// Default location: `<config dir>/easyjam/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("easyjam").join("config.ron"))
    }

    /// Parse and validate a configuration from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Load a configuration file, using defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Check values that would make playback meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.robot.is_consistent() {
            return Err(ConfigError::Invalid(format!(
                "robot needs at least 2 joints with one link length and limit each (n_joints = {}, {} lengths, {} limits)",
                self.robot.n_joints,
                self.robot.link_lengths.len(),
                self.robot.joint_limits.len()
            )));
        }

        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.playback.tick_rate_hz) {
            return Err(ConfigError::Invalid(format!(
                "playback.tick_rate_hz must be between {} and {}",
                MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ
            )));
        }

        if !(self.playback.strum_speed.is_finite()
            && self.playback.strum_speed >= MIN_STRUM_SPEED)
        {
            return Err(ConfigError::Invalid(format!(
                "playback.strum_speed must be at least {}",
                MIN_STRUM_SPEED
            )));
        }

        if !(self.playback.dt.is_finite() && self.playback.dt > 0.0) {
            return Err(ConfigError::Invalid("playback.dt must be > 0".to_string()));
        }

        if self.dual_arm.strum_joint >= crate::kinematics::trajectory::DUAL_ARM_DOF {
            return Err(ConfigError::Invalid(format!(
                "dual_arm.strum_joint {} out of range",
                self.dual_arm.strum_joint
            )));
        }

        Ok(())
    }
}
