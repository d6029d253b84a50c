// Request and response shapes of the front-end commands

use crate::config::SimulationMode;
use crate::kinematics::arm::Point2;
use crate::music::chord::Chord;
use crate::sequencer::pattern::{PatternDef, StrumStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters of a `play` command
///
/// Missing fields are filled from the configured session defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub chords: Option<Vec<String>>,
    pub pattern: Option<String>,
    /// Stop after this many full passes of the pattern; plays until stopped if absent
    pub passes: Option<u32>,
}

impl PlayRequest {
    pub fn new(chords: Vec<String>, pattern: impl Into<String>) -> Self {
        Self {
            chords: Some(chords),
            pattern: Some(pattern.into()),
            passes: None,
        }
    }

    pub fn with_passes(mut self, passes: u32) -> Self {
        self.passes = Some(passes);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Chord names actually played, after fallbacks
    pub chords: Vec<String>,
    /// Pattern key actually played, after fallbacks
    pub pattern: String,
    pub tempo: u32,
    pub passes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopResponse {
    /// True if a session was running when the stop arrived
    pub was_playing: bool,
    pub steps_played: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RobotStateResponse {
    pub joint_angles: Vec<f64>,
    pub end_effector: Option<Point2>,
    pub current_chord: Option<String>,
    pub is_playing: bool,
    pub simulation_available: bool,
    pub chord_index: usize,
    pub pattern_index: usize,
    pub tempo: u32,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TempoResponse {
    pub tempo: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationResponse {
    pub available: bool,
    pub environment: String,
    pub mode: SimulationMode,
    /// Size of the latest rendered frame, if any
    pub frame: Option<FrameInfo>,
}

/// One entry of a chord listing
#[derive(Debug, Clone, Serialize)]
pub struct ChordInfo {
    pub name: String,
    pub frets: Vec<i8>,
    pub fingering: Vec<u8>,
    pub difficulty: u8,
}

impl From<&Chord> for ChordInfo {
    fn from(chord: &Chord) -> Self {
        Self {
            name: chord.name.to_string(),
            frets: chord.frets.to_vec(),
            fingering: chord.fingering.to_vec(),
            difficulty: chord.difficulty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChordListResponse {
    pub difficulty: u8,
    pub chords: Vec<ChordInfo>,
}

/// One entry of a pattern listing
#[derive(Debug, Clone, Serialize)]
pub struct PatternInfo {
    pub key: String,
    pub name: String,
    pub steps: Vec<StrumStep>,
    pub tempo: u32,
    pub difficulty: u8,
}

impl From<&PatternDef> for PatternInfo {
    fn from(def: &PatternDef) -> Self {
        Self {
            key: def.key.to_string(),
            name: def.name.to_string(),
            steps: def.steps.to_vec(),
            tempo: def.tempo.bpm(),
            difficulty: def.difficulty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternListResponse {
    pub difficulty: u8,
    pub patterns: Vec<PatternInfo>,
}
