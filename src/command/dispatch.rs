// Dispatch - Run parsed commands against the session manager

use crate::command::parser::Command;
use crate::command::types::{ChordInfo, ChordListResponse, PatternInfo, PatternListResponse};
use crate::music::chord::{chord_suggestions, find_chord};
use crate::playback::session::{SessionError, SessionManager};
use crate::sequencer::pattern::{find_pattern, pattern_suggestions};
use serde::Serialize;
use serde_json::{Value, json};

/// Errors that can occur while executing a command
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the front end should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Print this response
    Json(Value),
    /// Stop reading commands
    Quit,
}

fn reply<T: Serialize>(value: &T) -> Result<Reply, DispatchError> {
    Ok(Reply::Json(serde_json::to_value(value)?))
}

/// Chords at or below `difficulty`, in library order
pub fn list_chords(difficulty: u8) -> ChordListResponse {
    ChordListResponse {
        difficulty,
        chords: chord_suggestions(difficulty)
            .into_iter()
            .filter_map(find_chord)
            .map(ChordInfo::from)
            .collect(),
    }
}

/// Patterns at or below `difficulty`, in library order
pub fn list_patterns(difficulty: u8) -> PatternListResponse {
    PatternListResponse {
        difficulty,
        patterns: pattern_suggestions(difficulty)
            .into_iter()
            .filter_map(find_pattern)
            .map(PatternInfo::from)
            .collect(),
    }
}

/// Execute one command
///
/// Degraded results are returned as `{"value": ..., "diagnostics": [...]}`.
pub fn execute(manager: &SessionManager, command: Command) -> Result<Reply, DispatchError> {
    log::debug!("Executing '{}'", command.name());
    let default_difficulty = manager.config().defaults.difficulty;

    match command {
        Command::Chords { difficulty } => {
            reply(&list_chords(difficulty.unwrap_or(default_difficulty)))
        }
        Command::Patterns { difficulty } => {
            reply(&list_patterns(difficulty.unwrap_or(default_difficulty)))
        }
        Command::Play(request) => reply(&manager.start(request)?),
        Command::Stop => reply(&manager.stop()),
        Command::State => reply(&manager.status()),
        Command::Tempo { bpm } => reply(&manager.set_tempo(bpm)),
        Command::Simulation => reply(&manager.simulation()),
        Command::Help => Ok(Reply::Json(json!({ "usage": Command::usage() }))),
        Command::Quit => Ok(Reply::Quit),
    }
}
