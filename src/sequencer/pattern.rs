// Pattern - Strumming patterns
// A pattern is an ordered, looping sequence of strum steps played at a tempo

use crate::diagnostics::{Diagnostic, Resolution};
use crate::sequencer::timeline::{Tempo, TimeSignature};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Key of the pattern used when a requested pattern is unknown
pub const DEFAULT_PATTERN: &str = "basic_alternating";

/// One slot of a strumming pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrumStep {
    Down,
    Up,
    Mute,
    Rest,
}

impl StrumStep {
    /// Direction of the strum, `None` for steps that hold position
    pub fn direction(&self) -> Option<StrumDirection> {
        match self {
            StrumStep::Down => Some(StrumDirection::Down),
            StrumStep::Up => Some(StrumDirection::Up),
            StrumStep::Mute | StrumStep::Rest => None,
        }
    }

    /// True for steps that hold position for one beat
    pub fn is_hold(&self) -> bool {
        self.direction().is_none()
    }
}

impl fmt::Display for StrumStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrumStep::Down => "down",
            StrumStep::Up => "up",
            StrumStep::Mute => "mute",
            StrumStep::Rest => "rest",
        };
        f.write_str(s)
    }
}

/// Direction of an actual strum motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrumDirection {
    Down,
    Up,
}

impl StrumDirection {
    /// +1 for down, -1 for up
    pub fn sign(&self) -> f64 {
        match self {
            StrumDirection::Down => 1.0,
            StrumDirection::Up => -1.0,
        }
    }
}

/// A strumming pattern owned by a play session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrummingPattern {
    pub name: String,
    steps: Vec<StrumStep>,
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    /// Difficulty rating, 1 (easy) to 5 (hard)
    pub difficulty: u8,
}

impl StrummingPattern {
    /// Create a new pattern
    pub fn new(
        name: String,
        steps: Vec<StrumStep>,
        tempo: Tempo,
        time_signature: TimeSignature,
        difficulty: u8,
    ) -> Self {
        assert!(!steps.is_empty(), "Pattern must have at least one step");

        Self {
            name,
            steps,
            tempo,
            time_signature,
            difficulty,
        }
    }

    /// All steps in order
    pub fn steps(&self) -> &[StrumStep] {
        &self.steps
    }

    /// Number of steps (always >= 1)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Patterns are never empty; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, wrapping modulo the pattern length
    pub fn step_at(&self, index: usize) -> StrumStep {
        self.steps[index % self.steps.len()]
    }

    /// Duration in seconds per beat (60 / tempo)
    pub fn seconds_per_beat(&self) -> f64 {
        self.tempo.seconds_per_beat()
    }

    /// Duration of one beat
    pub fn beat_duration(&self) -> Duration {
        self.tempo.beat_duration()
    }

    /// Duration of one full pass in seconds, counting measures of
    /// `time_signature.numerator` steps
    pub fn pattern_duration(&self) -> f64 {
        let measures = self.steps.len() as f64 / self.time_signature.beats_per_measure();
        measures * self.seconds_per_beat()
    }

    /// Change the tempo of this pattern
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }
}

/// Static definition of a library pattern
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PatternDef {
    pub key: &'static str,
    pub name: &'static str,
    pub steps: &'static [StrumStep],
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub difficulty: u8,
}

impl PatternDef {
    /// Build an owned pattern from this definition
    pub fn instantiate(&self) -> StrummingPattern {
        StrummingPattern::new(
            self.name.to_string(),
            self.steps.to_vec(),
            self.tempo,
            self.time_signature,
            self.difficulty,
        )
    }
}

use StrumStep::{Down as D, Rest as R, Up as U};

/// All known strumming patterns, in presentation order
pub static PATTERN_LIBRARY: &[PatternDef] = &[
    PatternDef {
        key: "basic_down",
        name: "Basic Down",
        steps: &[D, R, D, R],
        tempo: Tempo::new(120),
        time_signature: TimeSignature::four_four(),
        difficulty: 1,
    },
    PatternDef {
        key: "basic_alternating",
        name: "Basic Alternating",
        steps: &[D, U, D, U],
        tempo: Tempo::new(120),
        time_signature: TimeSignature::four_four(),
        difficulty: 1,
    },
    PatternDef {
        key: "folk_pattern",
        name: "Folk Pattern",
        steps: &[D, D, U, R, U, D, U, R],
        tempo: Tempo::new(100),
        time_signature: TimeSignature::four_four(),
        difficulty: 2,
    },
    PatternDef {
        key: "rock_pattern",
        name: "Rock Pattern",
        steps: &[D, R, D, U, R, U, D, U],
        tempo: Tempo::new(130),
        time_signature: TimeSignature::four_four(),
        difficulty: 2,
    },
    PatternDef {
        key: "reggae_pattern",
        name: "Reggae Pattern",
        steps: &[R, U, R, U, R, U, R, U],
        tempo: Tempo::new(80),
        time_signature: TimeSignature::four_four(),
        difficulty: 3,
    },
    PatternDef {
        key: "flamenco_pattern",
        name: "Flamenco Pattern",
        steps: &[D, U, U, D, U, D, D, U],
        tempo: Tempo::new(140),
        time_signature: TimeSignature::four_four(),
        difficulty: 4,
    },
    PatternDef {
        key: "slow_ballad",
        name: "Slow Ballad",
        steps: &[D, R, R, R, U, R, D, R],
        tempo: Tempo::new(70),
        time_signature: TimeSignature::four_four(),
        difficulty: 1,
    },
];

/// Look up a pattern definition by key
pub fn find_pattern(key: &str) -> Option<&'static PatternDef> {
    PATTERN_LIBRARY.iter().find(|p| p.key == key)
}

/// The pattern definition used when a lookup fails
pub fn default_pattern() -> &'static PatternDef {
    find_pattern(DEFAULT_PATTERN).unwrap_or(&PATTERN_LIBRARY[0])
}

/// Look up a pattern, falling back to the default for unknown keys
pub fn resolve_pattern(key: &str) -> Resolution<&'static PatternDef> {
    match find_pattern(key) {
        Some(def) => Resolution::ok(def),
        None => Resolution::degraded(
            default_pattern(),
            Diagnostic::UnknownPattern {
                requested: key.to_string(),
                fallback: DEFAULT_PATTERN.to_string(),
            },
        ),
    }
}

/// Keys of the patterns at or below the given difficulty
pub fn pattern_suggestions(max_difficulty: u8) -> Vec<&'static str> {
    PATTERN_LIBRARY
        .iter()
        .filter(|p| p.difficulty <= max_difficulty)
        .map(|p| p.key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strum_step_direction() {
        assert_eq!(StrumStep::Down.direction(), Some(StrumDirection::Down));
        assert_eq!(StrumStep::Up.direction(), Some(StrumDirection::Up));
        assert!(StrumStep::Rest.is_hold());
        assert!(StrumStep::Mute.is_hold());
        assert_eq!(StrumDirection::Down.sign(), 1.0);
        assert_eq!(StrumDirection::Up.sign(), -1.0);
    }

    #[test]
    fn test_strum_step_serde() {
        let steps: Vec<StrumStep> =
            serde_json::from_str(r#"["down", "up", "mute", "rest"]"#).unwrap();
        assert_eq!(
            steps,
            vec![StrumStep::Down, StrumStep::Up, StrumStep::Mute, StrumStep::Rest]
        );
        assert_eq!(StrumStep::Mute.to_string(), "mute");
    }

    #[test]
    fn test_pattern_timing() {
        let pattern = find_pattern("basic_down").unwrap().instantiate();
        assert_eq!(pattern.name, "Basic Down");
        assert_eq!(pattern.seconds_per_beat(), 0.5);
        // 4 steps in 4/4 is one measure at 0.5s per beat
        assert_eq!(pattern.pattern_duration(), 0.5);

        let folk = find_pattern("folk_pattern").unwrap().instantiate();
        assert_eq!(folk.len(), 8);
        assert!((folk.pattern_duration() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_step_at_wraps() {
        let pattern = find_pattern("basic_alternating").unwrap().instantiate();
        assert_eq!(pattern.step_at(0), StrumStep::Down);
        assert_eq!(pattern.step_at(5), StrumStep::Up);
        assert_eq!(pattern.step_at(8), StrumStep::Down);
    }

    #[test]
    fn test_set_tempo_only_affects_instance() {
        let mut pattern = find_pattern("rock_pattern").unwrap().instantiate();
        pattern.set_tempo(Tempo::new(60));
        assert_eq!(pattern.seconds_per_beat(), 1.0);
        assert_eq!(find_pattern("rock_pattern").unwrap().tempo.bpm(), 130);
    }

    #[test]
    #[should_panic(expected = "Pattern must have at least one step")]
    fn test_empty_pattern_panics() {
        let _ = StrummingPattern::new(
            "Empty".to_string(),
            Vec::new(),
            Tempo::default(),
            TimeSignature::default(),
            1,
        );
    }

    #[test]
    fn test_unknown_pattern_falls_back() {
        let r = resolve_pattern("polka");
        assert!(r.is_degraded());
        assert_eq!(r.value.key, "basic_alternating");
        assert!(!resolve_pattern("reggae_pattern").is_degraded());
    }

    #[test]
    fn test_pattern_suggestions() {
        assert_eq!(
            pattern_suggestions(1),
            vec!["basic_down", "basic_alternating", "slow_ballad"]
        );
        assert_eq!(pattern_suggestions(3).len(), 6);
        assert_eq!(pattern_suggestions(5).len(), PATTERN_LIBRARY.len());
    }
}
