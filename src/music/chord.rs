// Chord - Guitar chord shapes and the static chord library

use crate::diagnostics::{Diagnostic, Resolution};
use serde::Serialize;
use std::fmt;

/// Number of strings on the guitar
pub const STRING_COUNT: usize = 6;

/// Fret value for a string that is not played
pub const MUTED: i8 = -1;

/// Fret value for an open string
pub const OPEN: i8 = 0;

/// Name of the chord used when a requested chord is unknown
pub const DEFAULT_CHORD: &str = "C";

/// A guitar chord shape
///
/// Strings are ordered from low E to high E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chord {
    pub name: &'static str,
    /// Fret per string (-1 = muted, 0 = open)
    pub frets: [i8; STRING_COUNT],
    /// Finger per string (0 = no finger)
    pub fingering: [u8; STRING_COUNT],
    /// Difficulty rating, 1 (easy) to 5 (hard)
    pub difficulty: u8,
}

impl Chord {
    const fn new(
        name: &'static str,
        frets: [i8; STRING_COUNT],
        fingering: [u8; STRING_COUNT],
        difficulty: u8,
    ) -> Self {
        Self {
            name,
            frets,
            fingering,
            difficulty,
        }
    }

    /// Number of strings that sound when the chord is strummed
    pub fn sounding_strings(&self) -> usize {
        self.frets.iter().filter(|&&f| f != MUTED).count()
    }

    /// True if the string at `index` is muted
    pub fn is_muted(&self, index: usize) -> bool {
        self.frets.get(index).is_some_and(|&f| f == MUTED)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chord", self.name)
    }
}

/// All known chords, in presentation order
pub static CHORD_LIBRARY: &[Chord] = &[
    // Open chords
    Chord::new("G", [3, 2, 0, 0, 3, 3], [3, 2, 0, 0, 4, 4], 1),
    Chord::new("C", [-1, 3, 2, 0, 1, 0], [0, 3, 2, 0, 1, 0], 1),
    Chord::new("D", [-1, -1, 0, 2, 3, 2], [0, 0, 0, 1, 3, 2], 1),
    Chord::new("Em", [0, 2, 2, 0, 0, 0], [0, 2, 3, 0, 0, 0], 1),
    Chord::new("Am", [-1, 0, 2, 2, 1, 0], [0, 0, 2, 3, 1, 0], 1),
    Chord::new("E", [0, 2, 2, 1, 0, 0], [0, 2, 3, 1, 0, 0], 1),
    Chord::new("A", [-1, 0, 2, 2, 2, 0], [0, 0, 1, 2, 3, 0], 1),
    // Barre chords
    Chord::new("F", [1, 3, 3, 2, 1, 1], [1, 3, 4, 2, 1, 1], 3),
    Chord::new("Bm", [-1, 2, 4, 4, 3, 2], [0, 1, 3, 4, 2, 1], 3),
    // Power chords
    Chord::new("G5", [3, 5, 5, -1, -1, -1], [1, 3, 4, 0, 0, 0], 2),
    Chord::new("A5", [-1, 0, 2, 2, -1, -1], [0, 0, 1, 2, 0, 0], 2),
    Chord::new("D5", [-1, -1, 0, 2, 3, -1], [0, 0, 0, 1, 3, 0], 2),
];

/// Look up a chord by exact name
pub fn find_chord(name: &str) -> Option<&'static Chord> {
    CHORD_LIBRARY.iter().find(|c| c.name == name)
}

/// The chord used when a lookup fails
pub fn default_chord() -> &'static Chord {
    // The library always contains the default chord
    find_chord(DEFAULT_CHORD).unwrap_or(&CHORD_LIBRARY[0])
}

/// Look up a chord, falling back to the default chord for unknown names
pub fn resolve_chord(name: &str) -> Resolution<&'static Chord> {
    match find_chord(name) {
        Some(chord) => Resolution::ok(chord),
        None => Resolution::degraded(
            default_chord(),
            Diagnostic::UnknownChord {
                requested: name.to_string(),
                fallback: DEFAULT_CHORD.to_string(),
            },
        ),
    }
}

/// Names of the chords at or below the given difficulty
pub fn chord_suggestions(max_difficulty: u8) -> Vec<&'static str> {
    CHORD_LIBRARY
        .iter()
        .filter(|c| c.difficulty <= max_difficulty)
        .map(|c| c.name)
        .collect()
}
