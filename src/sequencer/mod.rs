// Sequencer module
// Tempo, strumming patterns, and the chord progression cursor pair

pub mod pattern;
pub mod progression;
pub mod timeline;

pub use pattern::{
    PATTERN_LIBRARY, PatternDef, StrumDirection, StrumStep, StrummingPattern, find_pattern,
    pattern_suggestions, resolve_pattern,
};
pub use progression::ChordProgression;
pub use timeline::{Tempo, TimeSignature};
