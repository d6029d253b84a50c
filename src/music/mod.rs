// Music module - Chord shapes and chord library

pub mod chord;

pub use chord::{Chord, CHORD_LIBRARY, chord_suggestions, find_chord, resolve_chord};
