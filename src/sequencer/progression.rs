// Progression - Chord progression driven by a strumming pattern
// Two independent wrapping cursors: one over chords, one over pattern steps

use crate::diagnostics::{Diagnostic, Resolution};
use crate::music::chord::{Chord, default_chord, resolve_chord};
use crate::sequencer::pattern::{StrumStep, StrummingPattern, resolve_pattern};
use crate::sequencer::timeline::Tempo;

/// A chord progression played with one strumming pattern
///
/// Callers advance the chord once per full pass of the pattern, i.e. when
/// [`ChordProgression::is_at_pattern_start`] becomes true after a step.
#[derive(Debug, Clone)]
pub struct ChordProgression {
    chords: Vec<&'static Chord>,
    pattern: StrummingPattern,
    chord_index: usize,
    pattern_index: usize,
}

impl ChordProgression {
    /// Create a progression from resolved chords and an owned pattern
    ///
    /// An empty chord list is replaced by the default chord.
    pub fn new(chords: Vec<&'static Chord>, pattern: StrummingPattern) -> Self {
        let chords = if chords.is_empty() {
            vec![default_chord()]
        } else {
            chords
        };

        Self {
            chords,
            pattern,
            chord_index: 0,
            pattern_index: 0,
        }
    }

    /// Build a progression from chord names and a pattern key
    ///
    /// Unknown names fall back to library defaults and are reported as
    /// diagnostics instead of errors.
    pub fn from_names<S: AsRef<str>>(chord_names: &[S], pattern_key: &str) -> Resolution<Self> {
        let mut diagnostics = Vec::new();

        let mut chords = Vec::with_capacity(chord_names.len());
        for name in chord_names {
            let resolved = resolve_chord(name.as_ref());
            diagnostics.extend(resolved.diagnostics);
            chords.push(resolved.value);
        }
        if chords.is_empty() {
            diagnostics.push(Diagnostic::EmptyProgression);
        }

        let pattern = resolve_pattern(pattern_key);
        diagnostics.extend(pattern.diagnostics);

        Resolution {
            value: Self::new(chords, pattern.value.instantiate()),
            diagnostics,
        }
    }

    /// Get the current chord
    pub fn current_chord(&self) -> &'static Chord {
        self.chords[self.chord_index]
    }

    /// All chords in the progression
    pub fn chords(&self) -> &[&'static Chord] {
        &self.chords
    }

    /// The pattern being played
    pub fn pattern(&self) -> &StrummingPattern {
        &self.pattern
    }

    /// Index of the current chord
    pub fn chord_index(&self) -> usize {
        self.chord_index
    }

    /// Index of the next pattern step to be returned
    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    /// Return the step at the pattern cursor, then advance the cursor
    ///
    /// Not idempotent: every call moves the cursor forward.
    pub fn next_strum(&mut self) -> StrumStep {
        let strum = self.pattern.step_at(self.pattern_index);
        self.pattern_index = (self.pattern_index + 1) % self.pattern.len();
        strum
    }

    /// Move to the next chord in the progression
    pub fn advance_chord(&mut self) {
        self.chord_index = (self.chord_index + 1) % self.chords.len();
    }

    /// True when the pattern cursor is back at its first step
    pub fn is_at_pattern_start(&self) -> bool {
        self.pattern_index == 0
    }

    /// Change the tempo of this progression's pattern
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.pattern.set_tempo(tempo);
    }

    /// Reset both cursors
    pub fn reset(&mut self) {
        self.chord_index = 0;
        self.pattern_index = 0;
    }
}
