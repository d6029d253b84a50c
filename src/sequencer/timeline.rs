// Timeline - Tempo and time signature
// Handles conversion between beats and real time for strumming patterns

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Time signature (numerator/denominator)
/// Example: 4/4 time = TimeSignature { numerator: 4, denominator: 4 }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,   // Beats per measure
    pub denominator: u8, // Beat unit (4 = quarter note, 8 = eighth note)
}

impl TimeSignature {
    /// Creates a new time signature
    pub const fn new(numerator: u8, denominator: u8) -> Self {
        assert!(numerator > 0, "Time signature numerator must be > 0");
        assert!(
            denominator.is_power_of_two(),
            "Time signature denominator must be power of 2"
        );
        Self {
            numerator,
            denominator,
        }
    }

    /// Common 4/4 time signature
    pub const fn four_four() -> Self {
        Self::new(4, 4)
    }

    /// Common 3/4 time signature (waltz)
    pub const fn three_four() -> Self {
        Self::new(3, 4)
    }

    /// Number of beats per measure
    pub fn beats_per_measure(&self) -> f64 {
        self.numerator as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Tempo in whole BPM (Beats Per Minute), always > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    /// Creates a new tempo, panicking on 0 BPM
    pub const fn new(bpm: u32) -> Self {
        assert!(bpm > 0, "BPM must be > 0");
        Self { bpm }
    }

    /// Creates a new tempo, `None` for 0 BPM
    pub fn try_new(bpm: u32) -> Option<Self> {
        (bpm > 0).then_some(Self { bpm })
    }

    /// Get BPM value
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Duration of one beat
    pub fn beat_duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds_per_beat())
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120)
    }
}

impl TryFrom<u32> for Tempo {
    type Error = String;

    fn try_from(bpm: u32) -> Result<Self, Self::Error> {
        Self::try_new(bpm).ok_or_else(|| "BPM must be > 0".to_string())
    }
}

impl From<Tempo> for u32 {
    fn from(tempo: Tempo) -> Self {
        tempo.bpm
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}
