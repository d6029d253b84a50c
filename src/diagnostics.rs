// Diagnostics - Degraded-but-successful results
// Operations in the strummer core never fail; they fall back to a default and
// report what happened through a Diagnostic attached to the returned value.

use serde::Serialize;

/// A condition that was recovered from locally
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("Unknown chord '{requested}', using '{fallback}'")]
    UnknownChord { requested: String, fallback: String },

    #[error("Unknown pattern '{requested}', using '{fallback}'")]
    UnknownPattern { requested: String, fallback: String },

    #[error("Empty chord list, using default progression")]
    EmptyProgression,

    #[error("Target at distance {distance:.4} exceeds reach {max_reach:.4}, rescaled")]
    UnreachableTarget { distance: f64, max_reach: f64 },

    #[error("Simulation environment unavailable")]
    EnvironmentUnavailable,

    #[error("Invalid tempo {requested} BPM, keeping {kept} BPM")]
    InvalidTempo { requested: u32, kept: u32 },

    #[error("Previous playback thread panicked, environment was replaced")]
    DriverPanicked,
}

/// A value together with the diagnostics produced while computing it
///
/// `diagnostics` is empty when nothing had to be degraded.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Resolution<T> {
    /// A clean result
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// A degraded result with a single diagnostic
    pub fn degraded(value: T, diagnostic: Diagnostic) -> Self {
        Self {
            value,
            diagnostics: vec![diagnostic],
        }
    }

    /// True when at least one fallback was taken
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Transform the value, keeping the diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        Resolution {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Drop the diagnostics
    pub fn into_value(self) -> T {
        self.value
    }

    /// Log every diagnostic at warn level
    pub fn log_diagnostics(&self, context: &str) {
        for diagnostic in &self.diagnostics {
            log::warn!("{}: {}", context, diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_resolution() {
        let r = Resolution::ok(42);
        assert!(!r.is_degraded());
        assert_eq!(r.into_value(), 42);
    }

    #[test]
    fn test_degraded_resolution_keeps_diagnostics_through_map() {
        let r = Resolution::degraded(2, Diagnostic::EmptyProgression).map(|v| v * 10);
        assert!(r.is_degraded());
        assert_eq!(r.value, 20);
        assert_eq!(r.diagnostics, vec![Diagnostic::EmptyProgression]);
    }

    #[test]
    fn test_diagnostic_messages() {
        let d = Diagnostic::UnknownChord {
            requested: "H7".to_string(),
            fallback: "C".to_string(),
        };
        assert_eq!(d.to_string(), "Unknown chord 'H7', using 'C'");

        let d = Diagnostic::InvalidTempo {
            requested: 0,
            kept: 120,
        };
        assert_eq!(d.to_string(), "Invalid tempo 0 BPM, keeping 120 BPM");
    }

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let json = serde_json::to_value(Diagnostic::EnvironmentUnavailable).unwrap();
        assert_eq!(json["kind"], "environment_unavailable");
    }
}
