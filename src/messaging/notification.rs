// Notifications - Diagnostics forwarded to the front end

use crate::diagnostics::Diagnostic;
use serde::Serialize;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Part of the system a notification comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Chord and pattern lookups
    Music,
    Kinematics,
    Simulation,
    Session,
}

/// Notification with timestamp
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    pub timestamp: i64, // Unix timestamp in milliseconds
}

impl Notification {
    pub fn new(level: NotificationLevel, category: NotificationCategory, message: String) -> Self {
        Self {
            level,
            category,
            message,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn info(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }
}

impl From<&Diagnostic> for Notification {
    fn from(diagnostic: &Diagnostic) -> Self {
        let category = match diagnostic {
            Diagnostic::UnknownChord { .. }
            | Diagnostic::UnknownPattern { .. }
            | Diagnostic::EmptyProgression => NotificationCategory::Music,
            Diagnostic::UnreachableTarget { .. } => NotificationCategory::Kinematics,
            Diagnostic::EnvironmentUnavailable => NotificationCategory::Simulation,
            Diagnostic::InvalidTempo { .. } | Diagnostic::DriverPanicked => {
                NotificationCategory::Session
            }
        };

        let level = match diagnostic {
            Diagnostic::DriverPanicked => NotificationLevel::Error,
            Diagnostic::EnvironmentUnavailable => NotificationLevel::Info,
            _ => NotificationLevel::Warning,
        };

        Self::new(level, category, diagnostic.to_string())
    }
}
