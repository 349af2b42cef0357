use serde::Serialize;

use crate::layout::ElementRef;

/// Non-fatal configuration or layout problem a scene degraded around
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Hook outside [0, 1]; clamped
    TriggerHookOutOfRange { value: f64 },
    /// Non-finite offset; replaced by 0
    InvalidOffset { value: f64 },
    /// Negative or non-finite duration; treated as 0
    InvalidDuration { value: f64 },
    /// Duration callback returned an error; treated as 0
    DurationFailed { message: String },
    /// Trigger element not in the document; scene is inert
    TriggerElementMissing { element: ElementRef },
    /// Pinned element not in the document; pin skipped
    PinElementMissing { element: ElementRef },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TriggerHookOutOfRange { value } => {
                write!(f, "trigger hook {} outside [0, 1], clamped", value)
            }
            Self::InvalidOffset { value } => write!(f, "offset {} is not finite, using 0", value),
            Self::InvalidDuration { value } => write!(f, "duration {} is invalid, using 0", value),
            Self::DurationFailed { message } => {
                write!(f, "duration callback failed ({}), using 0", message)
            }
            Self::TriggerElementMissing { element } => {
                write!(f, "trigger element '{}' is not in the document", element)
            }
            Self::PinElementMissing { element } => {
                write!(f, "pin element '{}' is not in the document", element)
            }
        }
    }
}
