//! Pure scene state transitions
//!
//! Given the previous snapshot, the trigger window and a scroll position,
//! [`evaluate`] returns the next snapshot and [`transition_events`] lists
//! the lifecycle events that move from one to the other.

use serde::{Deserialize, Serialize};

use super::events::EventKind;

/// Where the scroll position sits relative to a scene's window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SceneState {
    #[default]
    Before,
    During,
    After,
}

impl SceneState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::During => "DURING",
            Self::After => "AFTER",
        }
    }
}

impl std::fmt::Display for SceneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved trigger position and duration, valid until the next refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerWindow {
    pub start: f64,
    pub duration: f64,
}

impl TriggerWindow {
    pub fn end(&self) -> f64 {
        self.start + self.duration.max(0.0)
    }
}

/// Lifecycle position of a scene
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    pub state: SceneState,
    pub progress: f64,
    /// Progress has reached 1 at least once
    pub completed: bool,
}

/// Next snapshot for `scroll_pos`
///
/// A zero-length window only knows `Before` and `After`. Without `reverse`
/// progress never goes down, and a completed scene stays `After` whatever
/// the window does afterwards.
pub fn evaluate(current: Snapshot, window: TriggerWindow, scroll_pos: f64, reverse: bool) -> Snapshot {
    if !reverse && current.completed {
        return Snapshot {
            state: SceneState::After,
            progress: 1.0,
            completed: true,
        };
    }

    let (state, progress) = if window.duration <= 0.0 {
        if scroll_pos >= window.start {
            (SceneState::After, 1.0)
        } else {
            (SceneState::Before, 0.0)
        }
    } else {
        let raw = (scroll_pos - window.start) / window.duration;
        if raw < 0.0 {
            (SceneState::Before, 0.0)
        } else if raw >= 1.0 {
            (SceneState::After, 1.0)
        } else {
            (SceneState::During, raw)
        }
    };

    if !reverse && progress < current.progress {
        return current;
    }

    Snapshot {
        state,
        progress,
        completed: current.completed || state == SceneState::After,
    }
}

/// Events to dispatch when moving from `previous` to `next`
///
/// Each entry carries the state reported with the event: the state being
/// left for `Leave`, the new state for everything else.
pub fn transition_events(previous: Snapshot, next: Snapshot) -> Vec<(EventKind, SceneState)> {
    if previous.state != next.state {
        vec![
            (EventKind::Leave, previous.state),
            (EventKind::Enter, next.state),
            (EventKind::Progress, next.state),
            (EventKind::Update, next.state),
        ]
    } else if previous.progress != next.progress {
        vec![
            (EventKind::Progress, next.state),
            (EventKind::Update, next.state),
        ]
    } else {
        Vec::new()
    }
}
