//! Scroll position backends
//!
//! A controller reads scroll positions from exactly one backend at a time.
//! `Native` reads the container's own offset whenever a scroll event arrives.
//! `Smoothed` feeds raw offsets into a [`SmoothScroller`] and uses the
//! damped position it produces on each frame.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Container};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendKind {
    Native,
    Smoothed,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "NATIVE",
            Self::Smoothed => "SMOOTHED",
        }
    }
}

/// Inertial scroll position source
pub trait SmoothScroller {
    /// Feed the latest raw scroll offset of the container
    fn sync(&mut self, raw: f64);

    /// Advance one frame; returns the new damped position if it moved
    fn tick(&mut self, now: Instant) -> Option<f64>;

    /// Current damped position
    fn position(&self) -> f64;

    /// Start a programmatic scroll towards `target`
    fn scroll_to(&mut self, target: f64, now: Instant);

    /// Stop producing positions and release held resources
    fn dispose(&mut self);
}

/// Builds smoothed backends for a container
pub trait SmoothScrollerFactory {
    /// `start` is the position the new backend must report before any input
    fn create(
        &self,
        container: &Container,
        axis: Axis,
        damping: f64,
        start: f64,
    ) -> Result<Box<dyn SmoothScroller>>;
}

/// Active backend of a controller instance
pub(crate) enum Backend {
    Native,
    Smoothed(Box<dyn SmoothScroller>),
}

impl Backend {
    pub(crate) fn kind(&self) -> BackendKind {
        match self {
            Self::Native => BackendKind::Native,
            Self::Smoothed(_) => BackendKind::Smoothed,
        }
    }

    pub(crate) fn dispose(self) {
        if let Self::Smoothed(mut scroller) = self {
            scroller.dispose();
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind().as_str())
    }
}
