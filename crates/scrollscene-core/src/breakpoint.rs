//! Viewport width classes
//!
//! The controller never looks at breakpoints itself. A consumer observes the
//! viewport width, and when the class changes it rebuilds scene options for
//! the new class and hands them to `Controller::reconfigure_scene`.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

/// Result of observing a viewport width
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakpointChange {
    /// Active class, `None` when no breakpoint matches
    pub screen_size: Option<String>,
    pub has_changed: bool,
}

/// Maps a viewport width onto the widest breakpoint it satisfies
#[derive(Debug, Clone)]
pub struct BreakpointResolver {
    /// (min width, name), ascending
    thresholds: Vec<(f64, String)>,
    current: Option<String>,
    observed: bool,
}

impl BreakpointResolver {
    pub fn new(breakpoints: &BTreeMap<String, f64>) -> Self {
        let mut thresholds: Vec<(f64, String)> = breakpoints
            .iter()
            .filter(|(_, min)| min.is_finite())
            .map(|(name, min)| (*min, name.clone()))
            .collect();
        thresholds.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            thresholds,
            current: None,
            observed: false,
        }
    }

    /// Class for `width` without recording it
    pub fn classify(&self, width: f64) -> Option<&str> {
        self.thresholds
            .iter()
            .rev()
            .find(|(min, _)| width >= *min)
            .map(|(_, name)| name.as_str())
    }

    /// Record a viewport width; the first observation always reports a change
    pub fn observe(&mut self, width: f64) -> BreakpointChange {
        let screen_size = self.classify(width).map(str::to_string);
        let has_changed = !self.observed || screen_size != self.current;
        if has_changed {
            debug!(width, from = ?self.current, to = ?screen_size, "Breakpoint changed");
        }
        self.observed = true;
        self.current = screen_size.clone();
        BreakpointChange {
            screen_size,
            has_changed,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> BreakpointResolver {
        BreakpointResolver::new(&BTreeMap::from([
            ("mobile".to_string(), 0.0),
            ("tablet".to_string(), 768.0),
            ("desktop".to_string(), 1024.0),
        ]))
    }

    #[test]
    fn test_classify() {
        let resolver = resolver();
        assert_eq!(resolver.classify(320.0), Some("mobile"));
        assert_eq!(resolver.classify(768.0), Some("tablet"));
        assert_eq!(resolver.classify(1023.9), Some("tablet"));
        assert_eq!(resolver.classify(1920.0), Some("desktop"));
        assert_eq!(resolver.classify(-1.0), None);
    }

    #[test]
    fn test_observe_reports_changes_only() {
        let mut resolver = resolver();
        let first = resolver.observe(1280.0);
        assert!(first.has_changed);
        assert_eq!(first.screen_size.as_deref(), Some("desktop"));

        assert!(!resolver.observe(1100.0).has_changed);

        let change = resolver.observe(800.0);
        assert!(change.has_changed);
        assert_eq!(resolver.current(), Some("tablet"));
    }

    #[test]
    fn test_empty_table() {
        let mut resolver = BreakpointResolver::new(&BTreeMap::new());
        let change = resolver.observe(1000.0);
        assert_eq!(change.screen_size, None);
        assert!(change.has_changed);
        assert!(!resolver.observe(500.0).has_changed);
    }
}
