use std::time::{Duration, Instant};

use tracing::debug;

use super::timing::{is_complete, lerp, progress};
use crate::config::{EasingType, SmoothConfig};
use crate::controller::{SmoothScroller, SmoothScrollerFactory};
use crate::geometry::{Axis, Container};
use crate::{Error, Result};

/// Distance below which the damped position snaps onto its target
const SETTLE_THRESHOLD: f64 = 0.5;

/// Programmatic scroll-to in flight
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Damped scroll position follower
///
/// Call `sync()` with raw offsets as they arrive and `tick()` once per frame
/// to get the interpolated position.
#[derive(Debug, Clone)]
pub struct InertialScroller {
    container: Container,
    axis: Axis,
    /// Share of the remaining distance covered per frame
    damping: f64,
    config: SmoothConfig,
    /// Damped position (what scenes see)
    position: f64,
    /// Latest raw input
    target: f64,
    animation: Option<ActiveAnimation>,
    disposed: bool,
}

impl InertialScroller {
    pub fn new(container: Container, axis: Axis, damping: f64, start: f64, config: SmoothConfig) -> Self {
        Self {
            container,
            axis,
            damping,
            config,
            position: start,
            target: start,
            animation: None,
            disposed: false,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Position the scroller is heading for
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.target)
    }

    /// True while the damped position still moves
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.position != self.target
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl SmoothScroller for InertialScroller {
    fn sync(&mut self, raw: f64) {
        if self.disposed {
            return;
        }
        // User input interrupts a programmatic scroll
        if self.animation.is_some() && raw != self.target() {
            self.animation = None;
        }
        self.target = raw;
    }

    fn tick(&mut self, now: Instant) -> Option<f64> {
        if self.disposed {
            return None;
        }
        let before = self.position;

        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.position = anim.to;
                self.target = anim.to;
                self.animation = None;
            } else {
                let t = progress(anim.start, now, anim.duration);
                self.position = lerp(anim.from, anim.to, anim.easing.apply(t));
            }
        } else {
            let remaining = self.target - self.position;
            if remaining.abs() < SETTLE_THRESHOLD {
                self.position = self.target;
            } else {
                self.position += remaining * self.damping;
            }
        }

        (self.position != before).then_some(self.position)
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn scroll_to(&mut self, target: f64, now: Instant) {
        if self.disposed {
            return;
        }
        if self.position == target {
            self.animation = None;
            self.target = target;
            return;
        }
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.position,
            to: target,
            duration: Duration::from_millis(self.config.animation_duration_ms),
            easing: self.config.easing,
        });
    }

    fn dispose(&mut self) {
        debug!(container = %self.container, "Disposing inertial scroller");
        self.animation = None;
        self.disposed = true;
    }
}

/// Creates [`InertialScroller`]s from a [`SmoothConfig`]
#[derive(Debug, Clone, Default)]
pub struct InertialScrollerFactory {
    config: SmoothConfig,
}

impl InertialScrollerFactory {
    pub fn new(config: SmoothConfig) -> Self {
        Self { config }
    }
}

impl SmoothScrollerFactory for InertialScrollerFactory {
    fn create(
        &self,
        container: &Container,
        axis: Axis,
        damping: f64,
        start: f64,
    ) -> Result<Box<dyn SmoothScroller>> {
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(Error::Backend(format!(
                "damping factor {} outside (0, 1]",
                damping
            )));
        }
        Ok(Box::new(InertialScroller::new(
            container.clone(),
            axis,
            damping,
            start,
            self.config.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(damping: f64) -> InertialScroller {
        InertialScroller::new(Container::Window, Axis::Vertical, damping, 0.0, SmoothConfig::default())
    }

    #[test]
    fn test_damped_follow() {
        let mut s = scroller(0.5);
        let now = Instant::now();
        s.sync(100.0);

        assert_eq!(s.tick(now), Some(50.0));
        assert_eq!(s.tick(now), Some(75.0));
        assert!(s.is_animating());

        for _ in 0..20 {
            s.tick(now);
        }
        assert_eq!(s.position(), 100.0);
        assert!(!s.is_animating());
        assert_eq!(s.tick(now), None);
    }

    #[test]
    fn test_scroll_to_tween() {
        let config = SmoothConfig {
            animation_duration_ms: 100,
            easing: EasingType::Linear,
            ..Default::default()
        };
        let mut s = InertialScroller::new(Container::Window, Axis::Vertical, 0.1, 0.0, config);
        let start = Instant::now();

        s.scroll_to(200.0, start);
        assert_eq!(s.target(), 200.0);

        let mid = s.tick(start + Duration::from_millis(50)).unwrap();
        assert!((mid - 100.0).abs() < 0.001);

        assert_eq!(s.tick(start + Duration::from_millis(150)), Some(200.0));
        assert!(!s.is_animating());
    }

    #[test]
    fn test_input_interrupts_tween() {
        let mut s = scroller(1.0);
        let now = Instant::now();
        s.scroll_to(500.0, now);
        s.sync(40.0);
        assert_eq!(s.target(), 40.0);
        assert_eq!(s.tick(now), Some(40.0));
    }

    #[test]
    fn test_disposed_is_silent() {
        let mut s = scroller(0.5);
        s.sync(100.0);
        s.dispose();
        assert!(s.is_disposed());
        assert_eq!(s.tick(Instant::now()), None);
    }

    #[test]
    fn test_factory_rejects_bad_damping() {
        let factory = InertialScrollerFactory::default();
        assert!(factory.create(&Container::Window, Axis::Vertical, 0.0, 0.0).is_err());
        assert!(factory.create(&Container::Window, Axis::Vertical, 1.5, 0.0).is_err());

        let created = factory.create(&Container::Window, Axis::Vertical, 0.2, 320.0).unwrap();
        assert_eq!(created.position(), 320.0);
    }
}
