//! Frame timing helpers
//!
//! All functions take the frame timestamp explicitly so the backend can be
//! driven from a recorded or simulated clock.

use std::time::{Duration, Instant};

/// Animation progress in [0, 1] at `now`
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Frame interval for a target frame rate, ~60fps when unset
#[inline]
pub fn frame_interval(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16)
    } else {
        Duration::from_millis(1000 / fps as u64)
    }
}
