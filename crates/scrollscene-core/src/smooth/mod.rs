//! Inertial smoothed-scrolling backend
//!
//! The default [`SmoothScroller`](crate::controller::SmoothScroller)
//! implementation. Raw scroll input sets a target; every frame the damped
//! position covers a fixed share of the remaining distance. Programmatic
//! scroll-to requests run as eased tweens instead.
//!
//! - `easing` - easing curves for programmatic tweens
//! - `timing` - progress and interpolation helpers
//! - `scroller` - the backend itself and its factory

pub mod easing;
pub mod timing;

mod scroller;

pub use scroller::{InertialScroller, InertialScrollerFactory};
