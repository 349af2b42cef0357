//! Host layout abstraction
//!
//! The engine never touches a rendering technology directly. Everything it
//! needs from the page (viewport extents, element boxes, inline styles,
//! spacer insertion) goes through the [`Layout`] trait. Implementations use
//! interior mutability, mirroring how a document is shared by everything
//! that lives on it.

mod memory;
pub(crate) mod style;

use serde::{Deserialize, Serialize};

use crate::controller::ControllerId;
use crate::geometry::{Axis, Container};

pub use memory::MemoryLayout;
pub use style::InlineStyle;

/// Handle to an element in the host layout
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element box in document coordinates (unaffected by scrolling)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Leading edge along `axis`
    #[inline]
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Leading edge across `axis`
    #[inline]
    pub fn cross_start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.x,
            Axis::Horizontal => self.y,
        }
    }

    /// Size along `axis`
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// What the engine needs from the page hosting it
pub trait Layout {
    /// Viewport extent of the window along `axis`
    fn window_extent(&self, axis: Axis) -> f64;

    /// Page scroll offset along `axis`
    fn page_offset(&self, axis: Axis) -> f64;

    fn set_page_offset(&self, axis: Axis, offset: f64);

    /// Content box of an element, `None` when it is not in the document
    fn content_box(&self, element: &ElementRef) -> Option<Rect>;

    /// Scroll offset of a scrollable element
    fn element_scroll_offset(&self, element: &ElementRef, axis: Axis) -> Option<f64>;

    fn set_element_scroll_offset(&self, element: &ElementRef, axis: Axis, offset: f64);

    /// Raw inline style text of an element, exactly as stored
    fn inline_style(&self, element: &ElementRef) -> Option<String>;

    fn set_inline_style(&self, element: &ElementRef, css: &str);

    /// Wrap `pinned` in a new spacer element and return the spacer
    fn insert_spacer(&self, pinned: &ElementRef) -> Option<ElementRef>;

    /// Unwrap and drop a spacer created by [`Layout::insert_spacer`]
    fn remove_spacer(&self, spacer: &ElementRef);

    /// Controller currently bound to `container`
    fn container_owner(&self, container: &Container) -> Option<ControllerId>;

    fn set_container_owner(&self, container: &Container, owner: Option<ControllerId>);
}
