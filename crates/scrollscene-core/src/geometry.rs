//! Container geometry sampling
//!
//! Reads the size and scroll offset of a scroll container along one axis.
//! The window/document and scrollable elements are measured differently:
//! the window reports the viewport extent and the page offset, an element
//! reports its content box and its own scroll offset.

use serde::{Deserialize, Serialize};

use crate::layout::{ElementRef, Layout};

/// Scroll axis of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// Direction of the last scroll movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrollDirection {
    Forward,
    Reverse,
    #[default]
    Paused,
}

impl ScrollDirection {
    /// Derive the direction from the previous and current positions
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(prev) if current > prev => Self::Forward,
            Some(prev) if current < prev => Self::Reverse,
            _ => Self::Paused,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "FORWARD",
            Self::Reverse => "REVERSE",
            Self::Paused => "PAUSED",
        }
    }
}

/// The scroll surface a controller is bound to
///
/// When no container is configured the window is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    #[default]
    Window,
    Element(ElementRef),
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Window => f.write_str("window"),
            Self::Element(el) => write!(f, "#{}", el),
        }
    }
}

/// One geometry sample of a container
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    /// Viewport extent along the axis
    pub size: f64,
    /// Scroll offset along the axis
    pub scroll_pos: f64,
    pub scroll_direction: ScrollDirection,
}

impl Geometry {
    /// Same size, new position; direction derived from this sample
    pub fn moved_to(&self, scroll_pos: f64) -> Self {
        Self {
            size: self.size,
            scroll_pos,
            scroll_direction: ScrollDirection::between(Some(self.scroll_pos), scroll_pos),
        }
    }
}

/// Stateless geometry reads against a [`Layout`]
pub struct GeometryProvider;

impl GeometryProvider {
    /// Sample size, offset and direction of `container`
    ///
    /// Returns `None` when the container is no longer part of the document
    /// or has collapsed to zero size; scene evaluation pauses until a valid
    /// sample comes back.
    pub fn sample(
        layout: &dyn Layout,
        container: &Container,
        axis: Axis,
        previous_pos: Option<f64>,
    ) -> Option<Geometry> {
        let size = Self::size(layout, container, axis)?;
        let scroll_pos = Self::scroll_offset(layout, container, axis)?;
        Some(Geometry {
            size,
            scroll_pos,
            scroll_direction: ScrollDirection::between(previous_pos, scroll_pos),
        })
    }

    /// Viewport extent along `axis`, `None` when unusable
    pub fn size(layout: &dyn Layout, container: &Container, axis: Axis) -> Option<f64> {
        let size = match container {
            Container::Window => layout.window_extent(axis),
            Container::Element(el) => layout.content_box(el)?.extent(axis),
        };
        (size.is_finite() && size > 0.0).then_some(size)
    }

    /// Current scroll offset along `axis`
    pub fn scroll_offset(layout: &dyn Layout, container: &Container, axis: Axis) -> Option<f64> {
        match container {
            Container::Window => Some(layout.page_offset(axis)),
            Container::Element(el) => layout.element_scroll_offset(el, axis),
        }
    }

    /// Write a scroll offset; only the controller's active backend calls this
    pub fn scroll_to(layout: &dyn Layout, container: &Container, axis: Axis, offset: f64) {
        let offset = offset.max(0.0);
        match container {
            Container::Window => layout.set_page_offset(axis, offset),
            Container::Element(el) => layout.set_element_scroll_offset(el, axis, offset),
        }
    }

    /// Offset of `element` in the container's scroll space
    pub fn element_offset(
        layout: &dyn Layout,
        element: &ElementRef,
        container: &Container,
        axis: Axis,
    ) -> Option<f64> {
        let rect = layout.content_box(element)?;
        match container {
            Container::Window => Some(rect.start(axis)),
            Container::Element(parent) => {
                let parent_rect = layout.content_box(parent)?;
                Some(rect.start(axis) - parent_rect.start(axis))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{MemoryLayout, Rect};

    #[test]
    fn test_direction_between() {
        assert_eq!(ScrollDirection::between(None, 10.0), ScrollDirection::Paused);
        assert_eq!(ScrollDirection::between(Some(5.0), 10.0), ScrollDirection::Forward);
        assert_eq!(ScrollDirection::between(Some(15.0), 10.0), ScrollDirection::Reverse);
        assert_eq!(ScrollDirection::between(Some(10.0), 10.0), ScrollDirection::Paused);
    }

    #[test]
    fn test_window_sample() {
        let layout = MemoryLayout::new(800.0, 1000.0);
        layout.set_page_offset(Axis::Vertical, 250.0);

        let geometry = GeometryProvider::sample(&layout, &Container::Window, Axis::Vertical, Some(200.0)).unwrap();
        assert_eq!(geometry.size, 1000.0);
        assert_eq!(geometry.scroll_pos, 250.0);
        assert_eq!(geometry.scroll_direction, ScrollDirection::Forward);

        let horizontal = GeometryProvider::sample(&layout, &Container::Window, Axis::Horizontal, None).unwrap();
        assert_eq!(horizontal.size, 800.0);
        assert_eq!(horizontal.scroll_direction, ScrollDirection::Paused);
    }

    #[test]
    fn test_element_container_sample() {
        let layout = MemoryLayout::new(800.0, 1000.0);
        layout.add_element("panel", Rect::new(0.0, 100.0, 400.0, 300.0));
        layout.set_element_scroll_offset(&ElementRef::from("panel"), Axis::Vertical, 40.0);

        let container = Container::Element(ElementRef::from("panel"));
        let geometry = GeometryProvider::sample(&layout, &container, Axis::Vertical, None).unwrap();
        assert_eq!(geometry.size, 300.0);
        assert_eq!(geometry.scroll_pos, 40.0);
    }

    #[test]
    fn test_detached_container_has_no_geometry() {
        let layout = MemoryLayout::new(800.0, 1000.0);
        layout.add_element("panel", Rect::new(0.0, 100.0, 400.0, 300.0));
        layout.detach_element("panel");

        let container = Container::Element(ElementRef::from("panel"));
        assert!(GeometryProvider::sample(&layout, &container, Axis::Vertical, None).is_none());
    }

    #[test]
    fn test_element_offset_in_element_container() {
        let layout = MemoryLayout::new(800.0, 1000.0);
        layout.add_element("panel", Rect::new(0.0, 100.0, 400.0, 300.0));
        layout.add_element("item", Rect::new(0.0, 700.0, 400.0, 50.0));
        layout.set_element_scroll_offset(&ElementRef::from("panel"), Axis::Vertical, 25.0);

        let container = Container::Element(ElementRef::from("panel"));
        let offset = GeometryProvider::element_offset(&layout, &ElementRef::from("item"), &container, Axis::Vertical);
        assert_eq!(offset, Some(600.0));
    }
}
