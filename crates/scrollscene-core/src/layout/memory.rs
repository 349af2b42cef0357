//! In-memory page model
//!
//! A flat set of positioned elements plus a window. Used by the simulator
//! and by tests; positions never reflow, so pinning only shows up in the
//! inline styles it writes.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{ElementRef, Layout, Rect};
use crate::controller::ControllerId;
use crate::geometry::{Axis, Container};

#[derive(Debug, Clone)]
struct Node {
    rect: Rect,
    style: String,
    scroll: [f64; 2],
    attached: bool,
    /// Element wrapped by this node when it is a spacer
    wraps: Option<ElementRef>,
}

impl Node {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            style: String::new(),
            scroll: [0.0, 0.0],
            attached: true,
            wraps: None,
        }
    }
}

#[derive(Debug, Default)]
struct Page {
    width: f64,
    height: f64,
    offset: [f64; 2],
    elements: BTreeMap<ElementRef, Node>,
    owners: HashMap<Container, ControllerId>,
    next_spacer: u32,
}

#[inline]
fn slot(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

/// [`Layout`] backed by plain data
#[derive(Debug, Default)]
pub struct MemoryLayout {
    page: RefCell<Page>,
}

impl MemoryLayout {
    /// Create a page with a window of the given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            page: RefCell::new(Page {
                width,
                height,
                ..Default::default()
            }),
        }
    }

    /// Add (or replace) an element at a document position
    pub fn add_element(&self, id: impl Into<ElementRef>, rect: Rect) {
        self.page.borrow_mut().elements.insert(id.into(), Node::new(rect));
    }

    /// Add an element carrying an initial inline style
    pub fn add_styled_element(&self, id: impl Into<ElementRef>, rect: Rect, style: &str) {
        let mut node = Node::new(rect);
        node.style = style.to_string();
        self.page.borrow_mut().elements.insert(id.into(), node);
    }

    pub fn set_element_rect(&self, id: &str, rect: Rect) {
        if let Some(node) = self.page.borrow_mut().elements.get_mut(&ElementRef::from(id)) {
            node.rect = rect;
        }
    }

    /// Take an element out of the document without forgetting it
    pub fn detach_element(&self, id: &str) {
        if let Some(node) = self.page.borrow_mut().elements.get_mut(&ElementRef::from(id)) {
            node.attached = false;
        }
    }

    pub fn reattach_element(&self, id: &str) {
        if let Some(node) = self.page.borrow_mut().elements.get_mut(&ElementRef::from(id)) {
            node.attached = true;
        }
    }

    pub fn resize_window(&self, width: f64, height: f64) {
        let mut page = self.page.borrow_mut();
        page.width = width;
        page.height = height;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.page.borrow().elements.contains_key(&ElementRef::from(id))
    }

    /// Number of spacers currently in the page
    pub fn spacer_count(&self) -> usize {
        self.page
            .borrow()
            .elements
            .values()
            .filter(|node| node.wraps.is_some())
            .count()
    }
}

impl Layout for MemoryLayout {
    fn window_extent(&self, axis: Axis) -> f64 {
        let page = self.page.borrow();
        match axis {
            Axis::Vertical => page.height,
            Axis::Horizontal => page.width,
        }
    }

    fn page_offset(&self, axis: Axis) -> f64 {
        self.page.borrow().offset[slot(axis)]
    }

    fn set_page_offset(&self, axis: Axis, offset: f64) {
        self.page.borrow_mut().offset[slot(axis)] = offset;
    }

    fn content_box(&self, element: &ElementRef) -> Option<Rect> {
        let page = self.page.borrow();
        page.elements
            .get(element)
            .filter(|node| node.attached)
            .map(|node| node.rect)
    }

    fn element_scroll_offset(&self, element: &ElementRef, axis: Axis) -> Option<f64> {
        let page = self.page.borrow();
        page.elements
            .get(element)
            .filter(|node| node.attached)
            .map(|node| node.scroll[slot(axis)])
    }

    fn set_element_scroll_offset(&self, element: &ElementRef, axis: Axis, offset: f64) {
        if let Some(node) = self.page.borrow_mut().elements.get_mut(element) {
            node.scroll[slot(axis)] = offset;
        }
    }

    fn inline_style(&self, element: &ElementRef) -> Option<String> {
        self.page.borrow().elements.get(element).map(|node| node.style.clone())
    }

    fn set_inline_style(&self, element: &ElementRef, css: &str) {
        if let Some(node) = self.page.borrow_mut().elements.get_mut(element) {
            node.style = css.to_string();
        }
    }

    fn insert_spacer(&self, pinned: &ElementRef) -> Option<ElementRef> {
        let mut page = self.page.borrow_mut();
        let rect = page.elements.get(pinned).filter(|node| node.attached)?.rect;
        page.next_spacer += 1;
        let spacer = ElementRef::new(format!("scrollscene-spacer-{}", page.next_spacer));
        let mut node = Node::new(rect);
        node.wraps = Some(pinned.clone());
        page.elements.insert(spacer.clone(), node);
        debug!(pinned = %pinned, spacer = %spacer, "Inserted pin spacer");
        Some(spacer)
    }

    fn remove_spacer(&self, spacer: &ElementRef) {
        let mut page = self.page.borrow_mut();
        if page.elements.get(spacer).is_some_and(|node| node.wraps.is_some()) {
            page.elements.remove(spacer);
        }
    }

    fn container_owner(&self, container: &Container) -> Option<ControllerId> {
        self.page.borrow().owners.get(container).copied()
    }

    fn set_container_owner(&self, container: &Container, owner: Option<ControllerId>) {
        let mut page = self.page.borrow_mut();
        match owner {
            Some(id) => {
                page.owners.insert(container.clone(), id);
            }
            None => {
                page.owners.remove(container);
            }
        }
    }
}
