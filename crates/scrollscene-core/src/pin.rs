//! Pinning support
//!
//! A pinned element is wrapped in a spacer when its scene is attached. The
//! spacer keeps the element's place in the flow (plus the scene duration
//! when followers are pushed) while the element itself is switched to fixed
//! positioning during the scene's active window.
//!
//! Style computation is pure: [`spacer_style`], [`fixed_style`] and
//! [`trailing_style`] turn geometry into declarations. [`Pin`] owns the
//! captured original style and writes the results through the layout.

use tracing::debug;

use crate::geometry::Axis;
use crate::layout::style::px;
use crate::layout::{ElementRef, InlineStyle, Layout, Rect};
use crate::scene::SceneState;

/// Pin request of a scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinOptions {
    pub element: ElementRef,
    /// Spacer grows by the scene duration so following content is pushed down
    pub push_followers: bool,
    /// Spacer width follows its parent instead of the captured pixel width
    pub relative_width: bool,
    /// Spacer height follows its content instead of the captured pixel height
    pub relative_height: bool,
    /// Spacer and fixed element span the full width
    pub auto_full_width: bool,
}

impl PinOptions {
    pub fn new(element: impl Into<ElementRef>) -> Self {
        Self {
            element: element.into(),
            push_followers: true,
            relative_width: false,
            relative_height: false,
            auto_full_width: false,
        }
    }

    pub fn push_followers(mut self, enabled: bool) -> Self {
        self.push_followers = enabled;
        self
    }

    pub fn relative_width(mut self, enabled: bool) -> Self {
        self.relative_width = enabled;
        self
    }

    pub fn relative_height(mut self, enabled: bool) -> Self {
        self.relative_height = enabled;
        self
    }

    pub fn auto_full_width(mut self, enabled: bool) -> Self {
        self.auto_full_width = enabled;
        self
    }

    /// Whether the spacer must be re-measured when the layout changes
    pub fn tracks_element_box(&self) -> bool {
        self.relative_width || self.relative_height || self.auto_full_width
    }
}

/// Placement of the pinned element for the current scene state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPhase {
    /// Original style, in flow
    Released,
    /// Fixed in the viewport
    Fixed,
    /// Back in flow, shifted to the end of the spacer
    Trailing,
}

impl From<SceneState> for PinPhase {
    fn from(state: SceneState) -> Self {
        match state {
            SceneState::Before => Self::Released,
            SceneState::During => Self::Fixed,
            SceneState::After => Self::Trailing,
        }
    }
}

/// Spacer declarations for a pinned element box
pub fn spacer_style(axis: Axis, element_box: Rect, duration: f64, options: &PinOptions) -> InlineStyle {
    let full_width = options.relative_width || options.auto_full_width;
    let padding = if options.push_followers { duration.max(0.0) } else { 0.0 };

    let style = InlineStyle::new()
        .with("display", "block")
        .with("position", "relative")
        .with("box-sizing", "content-box");

    match axis {
        Axis::Vertical => style
            .with("width", if full_width { "100%".to_string() } else { px(element_box.width) })
            .with("height", if options.relative_height { "auto".to_string() } else { px(element_box.height) })
            .with("padding-bottom", px(padding)),
        Axis::Horizontal => style
            .with("width", if options.relative_width { "auto".to_string() } else { px(element_box.width) })
            .with("height", if options.relative_height { "100%".to_string() } else { px(element_box.height) })
            .with("padding-right", px(padding)),
    }
}

/// Declarations for the element while fixed in the viewport
///
/// `viewport_start` is the element's leading edge in the viewport along
/// `axis` at the moment the scene window opened.
pub fn fixed_style(
    original: &InlineStyle,
    axis: Axis,
    viewport_start: f64,
    element_box: Rect,
    options: &PinOptions,
) -> InlineStyle {
    let (main, cross) = match axis {
        Axis::Vertical => ("top", "left"),
        Axis::Horizontal => ("left", "top"),
    };
    let width = if options.auto_full_width { "100%".to_string() } else { px(element_box.width) };

    original
        .clone()
        .with("position", "fixed")
        .with(main, px(viewport_start))
        .with(cross, px(element_box.cross_start(axis)))
        .with("width", width)
        .with("height", px(element_box.height))
        .with("box-sizing", "border-box")
}

/// Declarations for the element after the window, shifted by `shift`
pub fn trailing_style(original: &InlineStyle, axis: Axis, shift: f64, in_flow: bool) -> InlineStyle {
    let (main, cross) = match axis {
        Axis::Vertical => ("top", "left"),
        Axis::Horizontal => ("left", "top"),
    };
    original
        .clone()
        .with("position", if in_flow { "relative" } else { "absolute" })
        .with(main, px(shift))
        .with(cross, "0px")
}

/// A captured pin: spacer plus the original style of the pinned element
#[derive(Debug, Clone)]
pub struct Pin {
    options: PinOptions,
    spacer: ElementRef,
    /// Inline style text exactly as found at capture time
    original_css: String,
    original: InlineStyle,
    element_box: Rect,
    phase: PinPhase,
    spacer_css: Option<String>,
    element_css: Option<String>,
}

impl Pin {
    /// Capture the element's current style and wrap it in a spacer
    pub fn capture(layout: &dyn Layout, options: PinOptions) -> Option<Self> {
        let original_css = layout.inline_style(&options.element)?;
        let element_box = layout.content_box(&options.element)?;
        let spacer = layout.insert_spacer(&options.element)?;
        debug!(element = %options.element, spacer = %spacer, "Captured pin");

        Some(Self {
            original: InlineStyle::parse(&original_css),
            options,
            spacer,
            original_css,
            element_box,
            phase: PinPhase::Released,
            spacer_css: None,
            element_css: None,
        })
    }

    pub fn options(&self) -> &PinOptions {
        &self.options
    }

    pub fn element(&self) -> &ElementRef {
        &self.options.element
    }

    pub fn spacer(&self) -> &ElementRef {
        &self.spacer
    }

    pub fn phase(&self) -> PinPhase {
        self.phase
    }

    pub fn element_box(&self) -> Rect {
        self.element_box
    }

    pub fn original_css(&self) -> &str {
        &self.original_css
    }

    /// Resize the spacer for a (possibly new) duration
    ///
    /// With relative-size flags the element box is re-measured first. The
    /// box is only trusted while the element is in flow.
    pub fn resize(&mut self, layout: &dyn Layout, axis: Axis, duration: f64) {
        if self.options.tracks_element_box() && self.phase == PinPhase::Released {
            if let Some(rect) = layout.content_box(&self.options.element) {
                self.element_box = rect;
            }
        }
        let css = spacer_style(axis, self.element_box, duration, &self.options).to_css();
        if self.spacer_css.as_deref() != Some(css.as_str()) {
            layout.set_inline_style(&self.spacer, &css);
            self.spacer_css = Some(css);
        }
    }

    /// Place the element for `phase`
    pub fn apply(
        &mut self,
        layout: &dyn Layout,
        axis: Axis,
        phase: PinPhase,
        viewport_start: f64,
        duration: f64,
    ) {
        let css = match phase {
            PinPhase::Released => self.original_css.clone(),
            PinPhase::Fixed => {
                fixed_style(&self.original, axis, viewport_start, self.element_box, &self.options).to_css()
            }
            PinPhase::Trailing => {
                trailing_style(&self.original, axis, duration, self.options.push_followers).to_css()
            }
        };
        self.phase = phase;
        if self.element_css.as_deref() != Some(css.as_str()) {
            layout.set_inline_style(&self.options.element, &css);
            self.element_css = Some(css);
        }
    }

    /// Restore the original style and drop the spacer
    pub fn release(self, layout: &dyn Layout) {
        layout.set_inline_style(&self.options.element, &self.original_css);
        layout.remove_spacer(&self.spacer);
        debug!(element = %self.options.element, "Released pin");
    }
}
