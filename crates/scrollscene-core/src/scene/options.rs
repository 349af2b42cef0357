use std::rc::Rc;

use super::diagnostic::Diagnostic;
use crate::layout::ElementRef;
use crate::pin::PinOptions;
use crate::{Error, Result};

/// Hook at the bottom edge of the viewport
pub const ON_ENTER: f64 = 1.0;
/// Hook at the middle of the viewport
pub const ON_CENTER: f64 = 0.5;
/// Hook at the top edge of the viewport
pub const ON_LEAVE: f64 = 0.0;

/// Resolve a named trigger hook
pub fn trigger_hook_from_name(name: &str) -> Option<f64> {
    match name {
        "onEnter" => Some(ON_ENTER),
        "onCenter" => Some(ON_CENTER),
        "onLeave" => Some(ON_LEAVE),
        _ => None,
    }
}

/// Callback receiving the container size and returning a duration in pixels
pub type DurationFn = Rc<dyn Fn(f64) -> Result<f64>>;

/// How a scene's duration is obtained on each refresh
#[derive(Clone)]
pub enum SceneDuration {
    /// Pixels
    Fixed(f64),
    /// Share of the container size
    Relative(f64),
    /// Evaluated on every refresh
    Dynamic(DurationFn),
}

impl Default for SceneDuration {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

impl std::fmt::Debug for SceneDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(px) => write!(f, "Fixed({})", px),
            Self::Relative(ratio) => write!(f, "Relative({})", ratio),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl SceneDuration {
    pub fn dynamic(f: impl Fn(f64) -> Result<f64> + 'static) -> Self {
        Self::Dynamic(Rc::new(f))
    }

    /// Duration in pixels for a container of `container_size`
    pub fn resolve(&self, container_size: f64) -> std::result::Result<f64, Diagnostic> {
        let value = match self {
            Self::Fixed(px) => *px,
            Self::Relative(ratio) => ratio * container_size,
            Self::Dynamic(f) => f(container_size).map_err(|e| Diagnostic::DurationFailed {
                message: match e {
                    Error::Duration(message) => message,
                    other => other.to_string(),
                },
            })?,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Diagnostic::InvalidDuration { value })
        }
    }
}

/// Immutable scene configuration
///
/// Built once through [`SceneOptionsBuilder`]; a scene that needs different
/// options gets a whole new set through `Scene::reconfigure`.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    name: Option<String>,
    trigger_element: Option<ElementRef>,
    trigger_hook: f64,
    offset: f64,
    duration: SceneDuration,
    reverse: bool,
    pin: Option<PinOptions>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            name: None,
            trigger_element: None,
            trigger_hook: ON_CENTER,
            offset: 0.0,
            duration: SceneDuration::default(),
            reverse: true,
            pin: None,
            diagnostics: Vec::new(),
        }
    }
}

impl SceneOptions {
    pub fn builder() -> SceneOptionsBuilder {
        SceneOptionsBuilder::default()
    }

    /// Start a builder from these options
    pub fn to_builder(&self) -> SceneOptionsBuilder {
        SceneOptionsBuilder {
            options: Self {
                diagnostics: Vec::new(),
                ..self.clone()
            },
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn trigger_element(&self) -> Option<&ElementRef> {
        self.trigger_element.as_ref()
    }

    pub fn trigger_hook(&self) -> f64 {
        self.trigger_hook
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn duration(&self) -> &SceneDuration {
        &self.duration
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn pin(&self) -> Option<&PinOptions> {
        self.pin.as_ref()
    }

    /// Problems corrected while building
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneOptionsBuilder {
    options: SceneOptions,
}

impl SceneOptionsBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    pub fn trigger_element(mut self, element: impl Into<ElementRef>) -> Self {
        self.options.trigger_element = Some(element.into());
        self
    }

    /// Viewport anchor, 0 = top edge, 1 = bottom edge
    pub fn trigger_hook(mut self, hook: f64) -> Self {
        self.options.trigger_hook = hook;
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.options.offset = offset;
        self
    }

    pub fn duration(mut self, duration: SceneDuration) -> Self {
        self.options.duration = duration;
        self
    }

    /// Shorthand for a fixed duration in pixels
    pub fn duration_px(self, px: f64) -> Self {
        self.duration(SceneDuration::Fixed(px))
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.options.reverse = reverse;
        self
    }

    pub fn pin(mut self, pin: PinOptions) -> Self {
        self.options.pin = Some(pin);
        self
    }

    /// Validate and freeze
    ///
    /// Invalid values are replaced by safe ones and reported through
    /// [`SceneOptions::diagnostics`].
    pub fn build(self) -> SceneOptions {
        let mut options = self.options;
        let mut diagnostics = Vec::new();

        let hook = options.trigger_hook;
        if hook.is_nan() {
            diagnostics.push(Diagnostic::TriggerHookOutOfRange { value: hook });
            options.trigger_hook = ON_CENTER;
        } else if !(0.0..=1.0).contains(&hook) {
            diagnostics.push(Diagnostic::TriggerHookOutOfRange { value: hook });
            options.trigger_hook = hook.clamp(0.0, 1.0);
        }

        if !options.offset.is_finite() {
            diagnostics.push(Diagnostic::InvalidOffset { value: options.offset });
            options.offset = 0.0;
        }

        options.diagnostics = diagnostics;
        options
    }
}
