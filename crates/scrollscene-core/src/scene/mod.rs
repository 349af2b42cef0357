//! Scroll-bound scenes
//!
//! A scene maps a window of the container's scroll range onto a progress
//! value and walks through `BEFORE`, `DURING` and `AFTER` as the position
//! moves. It is created detached, bound by a controller, and evaluated by
//! that controller on every update.
//!
//! - `state` - pure transition rules
//! - `events` - event kinds, payloads and the listener registry
//! - `options` - immutable configuration and its builder
//! - `diagnostic` - non-fatal problems a scene works around

mod diagnostic;
mod events;
mod options;
mod state;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::controller::{ControllerId, ControllerInfo};
use crate::geometry::{Axis, Container, GeometryProvider};
use crate::layout::{ElementRef, Layout};
use crate::pin::{Pin, PinPhase};

pub use diagnostic::Diagnostic;
pub use events::{Callback, EventKind, ListenerRegistry, SceneEvent};
pub use options::{
    trigger_hook_from_name, DurationFn, SceneDuration, SceneOptions, SceneOptionsBuilder, ON_CENTER,
    ON_ENTER, ON_LEAVE,
};
pub use state::{evaluate, transition_events, SceneState, Snapshot, TriggerWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(Uuid);

impl SceneId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning link to the controller a scene is attached to
struct Binding {
    /// Last controller snapshot handed to the scene
    info: ControllerInfo,
    container: Container,
    layout: Rc<dyn Layout>,
}

pub struct Scene {
    id: SceneId,
    options: SceneOptions,
    listeners: ListenerRegistry,
    binding: Option<Binding>,
    snapshot: Snapshot,
    /// Resolved on refresh; `None` while detached or inert
    window: Option<TriggerWindow>,
    pin: Option<Pin>,
    refresh_diagnostics: Vec<Diagnostic>,
}

impl Scene {
    pub fn new(options: SceneOptions) -> Self {
        for diagnostic in options.diagnostics() {
            warn!(scene = options.name().unwrap_or("-"), "{}", diagnostic);
        }
        Self {
            id: SceneId::new(),
            options,
            listeners: ListenerRegistry::new(),
            binding: None,
            snapshot: Snapshot::default(),
            window: None,
            pin: None,
            refresh_diagnostics: Vec::new(),
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.options.name()
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn state(&self) -> SceneState {
        self.snapshot.state
    }

    pub fn progress(&self) -> f64 {
        self.snapshot.progress
    }

    /// Absolute start of the scene window in container scroll space
    pub fn trigger_position(&self) -> Option<f64> {
        self.window.map(|w| w.start)
    }

    /// Resolved duration in pixels
    pub fn duration(&self) -> Option<f64> {
        self.window.map(|w| w.duration)
    }

    pub fn window(&self) -> Option<TriggerWindow> {
        self.window
    }

    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// Instance id of the controller this scene is attached to
    pub fn controller(&self) -> Option<ControllerId> {
        self.binding.as_ref().map(|b| b.info.id)
    }

    /// Configuration corrections plus problems found on the last refresh
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.options
            .diagnostics()
            .iter()
            .chain(self.refresh_diagnostics.iter())
            .cloned()
            .collect()
    }

    pub fn pin(&self) -> Option<&Pin> {
        self.pin.as_ref()
    }

    pub fn on(&mut self, kind: EventKind, callback: impl Fn(&SceneEvent) + 'static) -> &mut Self {
        self.listeners.add(kind, None, Rc::new(callback));
        self
    }

    /// Register a listener under a namespace so it can be removed as a group
    pub fn on_ns(
        &mut self,
        kind: EventKind,
        namespace: &str,
        callback: impl Fn(&SceneEvent) + 'static,
    ) -> &mut Self {
        self.listeners.add(kind, Some(namespace), Rc::new(callback));
        self
    }

    pub fn off(&mut self, kind: EventKind, namespace: Option<&str>) -> usize {
        self.listeners.remove(kind, namespace)
    }

    pub fn off_namespace(&mut self, namespace: &str) -> usize {
        self.listeners.remove_namespace(namespace)
    }

    /// Re-measure the container and recompute trigger, duration and state
    ///
    /// Does nothing while the scene is detached or the container has no
    /// usable geometry.
    pub fn refresh(&mut self) {
        let Some(binding) = self.binding.as_ref() else {
            debug!(scene = %self.id, "Refresh on detached scene ignored");
            return;
        };
        let info = binding.info;
        match GeometryProvider::size(binding.layout.as_ref(), &binding.container, info.axis) {
            Some(size) => self.refresh_with(ControllerInfo { size, ..info }),
            None => debug!(scene = %self.id, "Container has no geometry, refresh skipped"),
        }
    }

    /// Replace the options, keeping listeners and state
    pub fn reconfigure(&mut self, options: SceneOptions) {
        for diagnostic in options.diagnostics() {
            warn!(scene = %self.id, "{}", diagnostic);
        }
        if self.options.pin() != options.pin() {
            self.release_pin();
        }
        self.options = options;
        self.refresh();
    }

    /// Bind to a controller instance and evaluate
    ///
    /// A `fresh` attach starts from `BEFORE` and announces itself with `Add`;
    /// a re-attach after a backend swap keeps the current state. Evaluation
    /// waits for the next refresh when the container has no size yet.
    pub(crate) fn attach(
        &mut self,
        info: ControllerInfo,
        container: Container,
        layout: Rc<dyn Layout>,
        fresh: bool,
    ) {
        self.binding = Some(Binding {
            info,
            container,
            layout,
        });
        if fresh {
            self.snapshot = Snapshot::default();
            self.emit(EventKind::Add, self.snapshot.state);
        }
        if info.size > 0.0 {
            self.refresh_with(info);
        }
    }

    /// Drop the binding only; pin and state stay for the next attach
    pub(crate) fn unbind(&mut self) {
        self.binding = None;
    }

    /// Leave the controller: announce with `kind`, release the pin, unbind
    pub(crate) fn detach(&mut self, kind: EventKind) {
        if self.binding.is_none() {
            return;
        }
        self.emit(kind, self.snapshot.state);
        self.release_pin();
        self.binding = None;
        self.window = None;
        debug!(scene = %self.id, event = %kind, "Scene detached");
    }

    /// Resolve the trigger window for `info`, then evaluate
    pub(crate) fn refresh_with(&mut self, info: ControllerInfo) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        binding.info = info;
        let layout = Rc::clone(&binding.layout);
        let container = binding.container.clone();
        let mut diagnostics = Vec::new();
        let mut captured = false;

        if let Some(pin_options) = self.options.pin() {
            if self.pin.is_none() {
                match Pin::capture(layout.as_ref(), pin_options.clone()) {
                    Some(pin) => {
                        self.pin = Some(pin);
                        captured = true;
                    }
                    None => diagnostics.push(Diagnostic::PinElementMissing {
                        element: pin_options.element.clone(),
                    }),
                }
            }
        }

        let window = self.resolve_window(layout.as_ref(), &container, info, &mut diagnostics);

        if diagnostics != self.refresh_diagnostics {
            for diagnostic in &diagnostics {
                warn!(scene = %self.id, "{}", diagnostic);
            }
        }
        self.refresh_diagnostics = diagnostics;

        let Some(window) = window else {
            self.window = None;
            return;
        };

        if let Some(pin) = self.pin.as_mut() {
            pin.resize(layout.as_ref(), info.axis, window.duration);
        }

        let previous = self.window.replace(window);
        if previous.is_some_and(|p| p != window) {
            debug!(scene = %self.id, start = window.start, duration = window.duration, "Scene shifted");
            self.emit(EventKind::Shift, self.snapshot.state);
        }

        self.update_with(info);
        // Placement depends on the window, not only on the state
        if captured || previous != Some(window) {
            self.apply_pin();
        }
    }

    /// Evaluate against a new position using the cached window
    pub(crate) fn update_with(&mut self, info: ControllerInfo) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        binding.info = info;
        let Some(window) = self.window else {
            return;
        };

        let previous = self.snapshot;
        let next = evaluate(previous, window, info.scroll_pos, self.options.reverse());
        self.snapshot = next;

        let events = transition_events(previous, next);
        if events.is_empty() {
            return;
        }
        if previous.state != next.state {
            debug!(scene = %self.id, from = %previous.state, to = %next.state, "Scene state changed");
        }
        self.apply_pin();
        for (kind, state) in events {
            self.emit(kind, state);
        }
    }

    fn resolve_window(
        &self,
        layout: &dyn Layout,
        container: &Container,
        info: ControllerInfo,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<TriggerWindow> {
        let hook_offset = info.size * self.options.trigger_hook();

        let start = match self.options.trigger_element() {
            Some(element) => {
                let anchor = self.anchor_element(element);
                let Some(offset) = GeometryProvider::element_offset(layout, anchor, container, info.axis) else {
                    diagnostics.push(Diagnostic::TriggerElementMissing {
                        element: element.clone(),
                    });
                    return None;
                };
                offset - hook_offset + self.options.offset()
            }
            None => hook_offset + self.options.offset(),
        };

        let duration = self.options.duration().resolve(info.size).unwrap_or_else(|diagnostic| {
            diagnostics.push(diagnostic);
            0.0
        });

        Some(TriggerWindow { start, duration })
    }

    /// The pinned element moves while fixed, so its spacer stands in for it
    fn anchor_element<'a>(&'a self, element: &'a ElementRef) -> &'a ElementRef {
        match &self.pin {
            Some(pin) if pin.element() == element => pin.spacer(),
            _ => element,
        }
    }

    fn apply_pin(&mut self) {
        let (Some(binding), Some(pin), Some(window)) = (self.binding.as_ref(), self.pin.as_mut(), self.window)
        else {
            return;
        };
        let layout = binding.layout.as_ref();
        let axis = binding.info.axis;
        let phase = PinPhase::from(self.snapshot.state);
        let viewport_start = match phase {
            PinPhase::Fixed => pin_viewport_start(layout, &binding.container, axis, pin.spacer(), window.start),
            _ => 0.0,
        };
        pin.apply(layout, axis, phase, viewport_start, window.duration);
    }

    fn release_pin(&mut self) {
        let Some(pin) = self.pin.take() else {
            return;
        };
        match self.binding.as_ref() {
            Some(binding) => pin.release(binding.layout.as_ref()),
            None => warn!(scene = %self.id, element = %pin.element(), "Pin dropped without a layout"),
        }
    }

    fn emit(&self, kind: EventKind, state: SceneState) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        let info = binding.info;
        self.listeners.dispatch(&SceneEvent {
            kind,
            scene: self.id,
            name: self.options.name().map(str::to_string),
            state,
            progress: self.snapshot.progress,
            scroll_pos: info.scroll_pos,
            scroll_direction: info.scroll_direction,
            controller: info,
        });
    }
}

/// Viewport position of the pinned element at the moment its window opens
fn pin_viewport_start(
    layout: &dyn Layout,
    container: &Container,
    axis: Axis,
    spacer: &ElementRef,
    window_start: f64,
) -> f64 {
    let anchor = GeometryProvider::element_offset(layout, spacer, container, axis).unwrap_or(window_start);
    let origin = match container {
        Container::Window => 0.0,
        Container::Element(el) => layout.content_box(el).map_or(0.0, |rect| rect.start(axis)),
    };
    origin + anchor - window_start
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("name", &self.options.name())
            .field("state", &self.snapshot.state)
            .field("progress", &self.snapshot.progress)
            .field("window", &self.window)
            .field("controller", &self.controller())
            .field("listeners", &self.listeners)
            .finish()
    }
}
