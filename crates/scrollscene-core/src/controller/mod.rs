//! Scroll controller
//!
//! One controller per scroll container. It samples the container, keeps
//! the ordered scene set evaluated against the current position, and owns
//! the scroll backend (native or smoothed).

mod backend;

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, SmoothConfig};
use crate::geometry::{Axis, Container, Geometry, GeometryProvider, ScrollDirection};
use crate::layout::{ElementRef, Layout};
use crate::scene::{EventKind, Scene, SceneId, SceneOptions};
use crate::smooth::InertialScrollerFactory;
use crate::{Error, Result};

pub(crate) use backend::Backend;
pub use backend::{BackendKind, SmoothScroller, SmoothScrollerFactory};

/// Identity of one controller instance
///
/// A backend swap produces a new instance id; scenes re-attached after the
/// swap carry the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(Uuid);

impl ControllerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Controller snapshot handed to scenes and carried by every event
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerInfo {
    pub id: ControllerId,
    pub axis: Axis,
    pub backend: BackendKind,
    /// Container size along the axis, 0 while unknown
    pub size: f64,
    pub scroll_pos: f64,
    pub scroll_direction: ScrollDirection,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub container: Container,
    pub axis: Axis,
    /// Geometry poll cadence in native mode, zero disables polling
    pub refresh_interval: Duration,
    pub smooth_scrolling: bool,
    /// Damping handed to the smoothed backend factory
    pub damping: f64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            container: Container::Window,
            axis: Axis::Vertical,
            refresh_interval: Duration::from_millis(100),
            smooth_scrolling: false,
            damping: SmoothConfig::default().damping,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        let container = match config.controller.container.as_deref() {
            Some(id) => Container::Element(ElementRef::from(id)),
            None => Container::Window,
        };
        Self {
            container,
            axis: config.controller.axis,
            refresh_interval: Duration::from_millis(config.controller.refresh_interval_ms),
            smooth_scrolling: config.controller.smooth_scrolling,
            damping: config.smooth.damping,
        }
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_smooth_scrolling(mut self, enabled: bool) -> Self {
        self.smooth_scrolling = enabled;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

/// Input a controller reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    /// The container scrolled
    Scroll,
    /// The container or window changed size
    Resize,
    /// Animation frame
    Frame(Instant),
}

pub struct Controller {
    id: ControllerId,
    options: ControllerOptions,
    layout: Rc<dyn Layout>,
    factory: Box<dyn SmoothScrollerFactory>,
    backend: Backend,
    scenes: Vec<Scene>,
    /// Last valid sample; the position is the backend's, not necessarily raw
    geometry: Option<Geometry>,
    refresh_interval: Duration,
    pending_update: bool,
    last_poll: Option<Instant>,
    destroyed: bool,
}

impl Controller {
    /// Create a controller using the default inertial backend for smoothing
    pub fn new(layout: Rc<dyn Layout>, options: ControllerOptions) -> Result<Self> {
        Self::with_factory(layout, options, Box::new(InertialScrollerFactory::default()))
    }

    pub fn with_factory(
        layout: Rc<dyn Layout>,
        options: ControllerOptions,
        factory: Box<dyn SmoothScrollerFactory>,
    ) -> Result<Self> {
        if let Some(owner) = layout.container_owner(&options.container) {
            return Err(Error::ContainerInUse(format!(
                "{} (controller {})",
                options.container, owner
            )));
        }

        let id = ControllerId::new();
        layout.set_container_owner(&options.container, Some(id));
        let geometry = GeometryProvider::sample(layout.as_ref(), &options.container, options.axis, None);

        let mut controller = Self {
            id,
            refresh_interval: options.refresh_interval,
            options,
            layout,
            factory,
            backend: Backend::Native,
            scenes: Vec::new(),
            geometry,
            pending_update: false,
            last_poll: None,
            destroyed: false,
        };

        info!(
            container = %controller.options.container,
            axis = controller.options.axis.as_str(),
            "Controller created"
        );

        if controller.options.smooth_scrolling {
            if let Err(e) = controller.set_smooth_scrolling(true) {
                warn!("Smoothed scrolling unavailable, staying native: {}", e);
            }
        }

        Ok(controller)
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn container(&self) -> &Container {
        &self.options.container
    }

    pub fn info(&self) -> ControllerInfo {
        let (size, scroll_pos, scroll_direction) = match self.geometry {
            Some(g) => (g.size, g.scroll_pos, g.scroll_direction),
            None => (0.0, 0.0, ScrollDirection::Paused),
        };
        ControllerInfo {
            id: self.id,
            axis: self.options.axis,
            backend: self.backend.kind(),
            size,
            scroll_pos,
            scroll_direction,
        }
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn is_smooth_scrolling(&self) -> bool {
        self.backend.kind() == BackendKind::Smoothed
    }

    /// Active poll cadence; zero while smoothed or when disabled
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Attach a scene and evaluate it against the current position
    pub fn add_scene(&mut self, mut scene: Scene) -> Result<SceneId> {
        if self.destroyed {
            return Err(Error::ControllerDestroyed);
        }
        if scene.is_attached() {
            debug!(scene = %scene.id(), "Scene carries a stale binding, detaching first");
            scene.detach(EventKind::Remove);
        }

        let id = scene.id();
        scene.attach(self.info(), self.options.container.clone(), Rc::clone(&self.layout), true);
        debug!(
            scene = %id,
            name = scene.name().unwrap_or("-"),
            state = %scene.state(),
            "Scene added"
        );
        self.scenes.push(scene);
        Ok(id)
    }

    /// Detach a scene and hand it back with its listeners and state
    pub fn remove_scene(&mut self, id: SceneId) -> Option<Scene> {
        let index = self.scenes.iter().position(|s| s.id() == id)?;
        let mut scene = self.scenes.remove(index);
        scene.detach(EventKind::Remove);
        Some(scene)
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id() == id)
    }

    /// Scenes in registration order
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Re-measure the container, then recompute every scene
    pub fn refresh_all(&mut self) {
        if self.destroyed || self.resample().is_none() {
            return;
        }
        self.refresh_scenes();
    }

    /// Re-read the position and evaluate scenes against cached windows
    ///
    /// When the container just got its geometry back, windows are resolved
    /// again first, since scenes added or refreshed meanwhile have none.
    pub fn update(&mut self) {
        if self.destroyed {
            return;
        }
        let recovering = self.geometry.is_none();
        if self.resample().is_none() {
            return;
        }
        if recovering {
            debug!(container = %self.options.container, "Container geometry restored");
            self.refresh_scenes();
        } else {
            self.update_scenes();
        }
    }

    pub fn handle_event(&mut self, event: ControllerEvent) {
        if self.destroyed {
            return;
        }
        match event {
            ControllerEvent::Scroll => match &mut self.backend {
                Backend::Native => self.pending_update = true,
                Backend::Smoothed(scroller) => {
                    let raw = GeometryProvider::scroll_offset(
                        self.layout.as_ref(),
                        &self.options.container,
                        self.options.axis,
                    );
                    if let Some(raw) = raw {
                        scroller.sync(raw);
                    }
                }
            },
            ControllerEvent::Resize => self.refresh_all(),
            ControllerEvent::Frame(now) => {
                if std::mem::take(&mut self.pending_update) {
                    self.update();
                }
                self.advance_smoothed(now);
                self.poll(now);
            }
        }
    }

    /// Switch between native and smoothed scrolling
    ///
    /// Scenes keep their trigger windows and state across the swap and are
    /// re-attached under a new controller instance id. When the smoothed
    /// backend cannot be built the controller stays native and the error is
    /// returned.
    pub fn set_smooth_scrolling(&mut self, enabled: bool) -> Result<()> {
        if self.destroyed {
            return Err(Error::ControllerDestroyed);
        }
        let target = if enabled { BackendKind::Smoothed } else { BackendKind::Native };
        if self.backend.kind() == target {
            return Ok(());
        }
        self.transition(target)
    }

    /// Programmatic scroll through the active backend
    pub fn scroll_to(&mut self, position: f64) -> Result<()> {
        if self.destroyed {
            return Err(Error::ControllerDestroyed);
        }
        let position = position.max(0.0);
        GeometryProvider::scroll_to(self.layout.as_ref(), &self.options.container, self.options.axis, position);
        match &mut self.backend {
            Backend::Native => self.update(),
            Backend::Smoothed(scroller) => scroller.scroll_to(position, Instant::now()),
        }
        debug!(position, backend = self.backend.kind().as_str(), "Scroll to");
        Ok(())
    }

    /// Scroll to the start of a scene's window
    pub fn scroll_to_scene(&mut self, id: SceneId) -> Result<()> {
        let scene = self.scene(id).ok_or_else(|| Error::SceneNotFound(id.to_string()))?;
        let position = scene
            .trigger_position()
            .ok_or_else(|| Error::Other(format!("scene {} has no trigger position", id)))?;
        self.scroll_to(position)
    }

    /// Replace a scene's options, keeping its listeners and state
    pub fn reconfigure_scene(&mut self, id: SceneId, options: SceneOptions) -> Result<()> {
        let scene = self.scene_mut(id).ok_or_else(|| Error::SceneNotFound(id.to_string()))?;
        scene.reconfigure(options);
        Ok(())
    }

    /// Tear down and hand back every scene
    ///
    /// Scenes receive `Destroy`, pins are released, the backend is disposed
    /// and the container becomes free for a new controller. Later calls and
    /// events are ignored.
    pub fn destroy(&mut self) -> Vec<Scene> {
        if self.destroyed {
            return Vec::new();
        }
        self.destroyed = true;

        let mut scenes = std::mem::take(&mut self.scenes);
        for scene in &mut scenes {
            scene.detach(EventKind::Destroy);
        }
        std::mem::replace(&mut self.backend, Backend::Native).dispose();
        if self.layout.container_owner(&self.options.container) == Some(self.id) {
            self.layout.set_container_owner(&self.options.container, None);
        }

        info!(container = %self.options.container, scenes = scenes.len(), "Controller destroyed");
        scenes
    }

    /// Swap backends: detach all, dispose old, construct new, re-attach
    fn transition(&mut self, target: BackendKind) -> Result<()> {
        let from = self.backend.kind();
        for scene in &mut self.scenes {
            scene.unbind();
        }
        std::mem::replace(&mut self.backend, Backend::Native).dispose();

        let start = self
            .geometry
            .map(|g| g.scroll_pos)
            .or_else(|| {
                GeometryProvider::scroll_offset(self.layout.as_ref(), &self.options.container, self.options.axis)
            })
            .unwrap_or(0.0);

        let built = match target {
            BackendKind::Native => Ok(Backend::Native),
            BackendKind::Smoothed => self
                .factory
                .create(&self.options.container, self.options.axis, self.options.damping, start)
                .map(Backend::Smoothed),
        };

        let outcome = match built {
            Ok(backend) => {
                self.backend = backend;
                self.refresh_interval = match target {
                    BackendKind::Smoothed => Duration::ZERO,
                    BackendKind::Native => self.options.refresh_interval,
                };
                self.id = ControllerId::new();
                self.layout.set_container_owner(&self.options.container, Some(self.id));
                info!(from = from.as_str(), to = target.as_str(), "Scroll backend swapped");
                Ok(())
            }
            Err(e) => {
                warn!(backend = target.as_str(), "Backend swap failed, rolling back: {}", e);
                Err(match e {
                    e @ Error::Backend(_) => e,
                    other => Error::Backend(other.to_string()),
                })
            }
        };

        self.pending_update = false;
        self.last_poll = None;
        self.resample();
        let info = self.info();
        for scene in &mut self.scenes {
            scene.attach(info, self.options.container.clone(), Rc::clone(&self.layout), false);
        }
        outcome
    }

    /// Sample the container, routing the raw position through the backend
    fn resample(&mut self) -> Option<Geometry> {
        let previous = self.geometry.map(|g| g.scroll_pos);
        let Some(mut sample) = GeometryProvider::sample(
            self.layout.as_ref(),
            &self.options.container,
            self.options.axis,
            previous,
        ) else {
            if self.geometry.take().is_some() {
                debug!(container = %self.options.container, "Container lost its geometry, scenes paused");
            }
            return None;
        };

        if let Backend::Smoothed(scroller) = &mut self.backend {
            scroller.sync(sample.scroll_pos);
            sample.scroll_pos = scroller.position();
            sample.scroll_direction = ScrollDirection::between(previous, sample.scroll_pos);
        }
        self.geometry = Some(sample);
        Some(sample)
    }

    fn advance_smoothed(&mut self, now: Instant) {
        if self.backend.kind() != BackendKind::Smoothed {
            return;
        }
        // No poll runs while smoothed, so frames look for lost geometry
        if self.geometry.is_none() {
            self.update();
        }
        let Backend::Smoothed(scroller) = &mut self.backend else {
            return;
        };
        let Some(position) = scroller.tick(now) else {
            return;
        };
        let Some(geometry) = self.geometry else {
            return;
        };
        self.geometry = Some(geometry.moved_to(position));
        self.update_scenes();
    }

    /// Refresh on the configured cadence to catch layout changes
    fn poll(&mut self, now: Instant) {
        if self.refresh_interval.is_zero() {
            return;
        }
        let due = self
            .last_poll
            .map_or(true, |last| now.saturating_duration_since(last) >= self.refresh_interval);
        if due {
            self.last_poll = Some(now);
            self.refresh_all();
        }
    }

    fn refresh_scenes(&mut self) {
        let info = self.info();
        for scene in &mut self.scenes {
            scene.refresh_with(info);
        }
    }

    fn update_scenes(&mut self) {
        let info = self.info();
        for scene in &mut self.scenes {
            scene.update_with(info);
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("container", &self.options.container)
            .field("backend", &self.backend)
            .field("scenes", &self.scenes.len())
            .field("geometry", &self.geometry)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::layout::{MemoryLayout, Rect};
    use crate::pin::PinOptions;
    use crate::scene::SceneState;

    struct FailingFactory;

    impl SmoothScrollerFactory for FailingFactory {
        fn create(&self, _: &Container, _: Axis, _: f64, _: f64) -> Result<Box<dyn SmoothScroller>> {
            Err(Error::Backend("no frame source".into()))
        }
    }

    fn page() -> Rc<MemoryLayout> {
        let layout = MemoryLayout::new(800.0, 1000.0);
        layout.add_styled_element("hero", Rect::new(0.0, 500.0, 800.0, 300.0), "color:red;  margin:0");
        layout.add_element("panel", Rect::new(0.0, 0.0, 400.0, 500.0));
        Rc::new(layout)
    }

    fn hero_scene() -> Scene {
        Scene::new(
            SceneOptions::builder()
                .name("hero")
                .trigger_element("hero")
                .trigger_hook(0.0)
                .duration_px(200.0)
                .build(),
        )
    }

    fn scroll(controller: &mut Controller, layout: &MemoryLayout, pos: f64) {
        layout.set_page_offset(Axis::Vertical, pos);
        controller.handle_event(ControllerEvent::Scroll);
        controller.handle_event(ControllerEvent::Frame(Instant::now()));
    }

    fn event_log(scene: &mut Scene) -> Rc<RefCell<Vec<EventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in EventKind::ALL {
            let log = Rc::clone(&log);
            scene.on(kind, move |e| log.borrow_mut().push(e.kind));
        }
        log
    }

    #[test]
    fn test_scroll_drives_scenes() {
        let layout = page();
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();

        scroll(&mut controller, &layout, 500.0);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::During);

        scroll(&mut controller, &layout, 600.0);
        let scene = controller.scene(id).unwrap();
        assert!((scene.progress() - 0.5).abs() < 1e-9);
        assert_eq!(controller.info().scroll_direction, ScrollDirection::Forward);

        scroll(&mut controller, &layout, 700.0);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::After);
    }

    #[test]
    fn test_scroll_waits_for_frame() {
        let layout = page();
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();

        layout.set_page_offset(Axis::Vertical, 600.0);
        controller.handle_event(ControllerEvent::Scroll);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::Before);

        controller.handle_event(ControllerEvent::Frame(Instant::now()));
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::During);
    }

    #[test]
    fn test_refresh_all_twice_is_silent() {
        let layout = page();
        layout.set_page_offset(Axis::Vertical, 600.0);
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let mut scene = hero_scene();
        let log = event_log(&mut scene);
        controller.add_scene(scene).unwrap();

        controller.refresh_all();
        let count = log.borrow().len();
        controller.refresh_all();
        controller.refresh_all();
        assert_eq!(log.borrow().len(), count);
    }

    #[test]
    fn test_swap_round_trip_keeps_scenes() {
        let layout = page();
        layout.set_page_offset(Axis::Vertical, 600.0);
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();
        let first = controller.id();
        let before = controller.scene(id).unwrap().window();

        controller.set_smooth_scrolling(true).unwrap();
        assert!(controller.is_smooth_scrolling());
        assert_eq!(controller.refresh_interval(), Duration::ZERO);
        assert_ne!(controller.id(), first);
        let scene = controller.scene(id).unwrap();
        assert_eq!(scene.controller(), Some(controller.id()));
        assert_eq!(scene.window(), before);
        assert_eq!(scene.state(), SceneState::During);

        controller.set_smooth_scrolling(false).unwrap();
        assert_eq!(controller.backend(), BackendKind::Native);
        assert_eq!(controller.refresh_interval(), Duration::from_millis(100));
        let scene = controller.scene(id).unwrap();
        assert_eq!(scene.window(), before);
        assert!((scene.progress() - 0.5).abs() < 1e-9);
        assert_eq!(layout.container_owner(&Container::Window), Some(controller.id()));
    }

    #[test]
    fn test_swap_failure_rolls_back() {
        let layout = page();
        layout.set_page_offset(Axis::Vertical, 600.0);
        let mut controller =
            Controller::with_factory(layout.clone(), ControllerOptions::default(), Box::new(FailingFactory)).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();
        let original = controller.id();

        let result = controller.set_smooth_scrolling(true);
        assert!(matches!(result, Err(Error::Backend(_))));
        assert!(!controller.is_smooth_scrolling());
        assert_eq!(controller.id(), original);
        assert_eq!(controller.refresh_interval(), Duration::from_millis(100));

        let scene = controller.scene(id).unwrap();
        assert_eq!(scene.controller(), Some(original));
        scroll(&mut controller, &layout, 700.0);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::After);
    }

    #[test]
    fn test_invalid_damping_falls_back_to_native() {
        let layout = page();
        let options = ControllerOptions::default().with_smooth_scrolling(true).with_damping(0.0);
        let controller = Controller::new(layout, options).unwrap();
        assert_eq!(controller.backend(), BackendKind::Native);
    }

    #[test]
    fn test_smoothed_position_follows_input() {
        let layout = page();
        let options = ControllerOptions::default().with_smooth_scrolling(true);
        let mut controller = Controller::new(layout.clone(), options).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();

        layout.set_page_offset(Axis::Vertical, 800.0);
        controller.handle_event(ControllerEvent::Scroll);

        let start = Instant::now();
        controller.handle_event(ControllerEvent::Frame(start));
        assert!(controller.info().scroll_pos < 800.0);
        assert_eq!(controller.info().backend, BackendKind::Smoothed);

        for frame in 1..200 {
            controller.handle_event(ControllerEvent::Frame(start + Duration::from_millis(16 * frame)));
        }
        assert_eq!(controller.info().scroll_pos, 800.0);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::After);
    }

    #[test]
    fn test_container_claimed_once() {
        let layout = page();
        let mut first = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let second = Controller::new(layout.clone(), ControllerOptions::default());
        assert!(matches!(second, Err(Error::ContainerInUse(_))));

        let panel = ControllerOptions::default().with_container(Container::Element("panel".into()));
        assert!(Controller::new(layout.clone(), panel).is_ok());

        first.destroy();
        assert!(Controller::new(layout, ControllerOptions::default()).is_ok());
    }

    #[test]
    fn test_destroy_is_repeatable() {
        let layout = page();
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let mut scene = hero_scene();
        let log = event_log(&mut scene);
        controller.add_scene(scene).unwrap();

        let scenes = controller.destroy();
        assert_eq!(scenes.len(), 1);
        assert!(!scenes[0].is_attached());
        assert_eq!(log.borrow().last(), Some(&EventKind::Destroy));

        assert!(controller.destroy().is_empty());
        controller.handle_event(ControllerEvent::Resize);
        assert!(matches!(controller.add_scene(hero_scene()), Err(Error::ControllerDestroyed)));
        assert!(layout.container_owner(&Container::Window).is_none());
    }

    #[test]
    fn test_destroy_restores_pins() {
        let layout = page();
        let hero = ElementRef::from("hero");
        let original = layout.inline_style(&hero).unwrap();
        layout.set_page_offset(Axis::Vertical, 600.0);

        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let scene = Scene::new(
            SceneOptions::builder()
                .trigger_element("hero")
                .trigger_hook(0.0)
                .duration_px(200.0)
                .pin(PinOptions::new("hero"))
                .build(),
        );
        controller.add_scene(scene).unwrap();
        assert_ne!(layout.inline_style(&hero).unwrap(), original);

        controller.destroy();
        assert_eq!(layout.inline_style(&hero).unwrap(), original);
        assert_eq!(layout.spacer_count(), 0);
    }

    #[test]
    fn test_move_scene_between_controllers() {
        let layout = page();
        layout.add_element("item", Rect::new(0.0, 300.0, 400.0, 50.0));
        layout.set_page_offset(Axis::Vertical, 750.0);

        let mut window = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let panel_options = ControllerOptions::default().with_container(Container::Element("panel".into()));
        let mut panel = Controller::new(layout.clone(), panel_options).unwrap();

        let id = window.add_scene(hero_scene()).unwrap();
        assert_eq!(window.scene(id).unwrap().state(), SceneState::After);

        let mut scene = window.remove_scene(id).unwrap();
        assert!(window.scenes().is_empty());
        let log = event_log(&mut scene);

        let options = scene.options().to_builder().trigger_element("item").build();
        scene.reconfigure(options);
        panel.add_scene(scene).unwrap();

        let scene = panel.scene(id).unwrap();
        assert_eq!(scene.controller(), Some(panel.id()));
        assert_eq!(scene.trigger_position(), Some(300.0));
        assert_eq!(scene.state(), SceneState::Before);
        assert_eq!(*log.borrow(), vec![EventKind::Add]);
    }

    #[test]
    fn test_geometry_loss_pauses_scenes() {
        let layout = page();
        layout.add_element("item", Rect::new(0.0, 300.0, 400.0, 50.0));
        let panel = Container::Element("panel".into());
        let mut controller =
            Controller::new(layout.clone(), ControllerOptions::default().with_container(panel.clone())).unwrap();
        let mut scene = Scene::new(
            SceneOptions::builder()
                .trigger_element("item")
                .trigger_hook(0.0)
                .duration_px(100.0)
                .build(),
        );
        let log = event_log(&mut scene);
        let id = controller.add_scene(scene).unwrap();
        log.borrow_mut().clear();

        layout.detach_element("panel");
        layout.set_element_scroll_offset(&ElementRef::from("panel"), Axis::Vertical, 350.0);
        controller.handle_event(ControllerEvent::Scroll);
        controller.handle_event(ControllerEvent::Frame(Instant::now()));
        controller.refresh_all();
        assert!(log.borrow().is_empty());
        assert!(controller.geometry().is_none());

        layout.reattach_element("panel");
        controller.handle_event(ControllerEvent::Resize);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::During);
        assert!(!log.borrow().is_empty());
    }

    fn item_scene() -> Scene {
        Scene::new(
            SceneOptions::builder()
                .trigger_element("item")
                .trigger_hook(0.0)
                .duration_px(100.0)
                .build(),
        )
    }

    #[test]
    fn test_smoothed_resumes_after_geometry_loss() {
        let layout = page();
        layout.add_element("item", Rect::new(0.0, 300.0, 400.0, 50.0));
        let options = ControllerOptions::default()
            .with_container(Container::Element("panel".into()))
            .with_smooth_scrolling(true);
        let mut controller = Controller::new(layout.clone(), options).unwrap();
        assert!(controller.is_smooth_scrolling());
        let id = controller.add_scene(item_scene()).unwrap();

        layout.detach_element("panel");
        controller.refresh_all();
        assert!(controller.geometry().is_none());

        layout.reattach_element("panel");
        layout.set_element_scroll_offset(&ElementRef::from("panel"), Axis::Vertical, 350.0);
        controller.handle_event(ControllerEvent::Scroll);
        let start = Instant::now();
        for frame in 0..300 {
            controller.handle_event(ControllerEvent::Frame(start + Duration::from_millis(16 * frame)));
        }

        assert!(controller.geometry().is_some());
        assert_eq!(controller.info().scroll_pos, 350.0);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::During);
    }

    #[test]
    fn test_scene_added_without_geometry_resolves_on_recovery() {
        let layout = page();
        layout.add_element("item", Rect::new(0.0, 300.0, 400.0, 50.0));
        let options = ControllerOptions::default()
            .with_container(Container::Element("panel".into()))
            .with_refresh_interval(Duration::ZERO);
        let mut controller = Controller::new(layout.clone(), options).unwrap();

        layout.detach_element("panel");
        controller.refresh_all();
        let id = controller.add_scene(item_scene()).unwrap();
        assert!(controller.scene(id).unwrap().window().is_none());

        layout.reattach_element("panel");
        layout.set_element_scroll_offset(&ElementRef::from("panel"), Axis::Vertical, 350.0);
        controller.handle_event(ControllerEvent::Scroll);
        controller.handle_event(ControllerEvent::Frame(Instant::now()));

        let scene = controller.scene(id).unwrap();
        assert_eq!(scene.trigger_position(), Some(300.0));
        assert_eq!(scene.state(), SceneState::During);
    }

    #[test]
    fn test_scroll_to_scene() {
        let layout = page();
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();

        controller.scroll_to_scene(id).unwrap();
        assert_eq!(layout.page_offset(Axis::Vertical), 500.0);
        assert_eq!(controller.scene(id).unwrap().state(), SceneState::During);
    }

    #[test]
    fn test_reconfigure_unknown_scene() {
        let layout = page();
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();
        controller.remove_scene(id);

        let result = controller.reconfigure_scene(id, SceneOptions::default());
        assert!(matches!(result, Err(Error::SceneNotFound(_))));
    }

    #[test]
    fn test_poll_refreshes_on_interval() {
        let layout = page();
        let mut controller = Controller::new(layout.clone(), ControllerOptions::default()).unwrap();
        let id = controller.add_scene(hero_scene()).unwrap();

        let start = Instant::now();
        controller.handle_event(ControllerEvent::Frame(start));
        layout.set_element_rect("hero", Rect::new(0.0, 900.0, 800.0, 300.0));

        controller.handle_event(ControllerEvent::Frame(start + Duration::from_millis(50)));
        assert_eq!(controller.scene(id).unwrap().trigger_position(), Some(500.0));

        controller.handle_event(ControllerEvent::Frame(start + Duration::from_millis(120)));
        assert_eq!(controller.scene(id).unwrap().trigger_position(), Some(900.0));
    }
}
