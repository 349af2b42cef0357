//! Scene lifecycle events and the listener registry
//!
//! Listeners are kept per event kind in registration order, each with an
//! optional namespace so a group of handlers can be removed at once.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::state::SceneState;
use super::SceneId;
use crate::controller::ControllerInfo;
use crate::geometry::ScrollDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A state was entered
    Enter,
    /// A state was left
    Leave,
    /// Progress changed
    Progress,
    /// Full snapshot after any change
    Update,
    /// Attached to a controller
    Add,
    /// Removed from its controller
    Remove,
    /// Trigger position or duration changed on refresh
    Shift,
    /// Owning controller was destroyed
    Destroy,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Enter,
        EventKind::Leave,
        EventKind::Progress,
        EventKind::Update,
        EventKind::Add,
        EventKind::Remove,
        EventKind::Shift,
        EventKind::Destroy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::Progress => "progress",
            Self::Update => "update",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Shift => "shift",
            Self::Destroy => "destroy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload handed to listeners
#[derive(Debug, Clone, Serialize)]
pub struct SceneEvent {
    pub kind: EventKind,
    pub scene: SceneId,
    pub name: Option<String>,
    /// State being left for `Leave`, current state otherwise
    pub state: SceneState,
    pub progress: f64,
    pub scroll_pos: f64,
    pub scroll_direction: ScrollDirection,
    pub controller: ControllerInfo,
}

pub type Callback = Rc<dyn Fn(&SceneEvent)>;

struct Listener {
    namespace: Option<String>,
    callback: Callback,
}

/// Event kind -> ordered (namespace, callback) pairs
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EventKind, namespace: Option<&str>, callback: Callback) {
        self.listeners.entry(kind).or_default().push(Listener {
            namespace: namespace.map(str::to_string),
            callback,
        });
    }

    /// Remove listeners of `kind`; all of them when `namespace` is `None`
    ///
    /// Returns how many were removed.
    pub fn remove(&mut self, kind: EventKind, namespace: Option<&str>) -> usize {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return 0;
        };
        let before = list.len();
        match namespace {
            Some(ns) => list.retain(|l| l.namespace.as_deref() != Some(ns)),
            None => list.clear(),
        }
        before - list.len()
    }

    /// Remove every listener registered under `namespace`
    pub fn remove_namespace(&mut self, namespace: &str) -> usize {
        self.listeners
            .values_mut()
            .map(|list| {
                let before = list.len();
                list.retain(|l| l.namespace.as_deref() != Some(namespace));
                before - list.len()
            })
            .sum()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(Vec::is_empty)
    }

    /// Call every listener for the event's kind in registration order
    ///
    /// Dispatch runs over a snapshot of the list taken before the first call.
    pub fn dispatch(&self, event: &SceneEvent) {
        let snapshot: Vec<Callback> = match self.listeners.get(&event.kind) {
            Some(list) => list.iter().map(|l| Rc::clone(&l.callback)).collect(),
            None => return,
        };
        for callback in snapshot {
            callback(event);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            let count = self.count(kind);
            if count > 0 {
                map.entry(&kind.as_str(), &count);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::controller::{BackendKind, ControllerId};
    use crate::geometry::Axis;

    fn event(kind: EventKind) -> SceneEvent {
        SceneEvent {
            kind,
            scene: SceneId::new(),
            name: None,
            state: SceneState::During,
            progress: 0.5,
            scroll_pos: 600.0,
            scroll_direction: ScrollDirection::Forward,
            controller: ControllerInfo {
                id: ControllerId::new(),
                axis: Axis::Vertical,
                backend: BackendKind::Native,
                size: 1000.0,
                scroll_pos: 600.0,
                scroll_direction: ScrollDirection::Forward,
            },
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> Callback {
        let log = Rc::clone(log);
        Rc::new(move |_: &SceneEvent| log.borrow_mut().push(label))
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.add(EventKind::Enter, None, recorder(&log, "first"));
        registry.add(EventKind::Enter, Some("fx"), recorder(&log, "second"));
        registry.add(EventKind::Leave, None, recorder(&log, "other"));
        registry.add(EventKind::Enter, None, recorder(&log, "third"));

        registry.dispatch(&event(EventKind::Enter));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_remove_by_namespace_keeps_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.add(EventKind::Progress, Some("a"), recorder(&log, "a1"));
        registry.add(EventKind::Progress, Some("b"), recorder(&log, "b1"));
        registry.add(EventKind::Progress, Some("a"), recorder(&log, "a2"));
        registry.add(EventKind::Progress, None, recorder(&log, "plain"));
        registry.add(EventKind::Update, Some("a"), recorder(&log, "a3"));

        assert_eq!(registry.remove(EventKind::Progress, Some("a")), 2);
        registry.dispatch(&event(EventKind::Progress));
        assert_eq!(*log.borrow(), vec!["b1", "plain"]);

        assert_eq!(registry.remove_namespace("a"), 1);
        assert_eq!(registry.count(EventKind::Update), 0);

        assert_eq!(registry.remove(EventKind::Progress, None), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_event_kind_names() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_name("scroll"), None);
    }

    #[test]
    fn test_event_serializes() {
        let json = serde_json::to_string(&event(EventKind::Enter)).unwrap();
        assert!(json.contains("\"kind\":\"enter\""));
        assert!(json.contains("\"state\":\"DURING\""));
        assert!(json.contains("\"scroll_direction\":\"FORWARD\""));
    }
}
