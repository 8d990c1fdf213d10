use crate::editor::Editor;
use crate::scene::{Color, FogType, NodeId};
use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    EditorCleared,
    SceneGraphChanged,
    ObjectChanged(NodeId),
    ObjectSelected(Option<NodeId>),
    ObjectFocused(NodeId),
    SceneBackgroundChanged { source: &'static str, color: Color },
    SceneFogChanged { source: &'static str, fog_type: FogType, color: Color, near: f32, far: f32, density: f32 },
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::EditorCleared => EventKind::EditorCleared,
            EditorEvent::SceneGraphChanged => EventKind::SceneGraphChanged,
            EditorEvent::ObjectChanged(_) => EventKind::ObjectChanged,
            EditorEvent::ObjectSelected(_) => EventKind::ObjectSelected,
            EditorEvent::ObjectFocused(_) => EventKind::ObjectFocused,
            EditorEvent::SceneBackgroundChanged { .. } => EventKind::SceneBackgroundChanged,
            EditorEvent::SceneFogChanged { .. } => EventKind::SceneFogChanged,
        }
    }
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorEvent::EditorCleared | EditorEvent::SceneGraphChanged => write!(f, "{}", self.kind()),
            EditorEvent::ObjectChanged(id) | EditorEvent::ObjectFocused(id) => {
                write!(f, "{} id={id}", self.kind())
            }
            EditorEvent::ObjectSelected(Some(id)) => write!(f, "objectSelected id={id}"),
            EditorEvent::ObjectSelected(None) => write!(f, "objectSelected id=none"),
            EditorEvent::SceneBackgroundChanged { source, color } => {
                write!(f, "sceneBackgroundChanged source={source} color={color}")
            }
            EditorEvent::SceneFogChanged { source, fog_type, color, near, far, density } => write!(
                f,
                "sceneFogChanged source={source} type={fog_type} color={color} near={near:.2} far={far:.2} density={density:.3}"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    EditorCleared,
    SceneGraphChanged,
    ObjectChanged,
    ObjectSelected,
    ObjectFocused,
    SceneBackgroundChanged,
    SceneFogChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::EditorCleared,
        EventKind::SceneGraphChanged,
        EventKind::ObjectChanged,
        EventKind::ObjectSelected,
        EventKind::ObjectFocused,
        EventKind::SceneBackgroundChanged,
        EventKind::SceneFogChanged,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::EditorCleared => "editorCleared",
            EventKind::SceneGraphChanged => "sceneGraphChanged",
            EventKind::ObjectChanged => "objectChanged",
            EventKind::ObjectSelected => "objectSelected",
            EventKind::ObjectFocused => "objectFocused",
            EventKind::SceneBackgroundChanged => "sceneBackgroundChanged",
            EventKind::SceneFogChanged => "sceneFogChanged",
        }
    }

    /// Splits a `name.Namespace` subscription key.
    pub fn parse_key(key: &str) -> Result<(EventKind, Option<&str>)> {
        let (name, namespace) = match key.split_once('.') {
            Some((name, namespace)) => (name, Some(namespace)),
            None => (key, None),
        };
        if namespace.is_some_and(str::is_empty) {
            return Err(anyhow!("Empty namespace in event key '{key}'"));
        }
        Ok((name.parse()?, namespace))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow!("Unknown event '{s}'"))
    }
}

pub type EventHandler = Box<dyn FnMut(&Editor, &EditorEvent)>;

struct Subscription {
    kind: EventKind,
    namespace: String,
    handler: EventHandler,
}

/// Synchronous publish/subscribe hub. Handlers run in registration order and
/// each runs to completion before the next.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    /// Registers `handler` under `(kind, namespace)`, replacing any handler
    /// already registered under the same key.
    pub fn on(
        &mut self,
        kind: EventKind,
        namespace: impl Into<String>,
        handler: impl FnMut(&Editor, &EditorEvent) + 'static,
    ) {
        let namespace = namespace.into();
        let handler: EventHandler = Box::new(handler);
        match self.subscriptions.iter_mut().find(|sub| sub.kind == kind && sub.namespace == namespace) {
            Some(existing) => existing.handler = handler,
            None => self.subscriptions.push(Subscription { kind, namespace, handler }),
        }
    }

    pub fn off(&mut self, kind: EventKind, namespace: &str) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| !(sub.kind == kind && sub.namespace == namespace));
        self.subscriptions.len() != before
    }

    /// Drops every subscription registered under `namespace`.
    pub fn off_namespace(&mut self, namespace: &str) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.namespace != namespace);
        before - self.subscriptions.len()
    }

    pub fn emit(&mut self, editor: &Editor, event: &EditorEvent) {
        let kind = event.kind();
        log::debug!("dispatch {event}");
        for sub in self.subscriptions.iter_mut().filter(|sub| sub.kind == kind) {
            (sub.handler)(editor, event);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|sub| sub.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
