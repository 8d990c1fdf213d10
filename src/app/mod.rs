use crate::config::Options;
use crate::editor::{DropPosition, Editor};
use crate::events::{EditorEvent, EventBus, EventKind};
use crate::scene::{NodeId, Object3D};
use anyhow::Result;

pub mod scene_panel;

pub use scene_panel::{PanelActions, ScenePanel};

/// Application hub shared by every panel: session options, editor state and
/// the event bus connecting them.
pub struct App {
    pub options: Options,
    pub editor: Editor,
    bus: EventBus,
}

impl App {
    pub fn new(options: Options) -> Self {
        Self::with_editor(options, Editor::new())
    }

    pub fn with_editor(options: Options, editor: Editor) -> Self {
        Self { options, editor, bus: EventBus::default() }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribes with a `name.Namespace` key, e.g. `objectSelected.ScenePanel`.
    pub fn on(&mut self, key: &str, handler: impl FnMut(&Editor, &EditorEvent) + 'static) -> Result<()> {
        let (kind, namespace) = EventKind::parse_key(key)?;
        self.bus.on(kind, namespace.unwrap_or_default(), handler);
        Ok(())
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        namespace: &str,
        handler: impl FnMut(&Editor, &EditorEvent) + 'static,
    ) {
        self.bus.on(kind, namespace, handler);
    }

    pub fn off(&mut self, kind: EventKind, namespace: &str) -> bool {
        self.bus.off(kind, namespace)
    }

    pub fn off_namespace(&mut self, namespace: &str) -> usize {
        self.bus.off_namespace(namespace)
    }

    /// Lets the editor apply the event, then delivers it to every subscriber.
    pub fn call(&mut self, event: EditorEvent) {
        self.editor.apply(&event);
        self.bus.emit(&self.editor, &event);
    }

    pub fn call_all(&mut self, events: impl IntoIterator<Item = EditorEvent>) {
        for event in events {
            self.call(event);
        }
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        let event = self.editor.select(id);
        self.call_all(event);
    }

    pub fn select_by_id(&mut self, id: NodeId) {
        let event = self.editor.select_by_id(id);
        self.call_all(event);
    }

    pub fn focus_by_id(&mut self, id: NodeId) {
        let event = self.editor.focus_by_id(id);
        self.call_all(event);
    }

    pub fn add_object(&mut self, parent: Option<NodeId>, object: Object3D) {
        let event = self.editor.add_object(parent, object);
        self.call_all(event);
    }

    pub fn remove_object(&mut self, id: NodeId) {
        let events = self.editor.remove_object(id);
        self.call_all(events);
    }

    pub fn move_object(&mut self, id: NodeId, target: NodeId, position: DropPosition) {
        let event = self.editor.move_object(id, target, position);
        if event.is_none() {
            log::debug!("rejected move of object {id} relative to {target}");
        }
        self.call_all(event);
    }

    pub fn set_object_name(&mut self, id: NodeId, name: impl Into<String>) {
        let event = self.editor.set_object_name(id, name);
        self.call_all(event);
    }

    pub fn add_script(&mut self, id: NodeId, source: impl Into<String>) {
        let event = self.editor.add_script(id, source);
        self.call_all(event);
    }

    pub fn clear(&mut self) {
        let events = self.editor.clear();
        self.call_all(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn editor_applies_before_subscribers_run() {
        let mut app = App::new(Options::default());
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        app.on("sceneBackgroundChanged.Viewport", move |editor, _| {
            *sink.borrow_mut() = editor.scene.background;
        })
        .expect("subscribe");

        app.call(EditorEvent::SceneBackgroundChanged { source: "test", color: crate::scene::Color(0x123456) });
        assert_eq!(*seen.borrow(), Some(crate::scene::Color(0x123456)));
    }

    #[test]
    fn unknown_event_key_is_rejected() {
        let mut app = App::new(Options::default());
        assert!(app.on("objectExploded.Panel", |_, _| {}).is_err());
        assert!(app.bus().is_empty());
    }

    #[test]
    fn repeated_selection_is_not_rebroadcast() {
        let mut app = App::new(Options::default());
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        app.subscribe(EventKind::ObjectSelected, "Counter", move |_, _| *counter.borrow_mut() += 1);
        let camera = app.editor.camera.id;
        app.select_by_id(camera);
        app.select_by_id(camera);
        assert_eq!(*count.borrow(), 1);
    }
}
