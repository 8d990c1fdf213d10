use crate::events::EditorEvent;
use crate::scene::{Color, Fog, FogType, NodeId, Object3D, Scene};
use glam::Vec3;
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 5.0, 10.0);

/// Where a moved object lands relative to the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    Inside,
    After,
}

/// Editor-side state the panels read from. Mutations return the event the
/// caller is expected to broadcast; they never broadcast on their own.
pub struct Editor {
    pub camera: Object3D,
    pub scene: Scene,
    /// Scripts attached to objects, keyed by object uuid.
    pub scripts: HashMap<Uuid, Vec<String>>,
    selected: Option<NodeId>,
    focused: Option<NodeId>,
    camera_target: Vec3,
    next_id: u32,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        let camera = Object3D::new(NodeId(1), "PerspectiveCamera", "Camera").with_position(DEFAULT_CAMERA_POSITION);
        Self {
            camera,
            scene: Scene::new(NodeId(2)),
            scripts: HashMap::new(),
            selected: None,
            focused: None,
            camera_target: Vec3::ZERO,
            next_id: 3,
        }
    }

    /// Adopts a loaded scene; the camera is re-numbered past the scene's ids.
    /// Ids saturate at `u32::MAX` instead of wrapping.
    pub fn with_scene(scene: Scene) -> Self {
        let mut editor = Self::new();
        let max_id = scene.root.max_id();
        if max_id.0 >= u32::MAX - 1 {
            log::warn!("scene uses node id {max_id}; new ids saturate at {}", u32::MAX);
        }
        let camera_id = max_id.0.saturating_add(1);
        editor.camera.id = NodeId(camera_id);
        editor.scene = scene;
        editor.next_id = camera_id.saturating_add(1);
        editor
    }

    pub fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn camera_target(&self) -> Vec3 {
        self.camera_target
    }

    pub fn object_by_id(&self, id: NodeId) -> Option<&Object3D> {
        if self.camera.id == id {
            return Some(&self.camera);
        }
        self.scene.object_by_id(id)
    }

    pub fn selected_object(&self) -> Option<&Object3D> {
        self.selected.and_then(|id| self.object_by_id(id))
    }

    pub fn has_script(&self, uuid: &Uuid) -> bool {
        self.scripts.get(uuid).is_some_and(|scripts| !scripts.is_empty())
    }

    pub fn select(&mut self, id: Option<NodeId>) -> Option<EditorEvent> {
        if self.selected == id {
            return None;
        }
        self.selected = id;
        Some(EditorEvent::ObjectSelected(id))
    }

    /// Unknown ids clear the selection.
    pub fn select_by_id(&mut self, id: NodeId) -> Option<EditorEvent> {
        let target = self.object_by_id(id).map(|object| object.id);
        self.select(target)
    }

    /// Points the camera at the node, keeping the current viewing offset.
    pub fn focus_by_id(&mut self, id: NodeId) -> Option<EditorEvent> {
        let is_camera = self.camera.id == id;
        let target =
            if is_camera { Some(self.camera_target) } else { self.scene.root.world_position(id) };
        let target = target?;
        if !is_camera {
            let offset = self.camera.position - self.camera_target;
            self.camera.position = target + offset;
        }
        self.camera_target = target;
        self.focused = Some(id);
        Some(EditorEvent::ObjectFocused(id))
    }

    /// Appends `object` under `parent` (the scene root when `None`).
    pub fn add_object(&mut self, parent: Option<NodeId>, object: Object3D) -> Option<EditorEvent> {
        let parent_id = parent.unwrap_or(self.scene.root.id);
        self.next_id = self.next_id.max(object.max_id().0.saturating_add(1));
        let parent = self.scene.root.find_mut(parent_id)?;
        parent.children.push(object);
        Some(EditorEvent::SceneGraphChanged)
    }

    pub fn remove_object(&mut self, id: NodeId) -> Vec<EditorEvent> {
        let Some(removed) = self.scene.root.take_descendant(id) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        if self.selected.is_some_and(|selected| removed.contains(selected)) {
            events.extend(self.select(None));
        }
        if self.focused.is_some_and(|focused| removed.contains(focused)) {
            self.focused = None;
        }
        events.push(EditorEvent::SceneGraphChanged);
        events
    }

    /// Reparents `id` relative to `target`. Moves into the object's own
    /// subtree, or of the root or camera, are ignored.
    pub fn move_object(&mut self, id: NodeId, target: NodeId, position: DropPosition) -> Option<EditorEvent> {
        let root_id = self.scene.root.id;
        if id == root_id || id == target || !self.scene.root.contains(target) {
            return None;
        }
        if self.scene.root.find(id)?.contains(target) {
            return None;
        }
        let object = self.scene.root.take_descendant(id)?;
        let position = if target == root_id { DropPosition::Inside } else { position };
        match position {
            DropPosition::Inside => {
                self.scene.root.find_mut(target)?.children.push(object);
            }
            DropPosition::Before | DropPosition::After => {
                let (parent_id, index) = self.scene.root.parent_of(target)?;
                let index = if position == DropPosition::After { index + 1 } else { index };
                self.scene.root.find_mut(parent_id)?.children.insert(index, object);
            }
        }
        Some(EditorEvent::SceneGraphChanged)
    }

    pub fn set_object_name(&mut self, id: NodeId, name: impl Into<String>) -> Option<EditorEvent> {
        let object = if self.camera.id == id { Some(&mut self.camera) } else { self.scene.root.find_mut(id) };
        object?.name = name.into();
        Some(EditorEvent::ObjectChanged(id))
    }

    pub fn add_script(&mut self, id: NodeId, source: impl Into<String>) -> Option<EditorEvent> {
        let uuid = self.object_by_id(id)?.uuid;
        self.scripts.entry(uuid).or_default().push(source.into());
        Some(EditorEvent::ObjectChanged(id))
    }

    pub fn remove_scripts(&mut self, id: NodeId) -> Option<EditorEvent> {
        let uuid = self.object_by_id(id)?.uuid;
        self.scripts.remove(&uuid)?;
        Some(EditorEvent::ObjectChanged(id))
    }

    /// Resets to an empty scene. Ids keep counting up. A live selection is
    /// dropped first, so the returned events start with `ObjectSelected(None)`.
    pub fn clear(&mut self) -> Vec<EditorEvent> {
        let mut events: Vec<EditorEvent> = self.select(None).into_iter().collect();
        let scene_id = self.allocate_id();
        self.scene = Scene::new(scene_id);
        self.scripts.clear();
        self.focused = None;
        self.camera.position = DEFAULT_CAMERA_POSITION;
        self.camera_target = Vec3::ZERO;
        events.push(EditorEvent::EditorCleared);
        events
    }

    pub fn apply_background(&mut self, color: Color) {
        self.scene.background = Some(color);
    }

    pub fn apply_fog(&mut self, fog_type: FogType, color: Color, near: f32, far: f32, density: f32) {
        self.scene.fog = match fog_type {
            FogType::None => None,
            FogType::Fog => Some(Fog::Linear { color, near, far }),
            FogType::FogExp2 => Some(Fog::Exponential { color, density }),
        };
    }

    /// The editor's own reaction to broadcast events, run before any
    /// subscriber sees them.
    pub fn apply(&mut self, event: &EditorEvent) {
        match *event {
            EditorEvent::SceneBackgroundChanged { color, .. } => self.apply_background(color),
            EditorEvent::SceneFogChanged { fog_type, color, near, far, density, .. } => {
                self.apply_fog(fog_type, color, near, far, density)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> (Editor, NodeId, NodeId, NodeId) {
        let mut editor = Editor::new();
        let group = editor.allocate_id();
        let child = editor.allocate_id();
        let light = editor.allocate_id();
        editor.add_object(None, Object3D::new(group, "Group", "Group").with_position(Vec3::new(2.0, 0.0, 0.0)));
        editor.add_object(Some(group), Object3D::new(child, "Object3D", "Child"));
        editor.add_object(None, Object3D::new(light, "PointLight", "Light"));
        (editor, group, child, light)
    }

    #[test]
    fn select_by_id_emits_once_and_clears_on_unknown() {
        let (mut editor, group, _, _) = populated();
        assert_eq!(editor.select_by_id(group), Some(EditorEvent::ObjectSelected(Some(group))));
        assert_eq!(editor.select_by_id(group), None, "reselecting is a no-op");
        assert_eq!(editor.select_by_id(NodeId(999)), Some(EditorEvent::ObjectSelected(None)));
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn camera_is_selectable() {
        let mut editor = Editor::new();
        let camera = editor.camera.id;
        editor.select_by_id(camera);
        assert_eq!(editor.selected_object().map(|o| o.kind.as_str()), Some("PerspectiveCamera"));
    }

    #[test]
    fn focus_moves_camera_with_target() {
        let (mut editor, _, child, _) = populated();
        let event = editor.focus_by_id(child);
        assert_eq!(event, Some(EditorEvent::ObjectFocused(child)));
        assert_eq!(editor.camera_target(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(editor.camera.position, Vec3::new(2.0, 5.0, 10.0));
        assert_eq!(editor.focus_by_id(NodeId(999)), None);
    }

    #[test]
    fn move_rejects_cycles() {
        let (mut editor, group, child, _) = populated();
        assert_eq!(editor.move_object(group, child, DropPosition::Inside), None);
        assert_eq!(editor.scene.root.parent_of(child), Some((group, 0)));
    }

    #[test]
    fn move_before_and_inside() {
        let (mut editor, group, child, light) = populated();
        let root = editor.scene.root.id;
        editor.move_object(light, group, DropPosition::Before).expect("move before");
        let order: Vec<_> = editor.scene.children().iter().map(|o| o.id).collect();
        assert_eq!(order, vec![light, group]);

        editor.move_object(child, light, DropPosition::Inside).expect("move inside");
        assert_eq!(editor.scene.root.parent_of(child), Some((light, 0)));

        editor.move_object(light, group, DropPosition::After).expect("move after");
        assert_eq!(editor.scene.root.parent_of(light), Some((root, 1)));
    }

    #[test]
    fn removing_selected_subtree_clears_selection() {
        let (mut editor, group, child, _) = populated();
        editor.select_by_id(child);
        let events = editor.remove_object(group);
        assert_eq!(events, vec![EditorEvent::ObjectSelected(None), EditorEvent::SceneGraphChanged]);
        assert!(editor.object_by_id(child).is_none());
    }

    #[test]
    fn scripts_are_keyed_by_uuid() {
        let (mut editor, group, _, _) = populated();
        assert_eq!(editor.add_script(group, "update() {}"), Some(EditorEvent::ObjectChanged(group)));
        let uuid = editor.object_by_id(group).expect("group").uuid;
        assert!(editor.has_script(&uuid));
        editor.remove_scripts(group);
        assert!(!editor.has_script(&uuid));
    }

    #[test]
    fn fog_application_follows_type() {
        let mut editor = Editor::new();
        editor.apply_fog(FogType::Fog, Color(0x101010), 1.0, 20.0, 0.02);
        assert_eq!(editor.scene.fog, Some(Fog::Linear { color: Color(0x101010), near: 1.0, far: 20.0 }));
        editor.apply_fog(FogType::FogExp2, Color(0x202020), 1.0, 20.0, 0.02);
        assert_eq!(editor.scene.fog, Some(Fog::Exponential { color: Color(0x202020), density: 0.02 }));
        editor.apply_fog(FogType::None, Color(0x202020), 1.0, 20.0, 0.02);
        assert_eq!(editor.scene.fog, None);
    }

    #[test]
    fn loaded_scene_ids_do_not_collide_with_camera() {
        let scene = Scene::new(NodeId(1));
        let mut editor = Editor::with_scene(scene);
        assert_eq!(editor.camera.id, NodeId(2));
        assert_eq!(editor.allocate_id(), NodeId(3));
    }

    #[test]
    fn clear_drops_selection_before_clearing() {
        let (mut editor, group, _, _) = populated();
        editor.select_by_id(group);
        assert_eq!(editor.clear(), vec![EditorEvent::ObjectSelected(None), EditorEvent::EditorCleared]);
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.clear(), vec![EditorEvent::EditorCleared]);
    }

    #[test]
    fn ids_saturate_at_the_top_of_the_range() {
        let mut scene = Scene::new(NodeId(1));
        scene.root.children.push(Object3D::new(NodeId(u32::MAX), "Mesh", "Last"));
        let mut editor = Editor::with_scene(scene);
        assert_eq!(editor.camera.id, NodeId(u32::MAX));
        assert_eq!(editor.allocate_id(), NodeId(u32::MAX));
        assert_eq!(editor.allocate_id(), NodeId(u32::MAX));
        let late = Object3D::new(NodeId(u32::MAX), "Group", "Late");
        assert_eq!(editor.add_object(None, late), Some(EditorEvent::SceneGraphChanged));
    }
}
