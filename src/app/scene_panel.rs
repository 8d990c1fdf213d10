//! Scene panel: an outliner mirroring the scene graph plus background and fog
//! properties.
//!
//! The panel keeps its state behind shared handles so the event subscriptions
//! it registers on the [`App`] can update it while the panel itself is driven
//! by user input.

use super::App;
use crate::editor::{DropPosition, Editor};
use crate::events::{EditorEvent, EventKind};
use crate::scene::{Color, FogType, NodeId, Object3D};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

mod fog_form;
mod outliner;
#[cfg(feature = "editor")]
mod view;

pub use fog_form::{visible_fields, FogFields, FogForm, DENSITY_DECIMALS, DENSITY_RANGE, DISTANCE_RANGE};
pub use outliner::{drop_position_at, Outliner, OutlinerRow, ROW_INDENT};

/// Namespace of the panel's subscriptions and source tag of its events.
pub const SCENE_PANEL: &str = "ScenePanel";
pub const DEFAULT_BACKGROUND: Color = Color(0xaaaaaa);

fn badge(kind: &str) -> String {
    format!("[{kind}]")
}

/// Row label: type badge and name, then geometry and material badges for
/// meshes, then a script badge when a script is attached.
pub fn build_label(object: &Object3D, scripts: &HashMap<Uuid, Vec<String>>) -> String {
    let mut label = format!("{} {}", badge(&object.kind), object.name);
    if let Some(renderable) = &object.renderable {
        for asset in [&renderable.geometry, &renderable.material] {
            label.push(' ');
            label.push_str(&badge(&asset.kind));
            label.push(' ');
            label.push_str(&asset.name);
        }
    }
    if scripts.get(&object.uuid).is_some_and(|list| !list.is_empty()) {
        label.push(' ');
        label.push_str(&badge("Script"));
    }
    label
}

fn push_rows(objects: &[Object3D], depth: usize, editor: &Editor, rows: &mut Vec<OutlinerRow>) {
    for object in objects {
        rows.push(OutlinerRow {
            id: object.id,
            label: build_label(object, &editor.scripts),
            draggable: true,
            depth,
        });
        push_rows(&object.children, depth + 1, editor, rows);
    }
}

/// Camera and scene rows followed by the scene's descendants in pre-order.
pub fn outliner_rows(editor: &Editor) -> Vec<OutlinerRow> {
    let mut rows = Vec::with_capacity(2 + editor.scene.root.descendant_count());
    for fixed in [&editor.camera, &editor.scene.root] {
        rows.push(OutlinerRow {
            id: fixed.id,
            label: build_label(fixed, &editor.scripts),
            draggable: false,
            depth: 0,
        });
    }
    push_rows(editor.scene.children(), 1, editor, &mut rows);
    rows
}

#[derive(Debug)]
struct PanelState {
    outliner: Outliner,
    background: Color,
    fog: FogForm,
}

impl PanelState {
    fn new() -> Self {
        Self { outliner: Outliner::default(), background: DEFAULT_BACKGROUND, fog: FogForm::default() }
    }

    fn refresh(&mut self, editor: &Editor) {
        self.outliner.set_options(outliner_rows(editor));
        self.outliner.set_value(editor.selected());
        if let Some(background) = editor.scene.background {
            self.background = background;
        }
        self.fog.sync(editor.scene.fog.as_ref());
        log::debug!(
            "scene panel refreshed: {} rows, fog {}",
            self.outliner.rows().len(),
            self.fog.fog_type()
        );
    }

    fn patch_object(&mut self, editor: &Editor, id: NodeId) {
        if let Some(object) = editor.object_by_id(id) {
            self.outliner.patch_label(id, build_label(object, &editor.scripts));
        }
    }
}

/// User input gathered while drawing a frame, applied once drawing is done.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelActions {
    pub select: Option<NodeId>,
    pub focus: Option<NodeId>,
    pub drop: Option<(NodeId, NodeId, DropPosition)>,
    pub background: Option<Color>,
    pub fog_type: Option<FogType>,
    pub fog_color: Option<Color>,
    pub fog_near: Option<f32>,
    pub fog_far: Option<f32>,
    pub fog_density: Option<f32>,
}

impl PanelActions {
    pub fn is_empty(&self) -> bool {
        *self == PanelActions::default()
    }
}

#[derive(Clone)]
pub struct ScenePanel {
    state: Rc<RefCell<PanelState>>,
    ignore_object_selected: Rc<Cell<bool>>,
}

impl ScenePanel {
    /// Builds the panel, syncs it with the current editor state and
    /// subscribes it to the app's events.
    pub fn new(app: &mut App) -> Self {
        let panel =
            Self { state: Rc::new(RefCell::new(PanelState::new())), ignore_object_selected: Rc::new(Cell::new(false)) };
        panel.refresh(&app.editor);
        panel.subscribe(app);
        panel
    }

    fn subscribe(&self, app: &mut App) {
        for kind in [EventKind::EditorCleared, EventKind::SceneGraphChanged] {
            let state = Rc::clone(&self.state);
            app.subscribe(kind, SCENE_PANEL, move |editor, _| state.borrow_mut().refresh(editor));
        }

        let state = Rc::clone(&self.state);
        app.subscribe(EventKind::ObjectChanged, SCENE_PANEL, move |editor, event| {
            if let EditorEvent::ObjectChanged(id) = event {
                state.borrow_mut().patch_object(editor, *id);
            }
        });

        let state = Rc::clone(&self.state);
        let ignore = Rc::clone(&self.ignore_object_selected);
        app.subscribe(EventKind::ObjectSelected, SCENE_PANEL, move |_, event| {
            if ignore.get() {
                return;
            }
            if let EditorEvent::ObjectSelected(id) = event {
                state.borrow_mut().outliner.set_value(*id);
            }
        });
    }

    /// Removes the panel's subscriptions.
    pub fn detach(&self, app: &mut App) -> usize {
        app.off_namespace(SCENE_PANEL)
    }

    /// Full rebuild of rows, background swatch and fog form.
    pub fn refresh(&self, editor: &Editor) {
        self.state.borrow_mut().refresh(editor);
    }

    pub fn outliner(&self) -> Ref<'_, Outliner> {
        Ref::map(self.state.borrow(), |state| &state.outliner)
    }

    pub fn fog(&self) -> Ref<'_, FogForm> {
        Ref::map(self.state.borrow(), |state| &state.fog)
    }

    pub fn background(&self) -> Color {
        self.state.borrow().background
    }

    /// Outliner row chosen by the user. The editor's selection broadcast is
    /// ignored while it is in flight since the row is already highlighted.
    pub fn select_row(&self, app: &mut App, id: NodeId) {
        self.state.borrow_mut().outliner.set_value(Some(id));
        self.ignore_object_selected.set(true);
        app.select_by_id(id);
        self.ignore_object_selected.set(false);
    }

    /// Outliner row double-clicked.
    pub fn focus_row(&self, app: &mut App, id: NodeId) {
        app.focus_by_id(id);
    }

    pub fn drop_row(&self, app: &mut App, id: NodeId, target: NodeId, position: DropPosition) {
        app.move_object(id, target, position);
    }

    pub fn set_background(&self, app: &mut App, color: Color) {
        self.state.borrow_mut().background = color;
        app.call(EditorEvent::SceneBackgroundChanged { source: SCENE_PANEL, color });
    }

    pub fn set_fog_type(&self, app: &mut App, fog_type: FogType) {
        self.update_fog(app, |fog| fog.set_type(fog_type));
    }

    pub fn set_fog_color(&self, app: &mut App, color: Color) {
        self.update_fog(app, |fog| fog.set_color(color));
    }

    pub fn set_fog_near(&self, app: &mut App, near: f32) {
        self.update_fog(app, |fog| fog.set_near(near));
    }

    pub fn set_fog_far(&self, app: &mut App, far: f32) {
        self.update_fog(app, |fog| fog.set_far(far));
    }

    pub fn set_fog_density(&self, app: &mut App, density: f32) {
        self.update_fog(app, |fog| fog.set_density(density));
    }

    fn update_fog(&self, app: &mut App, edit: impl FnOnce(&mut FogForm)) {
        let event = {
            let mut state = self.state.borrow_mut();
            edit(&mut state.fog);
            state.fog.to_event(SCENE_PANEL)
        };
        app.call(event);
    }

    /// Applies input collected by a frame. Selection goes first so a click
    /// and a property edit in the same frame both land.
    pub fn apply_actions(&self, app: &mut App, actions: PanelActions) {
        if let Some(id) = actions.select {
            self.select_row(app, id);
        }
        if let Some(id) = actions.focus {
            self.focus_row(app, id);
        }
        if let Some((id, target, position)) = actions.drop {
            self.drop_row(app, id, target, position);
        }
        if let Some(color) = actions.background {
            self.set_background(app, color);
        }
        if let Some(fog_type) = actions.fog_type {
            self.set_fog_type(app, fog_type);
        }
        if let Some(color) = actions.fog_color {
            self.set_fog_color(app, color);
        }
        if let Some(near) = actions.fog_near {
            self.set_fog_near(app, near);
        }
        if let Some(far) = actions.fog_far {
            self.set_fog_far(app, far);
        }
        if let Some(density) = actions.fog_density {
            self.set_fog_density(app, density);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::scene::AssetTag;

    #[test]
    fn plain_object_label_has_type_and_name() {
        let object = Object3D::new(NodeId(5), "Group", "Props");
        assert_eq!(build_label(&object, &HashMap::new()), "[Group] Props");
    }

    #[test]
    fn mesh_label_orders_geometry_material_script() {
        let object = Object3D::mesh(
            NodeId(5),
            "Crate",
            AssetTag::new("BoxGeometry", "Box"),
            AssetTag::new("MeshStandardMaterial", "Standard"),
        );
        let mut scripts = HashMap::new();
        scripts.insert(object.uuid, vec!["spin".to_string()]);
        assert_eq!(
            build_label(&object, &scripts),
            "[Mesh] Crate [BoxGeometry] Box [MeshStandardMaterial] Standard [Script]"
        );
    }

    #[test]
    fn empty_script_list_has_no_badge() {
        let object = Object3D::new(NodeId(5), "Group", "Props");
        let mut scripts = HashMap::new();
        scripts.insert(object.uuid, Vec::new());
        assert!(!build_label(&object, &scripts).contains("[Script]"));
    }

    #[test]
    fn fixed_rows_come_first_and_are_not_draggable() {
        let app = App::new(Options::default());
        let rows = outliner_rows(&app.editor);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, app.editor.camera.id);
        assert_eq!(rows[1].id, app.editor.scene.root.id);
        assert!(rows.iter().all(|row| !row.draggable && row.padding() == 0.0));
    }

    #[test]
    fn apply_actions_with_nothing_is_a_no_op() {
        let mut app = App::new(Options::default());
        let panel = ScenePanel::new(&mut app);
        let revision = panel.outliner().revision();
        let actions = PanelActions::default();
        assert!(actions.is_empty());
        panel.apply_actions(&mut app, actions);
        assert_eq!(panel.outliner().revision(), revision);
        assert_eq!(app.editor.scene.fog, None);
    }
}
