use crate::editor::DropPosition;
use crate::scene::NodeId;

/// Horizontal indent per nesting level, in points.
pub const ROW_INDENT: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlinerRow {
    pub id: NodeId,
    pub label: String,
    pub draggable: bool,
    pub depth: usize,
}

impl OutlinerRow {
    pub fn padding(&self) -> f32 {
        self.depth as f32 * ROW_INDENT
    }
}

/// Flat list of rows mirroring the scene graph plus the highlighted id.
#[derive(Debug, Default)]
pub struct Outliner {
    rows: Vec<OutlinerRow>,
    value: Option<NodeId>,
    revision: u64,
}

impl Outliner {
    pub fn rows(&self) -> &[OutlinerRow] {
        &self.rows
    }

    pub fn value(&self) -> Option<NodeId> {
        self.value
    }

    /// Bumped on every row replacement, label patch or highlight change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_options(&mut self, rows: Vec<OutlinerRow>) {
        self.rows = rows;
        self.revision += 1;
    }

    pub fn set_value(&mut self, value: Option<NodeId>) {
        self.value = value;
        self.revision += 1;
    }

    /// Index of the highlighted row; `None` when the value matches no row.
    pub fn selected_index(&self) -> Option<usize> {
        let value = self.value?;
        self.rows.iter().position(|row| row.id == value)
    }

    /// Replaces the label of the first row showing `id`.
    pub fn patch_label(&mut self, id: NodeId, label: String) -> bool {
        for row in &mut self.rows {
            if row.id == id {
                row.label = label;
                self.revision += 1;
                return true;
            }
        }
        false
    }
}

/// Maps a pointer offset inside a row of `height` to a drop position: the top
/// and bottom quarters insert as siblings, the middle reparents.
pub fn drop_position_at(offset: f32, height: f32) -> DropPosition {
    if height <= 0.0 {
        return DropPosition::Inside;
    }
    let fraction = offset / height;
    if fraction < 0.25 {
        DropPosition::Before
    } else if fraction > 0.75 {
        DropPosition::After
    } else {
        DropPosition::Inside
    }
}
