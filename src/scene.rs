use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 24-bit RGB color stored as a hex integer (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn hex(self) -> u32 {
        self.0 & 0x00ff_ffff
    }

    pub const fn to_rgb(self) -> [u8; 3] {
        let hex = self.hex();
        [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.hex())
    }
}

/// Type tag and name of a geometry or material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTag {
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl AssetTag {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: kind.into(), name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub geometry: AssetTag,
    pub material: AssetTag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object3D {
    pub id: NodeId,
    pub uuid: Uuid,
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderable: Option<Renderable>,
    #[serde(default)]
    pub children: Vec<Object3D>,
}

impl Object3D {
    pub fn new(id: NodeId, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            kind: kind.into(),
            name: name.into(),
            position: Vec3::ZERO,
            renderable: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(id: NodeId, name: impl Into<String>, geometry: AssetTag, material: AssetTag) -> Self {
        let mut object = Self::new(id, "Mesh", name);
        object.renderable = Some(Renderable { geometry, material });
        object
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_child(mut self, child: Object3D) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first pre-order search, including `self`.
    pub fn find(&self, id: NodeId) -> Option<&Object3D> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Object3D> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Sum of positions from `self` down to the node, or `None` when absent.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        if self.id == id {
            return Some(self.position);
        }
        self.children.iter().find_map(|child| child.world_position(id)).map(|pos| pos + self.position)
    }

    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|child| 1 + child.descendant_count()).sum()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Detaches the descendant with `id` and returns it.
    pub fn take_descendant(&mut self, id: NodeId) -> Option<Object3D> {
        if let Some(index) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(index));
        }
        self.children.iter_mut().find_map(|child| child.take_descendant(id))
    }

    /// Parent id and index of a descendant.
    pub fn parent_of(&self, id: NodeId) -> Option<(NodeId, usize)> {
        if let Some(index) = self.children.iter().position(|child| child.id == id) {
            return Some((self.id, index));
        }
        self.children.iter().find_map(|child| child.parent_of(id))
    }

    pub fn max_id(&self) -> NodeId {
        self.children.iter().map(Object3D::max_id).fold(self.id, NodeId::max)
    }
}

/// Fog variant selector, named after the engine's fog classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FogType {
    #[default]
    None,
    Fog,
    FogExp2,
}

impl FogType {
    pub const ALL: [FogType; 3] = [FogType::None, FogType::Fog, FogType::FogExp2];

    pub fn as_str(self) -> &'static str {
        match self {
            FogType::None => "None",
            FogType::Fog => "Fog",
            FogType::FogExp2 => "FogExp2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FogType::None => "None",
            FogType::Fog => "Linear",
            FogType::FogExp2 => "Exponential",
        }
    }
}

impl fmt::Display for FogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Fog {
    #[serde(rename = "Fog")]
    Linear { color: Color, near: f32, far: f32 },
    #[serde(rename = "FogExp2")]
    Exponential { color: Color, density: f32 },
}

impl Fog {
    pub fn fog_type(&self) -> FogType {
        match self {
            Fog::Linear { .. } => FogType::Fog,
            Fog::Exponential { .. } => FogType::FogExp2,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Fog::Linear { color, .. } | Fog::Exponential { color, .. } => *color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub root: Object3D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog: Option<Fog>,
}

impl Scene {
    pub fn new(id: NodeId) -> Self {
        Self { root: Object3D::new(id, "Scene", "Scene"), background: None, fog: None }
    }

    pub fn children(&self) -> &[Object3D] {
        &self.root.children
    }

    pub fn object_by_id(&self, id: NodeId) -> Option<&Object3D> {
        self.root.find(id)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("Failed to read scene file {}", path.display()))?;
        let scene = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))?;
        Ok(scene)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create scene directory {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize scene")?;
        fs::write(path, json).with_context(|| format!("Failed to write scene file {}", path.display()))?;
        Ok(())
    }
}
