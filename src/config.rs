use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Token meaning "same origin as the editor page"; never prefixed with a scheme.
pub const SAME_ORIGIN_SERVER: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SceneType {
    #[default]
    Empty,
    #[serde(rename = "GIS")]
    Gis,
}

impl SceneType {
    pub fn label(self) -> &'static str {
        match self {
            SceneType::Empty => "Empty",
            SceneType::Gis => "GIS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadowMapType {
    Basic,
    #[serde(rename = "PCF")]
    Pcf,
    #[default]
    #[serde(rename = "PCFSoft")]
    PcfSoft,
    #[serde(rename = "VSM")]
    Vsm,
}

impl ShadowMapType {
    pub fn label(self) -> &'static str {
        match self {
            ShadowMapType::Basic => "Basic",
            ShadowMapType::Pcf => "PCF",
            ShadowMapType::PcfSoft => "PCF Soft",
            ShadowMapType::Vsm => "VSM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    #[serde(rename = "")]
    None,
    Rain,
    Snow,
}

impl Weather {
    pub fn label(self) -> &'static str {
        match self {
            Weather::None => "None",
            Weather::Rain => "Rain",
            Weather::Snow => "Snow",
        }
    }
}

/// Where newly added objects are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddMode {
    #[default]
    Center,
    Click,
}

impl AddMode {
    pub fn label(self) -> &'static str {
        match self {
            AddMode::Center => "Scene center",
            AddMode::Click => "Click in scene",
        }
    }
}

/// CSS-style post filters applied to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub hue_rotate: f32,
    pub saturate: f32,
    pub brightness: f32,
    pub blur: f32,
    pub contrast: f32,
    pub grayscale: f32,
    pub invert: f32,
    pub sepia: f32,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            hue_rotate: 0.0,
            saturate: 1.0,
            brightness: 1.0,
            blur: 0.0,
            contrast: 1.0,
            grayscale: 0.0,
            invert: 0.0,
            sepia: 0.0,
        }
    }
}

/// Partial options payload. A `None` field means the key was absent and the
/// default applies; a `Some` value is kept as given, falsy or not.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsInput {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub scene_type: Option<SceneType>,
    #[serde(default)]
    pub save_child: Option<bool>,
    #[serde(default)]
    pub save_material: Option<bool>,
}

impl OptionsInput {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        let input = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse options file {}", path.display()))?;
        Ok(input)
    }
}

/// Session options seeding a new editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub server: String,
    pub scene_type: SceneType,
    /// Export the children of imported models.
    pub save_child: bool,
    /// Export the materials of those children.
    pub save_material: bool,
    pub shadow_map_type: ShadowMapType,
    pub gamma_input: bool,
    pub gamma_output: bool,
    pub gamma_factor: f32,
    #[serde(flatten)]
    pub filters: FilterOptions,
    pub weather: Weather,
    pub add_mode: AddMode,
    pub enable_physics: bool,
}

impl Options {
    pub fn new(input: OptionsInput) -> Self {
        let server = normalize_server(input.server.unwrap_or_else(|| SAME_ORIGIN_SERVER.to_string()));
        Self {
            server,
            scene_type: input.scene_type.unwrap_or_default(),
            save_child: input.save_child.unwrap_or(true),
            save_material: input.save_material.unwrap_or(true),
            shadow_map_type: ShadowMapType::PcfSoft,
            gamma_input: false,
            gamma_output: false,
            gamma_factor: 2.0,
            filters: FilterOptions::default(),
            weather: Weather::None,
            add_mode: AddMode::Center,
            enable_physics: false,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let input: OptionsInput = serde_json::from_str(text).context("Failed to parse options")?;
        Ok(Self::new(input))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(OptionsInput::load(path)?))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(options) => options,
            Err(err) => {
                log::warn!("Options load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(OptionsInput::default())
    }
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http") || server == SAME_ORIGIN_SERVER {
        server
    } else {
        format!("http://{server}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_take_defaults() {
        let options = Options::default();
        assert_eq!(options.server, ".");
        assert_eq!(options.scene_type, SceneType::Empty);
        assert!(options.save_child);
        assert!(options.save_material);
        assert_eq!(options.shadow_map_type, ShadowMapType::PcfSoft);
        assert!(!options.gamma_input && !options.gamma_output);
        assert_eq!(options.gamma_factor, 2.0);
        assert_eq!(options.filters, FilterOptions::default());
        assert_eq!(options.weather, Weather::None);
        assert_eq!(options.add_mode, AddMode::Center);
        assert!(!options.enable_physics);
    }

    #[test]
    fn falsy_values_are_kept() {
        let options = Options::from_json_str(r#"{"saveChild": false, "saveMaterial": false}"#)
            .expect("parse options");
        assert!(!options.save_child);
        assert!(!options.save_material);
    }

    #[test]
    fn empty_server_is_present_and_prefixed() {
        let options = Options::new(OptionsInput { server: Some(String::new()), ..Default::default() });
        assert_eq!(options.server, "http://");
    }

    #[test]
    fn server_normalization() {
        let cases = [
            ("example.com", "http://example.com"),
            ("https://x", "https://x"),
            ("http://localhost:2000", "http://localhost:2000"),
            (".", "."),
            ("./api", "http://./api"),
        ];
        for (input, expected) in cases {
            let options = Options::new(OptionsInput { server: Some(input.to_string()), ..Default::default() });
            assert_eq!(options.server, expected, "server '{input}'");
        }
    }

    #[test]
    fn gis_scene_type_parses() {
        let options = Options::from_json_str(r#"{"sceneType": "GIS"}"#).expect("parse options");
        assert_eq!(options.scene_type, SceneType::Gis);
        assert_eq!(options.scene_type.label(), "GIS");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(Options::default()).expect("serialize options");
        assert_eq!(value["sceneType"], "Empty");
        assert_eq!(value["shadowMapType"], "PCFSoft");
        assert_eq!(value["weather"], "");
        assert_eq!(value["addMode"], "center");
        assert_eq!(value["hueRotate"], 0.0);
    }
}
