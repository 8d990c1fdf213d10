use crate::config::{OptionsInput, SceneType};
use anyhow::{anyhow, bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    pub options_path: Option<PathBuf>,
    pub scene_path: Option<PathBuf>,
    server: Option<String>,
    scene_type: Option<SceneType>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Use --options/--scene/--server/--scene-type with values.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "options" => overrides.options_path = Some(PathBuf::from(value)),
                "scene" => overrides.scene_path = Some(PathBuf::from(value)),
                "server" => overrides.server = Some(value),
                "scene-type" => overrides.scene_type = Some(parse_scene_type(&value)?),
                _ => bail!("Unknown flag '{flag}'. Supported flags: --options, --scene, --server, --scene-type."),
            }
        }
        Ok(overrides)
    }

    /// Options payload from `--options` (if any) with command-line values
    /// taking precedence.
    pub fn options_input(&self) -> Result<OptionsInput> {
        let mut input = match &self.options_path {
            Some(path) => OptionsInput::load(path)?,
            None => OptionsInput::default(),
        };
        if let Some(server) = &self.server {
            input.server = Some(server.clone());
        }
        if let Some(scene_type) = self.scene_type {
            input.scene_type = Some(scene_type);
        }
        Ok(input)
    }
}

fn parse_scene_type(value: &str) -> Result<SceneType> {
    match value.to_ascii_lowercase().as_str() {
        "empty" => Ok(SceneType::Empty),
        "gis" => Ok(SceneType::Gis),
        other => bail!("Invalid scene type '{other}'. Use Empty or GIS."),
    }
}
