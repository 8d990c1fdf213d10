use anyhow::Result;
use shadow_editor::cli::CliOverrides;
use shadow_editor::config::Options;
use shadow_editor::editor::Editor;
use shadow_editor::scene::Scene;
use shadow_editor::{App, ScenePanel};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let overrides = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            log::error!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(overrides) {
        log::error!("Application error: {err:?}");
        std::process::exit(1);
    }
}

fn run(overrides: CliOverrides) -> Result<()> {
    let options = Options::new(overrides.options_input()?);
    let editor = match &overrides.scene_path {
        Some(path) => Editor::with_scene(Scene::load_from_path(path)?),
        None => Editor::new(),
    };
    log::info!("server {} | scene type {}", options.server, options.scene_type.label());

    let mut app = App::with_editor(options, editor);
    let panel = ScenePanel::new(&mut app);

    for row in panel.outliner().rows() {
        let marker = if row.draggable { ' ' } else { '*' };
        log::info!("{marker}{:indent$}{}", "", row.label, indent = row.depth * 2);
    }
    log::info!("background {}", panel.background());
    let fog = panel.fog();
    log::info!(
        "fog {} color {} near {} far {} density {:.3}",
        fog.fog_type().label(),
        fog.color(),
        fog.near(),
        fog.far(),
        fog.density()
    );
    Ok(())
}
