pub mod app;
pub mod cli;
pub mod config;
pub mod editor;
pub mod events;
pub mod scene;

pub use app::{App, ScenePanel};
