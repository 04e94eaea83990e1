//! Where the bridge finds its config and puts its saved logs.

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};
use vesty_core::CoreConfig;

pub const CONFIG_FILE: &str = "config.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Vesty", "VestyWinBox")
}

/// `<config dir>/config.json` for this user, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load config from `explicit` if given (must exist), else from the user
/// config dir if a file is there, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<CoreConfig> {
    if let Some(path) = explicit {
        return CoreConfig::load(path)
            .with_context(|| format!("could not load config from {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            tracing::info!(path = %path.display(), "loading config");
            CoreConfig::load(&path).with_context(|| format!("could not load {}", path.display()))
        }
        _ => Ok(CoreConfig::default()),
    }
}

/// Saved logs go to the user's documents folder, falling back to the
/// current directory.
pub fn export_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
