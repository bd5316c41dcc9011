//! Settings persistence. The file lives next to the executable so portable
//! installs carry their configuration with them.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::settings::DoodleSettings;

pub const SETTINGS_FILE_NAME: &str = "doodle_settings.json";

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

pub fn load() -> Result<DoodleSettings> {
    let path = resolve_settings_path()?;
    load_from_path(&path)
}

pub fn save(settings: &DoodleSettings) -> Result<PathBuf> {
    let path = resolve_settings_path()?;
    save_to_path(&path, settings)?;
    Ok(path)
}

/// Loads settings, treating a missing or empty file as a fresh install.
pub fn load_from_path(path: &Path) -> Result<DoodleSettings> {
    if !path.exists() {
        return Ok(DoodleSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(DoodleSettings::default());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("deserialize settings file {}", path.display()))
}

pub fn save_to_path(path: &Path, settings: &DoodleSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create settings parent folder {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(settings).context("serialize settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write settings file {}", path.display()))
}
