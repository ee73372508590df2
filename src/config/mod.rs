pub mod builder;
pub mod defaults;
pub mod merge;
pub mod service;
pub mod settings;
pub mod types;


pub use builder::ConfigBuilder;
pub use service::{FileSource, SettingsService, SettingsSource};
pub use settings::{SettingKey, SettingValue, Settings};
pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Main configuration loading function
pub fn load_config(config_file: &str) -> Result<(SettingsInput, PathBuf)> {
    let config_dir = Path::new(config_file)
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    Ok((load_settings(Path::new(config_file))?, config_dir))
}

/// Read the adapter's settings block; a missing file yields no overrides
pub fn load_settings(path: &Path) -> Result<SettingsInput> {
    if !path.exists() {
        return Ok(SettingsInput::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_settings(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse_settings(contents: &str) -> Result<SettingsInput> {
    if contents.trim().is_empty() {
        return Ok(SettingsInput::default());
    }
    let file: ProjectFile = serde_yaml::from_str(contents)?;
    Ok(file.db_adapter.unwrap_or_default())
}
