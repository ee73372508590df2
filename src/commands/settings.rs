use crate::config::{SettingKey, SettingValue, Settings};
use anyhow::Result;
use std::collections::BTreeMap;

/// Settings subcommands
#[derive(Debug, Clone, clap::Subcommand)]
pub enum SettingsCommands {
    /// Get a resolved setting
    Get {
        /// Setting name (e.g. DEFAULT_INDEX_NAME)
        key: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// List all resolved settings
    List {
        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Execute settings command
pub fn cmd_settings(settings: &Settings, subcommand: Option<SettingsCommands>) -> Result<()> {
    match subcommand {
        Some(SettingsCommands::Get { key, format }) => {
            let value = settings.get(&key)?;
            print!("{}", render(&value, format)?);
        }
        Some(SettingsCommands::List { format }) => {
            print!("{}", render(&resolved_settings(settings)?, format)?);
        }
        None => {
            print!("{}", render(&resolved_settings(settings)?, OutputFormat::Yaml)?);
        }
    }
    Ok(())
}

/// Every setting with its resolved value, keyed by name
pub fn resolved_settings(settings: &Settings) -> Result<BTreeMap<&'static str, SettingValue>> {
    SettingKey::ALL
        .into_iter()
        .map(|key| Ok((key.name(), settings.value(key)?)))
        .collect()
}

fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}
