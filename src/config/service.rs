//! Process-wide holder of the current settings snapshot

use crate::config::load_settings;
use crate::config::settings::Settings;
use crate::config::types::SettingsInput;
use crate::constants::SETTINGS_NAMESPACE;
use crate::naming::NameBuilderRegistry;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Where user overrides are read from on every reload
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> Result<SettingsInput>;
}

/// Reads the `DB_ADAPTER` block of a YAML project file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for FileSource {
    fn load(&self) -> Result<SettingsInput> {
        load_settings(&self.path)
    }
}

impl SettingsSource for SettingsInput {
    fn load(&self) -> Result<SettingsInput> {
        Ok(self.clone())
    }
}

/// Owns the current [`Settings`] snapshot.
///
/// Readers hold an `Arc` to the snapshot they started with; a reload swaps in
/// a new snapshot and never mutates one that is already shared.
pub struct SettingsService {
    source: Box<dyn SettingsSource>,
    registry: NameBuilderRegistry,
    current: RwLock<Arc<Settings>>,
}

impl SettingsService {
    pub fn new(
        source: impl SettingsSource + 'static,
        registry: NameBuilderRegistry,
    ) -> Result<Self> {
        let user = source.load()?;
        let settings = Settings::new(user, registry.clone());
        Ok(Self {
            source: Box::new(source),
            registry,
            current: RwLock::new(Arc::new(settings)),
        })
    }

    pub fn current(&self) -> Arc<Settings> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the source and publish a fresh snapshot
    pub fn reload(&self) -> Result<Arc<Settings>> {
        let user = self.source.load()?;
        Ok(self.reload_with(user))
    }

    /// Publish a fresh snapshot built from `user`
    pub fn reload_with(&self, user: SettingsInput) -> Arc<Settings> {
        let settings = Arc::new(Settings::new(user, self.registry.clone()));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = settings.clone();
        info!("Settings reloaded");
        settings
    }

    /// Change notification from the host; reloads only for the adapter's block.
    ///
    /// Returns whether a reload happened.
    pub fn setting_changed(&self, setting: &str) -> Result<bool> {
        if setting != SETTINGS_NAMESPACE {
            debug!(setting, "Ignoring change to unrelated setting");
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }
}
