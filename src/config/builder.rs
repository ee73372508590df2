use crate::config::settings::Settings;
use crate::config::{merge::Merge, types::*};
use crate::naming::NameBuilderRegistry;

/// Layers settings inputs (file, then CLI) into a [`Settings`] resolver
pub struct ConfigBuilder {
    settings_input: SettingsInput,
    registry: NameBuilderRegistry,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            settings_input: SettingsInput::default(),
            registry: NameBuilderRegistry::default(),
        }
    }

    pub fn with_file(mut self, file_input: SettingsInput) -> Self {
        self.settings_input = self.settings_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: SettingsInput) -> Self {
        self.settings_input = self.settings_input.merge(cli_input);
        self
    }

    pub fn with_registry(mut self, registry: NameBuilderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The merged overrides, before any resolution
    pub fn input(&self) -> &SettingsInput {
        &self.settings_input
    }

    /// Options are not resolved here; each one resolves on first access
    pub fn resolve(self) -> Settings {
        Settings::new(self.settings_input, self.registry)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
