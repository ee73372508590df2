//! Migration files: `<models_dir>/<app>/<migration>.yaml`, each listing the
//! models it creates

use crate::config::Settings;
use crate::constants::{MIGRATION_EXTENSION, SQL_EXTENSION};
use crate::model::{Model, ModelRegistry};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A discovered migration file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MigrationFile {
    pub app_label: String,
    pub name: String,
    pub path: PathBuf,
}

impl MigrationFile {
    /// `app.migration`
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.name)
    }

    /// Leading part of the name up to the first underscore, e.g. `0001`
    pub fn prefix(&self) -> &str {
        self.name.split('_').next().unwrap_or(&self.name)
    }

    /// Where `sqlmigrateall` writes this migration's SQL
    pub fn output_path(&self, out_folder: &Path, folder_per_app: bool) -> PathBuf {
        if folder_per_app {
            out_folder
                .join(&self.app_label)
                .join(format!("{}.{}", self.name, SQL_EXTENSION))
        } else {
            out_folder.join(format!("{}_{}.{}", self.app_label, self.name, SQL_EXTENSION))
        }
    }
}

/// Contents of a migration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationDefinition {
    #[serde(default)]
    pub models: Vec<Model>,
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub file: MigrationFile,
    pub models: Vec<Model>,
}

/// Find all migration files, sorted by app then migration name
pub fn discover_migrations(models_dir: &Path) -> Result<Vec<MigrationFile>> {
    if !models_dir.exists() {
        return Ok(Vec::new());
    }

    let pattern = models_dir
        .join("*")
        .join(format!("*.{}", MIGRATION_EXTENSION));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| anyhow!("Models directory is not valid UTF-8: {}", models_dir.display()))?;

    let mut migrations = Vec::new();
    let entries = glob::glob(pattern)
        .with_context(|| format!("Invalid models directory {}", models_dir.display()))?;
    for entry in entries {
        let path = entry?;
        let name = path.file_stem().and_then(|n| n.to_str());
        let app_label = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());

        if let (Some(name), Some(app_label)) = (name, app_label) {
            migrations.push(MigrationFile {
                app_label: app_label.to_string(),
                name: name.to_string(),
                path: path.clone(),
            });
        }
    }

    migrations.sort();
    debug!(count = migrations.len(), dir = %models_dir.display(), "Discovered migrations");
    Ok(migrations)
}

/// Parse a migration file's contents; models without an app label get the file's app
pub fn parse_migration(file: &MigrationFile, contents: &str) -> Result<Migration> {
    let definition: MigrationDefinition = if contents.trim().is_empty() {
        MigrationDefinition::default()
    } else {
        serde_yaml::from_str(contents)
            .with_context(|| format!("Invalid migration {}", file.path.display()))?
    };

    let models = definition
        .models
        .into_iter()
        .map(|mut model| {
            if model.app_label.is_empty() {
                model.app_label = file.app_label.clone();
            }
            model
        })
        .collect();

    Ok(Migration {
        file: file.clone(),
        models,
    })
}

pub fn load_migration(file: &MigrationFile) -> Result<Migration> {
    let contents = std::fs::read_to_string(&file.path)
        .with_context(|| format!("Failed to read migration {}", file.path.display()))?;
    parse_migration(file, &contents)
}

pub fn load_migrations(models_dir: &Path) -> Result<Vec<Migration>> {
    discover_migrations(models_dir)?
        .iter()
        .map(load_migration)
        .collect()
}

/// Register the models of every migration, in migration order
pub fn build_registry(migrations: &[Migration], settings: &Settings) -> Result<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    for migration in migrations {
        registry
            .register_all(migration.models.iter().cloned(), settings)
            .with_context(|| format!("Failed to register models of {}", migration.file.label()))?;
    }
    Ok(registry)
}

/// Look a migration up by app and full name or name prefix
pub fn find_migration<'m>(
    migrations: &'m [Migration],
    app_label: &str,
    name: &str,
) -> Option<&'m Migration> {
    let in_app = || migrations.iter().filter(|m| m.file.app_label == app_label);
    in_app()
        .find(|m| m.file.name == name)
        .or_else(|| in_app().find(|m| m.file.prefix() == name))
}
