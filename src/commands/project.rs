use crate::backend::{BackendProfile, RecordingConnection};
use crate::config::Settings;
use crate::migration::{Migration, build_registry, load_migrations};
use crate::model::ModelRegistry;
use crate::schema::SchemaEditor;
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: resolved settings, the target backend and
/// the models directory
pub struct Project {
    pub settings: Arc<Settings>,
    pub profile: BackendProfile,
    pub models_dir: PathBuf,
}

/// Migrations in apply order with every model they create registered
pub struct LoadedMigrations {
    pub migrations: Vec<Migration>,
    pub registry: ModelRegistry,
}

impl Project {
    pub fn new(
        settings: Settings,
        profile: BackendProfile,
        models_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            profile,
            models_dir: models_dir.into(),
        }
    }

    pub fn load(&self) -> Result<LoadedMigrations> {
        let migrations = load_migrations(&self.models_dir)?;
        let registry = build_registry(&migrations, &self.settings)?;
        debug!(
            migrations = migrations.len(),
            models = registry.len(),
            "Loaded migrations"
        );
        Ok(LoadedMigrations {
            migrations,
            registry,
        })
    }

    /// Collected DDL of one migration, deferred statements included
    pub fn migration_sql(
        &self,
        registry: &ModelRegistry,
        migration: &Migration,
    ) -> Result<Vec<String>> {
        let mut connection = RecordingConnection::new(&self.profile);
        let mut editor =
            SchemaEditor::new(&mut connection, &self.profile, registry, self.settings.clone())?
                .collect_sql();

        for model in &migration.models {
            let registered = registry
                .get(&model.label())
                .ok_or_else(|| anyhow!("Model {} is not registered", model.label()))?;
            editor
                .create_model(registered)
                .with_context(|| format!("Failed to create model {}", model.label()))?;
        }
        editor.finish()?;

        Ok(editor.into_collected_sql())
    }
}

/// Statements joined for writing to a file or stdout
pub fn join_statements(statements: &[String]) -> String {
    let mut output = statements.join("\n");
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
