//! The "all known models" lookup, with the explicit normalization pass

use crate::config::Settings;
use crate::error::{AdapterError, Result};
use crate::model::field::Field;
use crate::model::table::Model;
use crate::naming::normalize_table;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<Model>,
    labels: BTreeMap<String, usize>,
    tables: BTreeMap<String, usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, normalizing its table name once.
    ///
    /// The table is rewritten against `DEFAULT_DB_TABLE_FORMAT` when
    /// normalization is enabled and a format is configured. Registering a
    /// label that is already known leaves the registered model untouched.
    pub fn register(&mut self, mut model: Model, settings: &Settings) -> Result<&Model> {
        let label = model.label();
        if let Some(&index) = self.labels.get(&label) {
            debug!(model = %label, "Model already registered");
            return Ok(&self.models[index]);
        }

        if model.db_table.is_empty() {
            model.db_table = model.default_db_table();
        }

        let format = settings.db_table_format();
        if settings.enable_db_table_normalization() && !format.is_empty() {
            let normalized =
                normalize_table(&model.db_table, format, settings.ignore_db_table_formats())?;
            if normalized != model.db_table {
                debug!(
                    model = %label,
                    from = %model.db_table,
                    to = %normalized,
                    "Normalized table name"
                );
                model.db_table = normalized;
            }
        }

        let index = self.models.len();
        self.labels.insert(label, index);
        self.tables.insert(model.db_table.clone(), index);
        self.models.push(model);
        Ok(&self.models[index])
    }

    pub fn register_all(
        &mut self,
        models: impl IntoIterator<Item = Model>,
        settings: &Settings,
    ) -> Result<()> {
        for model in models {
            self.register(model, settings)?;
        }
        Ok(())
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&Model> {
        self.labels.get(label).map(|&index| &self.models[index])
    }

    /// Resolve a table name back to its model
    pub fn by_table(&self, db_table: &str) -> Result<&Model> {
        self.tables
            .get(db_table)
            .map(|&index| &self.models[index])
            .ok_or_else(|| AdapterError::ModelNotFound {
                table: db_table.to_string(),
            })
    }

    /// Resolve a relation target: `app.Model`, a model of `from`'s app, or a table name
    pub fn resolve_reference(&self, from: &Model, reference: &str) -> Result<&Model> {
        if let Some(model) = self.get(reference) {
            return Ok(model);
        }
        if let Some(model) = self.get(&format!("{}.{}", from.app_label, reference)) {
            return Ok(model);
        }
        self.by_table(reference)
    }

    /// The model and field a relation field points to
    pub fn related_field(&self, from: &Model, field: &Field) -> Result<(&Model, &Field)> {
        let Some(relation) = &field.relation else {
            return Err(AdapterError::UnknownField {
                model: from.label(),
                field: field.name.clone(),
            });
        };
        let target = self.resolve_reference(from, &relation.to)?;
        let target_field = match &relation.to_field {
            Some(name) => target.field(name)?,
            None => target.primary_key().ok_or_else(|| AdapterError::UnknownField {
                model: target.label(),
                field: "<primary key>".to_string(),
            })?,
        };
        Ok((target, target_field))
    }
}
