//! Autoincrement emulation and grant statements

use crate::backend::profile::BackendProfile;
use crate::config::Settings;
use crate::error::{AdapterError, Result};
use crate::model::Model;
use crate::naming::{NameBuilder, ObjectType, split_identifier};
use crate::render::sql::{
    SequenceParams, render_create_sequence, render_create_trigger, render_grant, requires_range,
};
use std::sync::Arc;
use tracing::debug;

pub struct DatabaseOperations<'a> {
    profile: &'a BackendProfile,
    settings: Arc<Settings>,
    name_builder: Box<dyn NameBuilder>,
}

impl<'a> DatabaseOperations<'a> {
    pub fn new(profile: &'a BackendProfile, settings: Arc<Settings>) -> Result<Self> {
        let name_builder = settings.make_name_builder()?;
        Ok(Self {
            profile,
            settings,
            name_builder,
        })
    }

    pub fn profile(&self) -> &BackendProfile {
        self.profile
    }

    pub fn sequence_name(&self, db_table: &str, column: &str) -> Result<String> {
        self.object_name(db_table, column, ObjectType::Sequence)
    }

    pub fn trigger_name(&self, db_table: &str, column: &str) -> Result<String> {
        self.object_name(db_table, column, ObjectType::Trigger)
    }

    // Qualified names are quoted like the table so both land in the same schema
    fn object_name(&self, db_table: &str, column: &str, object_type: ObjectType) -> Result<String> {
        let name = self.name_builder.build(db_table, &[column], object_type, "", true)?;
        let (namespace, _) = split_identifier(&name);
        if namespace.is_empty() {
            Ok(name)
        } else {
            Ok(self.profile.quote_style.quote_name(&name))
        }
    }

    /// Sequence and trigger statements emulating autoincrement on `column`.
    ///
    /// Returns `None` when the backend has neither template. The sequence is
    /// followed by a SELECT grant when a role is configured. Fails with
    /// [`AdapterError::MissingRange`] when the sequence template needs the
    /// column type's range and the type has none.
    pub fn autoinc_sql(&self, model: &Model, column: &str) -> Result<Option<Vec<String>>> {
        if !self.profile.emulates_autoincrement() {
            return Ok(None);
        }
        let templates = &self.profile.templates;

        let field = model.field_by_column(column)?;
        let range = self.profile.integer_range(field.field_type);
        let sq_name = self.sequence_name(&model.db_table, column)?;
        let tr_name = self.trigger_name(&model.db_table, column)?;
        let tbl_name = self.profile.quote_style.quote_name(&model.db_table);
        let col_name = self.profile.quote_style.quote_name(column);

        let params = SequenceParams {
            sq_name: &sq_name,
            tr_name: &tr_name,
            tbl_name: &tbl_name,
            col_name: &col_name,
            range,
        };

        let mut output = Vec::new();

        if let Some(template) = &templates.create_sequence {
            if range.is_none() && requires_range(template)? {
                return Err(AdapterError::MissingRange {
                    field: field.name.clone(),
                    internal_type: field.field_type.internal_type().to_string(),
                });
            }
            output.push(render_create_sequence(template, &params)?);

            if let Some(grant) = self.control_sql(&sq_name, Some(&["SELECT".to_string()]))? {
                output.push(grant);
            }
        }

        if let Some(template) = &templates.create_trigger {
            output.push(render_create_trigger(template, &params)?);
        }

        debug!(
            table = %model.db_table,
            column,
            sequence = %sq_name,
            trigger = %tr_name,
            "Built autoincrement statements"
        );
        Ok(Some(output))
    }

    /// GRANT of `privileges` (default: the configured privileges) on `name`.
    ///
    /// Returns `None` when no role is configured.
    pub fn control_sql(&self, name: &str, privileges: Option<&[String]>) -> Result<Option<String>> {
        let role = self.settings.role_name();
        if role.is_empty() {
            return Ok(None);
        }
        let privileges = privileges.unwrap_or_else(|| self.settings.privileges());
        render_grant(&self.profile.templates.grant, privileges, name, role).map(Some)
    }
}
