//! DDL orchestration for model creation
//!
//! A session runs `Init -> ColumnsProcessed -> TableEmitted -> DeferredFlushed`.
//! Every fragment is built before the first statement is executed, so a
//! failure while building leaves nothing half-applied.

use crate::backend::{BackendProfile, Connection, DatabaseOperations, SqlParam};
use crate::config::{CheckCategory, Settings};
use crate::error::{AdapterError, Result};
use crate::model::{Field, Model, ModelRegistry};
use crate::naming::{NameBuilder, ObjectType};
use crate::render::SqlFormatter;
use crate::render::sql::{
    ForeignKeyClause, render_check, render_column_comment, render_create_index, render_create_table,
    render_foreign_key, render_primary_key, render_unique,
};
use crate::schema::deferred::{DeferredCategory, DeferredStatements};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Init,
    ColumnsProcessed,
    TableEmitted,
    DeferredFlushed,
}

pub struct SchemaEditor<'a> {
    connection: &'a mut dyn Connection,
    profile: &'a BackendProfile,
    models: &'a ModelRegistry,
    settings: Arc<Settings>,
    operations: DatabaseOperations<'a>,
    name_builder: Box<dyn NameBuilder>,
    formatter: SqlFormatter,
    collect_sql: bool,
    collected_sql: Vec<String>,
    deferred_sql: Vec<String>,
    deferred_column_sql: DeferredStatements,
    deferred_table_sql: DeferredStatements,
    state: EditorState,
}

impl<'a> SchemaEditor<'a> {
    pub fn new(
        connection: &'a mut dyn Connection,
        profile: &'a BackendProfile,
        models: &'a ModelRegistry,
        settings: Arc<Settings>,
    ) -> Result<Self> {
        let operations = DatabaseOperations::new(profile, settings.clone())?;
        let name_builder = settings.make_name_builder()?;
        let formatter = SqlFormatter::new(settings.sql_format_options().clone());
        Ok(Self {
            connection,
            profile,
            models,
            settings,
            operations,
            name_builder,
            formatter,
            collect_sql: false,
            collected_sql: Vec::new(),
            deferred_sql: Vec::new(),
            deferred_column_sql: DeferredStatements::new(),
            deferred_table_sql: DeferredStatements::new(),
            state: EditorState::Init,
        })
    }

    /// Collect formatted statements instead of executing them
    pub fn collect_sql(mut self) -> Self {
        self.collect_sql = true;
        self
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn collected_sql(&self) -> &[String] {
        &self.collected_sql
    }

    pub fn into_collected_sql(self) -> Vec<String> {
        self.collected_sql
    }

    /// Statements to run after the `CREATE TABLE`, in flush order
    pub fn deferred_sql(&self) -> &[String] {
        &self.deferred_sql
    }

    pub fn deferred_column_sql(&self) -> &DeferredStatements {
        &self.deferred_column_sql
    }

    pub fn deferred_table_sql(&self) -> &DeferredStatements {
        &self.deferred_table_sql
    }

    pub fn operations(&self) -> &DatabaseOperations<'a> {
        &self.operations
    }

    pub fn quote_name(&self, name: &str) -> String {
        self.connection.quote_name(name)
    }

    /// Column definition for `field`, deferring its constraints, index,
    /// autoincrement and comment statements.
    ///
    /// Returns `None` for fields without a physical column.
    pub fn column_sql(
        &mut self,
        model: &Model,
        field: &Field,
    ) -> Result<Option<(String, Vec<SqlParam>)>> {
        if !field.has_column() {
            return Ok(None);
        }
        let Some(mut sql) = self.column_type(model, field)? else {
            return Ok(None);
        };

        if field.null && !self.connection.implied_column_null() {
            sql.push_str(" NULL");
        }

        let column = field.column();
        let qn_column = self.quote_name(&column);

        if !field.null {
            let qualifier = self.settings.check_qualifier(Some(CheckCategory::NotNull)).to_string();
            let name = self.check_constraint_name(model, field, &qualifier)?;
            let check = format!("{} IS NOT NULL", qn_column);
            let statement = self.create_check_sql(model, &name, &check)?;
            self.deferred_column_sql.push(DeferredCategory::Check, statement);
        }

        if let Some(check) = self.profile.check_constraint(field.field_type, &qn_column)? {
            let qualifier = self
                .settings
                .check_qualifier(field.field_type.check_category())
                .to_string();
            let name = self.check_constraint_name(model, field, &qualifier)?;
            let statement = self.create_check_sql(model, &name, &check)?;
            self.deferred_column_sql.push(DeferredCategory::Check, statement);
        }

        if field.primary_key {
            let statement = self.create_primary_key_sql(model, field)?;
            self.deferred_column_sql.push(DeferredCategory::PrimaryKey, statement);
        } else if field.unique {
            let statement = self.create_unique_sql(model, &[field])?;
            self.deferred_column_sql.push(DeferredCategory::Unique, statement);
        }

        if field.constrained_relation().is_some() {
            let statement = self.create_fk_sql(model, field)?;
            self.deferred_column_sql.push(DeferredCategory::ForeignKey, statement);
        }

        if field.db_index && !field.primary_key && !field.unique {
            let statement = self.create_index_sql(model, &[field], None)?;
            self.deferred_column_sql.push(DeferredCategory::Index, statement);
        }

        if field.field_type.is_auto() {
            if let Some(statements) = self.operations.autoinc_sql(model, &column)? {
                self.deferred_column_sql
                    .extend(DeferredCategory::Autoincrement, statements);
            }
        }

        if let Some(comment) = field.help_text.as_deref().filter(|c| !c.is_empty()) {
            let statement = self.comment_sql(model, field, comment)?;
            self.deferred_column_sql.push(DeferredCategory::Comment, statement);
        }

        Ok(Some((sql, Vec::new())))
    }

    // Relation columns take the type of the field they reference
    fn column_type(&self, model: &Model, field: &Field) -> Result<Option<String>> {
        if !field.field_type.is_relation() {
            return self.profile.db_type(field.field_type, field);
        }

        let mut owner = model;
        let mut target = field;
        for _ in 0..=self.models.len() {
            let (next_owner, next_target) = self.models.related_field(owner, target)?;
            owner = next_owner;
            target = next_target;
            if !target.field_type.is_relation() {
                return self.profile.db_type(target.field_type.rel_type(), target);
            }
        }

        Err(AdapterError::UnknownField {
            model: model.label(),
            field: field.name.clone(),
        })
    }

    /// The `CREATE TABLE` statement for `model`, deferring table-level
    /// uniques, indexes and the table grant.
    pub fn table_sql(&mut self, model: &Model) -> Result<(String, Vec<SqlParam>)> {
        self.deferred_column_sql.clear();
        self.deferred_table_sql.clear();
        self.state = EditorState::Init;

        let mut column_sqls = Vec::new();
        let mut params = Vec::new();

        for field in model.local_fields() {
            let Some((definition, extra_params)) = self.column_sql(model, field)? else {
                continue;
            };
            params.extend(extra_params);
            column_sqls.push(format!("{} {}", self.quote_name(&field.column()), definition));
        }

        let sql = render_create_table(
            &self.profile.templates.create_table,
            &self.quote_name(&model.db_table),
            &column_sqls,
            &self.profile.column_separator,
        )?;

        for names in &model.unique_together {
            let fields = model.enforce_model_fields(names)?;
            let statement = self.create_unique_sql(model, &fields)?;
            self.deferred_table_sql.push(DeferredCategory::Unique, statement);
        }

        for index in &model.indexes {
            let fields = model.enforce_model_fields(&index.fields)?;
            let statement = self.create_index_sql(model, &fields, index.name.as_deref())?;
            self.deferred_table_sql.push(DeferredCategory::Index, statement);
        }

        if let Some(grant) = self
            .operations
            .control_sql(&self.quote_name(&model.db_table), None)?
        {
            self.deferred_table_sql.push(DeferredCategory::Control, grant);
        }

        self.state = EditorState::ColumnsProcessed;
        Ok((sql, params))
    }

    /// Emit the `CREATE TABLE` and queue every deferred statement in the
    /// configured category order, column-level before table-level.
    pub fn create_model(&mut self, model: &Model) -> Result<()> {
        let (sql, params) = self.table_sql(model)?;
        let order = self.settings.deferred_sql_order()?.to_vec();

        if !sql.is_empty() {
            self.execute(&sql, &params)?;
        }
        self.state = EditorState::TableEmitted;

        let queued = self.deferred_sql.len();
        for category in order {
            self.deferred_sql
                .extend(self.deferred_column_sql.get(category).iter().cloned());
            self.deferred_sql
                .extend(self.deferred_table_sql.get(category).iter().cloned());
        }
        self.state = EditorState::DeferredFlushed;

        info!(
            table = %model.db_table,
            deferred = self.deferred_sql.len() - queued,
            "Created model"
        );
        Ok(())
    }

    /// Create the model registered under `db_table`
    pub fn create_model_for_table(&mut self, db_table: &str) -> Result<()> {
        let models = self.models;
        let model = models.by_table(db_table)?;
        self.create_model(model)
    }

    /// Execute the queued deferred statements
    pub fn finish(&mut self) -> Result<()> {
        let deferred = std::mem::take(&mut self.deferred_sql);
        debug!(statements = deferred.len(), "Executing deferred statements");
        for sql in deferred {
            self.execute(&sql, &[])?;
        }
        Ok(())
    }

    pub fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<()> {
        if !self.collect_sql
            && self.connection.in_atomic_block()
            && !self.connection.can_rollback_ddl()
        {
            return Err(AdapterError::TransactionPolicy);
        }

        debug!(sql, params = ?params, "Executing DDL");

        if self.collect_sql {
            let mut statement = self.formatter.format(sql);
            if !params.is_empty() {
                statement = substitute_params(&statement, params, |param| {
                    self.connection.quote_value(param)
                });
            }
            if !statement.ends_with(&self.profile.sql_ending) {
                statement.push_str(&self.profile.sql_ending);
            }
            self.collected_sql.push(statement);
        } else {
            self.connection.execute(sql, params)?;
        }
        Ok(())
    }

    /// Quoted object name from the configured name builder
    pub fn object_name(
        &self,
        model: &Model,
        fields: &[&Field],
        object_type: ObjectType,
        qualifier: &str,
        include_namespace: bool,
    ) -> Result<String> {
        let columns: Vec<String> = fields.iter().map(|field| field.column()).collect();
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        let name = self
            .name_builder
            .build(&model.db_table, &columns, object_type, qualifier, include_namespace)?;
        Ok(self.quote_name(&name))
    }

    pub fn check_constraint_name(
        &self,
        model: &Model,
        field: &Field,
        qualifier: &str,
    ) -> Result<String> {
        self.object_name(model, &[field], ObjectType::Check, qualifier, false)
    }

    fn quoted_columns(&self, fields: &[&Field]) -> Vec<String> {
        fields
            .iter()
            .map(|field| self.quote_name(&field.column()))
            .collect()
    }

    pub fn create_primary_key_sql(&self, model: &Model, field: &Field) -> Result<String> {
        render_primary_key(
            &self.profile.templates.create_pk,
            &self.quote_name(&model.db_table),
            &self.object_name(model, &[field], ObjectType::PrimaryKey, "", false)?,
            &self.quoted_columns(&[field]),
        )
    }

    pub fn create_unique_sql(&self, model: &Model, fields: &[&Field]) -> Result<String> {
        render_unique(
            &self.profile.templates.create_unique,
            &self.quote_name(&model.db_table),
            &self.object_name(model, fields, ObjectType::Unique, "", false)?,
            &self.quoted_columns(fields),
        )
    }

    pub fn create_fk_sql(&self, model: &Model, field: &Field) -> Result<String> {
        let (target_model, target_field) = self.models.related_field(model, field)?;
        render_foreign_key(
            &self.profile.templates.create_fk,
            &ForeignKeyClause {
                table: &self.quote_name(&model.db_table),
                name: &self.object_name(model, &[field], ObjectType::ForeignKey, "", false)?,
                column: &self.quote_name(&field.column()),
                to_table: &self.quote_name(&target_model.db_table),
                to_column: &self.quote_name(&target_field.column()),
                deferrable: self.connection.deferrable_sql(),
            },
        )
    }

    /// CREATE INDEX over `fields`; an explicit `name` bypasses the name builder
    pub fn create_index_sql(
        &self,
        model: &Model,
        fields: &[&Field],
        name: Option<&str>,
    ) -> Result<String> {
        let name = match name {
            Some(name) => self.quote_name(name),
            None => self.object_name(model, fields, ObjectType::Index, "", true)?,
        };
        render_create_index(
            &self.profile.templates.create_index,
            &self.quote_name(&model.db_table),
            &name,
            &self.quoted_columns(fields),
        )
    }

    pub fn create_check_sql(&self, model: &Model, name: &str, check: &str) -> Result<String> {
        render_check(
            &self.profile.templates.create_check,
            &self.quote_name(&model.db_table),
            name,
            check,
        )
    }

    pub fn comment_sql(&self, model: &Model, field: &Field, comment: &str) -> Result<String> {
        render_column_comment(
            &self.profile.templates.comment_on_column,
            &self.quote_name(&model.db_table),
            &self.quote_name(&field.column()),
            comment,
        )
    }
}

// Replace each `%s` marker with the next parameter literal
fn substitute_params(
    sql: &str,
    params: &[SqlParam],
    quote: impl Fn(&SqlParam) -> String,
) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut params = params.iter();
    let mut rest = sql;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match params.next() {
            Some(param) => out.push_str(&quote(param)),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
