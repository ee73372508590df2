//! Model fixtures shared by the integration tests

use anyhow::Result;
use db_adapter::backend::{BackendProfile, RecordingConnection};
use db_adapter::config::{Settings, SettingsInput};
use db_adapter::model::{Field, FieldType, Model, ModelRegistry};
use db_adapter::schema::SchemaEditor;
use std::sync::Arc;

pub fn author() -> Model {
    Model::new("tests", "Author", "tbl_author")
        .with_field(Field::new("id", FieldType::AutoField).with_primary_key())
}

pub fn tag() -> Model {
    Model::new("tests", "Tag", "tbl_tag")
        .with_field(Field::new("id", FieldType::AutoField).with_primary_key())
        .with_field(
            Field::new("name", FieldType::CharField)
                .with_max_length(100)
                .with_unique(),
        )
        .with_field(
            Field::new("description", FieldType::TextField)
                .with_null()
                .with_help_text("Optional description for tag"),
        )
}

pub fn post() -> Model {
    Model::new("tests", "Post", "tbl_post")
        .with_field(Field::new("id", FieldType::AutoField).with_primary_key())
        .with_field(Field::new("text", FieldType::TextField))
        .with_field(
            Field::new("name", FieldType::CharField)
                .with_max_length(30)
                .with_null(),
        )
        .with_field(
            Field::new("author", FieldType::ForeignKey)
                .references("Author")
                .with_db_column("written_by"),
        )
        .with_field(
            Field::new("tag", FieldType::ForeignKey)
                .references("Tag")
                .with_null(),
        )
}

pub fn article() -> Model {
    Model::new("tests", "Article", "tbl_article")
        .with_field(Field::new("article_id", FieldType::BigAutoField).with_primary_key())
        .with_field(Field::new("name", FieldType::CharField).with_max_length(30))
        .with_field(
            Field::new("text", FieldType::TextField)
                .with_null()
                .with_help_text("Article description"),
        )
        .with_field(Field::new("active", FieldType::BooleanField).with_null())
        .with_field(
            Field::new("author", FieldType::ForeignKey)
                .references("Author")
                .with_db_column("written_by")
                .with_null(),
        )
        .with_field(
            Field::new("tag", FieldType::ForeignKey)
                .references("Tag")
                .with_null(),
        )
        .with_unique_together(&["author", "name"])
        .with_index(&["tag"])
}

pub fn square() -> Model {
    Model::new("tests", "Square", "tbl_square")
        .with_field(Field::new("id", FieldType::AutoField).with_primary_key())
        .with_field(Field::new("side", FieldType::PositiveIntegerField).with_null())
}

pub fn settings(input: SettingsInput) -> Arc<Settings> {
    Arc::new(Settings::with_defaults().with_overrides(input))
}

pub fn with_role(role: &str) -> SettingsInput {
    SettingsInput {
        default_role_name: Some(role.to_string()),
        ..Default::default()
    }
}

/// Every fixture model registered under `settings`
pub fn registry(settings: &Settings) -> Result<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    registry.register_all([author(), tag(), post(), article(), square()], settings)?;
    Ok(registry)
}

/// Collected SQL of creating the model registered under `db_table`,
/// deferred statements included
pub fn create_model_sql(
    profile: &BackendProfile,
    settings: Arc<Settings>,
    db_table: &str,
) -> Result<Vec<String>> {
    let registry = registry(&settings)?;
    let mut connection = RecordingConnection::new(profile);
    let mut editor =
        SchemaEditor::new(&mut connection, profile, &registry, settings)?.collect_sql();
    editor.create_model_for_table(db_table)?;
    editor.finish()?;
    Ok(editor.into_collected_sql())
}
