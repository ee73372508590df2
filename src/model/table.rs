use crate::error::{AdapterError, Result};
use crate::model::field::Field;
use serde::{Deserialize, Serialize};

/// An explicitly declared index over one or more fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexDef {
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Model metadata consumed from the ORM
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    #[serde(default)]
    pub app_label: String,
    pub name: String,
    /// Defaults to `<app_label>_<name>` in lowercase when empty
    #[serde(default)]
    pub db_table: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_together: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDef>,
}

impl Model {
    pub fn new(
        app_label: impl Into<String>,
        name: impl Into<String>,
        db_table: impl Into<String>,
    ) -> Self {
        Self {
            app_label: app_label.into(),
            name: name.into(),
            db_table: db_table.into(),
            fields: Vec::new(),
            unique_together: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_unique_together(mut self, fields: &[&str]) -> Self {
        self.unique_together
            .push(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn with_index(mut self, fields: &[&str]) -> Self {
        self.indexes.push(IndexDef {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            name: None,
        });
        self
    }

    /// `app_label.Name`
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.name)
    }

    pub fn default_db_table(&self) -> String {
        format!("{}_{}", self.app_label, self.name).to_lowercase()
    }

    pub fn local_fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.primary_key)
    }

    pub fn field(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| AdapterError::UnknownField {
                model: self.label(),
                field: name.to_string(),
            })
    }

    pub fn field_by_column(&self, column: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|field| field.column() == column)
            .ok_or_else(|| AdapterError::FieldNotFound {
                model: self.label(),
                column: column.to_string(),
            })
    }

    /// Resolve references given as strings to the model's fields.
    ///
    /// A reference names a column or, failing that, a field, so both
    /// `unique_together` entries and backend column lists resolve here.
    pub fn enforce_model_fields<S: AsRef<str>>(&self, references: &[S]) -> Result<Vec<&Field>> {
        references
            .iter()
            .map(|reference| {
                let reference = reference.as_ref();
                self.fields
                    .iter()
                    .find(|field| field.column() == reference)
                    .or_else(|| self.fields.iter().find(|field| field.name == reference))
                    .ok_or_else(|| AdapterError::FieldNotFound {
                        model: self.label(),
                        column: reference.to_string(),
                    })
            })
            .collect()
    }
}
