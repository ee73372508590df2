//! Object name building from per-type naming patterns

use crate::config::Settings;
use crate::error::{AdapterError, Result};
use crate::naming::identifier::{TableIdentifier, compose_identifier};
use crate::naming::pattern::Template;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of database object being named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Sequence,
    Trigger,
    Index,
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
}

impl ObjectType {
    pub const ALL: [ObjectType; 7] = [
        ObjectType::Sequence,
        ObjectType::Trigger,
        ObjectType::Index,
        ObjectType::PrimaryKey,
        ObjectType::ForeignKey,
        ObjectType::Unique,
        ObjectType::Check,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Sequence => "sequence",
            ObjectType::Trigger => "trigger",
            ObjectType::Index => "index",
            ObjectType::PrimaryKey => "primary_key",
            ObjectType::ForeignKey => "foreign_key",
            ObjectType::Unique => "unique",
            ObjectType::Check => "check",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        ObjectType::ALL
            .into_iter()
            .find(|object_type| object_type.as_str() == s)
            .ok_or_else(|| AdapterError::UnknownObjectType {
                name: s.to_string(),
            })
    }
}

/// One naming pattern per object type
#[derive(Debug, Clone)]
pub struct NamePatterns {
    pub sequence: Template,
    pub trigger: Template,
    pub index: Template,
    pub primary_key: Template,
    pub foreign_key: Template,
    pub unique: Template,
    pub check: Template,
}

impl NamePatterns {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            sequence: Template::parse(settings.sequence_name())?,
            trigger: Template::parse(settings.trigger_name())?,
            index: Template::parse(settings.index_name())?,
            primary_key: Template::parse(settings.primary_key_name())?,
            foreign_key: Template::parse(settings.foreign_key_name())?,
            unique: Template::parse(settings.unique_name())?,
            check: Template::parse(settings.check_name())?,
        })
    }

    pub fn get(&self, object_type: ObjectType) -> &Template {
        match object_type {
            ObjectType::Sequence => &self.sequence,
            ObjectType::Trigger => &self.trigger,
            ObjectType::Index => &self.index,
            ObjectType::PrimaryKey => &self.primary_key,
            ObjectType::ForeignKey => &self.foreign_key,
            ObjectType::Unique => &self.unique,
            ObjectType::Check => &self.check,
        }
    }
}

/// Strategy for naming database objects derived from a model's table
pub trait NameBuilder: Send + Sync {
    /// Build the name of an object of `object_type` on `db_table` involving `columns`.
    ///
    /// The same inputs must always produce the same name.
    fn build(
        &self,
        db_table: &str,
        columns: &[&str],
        object_type: ObjectType,
        qualifier: &str,
        include_namespace: bool,
    ) -> Result<String>;

    /// Policy hook deciding which object types may carry the table namespace
    fn should_include_namespace(&self, _object_type: ObjectType) -> bool {
        true
    }
}

/// Default [`NameBuilder`] interpolating the configured naming patterns.
///
/// Patterns may use `{table}`, `{table_name}`, `{columns}`, `{name}`,
/// `{qualifier}` and any extra placeholder captured by the table format.
#[derive(Debug, Clone)]
pub struct PatternNameBuilder {
    table_format: String,
    patterns: NamePatterns,
    namespaced_types: Vec<ObjectType>,
}

impl PatternNameBuilder {
    pub fn new(
        table_format: impl Into<String>,
        patterns: NamePatterns,
        namespaced_types: Vec<ObjectType>,
    ) -> Self {
        Self {
            table_format: table_format.into(),
            patterns,
            namespaced_types,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.db_table_format(),
            NamePatterns::from_settings(settings)?,
            settings.namespaced_object_types().to_vec(),
        ))
    }

    /// Factory registered under [`PatternNameBuilder::PATH`]
    pub fn factory(settings: &Settings) -> Result<Box<dyn NameBuilder>> {
        Ok(Box::new(Self::from_settings(settings)?))
    }

    pub const PATH: &'static str = "db_adapter::naming::PatternNameBuilder";
}

impl NameBuilder for PatternNameBuilder {
    fn build(
        &self,
        db_table: &str,
        columns: &[&str],
        object_type: ObjectType,
        qualifier: &str,
        include_namespace: bool,
    ) -> Result<String> {
        let parts = TableIdentifier::parse(db_table, &self.table_format)?;

        let columns = columns.join("_");
        let name = if columns.is_empty() {
            parts.table_name.clone()
        } else {
            format!("{}_{}", parts.table_name, columns)
        };

        let mut values = parts.template_values();
        values.insert("columns", columns);
        values.insert("name", name);
        values.insert("qualifier", qualifier);

        let object_name = self.patterns.get(object_type).render(&values)?;

        if parts.is_namespaced() && include_namespace && self.should_include_namespace(object_type)
        {
            return Ok(compose_identifier(&parts.namespace, &object_name));
        }

        Ok(object_name)
    }

    fn should_include_namespace(&self, object_type: ObjectType) -> bool {
        self.namespaced_types.contains(&object_type)
    }
}
