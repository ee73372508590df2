use crate::naming::{NameBuilderRef, ObjectType};
use crate::schema::DeferredCategory;
use clap::Args;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Project file layout; only the `DB_ADAPTER` block is read
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectFile {
    #[serde(rename = "DB_ADAPTER", default, skip_serializing_if = "Option::is_none")]
    pub db_adapter: Option<SettingsInput>,
}

/// Raw user overrides - all fields Optional for merging over defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct SettingsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_db_table_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_db_table_formats: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_db_table_normalization: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sequence_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_trigger_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_primary_key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_foreign_key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_unique_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_check_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaced_object_types: Option<Vec<ObjectType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_qualifiers: Option<BTreeMap<CheckCategory, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_privileges: Option<Vec<String>>,

    /// `None`: not configured; `Some(None)`: explicitly `null`
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_name_builder_class: Option<Option<NameBuilderRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_format_options: Option<SqlFormatInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_sql_order: Option<Vec<DeferredCategory>>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Semantic field categories that select a check constraint qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    NotNull,
    Boolean,
    Positive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterCase {
    Upper,
    Lower,
    Capitalize,
    #[default]
    Preserve,
}

/// SQL formatting overrides, merged per key over the defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SqlFormatInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_case: Option<LetterCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_case: Option<LetterCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unquote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reindent: Option<bool>,
}

/// Resolved SQL formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlFormatOptions {
    pub keyword_case: LetterCase,
    pub identifier_case: LetterCase,
    pub unquote: bool,
    pub strip_comments: bool,
    pub reindent: bool,
}

/// Default values for every known setting
#[derive(Debug, Clone)]
pub struct Defaults {
    pub db_table_format: String,
    pub ignore_db_table_formats: Vec<String>,
    pub enable_db_table_normalization: bool,
    pub sequence_name: String,
    pub trigger_name: String,
    pub index_name: String,
    pub primary_key_name: String,
    pub foreign_key_name: String,
    pub unique_name: String,
    pub check_name: String,
    pub namespaced_object_types: Vec<ObjectType>,
    pub check_qualifiers: BTreeMap<CheckCategory, String>,
    pub role_name: String,
    pub privileges: Vec<String>,
    pub name_builder_class: Option<NameBuilderRef>,
    pub sql_format_options: SqlFormatOptions,
    pub deferred_sql_order: Vec<DeferredCategory>,
}

// CLI argument group for settings overrides
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    #[arg(long, global = true, help = "Table name format, e.g. '\"ns\".\"tbl_{table_name}\"'")]
    pub table_format: Option<String>,

    #[arg(long, global = true, help = "Disable table name normalization")]
    pub no_table_normalization: bool,

    #[arg(long, global = true, help = "Role receiving grants on created objects")]
    pub role: Option<String>,

    #[arg(long, global = true, value_delimiter = ',', help = "Privileges granted to the role")]
    pub privileges: Option<Vec<String>>,
}

impl From<SettingsArgs> for SettingsInput {
    fn from(args: SettingsArgs) -> Self {
        Self {
            default_db_table_format: args.table_format,
            enable_db_table_normalization: if args.no_table_normalization {
                Some(false)
            } else {
                None
            },
            default_role_name: args.role,
            default_privileges: args.privileges,
            ..Default::default()
        }
    }
}

impl CheckCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCategory::NotNull => "not_null",
            CheckCategory::Boolean => "boolean",
            CheckCategory::Positive => "positive",
        }
    }
}
