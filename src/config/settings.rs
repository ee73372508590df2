//! Lazily resolved adapter settings
//!
//! Every option is resolved on first access (user override, else default) and
//! cached per key. Dict-valued options merge the override into the default per
//! inner key. The name builder reference is resolved through a
//! [`NameBuilderRegistry`].

use crate::config::types::*;
use crate::error::{AdapterError, Result};
use crate::naming::{
    NameBuilder, NameBuilderFactory, NameBuilderRef, NameBuilderRegistry, ObjectType,
    PatternNameBuilder,
};
use crate::schema::DeferredCategory;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Every option key known to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    DefaultDbTableFormat,
    IgnoreDbTableFormats,
    EnableDbTableNormalization,
    DefaultSequenceName,
    DefaultTriggerName,
    DefaultIndexName,
    DefaultPrimaryKeyName,
    DefaultForeignKeyName,
    DefaultUniqueName,
    DefaultCheckName,
    NamespacedObjectTypes,
    CheckQualifiers,
    DefaultRoleName,
    DefaultPrivileges,
    DefaultNameBuilderClass,
    SqlFormatOptions,
    DeferredSqlOrder,
}

impl SettingKey {
    pub const ALL: [SettingKey; 17] = [
        SettingKey::DefaultDbTableFormat,
        SettingKey::IgnoreDbTableFormats,
        SettingKey::EnableDbTableNormalization,
        SettingKey::DefaultSequenceName,
        SettingKey::DefaultTriggerName,
        SettingKey::DefaultIndexName,
        SettingKey::DefaultPrimaryKeyName,
        SettingKey::DefaultForeignKeyName,
        SettingKey::DefaultUniqueName,
        SettingKey::DefaultCheckName,
        SettingKey::NamespacedObjectTypes,
        SettingKey::CheckQualifiers,
        SettingKey::DefaultRoleName,
        SettingKey::DefaultPrivileges,
        SettingKey::DefaultNameBuilderClass,
        SettingKey::SqlFormatOptions,
        SettingKey::DeferredSqlOrder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::DefaultDbTableFormat => "DEFAULT_DB_TABLE_FORMAT",
            SettingKey::IgnoreDbTableFormats => "IGNORE_DB_TABLE_FORMATS",
            SettingKey::EnableDbTableNormalization => "ENABLE_DB_TABLE_NORMALIZATION",
            SettingKey::DefaultSequenceName => "DEFAULT_SEQUENCE_NAME",
            SettingKey::DefaultTriggerName => "DEFAULT_TRIGGER_NAME",
            SettingKey::DefaultIndexName => "DEFAULT_INDEX_NAME",
            SettingKey::DefaultPrimaryKeyName => "DEFAULT_PRIMARY_KEY_NAME",
            SettingKey::DefaultForeignKeyName => "DEFAULT_FOREIGN_KEY_NAME",
            SettingKey::DefaultUniqueName => "DEFAULT_UNIQUE_NAME",
            SettingKey::DefaultCheckName => "DEFAULT_CHECK_NAME",
            SettingKey::NamespacedObjectTypes => "NAMESPACED_OBJECT_TYPES",
            SettingKey::CheckQualifiers => "CHECK_QUALIFIERS",
            SettingKey::DefaultRoleName => "DEFAULT_ROLE_NAME",
            SettingKey::DefaultPrivileges => "DEFAULT_PRIVILEGES",
            SettingKey::DefaultNameBuilderClass => "DEFAULT_NAME_BUILDER_CLASS",
            SettingKey::SqlFormatOptions => "SQL_FORMAT_OPTIONS",
            SettingKey::DeferredSqlOrder => "DEFERRED_SQL_ORDER",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| AdapterError::UnknownSetting {
                name: s.to_string(),
            })
    }
}

/// A resolved option value, as returned by [`Settings::get`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Str(String),
    Bool(bool),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    Builder(Option<NameBuilderRef>),
    Format(SqlFormatOptions),
}

#[derive(Debug, Default)]
struct SettingsCache {
    db_table_format: OnceCell<String>,
    ignore_db_table_formats: OnceCell<Vec<String>>,
    enable_db_table_normalization: OnceCell<bool>,
    sequence_name: OnceCell<String>,
    trigger_name: OnceCell<String>,
    index_name: OnceCell<String>,
    primary_key_name: OnceCell<String>,
    foreign_key_name: OnceCell<String>,
    unique_name: OnceCell<String>,
    check_name: OnceCell<String>,
    namespaced_object_types: OnceCell<Vec<ObjectType>>,
    check_qualifiers: OnceCell<BTreeMap<CheckCategory, String>>,
    role_name: OnceCell<String>,
    privileges: OnceCell<Vec<String>>,
    name_builder: OnceCell<Option<NameBuilderFactory>>,
    sql_format_options: OnceCell<SqlFormatOptions>,
    deferred_sql_order: OnceCell<Vec<DeferredCategory>>,
}

/// The settings resolver: user overrides layered over [`Defaults`]
#[derive(Debug)]
pub struct Settings {
    user: SettingsInput,
    defaults: Defaults,
    registry: NameBuilderRegistry,
    cache: SettingsCache,
}

fn resolve<'a, T: Clone>(
    key: SettingKey,
    cell: &'a OnceCell<T>,
    user: &Option<T>,
    default: &T,
) -> &'a T {
    cell.get_or_init(|| {
        debug!(setting = %key, overridden = user.is_some(), "Resolving setting");
        user.clone().unwrap_or_else(|| default.clone())
    })
}

impl Settings {
    pub fn new(user: SettingsInput, registry: NameBuilderRegistry) -> Self {
        Self {
            user,
            defaults: Defaults::default(),
            registry,
            cache: SettingsCache::default(),
        }
    }

    /// A settings snapshot using only the defaults
    pub fn with_defaults() -> Self {
        Self::new(SettingsInput::default(), NameBuilderRegistry::default())
    }

    /// A new snapshot over `user`, sharing this resolver's registry
    pub fn with_overrides(&self, user: SettingsInput) -> Self {
        Self::new(user, self.registry.clone())
    }

    /// Drop every cached value; the next access resolves again
    pub fn reload(&mut self) {
        debug!(cached = self.cached_keys().len(), "Dropping cached settings");
        self.cache = SettingsCache::default();
    }

    pub fn user_overrides(&self) -> &SettingsInput {
        &self.user
    }

    pub fn registry(&self) -> &NameBuilderRegistry {
        &self.registry
    }

    pub fn db_table_format(&self) -> &str {
        resolve(
            SettingKey::DefaultDbTableFormat,
            &self.cache.db_table_format,
            &self.user.default_db_table_format,
            &self.defaults.db_table_format,
        )
        .as_str()
    }

    pub fn ignore_db_table_formats(&self) -> &[String] {
        resolve(
            SettingKey::IgnoreDbTableFormats,
            &self.cache.ignore_db_table_formats,
            &self.user.ignore_db_table_formats,
            &self.defaults.ignore_db_table_formats,
        )
        .as_slice()
    }

    pub fn enable_db_table_normalization(&self) -> bool {
        *resolve(
            SettingKey::EnableDbTableNormalization,
            &self.cache.enable_db_table_normalization,
            &self.user.enable_db_table_normalization,
            &self.defaults.enable_db_table_normalization,
        )
    }

    pub fn sequence_name(&self) -> &str {
        resolve(
            SettingKey::DefaultSequenceName,
            &self.cache.sequence_name,
            &self.user.default_sequence_name,
            &self.defaults.sequence_name,
        )
        .as_str()
    }

    pub fn trigger_name(&self) -> &str {
        resolve(
            SettingKey::DefaultTriggerName,
            &self.cache.trigger_name,
            &self.user.default_trigger_name,
            &self.defaults.trigger_name,
        )
        .as_str()
    }

    pub fn index_name(&self) -> &str {
        resolve(
            SettingKey::DefaultIndexName,
            &self.cache.index_name,
            &self.user.default_index_name,
            &self.defaults.index_name,
        )
        .as_str()
    }

    pub fn primary_key_name(&self) -> &str {
        resolve(
            SettingKey::DefaultPrimaryKeyName,
            &self.cache.primary_key_name,
            &self.user.default_primary_key_name,
            &self.defaults.primary_key_name,
        )
        .as_str()
    }

    pub fn foreign_key_name(&self) -> &str {
        resolve(
            SettingKey::DefaultForeignKeyName,
            &self.cache.foreign_key_name,
            &self.user.default_foreign_key_name,
            &self.defaults.foreign_key_name,
        )
        .as_str()
    }

    pub fn unique_name(&self) -> &str {
        resolve(
            SettingKey::DefaultUniqueName,
            &self.cache.unique_name,
            &self.user.default_unique_name,
            &self.defaults.unique_name,
        )
        .as_str()
    }

    pub fn check_name(&self) -> &str {
        resolve(
            SettingKey::DefaultCheckName,
            &self.cache.check_name,
            &self.user.default_check_name,
            &self.defaults.check_name,
        )
        .as_str()
    }

    /// Object types whose names may carry the table namespace
    pub fn namespaced_object_types(&self) -> &[ObjectType] {
        resolve(
            SettingKey::NamespacedObjectTypes,
            &self.cache.namespaced_object_types,
            &self.user.namespaced_object_types,
            &self.defaults.namespaced_object_types,
        )
        .as_slice()
    }

    pub fn check_qualifiers(&self) -> &BTreeMap<CheckCategory, String> {
        self.cache.check_qualifiers.get_or_init(|| {
            debug!(setting = %SettingKey::CheckQualifiers, "Resolving setting");
            let mut merged = self.defaults.check_qualifiers.clone();
            if let Some(user) = &self.user.check_qualifiers {
                merged.extend(user.clone());
            }
            merged
        })
    }

    /// Qualifier for a check of `category`; uncategorized checks get none
    pub fn check_qualifier(&self, category: Option<CheckCategory>) -> &str {
        category
            .and_then(|category| self.check_qualifiers().get(&category))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Role receiving grants; empty disables grant emission
    pub fn role_name(&self) -> &str {
        resolve(
            SettingKey::DefaultRoleName,
            &self.cache.role_name,
            &self.user.default_role_name,
            &self.defaults.role_name,
        )
        .as_str()
    }

    pub fn privileges(&self) -> &[String] {
        resolve(
            SettingKey::DefaultPrivileges,
            &self.cache.privileges,
            &self.user.default_privileges,
            &self.defaults.privileges,
        )
        .as_slice()
    }

    /// The configured builder reference before resolution
    pub fn name_builder_class(&self) -> Option<&NameBuilderRef> {
        match &self.user.default_name_builder_class {
            Some(configured) => configured.as_ref(),
            None => self.defaults.name_builder_class.as_ref(),
        }
    }

    /// Resolve the configured builder reference to a factory.
    ///
    /// An explicit `null` yields `None`, meaning no custom builder is configured.
    pub fn name_builder(&self) -> Result<Option<NameBuilderFactory>> {
        self.cache
            .name_builder
            .get_or_try_init(|| {
                debug!(setting = %SettingKey::DefaultNameBuilderClass, "Resolving setting");
                self.name_builder_class()
                    .map(|reference| self.registry.resolve(reference))
                    .transpose()
            })
            .copied()
    }

    /// Construct a fresh name builder for one consumer.
    ///
    /// Falls back to [`PatternNameBuilder`] when no builder is configured.
    pub fn make_name_builder(&self) -> Result<Box<dyn NameBuilder>> {
        match self.name_builder()? {
            Some(factory) => factory(self),
            None => PatternNameBuilder::factory(self),
        }
    }

    pub fn sql_format_options(&self) -> &SqlFormatOptions {
        self.cache.sql_format_options.get_or_init(|| {
            debug!(setting = %SettingKey::SqlFormatOptions, "Resolving setting");
            match &self.user.sql_format_options {
                Some(input) => self.defaults.sql_format_options.overlay(input),
                None => self.defaults.sql_format_options.clone(),
            }
        })
    }

    /// Flush order of deferred statement categories; each category must appear exactly once
    pub fn deferred_sql_order(&self) -> Result<&[DeferredCategory]> {
        self.cache
            .deferred_sql_order
            .get_or_try_init(|| {
                let order = self
                    .user
                    .deferred_sql_order
                    .clone()
                    .unwrap_or_else(|| self.defaults.deferred_sql_order.clone());
                validate_order(&order)?;
                Ok(order)
            })
            .map(Vec::as_slice)
    }

    /// Look an option up by its key name
    pub fn get(&self, name: &str) -> Result<SettingValue> {
        self.value(name.parse()?)
    }

    pub fn value(&self, key: SettingKey) -> Result<SettingValue> {
        let strings = |items: &[String]| items.to_vec();
        Ok(match key {
            SettingKey::DefaultDbTableFormat => {
                SettingValue::Str(self.db_table_format().to_string())
            }
            SettingKey::IgnoreDbTableFormats => {
                SettingValue::List(strings(self.ignore_db_table_formats()))
            }
            SettingKey::EnableDbTableNormalization => {
                SettingValue::Bool(self.enable_db_table_normalization())
            }
            SettingKey::DefaultSequenceName => SettingValue::Str(self.sequence_name().to_string()),
            SettingKey::DefaultTriggerName => SettingValue::Str(self.trigger_name().to_string()),
            SettingKey::DefaultIndexName => SettingValue::Str(self.index_name().to_string()),
            SettingKey::DefaultPrimaryKeyName => {
                SettingValue::Str(self.primary_key_name().to_string())
            }
            SettingKey::DefaultForeignKeyName => {
                SettingValue::Str(self.foreign_key_name().to_string())
            }
            SettingKey::DefaultUniqueName => SettingValue::Str(self.unique_name().to_string()),
            SettingKey::DefaultCheckName => SettingValue::Str(self.check_name().to_string()),
            SettingKey::NamespacedObjectTypes => SettingValue::List(
                self.namespaced_object_types()
                    .iter()
                    .map(|object_type| object_type.as_str().to_string())
                    .collect(),
            ),
            SettingKey::CheckQualifiers => SettingValue::Map(
                self.check_qualifiers()
                    .iter()
                    .map(|(category, qualifier)| (category.as_str().to_string(), qualifier.clone()))
                    .collect(),
            ),
            SettingKey::DefaultRoleName => SettingValue::Str(self.role_name().to_string()),
            SettingKey::DefaultPrivileges => SettingValue::List(strings(self.privileges())),
            SettingKey::DefaultNameBuilderClass => {
                self.name_builder()?;
                SettingValue::Builder(self.name_builder_class().cloned())
            }
            SettingKey::SqlFormatOptions => SettingValue::Format(self.sql_format_options().clone()),
            SettingKey::DeferredSqlOrder => SettingValue::List(
                self.deferred_sql_order()?
                    .iter()
                    .map(|category| category.as_str().to_string())
                    .collect(),
            ),
        })
    }

    /// Keys whose values are currently cached
    pub fn cached_keys(&self) -> Vec<SettingKey> {
        let c = &self.cache;
        [
            (SettingKey::DefaultDbTableFormat, c.db_table_format.get().is_some()),
            (SettingKey::IgnoreDbTableFormats, c.ignore_db_table_formats.get().is_some()),
            (
                SettingKey::EnableDbTableNormalization,
                c.enable_db_table_normalization.get().is_some(),
            ),
            (SettingKey::DefaultSequenceName, c.sequence_name.get().is_some()),
            (SettingKey::DefaultTriggerName, c.trigger_name.get().is_some()),
            (SettingKey::DefaultIndexName, c.index_name.get().is_some()),
            (SettingKey::DefaultPrimaryKeyName, c.primary_key_name.get().is_some()),
            (SettingKey::DefaultForeignKeyName, c.foreign_key_name.get().is_some()),
            (SettingKey::DefaultUniqueName, c.unique_name.get().is_some()),
            (SettingKey::DefaultCheckName, c.check_name.get().is_some()),
            (SettingKey::NamespacedObjectTypes, c.namespaced_object_types.get().is_some()),
            (SettingKey::CheckQualifiers, c.check_qualifiers.get().is_some()),
            (SettingKey::DefaultRoleName, c.role_name.get().is_some()),
            (SettingKey::DefaultPrivileges, c.privileges.get().is_some()),
            (SettingKey::DefaultNameBuilderClass, c.name_builder.get().is_some()),
            (SettingKey::SqlFormatOptions, c.sql_format_options.get().is_some()),
            (SettingKey::DeferredSqlOrder, c.deferred_sql_order.get().is_some()),
        ]
        .into_iter()
        .filter_map(|(key, cached)| cached.then_some(key))
        .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn validate_order(order: &[DeferredCategory]) -> Result<()> {
    for category in DeferredCategory::ALL {
        let count = order.iter().filter(|c| **c == category).count();
        if count != 1 {
            return Err(AdapterError::InvalidOrder {
                reason: format!(
                    "category '{}' must appear exactly once, found {} times",
                    category, count
                ),
            });
        }
    }
    Ok(())
}
