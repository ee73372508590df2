//! Deferred DDL buckets, keyed by statement category

use crate::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category of a statement executed after the base `CREATE TABLE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferredCategory {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
    Index,
    Comment,
    Control,
    Autoincrement,
}

impl DeferredCategory {
    /// Every category, in the default flush order
    pub const ALL: [DeferredCategory; 8] = [
        DeferredCategory::PrimaryKey,
        DeferredCategory::Unique,
        DeferredCategory::ForeignKey,
        DeferredCategory::Check,
        DeferredCategory::Index,
        DeferredCategory::Comment,
        DeferredCategory::Control,
        DeferredCategory::Autoincrement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeferredCategory::PrimaryKey => "primary_key",
            DeferredCategory::Unique => "unique",
            DeferredCategory::ForeignKey => "foreign_key",
            DeferredCategory::Check => "check",
            DeferredCategory::Index => "index",
            DeferredCategory::Comment => "comment",
            DeferredCategory::Control => "control",
            DeferredCategory::Autoincrement => "autoincrement",
        }
    }
}

impl fmt::Display for DeferredCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeferredCategory {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        DeferredCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AdapterError::UnknownCategory {
                name: s.to_string(),
            })
    }
}

/// Ordered statements per category; every category is present from construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredStatements {
    buckets: BTreeMap<DeferredCategory, Vec<String>>,
}

impl DeferredStatements {
    pub fn new() -> Self {
        Self {
            buckets: DeferredCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    pub fn push(&mut self, category: DeferredCategory, sql: impl Into<String>) {
        self.buckets.entry(category).or_default().push(sql.into());
    }

    pub fn extend(
        &mut self,
        category: DeferredCategory,
        statements: impl IntoIterator<Item = String>,
    ) {
        self.buckets.entry(category).or_default().extend(statements);
    }

    pub fn get(&self, category: DeferredCategory) -> &[String] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.buckets.values_mut().for_each(Vec::clear);
    }
}

impl Default for DeferredStatements {
    fn default() -> Self {
        Self::new()
    }
}
