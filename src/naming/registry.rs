//! Resolution of configured name builder references

use crate::config::Settings;
use crate::error::{AdapterError, Result};
use crate::naming::builder::{NameBuilder, PatternNameBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Constructs a fresh builder for one consumer; builders are never shared
pub type NameBuilderFactory = fn(&Settings) -> Result<Box<dyn NameBuilder>>;

/// A configured name builder: a registry path, or a factory supplied in code
#[derive(Clone)]
pub enum NameBuilderRef {
    Path(String),
    Factory(NameBuilderFactory),
}

impl fmt::Debug for NameBuilderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameBuilderRef::Path(path) => f.debug_tuple("Path").field(path).finish(),
            NameBuilderRef::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl PartialEq for NameBuilderRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NameBuilderRef::Path(a), NameBuilderRef::Path(b)) => a == b,
            (NameBuilderRef::Factory(a), NameBuilderRef::Factory(b)) => {
                std::ptr::fn_addr_eq(*a, *b)
            }
            _ => false,
        }
    }
}

impl From<&str> for NameBuilderRef {
    fn from(path: &str) -> Self {
        NameBuilderRef::Path(path.to_string())
    }
}

impl Serialize for NameBuilderRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NameBuilderRef::Path(path) => serializer.serialize_str(path),
            NameBuilderRef::Factory(_) => serializer.serialize_str("<factory>"),
        }
    }
}

impl<'de> Deserialize<'de> for NameBuilderRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(NameBuilderRef::Path)
    }
}

/// Maps builder paths to factories
#[derive(Debug, Clone)]
pub struct NameBuilderRegistry {
    factories: BTreeMap<String, NameBuilderFactory>,
}

impl NameBuilderRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, path: impl Into<String>, factory: NameBuilderFactory) {
        self.factories.insert(path.into(), factory);
    }

    pub fn with(mut self, path: impl Into<String>, factory: NameBuilderFactory) -> Self {
        self.register(path, factory);
        self
    }

    /// Resolve a reference to its factory; unknown paths are configuration errors
    pub fn resolve(&self, reference: &NameBuilderRef) -> Result<NameBuilderFactory> {
        match reference {
            NameBuilderRef::Factory(factory) => Ok(*factory),
            NameBuilderRef::Path(path) => {
                self.factories
                    .get(path)
                    .copied()
                    .ok_or_else(|| AdapterError::UnresolvedBuilder { path: path.clone() })
            }
        }
    }
}

impl Default for NameBuilderRegistry {
    fn default() -> Self {
        Self::empty().with(PatternNameBuilder::PATH, PatternNameBuilder::factory)
    }
}
