//! Error types for db-adapter

use thiserror::Error;

/// Errors raised while resolving settings, building object names or emitting DDL
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Invalid setting: '{name}'")]
    UnknownSetting { name: String },

    #[error("Could not resolve name builder '{path}': no builder is registered under that path")]
    UnresolvedBuilder { path: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Pattern '{pattern}' references '{{{placeholder}}}' but no value was provided")]
    MissingPlaceholder {
        pattern: String,
        placeholder: String,
    },

    #[error("Unknown object type: '{name}'")]
    UnknownObjectType { name: String },

    #[error("Unknown deferred statement category: '{name}'")]
    UnknownCategory { name: String },

    #[error("Invalid deferred statement order: {reason}")]
    InvalidOrder { reason: String },

    #[error(
        "Executing DDL statements while in a transaction on databases that can't perform a rollback is prohibited."
    )]
    TransactionPolicy,

    #[error("Cannot retrieve the range of the column type bound to the field {field} ({internal_type})")]
    MissingRange {
        field: String,
        internal_type: String,
    },

    #[error("No model is registered with table '{table}'")]
    ModelNotFound { table: String },

    #[error("Model '{model}' has no field bound to column '{column}'")]
    FieldNotFound { model: String, column: String },

    #[error("Model '{model}' has no field named '{field}'")]
    UnknownField { model: String, field: String },

    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;

impl AdapterError {
    pub fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Configuration errors are never retried and always surface to the caller
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSetting { .. }
                | Self::UnresolvedBuilder { .. }
                | Self::InvalidPattern { .. }
                | Self::MissingPlaceholder { .. }
                | Self::UnknownObjectType { .. }
                | Self::UnknownCategory { .. }
                | Self::InvalidOrder { .. }
        )
    }

    /// Lookup misses come from caller input naming an entity that does not exist
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound { .. } | Self::FieldNotFound { .. } | Self::UnknownField { .. }
        )
    }
}
