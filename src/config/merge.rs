use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl<T> Merge<Option<T>> for Option<T> {
    fn merge(self, other: Option<T>) -> Option<T> {
        other.or(self)
    }
}

impl Merge<SettingsInput> for SettingsInput {
    fn merge(self, other: SettingsInput) -> SettingsInput {
        SettingsInput {
            default_db_table_format: self
                .default_db_table_format
                .merge(other.default_db_table_format),
            ignore_db_table_formats: self
                .ignore_db_table_formats
                .merge(other.ignore_db_table_formats),
            enable_db_table_normalization: self
                .enable_db_table_normalization
                .merge(other.enable_db_table_normalization),
            default_sequence_name: self.default_sequence_name.merge(other.default_sequence_name),
            default_trigger_name: self.default_trigger_name.merge(other.default_trigger_name),
            default_index_name: self.default_index_name.merge(other.default_index_name),
            default_primary_key_name: self
                .default_primary_key_name
                .merge(other.default_primary_key_name),
            default_foreign_key_name: self
                .default_foreign_key_name
                .merge(other.default_foreign_key_name),
            default_unique_name: self.default_unique_name.merge(other.default_unique_name),
            default_check_name: self.default_check_name.merge(other.default_check_name),
            namespaced_object_types: self
                .namespaced_object_types
                .merge(other.namespaced_object_types),
            check_qualifiers: match (self.check_qualifiers, other.check_qualifiers) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(mut a), Some(b)) => {
                    a.extend(b);
                    Some(a)
                }
            },
            default_role_name: self.default_role_name.merge(other.default_role_name),
            default_privileges: self.default_privileges.merge(other.default_privileges),
            default_name_builder_class: self
                .default_name_builder_class
                .merge(other.default_name_builder_class),
            sql_format_options: match (self.sql_format_options, other.sql_format_options) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            deferred_sql_order: self.deferred_sql_order.merge(other.deferred_sql_order),
        }
    }
}

impl SqlFormatInput {
    pub fn merge_with(self, other: SqlFormatInput) -> SqlFormatInput {
        SqlFormatInput {
            keyword_case: other.keyword_case.or(self.keyword_case),
            identifier_case: other.identifier_case.or(self.identifier_case),
            unquote: other.unquote.or(self.unquote),
            strip_comments: other.strip_comments.or(self.strip_comments),
            reindent: other.reindent.or(self.reindent),
        }
    }
}

impl SqlFormatOptions {
    /// Overlay per-key overrides on resolved options
    pub fn overlay(&self, input: &SqlFormatInput) -> SqlFormatOptions {
        SqlFormatOptions {
            keyword_case: input.keyword_case.unwrap_or(self.keyword_case),
            identifier_case: input.identifier_case.unwrap_or(self.identifier_case),
            unquote: input.unquote.unwrap_or(self.unquote),
            strip_comments: input.strip_comments.unwrap_or(self.strip_comments),
            reindent: input.reindent.unwrap_or(self.reindent),
        }
    }
}
