use crate::config::types::*;
use crate::naming::{NameBuilderRef, ObjectType, PatternNameBuilder};
use crate::schema::DeferredCategory;
use std::collections::BTreeMap;

impl Default for Defaults {
    fn default() -> Self {
        Self {
            db_table_format: String::new(),
            ignore_db_table_formats: Vec::new(),
            enable_db_table_normalization: true,
            sequence_name: "{table}_sq".to_string(),
            trigger_name: "{table}_tr".to_string(),
            index_name: "{table}_{columns}_idx".to_string(),
            primary_key_name: "{table}_{columns}_pk".to_string(),
            foreign_key_name: "{table}_{columns}_fk".to_string(),
            unique_name: "{table}_{columns}_uniq".to_string(),
            check_name: "{table}_{columns}{qualifier}_check".to_string(),
            namespaced_object_types: vec![
                ObjectType::Sequence,
                ObjectType::Trigger,
                ObjectType::Index,
            ],
            check_qualifiers: default_check_qualifiers(),
            role_name: String::new(),
            privileges: ["SELECT", "INSERT", "UPDATE", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
            name_builder_class: Some(NameBuilderRef::Path(PatternNameBuilder::PATH.to_string())),
            sql_format_options: SqlFormatOptions::default(),
            deferred_sql_order: DeferredCategory::ALL.to_vec(),
        }
    }
}

fn default_check_qualifiers() -> BTreeMap<CheckCategory, String> {
    BTreeMap::from([
        (CheckCategory::NotNull, "_nn".to_string()),
        (CheckCategory::Boolean, "_bool".to_string()),
        (CheckCategory::Positive, "_gte".to_string()),
    ])
}

impl Default for SqlFormatOptions {
    fn default() -> Self {
        Self {
            keyword_case: LetterCase::Preserve,
            identifier_case: LetterCase::Preserve,
            unquote: false,
            strip_comments: false,
            reindent: false,
        }
    }
}
