use crate::error::Result;
use crate::naming::pattern::{Template, TemplateValues};

/// Split a `"namespace"."name"` identifier into its parts.
///
/// Unqualified identifiers have an empty namespace. Surrounding double quotes
/// are stripped from both parts.
pub fn split_identifier(identifier: &str) -> (String, String) {
    match identifier.split_once("\".\"") {
        Some((namespace, name)) if !name.contains("\".\"") => (
            namespace.trim_matches('"').to_string(),
            name.trim_matches('"').to_string(),
        ),
        _ => (String::new(), identifier.trim_matches('"').to_string()),
    }
}

/// Inverse of [`split_identifier`]
pub fn compose_identifier(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("\"{}\".\"{}\"", namespace, name)
    }
}

/// Decomposed table name, recomputed on every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    pub namespace: String,
    /// Full table name as stored, without namespace
    pub table: String,
    /// Base name extracted through the table format, or `table` when it does not match
    pub table_name: String,
    /// Any other named placeholder captured by the table format
    pub extra: TemplateValues,
}

impl TableIdentifier {
    /// Decompose `db_table` using the un-namespaced part of `format`.
    ///
    /// A format that does not match is a normal outcome: `table_name` then
    /// falls back to the unmodified table.
    pub fn parse(db_table: &str, format: &str) -> Result<Self> {
        let (namespace, table) = split_identifier(db_table);
        let mut identifier = Self {
            namespace,
            table_name: table.clone(),
            table,
            extra: TemplateValues::new(),
        };

        if format.is_empty() {
            return Ok(identifier);
        }

        let (_, table_format) = split_identifier(format);
        let template = Template::parse(&table_format)?;
        if let Some(mut captures) = template.matches(&identifier.table) {
            if let Some(table_name) = captures.named.remove("table_name") {
                identifier.table_name = table_name;
            }
            captures.named.remove("table");
            captures.named.remove("namespace");
            identifier.extra = captures;
        }

        Ok(identifier)
    }

    pub fn is_namespaced(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Values available to naming patterns: `table`, `table_name` and extra captures
    pub fn template_values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        values.named.extend(self.extra.named.clone());
        values.insert("table", self.table.clone());
        values.insert("table_name", self.table_name.clone());
        values
    }
}
