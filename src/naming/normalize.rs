//! Table name normalization against the configured table format

use crate::error::Result;
use crate::naming::identifier::{compose_identifier, split_identifier};
use crate::naming::pattern::{Template, TemplateValues};
use tracing::debug;

/// Rewrite `db_table` so that it conforms to `format`.
///
/// Tables matching any of the `exclude` templates are returned unchanged, as
/// are tables already conforming to `format`. Applying the function to its own
/// output is a no-op.
pub fn normalize_table(db_table: &str, format: &str, exclude: &[String]) -> Result<String> {
    for excluded in exclude {
        if Template::parse(excluded)?.matches(db_table).is_some() {
            debug!(table = db_table, pattern = %excluded, "Table excluded from normalization");
            return Ok(db_table.to_string());
        }
    }

    if format.is_empty() {
        return Ok(db_table.to_string());
    }

    let (namespace, table_name) = split_identifier(db_table);
    let (namespace_format, table_format) = split_identifier(format);
    let table_template = Template::parse(&table_format)?;

    // Namespace required by the format but missing from the table
    if !namespace_format.is_empty() && namespace.is_empty() {
        let formatted = if table_template.matches(&table_name).is_some() {
            table_name
        } else {
            render_table_name(&table_template, &table_name)?
        };
        return Ok(compose_identifier(&namespace_format, &formatted));
    }

    // Table carries its own namespace, which wins over the format's
    if !namespace.is_empty() {
        if table_template.matches(&table_name).is_some() {
            return Ok(db_table.to_string());
        }
        let formatted = render_table_name(&table_template, &table_name)?;
        return Ok(compose_identifier(&namespace, &formatted));
    }

    if table_template.matches(db_table).is_some() {
        return Ok(db_table.to_string());
    }

    render_table_name(&table_template, db_table)
}

fn render_table_name(template: &Template, table_name: &str) -> Result<String> {
    template.render(
        &TemplateValues::new()
            .with("table_name", table_name)
            .with_positional(table_name),
    )
}
