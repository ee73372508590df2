//! ALTER TABLE ... ADD CONSTRAINT rendering

use crate::error::Result;
use crate::naming::TemplateValues;
use crate::render::sql::render_template;

pub fn render_primary_key(
    template: &str,
    table: &str,
    name: &str,
    columns: &[String],
) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("table", table)
            .with("name", name)
            .with("columns", columns.join(", ")),
    )
}

pub fn render_unique(
    template: &str,
    table: &str,
    name: &str,
    columns: &[String],
) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("table", table)
            .with("name", name)
            .with("columns", columns.join(", ")),
    )
}

pub fn render_check(template: &str, table: &str, name: &str, check: &str) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("table", table)
            .with("name", name)
            .with("check", check),
    )
}

/// Quoted parts of a foreign key constraint
#[derive(Debug, Clone)]
pub struct ForeignKeyClause<'a> {
    pub table: &'a str,
    pub name: &'a str,
    pub column: &'a str,
    pub to_table: &'a str,
    pub to_column: &'a str,
    /// Backend clause appended after the reference, e.g. ` DEFERRABLE INITIALLY DEFERRED`
    pub deferrable: &'a str,
}

pub fn render_foreign_key(template: &str, fk: &ForeignKeyClause<'_>) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("table", fk.table)
            .with("name", fk.name)
            .with("column", fk.column)
            .with("to_table", fk.to_table)
            .with("to_column", fk.to_column)
            .with("deferrable", fk.deferrable),
    )
}
