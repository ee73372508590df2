use crate::error::Result;
use crate::naming::TemplateValues;
use crate::render::sql::render_template;

/// Render a CREATE TABLE statement from `column definition` fragments
pub fn render_create_table(
    template: &str,
    table: &str,
    columns: &[String],
    separator: &str,
) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("table", table)
            .with("definition", columns.join(separator)),
    )
}
