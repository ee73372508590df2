use crate::error::Result;
use crate::naming::TemplateValues;
use crate::render::sql::render_template;

pub fn render_create_index(
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
