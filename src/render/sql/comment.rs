use crate::error::Result;
use crate::naming::TemplateValues;
use crate::render::sql::render_template;

/// Render a column comment; quotes inside `comment` are doubled
pub fn render_column_comment(
    template: &str,
    table: &str,
    column: &str,
    comment: &str,
) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("table", table)
            .with("column", column)
            .with("comment", comment.replace('\'', "''")),
    )
}
