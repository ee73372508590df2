use crate::error::Result;
use crate::naming::TemplateValues;
use crate::render::sql::render_template;

/// Render a GRANT of `privileges` on `name` to `role`
pub fn render_grant(
    template: &str,
    privileges: &[String],
    name: &str,
    role: &str,
) -> Result<String> {
    render_template(
        template,
        &TemplateValues::new()
            .with("privileges", privileges.join(", "))
            .with("name", name)
            .with("role", role),
    )
}
