//! Sequence and trigger rendering for autoincrement emulation

use crate::error::Result;
use crate::naming::{Template, TemplateValues};
use crate::render::sql::render_template;

/// Values available to sequence and trigger templates
#[derive(Debug, Clone)]
pub struct SequenceParams<'a> {
    pub sq_name: &'a str,
    pub tr_name: &'a str,
    pub tbl_name: &'a str,
    pub col_name: &'a str,
    pub range: Option<(i128, i128)>,
}

impl SequenceParams<'_> {
    fn values(&self) -> TemplateValues {
        let mut values = TemplateValues::new()
            .with("sq_name", self.sq_name)
            .with("tr_name", self.tr_name)
            .with("tbl_name", self.tbl_name)
            .with("col_name", self.col_name);
        if let Some((min, max)) = self.range {
            values.insert("sq_min_value", min.to_string());
            values.insert("sq_max_value", max.to_string());
        }
        values
    }
}

/// Whether `template` needs the column type's integer range
pub fn requires_range(template: &str) -> Result<bool> {
    let template = Template::parse(template)?;
    Ok(template.requires("sq_max_value") || template.requires("sq_min_value"))
}

pub fn render_create_sequence(template: &str, params: &SequenceParams<'_>) -> Result<String> {
    render_template(template, &params.values())
}

pub fn render_create_trigger(template: &str, params: &SequenceParams<'_>) -> Result<String> {
    render_template(template, &params.values())
}
