//! Template-driven DDL rendering
//!
//! Every statement is produced from a backend template with `{placeholder}`
//! fields. Identifiers passed in are expected to be quoted already.

pub mod comment;
pub mod constraint;
pub mod grant;
pub mod index;
pub mod sequence;
pub mod table;

pub use comment::render_column_comment;
pub use constraint::{
    ForeignKeyClause, render_check, render_foreign_key, render_primary_key, render_unique,
};
pub use grant::render_grant;
pub use index::render_create_index;
pub use sequence::{SequenceParams, render_create_sequence, render_create_trigger, requires_range};
pub use table::render_create_table;

use crate::error::Result;
use crate::naming::{Template, TemplateValues};

pub(crate) fn render_template(template: &str, values: &TemplateValues) -> Result<String> {
    Template::parse(template)?.render(values)
}
