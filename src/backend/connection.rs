use crate::render::escape_string;
use serde::Serialize;
use std::fmt;

/// A statement parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SqlParam {
    /// Inline literal form, used when SQL is collected rather than executed
    pub fn to_literal(&self) -> String {
        match self {
            SqlParam::Null => "NULL".to_string(),
            SqlParam::Bool(value) => if *value { "1" } else { "0" }.to_string(),
            SqlParam::Int(value) => value.to_string(),
            SqlParam::Text(value) => escape_string(value),
        }
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

/// The database connection collaborator
pub trait Connection {
    fn quote_name(&self, name: &str) -> String;

    fn quote_value(&self, value: &SqlParam) -> String {
        value.to_literal()
    }

    /// Clause appended to foreign key constraints
    fn deferrable_sql(&self) -> &str;

    /// Whether columns are nullable unless declared otherwise
    fn implied_column_null(&self) -> bool;

    fn can_rollback_ddl(&self) -> bool;

    fn in_atomic_block(&self) -> bool;

    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> anyhow::Result<()>;
}
