use crate::backend::connection::{Connection, SqlParam};
use crate::backend::profile::BackendProfile;
use crate::render::QuoteStyle;
use tracing::debug;

/// A connection that records executed statements in memory
#[derive(Debug, Clone)]
pub struct RecordingConnection {
    quote_style: QuoteStyle,
    deferrable_sql: String,
    implied_column_null: bool,
    can_rollback_ddl: bool,
    in_atomic_block: bool,
    executed: Vec<(String, Vec<SqlParam>)>,
}

impl RecordingConnection {
    pub fn new(profile: &BackendProfile) -> Self {
        Self {
            quote_style: profile.quote_style,
            deferrable_sql: profile.deferrable_sql.clone(),
            implied_column_null: profile.implied_column_null,
            can_rollback_ddl: profile.can_rollback_ddl,
            in_atomic_block: false,
            executed: Vec::new(),
        }
    }

    /// Mark the connection as inside a transaction
    pub fn in_transaction(mut self) -> Self {
        self.in_atomic_block = true;
        self
    }

    pub fn executed(&self) -> &[(String, Vec<SqlParam>)] {
        &self.executed
    }

    pub fn statements(&self) -> Vec<&str> {
        self.executed.iter().map(|(sql, _)| sql.as_str()).collect()
    }
}

impl Connection for RecordingConnection {
    fn quote_name(&self, name: &str) -> String {
        self.quote_style.quote_name(name)
    }

    fn deferrable_sql(&self) -> &str {
        &self.deferrable_sql
    }

    fn implied_column_null(&self) -> bool {
        self.implied_column_null
    }

    fn can_rollback_ddl(&self) -> bool {
        self.can_rollback_ddl
    }

    fn in_atomic_block(&self) -> bool {
        self.in_atomic_block
    }

    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> anyhow::Result<()> {
        debug!(statement = self.executed.len(), "Recording statement");
        self.executed.push((sql.to_string(), params.to_vec()));
        Ok(())
    }
}
