use crate::commands::project::{Project, join_statements};
use crate::migration::find_migration;
use anyhow::{Result, anyhow};

/// Print the DDL of one migration
pub fn cmd_sqlmigrate(project: &Project, app_label: &str, migration_name: &str) -> Result<()> {
    let loaded = project.load()?;
    let migration = find_migration(&loaded.migrations, app_label, migration_name).ok_or_else(|| {
        anyhow!(
            "Cannot find a migration matching '{}' from app '{}'",
            migration_name,
            app_label
        )
    })?;

    let statements = project.migration_sql(&loaded.registry, migration)?;
    print!("{}", join_statements(&statements));
    Ok(())
}
