use crate::commands::project::{Project, join_statements};
use crate::constants::DEFAULT_SQL_OUTPUT_DIR;
use crate::progress::MigrationReporter;
use anyhow::{Context, Result};
use console::style;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Write the DDL of every migration to `<out>/<app>/<migration>.sql`, or to
/// `<out>/<app>_<migration>.sql` when `no_folder_per_app` is set.
///
/// Returns the absolute output folder.
pub fn cmd_sqlmigrateall(
    project: &Project,
    out_folder: &str,
    no_folder_per_app: bool,
    quiet: bool,
) -> Result<PathBuf> {
    // "." would mix the scripts into the app folders
    let out_folder = if out_folder == "." {
        Path::new(DEFAULT_SQL_OUTPUT_DIR)
    } else {
        Path::new(out_folder)
    };

    let started = Instant::now();
    let loaded = project.load()?;
    let mut reporter = MigrationReporter::new(loaded.migrations.len(), quiet);

    for migration in &loaded.migrations {
        let label = migration.file.label();
        reporter.start_migration(&label);

        let path = migration.file.output_path(out_folder, !no_folder_per_app);
        let result = project
            .migration_sql(&loaded.registry, migration)
            .and_then(|statements| write_script(&path, &statements).map(|()| statements.len()));

        match result {
            Ok(count) => reporter.complete_migration(&path, count),
            Err(e) => {
                reporter.fail_migration(&label, &e);
                return Err(e);
            }
        }
    }
    reporter.summary(started.elapsed());

    let absolute = std::path::absolute(out_folder)
        .with_context(|| format!("Failed to resolve {}", out_folder.display()))?;
    info!(
        out_folder = %absolute.display(),
        migrations = loaded.migrations.len(),
        "SQL scripts written"
    );
    println!(
        "{}",
        style(format!(
            "Command finished! SQL scripts sucessfully saved into {}",
            absolute.display()
        ))
        .green()
    );
    Ok(absolute)
}

fn write_script(path: &Path, statements: &[String]) -> Result<()> {
    if let Some(directory) = path.parent() {
        create_directory(directory)?;
    }
    std::fs::write(path, join_statements(statements))
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn create_directory(path: &Path) -> Result<()> {
    match std::fs::create_dir_all(path) {
        Err(e) if e.kind() != ErrorKind::AlreadyExists => {
            Err(e).with_context(|| format!("Failed to create directory {}", path.display()))
        }
        _ => Ok(()),
    }
}
