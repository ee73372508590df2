use console::style;
use std::path::Path;
use std::time::Duration;

/// Per-migration progress lines for `sqlmigrateall`
pub struct MigrationReporter {
    total_migrations: usize,
    current_migration: usize,
    total_statements: usize,
    quiet: bool,
}

impl MigrationReporter {
    pub fn new(total_migrations: usize, quiet: bool) -> Self {
        Self {
            total_migrations,
            current_migration: 0,
            total_statements: 0,
            quiet,
        }
    }

    pub fn start_migration(&mut self, label: &str) {
        self.current_migration += 1;
        if self.quiet {
            return;
        }
        println!(
            "  [{}/{}] {}",
            self.current_migration, self.total_migrations, label
        );
    }

    pub fn complete_migration(&mut self, path: &Path, statements: usize) {
        self.total_statements += statements;
        if self.quiet {
            return;
        }
        println!(
            "    {} {} ({} statements)",
            style("→").dim(),
            path.display(),
            statements
        );
    }

    pub fn fail_migration(&self, label: &str, error: &anyhow::Error) {
        println!(
            "{} {} failed: {}",
            style("✗").red(),
            label,
            style(error.to_string()).red()
        );
    }

    pub fn summary(&self, total_duration: Duration) {
        if self.quiet {
            return;
        }
        println!(
            "{} {} migrations, {} statements in {}",
            style("✓").green(),
            self.current_migration,
            self.total_statements,
            style(format_elapsed(total_duration)).green()
        );
    }
}

// Rendering a script takes milliseconds, so sub-second runs keep their precision
fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        let micros = d.subsec_micros();
        if micros < 10_000 {
            format!("{:.1}ms", f64::from(micros) / 1000.0)
        } else {
            format!("{}ms", d.subsec_millis())
        }
    } else if secs < 60 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}
