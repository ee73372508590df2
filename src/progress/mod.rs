pub mod migration_reporter;

pub use migration_reporter::MigrationReporter;
