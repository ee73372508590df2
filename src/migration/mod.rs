pub mod discovery;

pub use discovery::{
    Migration, MigrationDefinition, MigrationFile, build_registry, discover_migrations,
    find_migration, load_migration, load_migrations, parse_migration,
};
