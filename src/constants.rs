// Namespaced settings block read from the project file
pub const SETTINGS_NAMESPACE: &str = "DB_ADAPTER";

// Configuration file name
pub const CONFIG_FILENAME: &str = "db_adapter.yaml";

// Model definitions layout: <models_dir>/<app>/<migration>.yaml
pub const MODELS_DIR: &str = "models";
pub const MIGRATION_EXTENSION: &str = "yaml";
pub const SQL_EXTENSION: &str = "sql";

// Output folder used when `sqlmigrateall` is given "."
pub const DEFAULT_SQL_OUTPUT_DIR: &str = "sqlmigrations";
