pub mod project;
pub mod settings;
pub mod sqlmigrate;
pub mod sqlmigrateall;

pub use project::{LoadedMigrations, Project, join_statements};
pub use settings::{OutputFormat, SettingsCommands, cmd_settings};
pub use sqlmigrate::cmd_sqlmigrate;
pub use sqlmigrateall::cmd_sqlmigrateall;
