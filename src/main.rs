use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use db_adapter::backend::BackendProfile;
use db_adapter::commands::{self, Project, SettingsCommands};
use db_adapter::config::{self, SettingsArgs};
use db_adapter::constants::{CONFIG_FILENAME, MODELS_DIR};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Directory holding <app>/<migration>.yaml model definitions
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    /// Target backend
    #[arg(long, value_enum, default_value = "oracle", global = true)]
    backend: Backend,

    #[command(flatten)]
    settings_args: SettingsArgs,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Backend {
    Oracle,
    Generic,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL of one migration
    Sqlmigrate {
        app_label: String,

        /// Migration name or its numeric prefix
        migration_name: String,
    },

    /// Write the SQL of every migration into a folder
    Sqlmigrateall {
        #[arg(default_value = ".")]
        out_folder: String,

        /// Put all scripts into the same folder, prefixed with the app label
        #[arg(long)]
        no_folder_per_app: bool,
    },

    /// Show resolved settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    run_main(cli)
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn run_main(cli: Cli) -> Result<()> {
    let (file_settings, root_dir) = config::load_config(&cli.config_file)?;
    let settings = config::ConfigBuilder::new()
        .with_file(file_settings)
        .with_cli_args(cli.settings_args.clone().into())
        .resolve();

    let profile = match cli.backend {
        Backend::Oracle => BackendProfile::oracle(),
        Backend::Generic => BackendProfile::generic(),
    };
    let models_dir = cli
        .models_dir
        .clone()
        .unwrap_or_else(|| root_dir.join(MODELS_DIR));
    debug!(backend = %profile.name, models_dir = %models_dir.display(), "Resolved project");

    match cli.command {
        Commands::Settings { command } => commands::cmd_settings(&settings, command),
        Commands::Sqlmigrate {
            app_label,
            migration_name,
        } => {
            let project = Project::new(settings, profile, models_dir);
            commands::cmd_sqlmigrate(&project, &app_label, &migration_name)
        }
        Commands::Sqlmigrateall {
            out_folder,
            no_folder_per_app,
        } => {
            if out_folder.is_empty() {
                return Err(anyhow!("Output folder must not be empty"));
            }
            let project = Project::new(settings, profile, models_dir);
            commands::cmd_sqlmigrateall(&project, &out_folder, no_folder_per_app, cli.quiet)
                .map(|_| ())
        }
    }
}
