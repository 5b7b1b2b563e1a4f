//! Namebook CLI - edit the list of names and exchange database snapshots

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use namebook::config::{self, NamebookConfig};
use namebook::output::{self, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "namebook")]
#[command(version)]
#[command(about = "A single editable list of names backed by an embedded SQLite file")]
#[command(long_about = r#"
Namebook keeps a list of names in a local SQLite file and can hand that file
off as a snapshot, or replace it wholesale with a snapshot picked from disk.

Example usage:
  namebook add "Ada Lovelace"
  namebook update 1 "Ada King"
  namebook export --to ~/backups/names.db
  namebook import --from ~/backups/names.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Document root holding the database directory (overrides config)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a namebook.toml with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show every name in the store
    List,

    /// Add a name
    Add {
        name: String,
    },

    /// Rename the entry with the given id
    Update {
        id: i64,
        name: String,
    },

    /// Delete the entry with the given id
    Delete {
        id: i64,
    },

    /// Hand the database file off to a destination path or directory
    Export {
        /// Destination file or directory
        #[arg(short, long)]
        to: PathBuf,
    },

    /// Replace the database with a snapshot file
    Import {
        /// Snapshot to import; prompts when omitted (empty answer cancels)
        #[arg(short, long)]
        from: Option<PathBuf>,
    },

    /// Show store statistics
    Stats,

    /// Serve the list over HTTP
    Serve {
        /// Port to listen on (defaults to config, then 7878)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_flag(cli.json);
    let command_name = command_name(&cli.command);

    let result = run(cli, mode);
    if let Err(e) = &result {
        if mode == OutputMode::Json {
            println!("{}", output::error_json(command_name, &format!("{:#}", e))?);
        } else {
            namebook::ui::error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let root = cli.root.as_deref();
    let load_settings = || -> anyhow::Result<NamebookConfig> {
        Ok(config::load_config(Some(&config_path))?.unwrap_or_else(|| {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            NamebookConfig::default()
        }))
    };

    match cli.command {
        Commands::Init { force } => commands::run_init(mode, &config_path, force),
        Commands::List => commands::run_list(mode, load_settings()?.location(root)),
        Commands::Add { name } => commands::run_add(mode, load_settings()?.location(root), &name),
        Commands::Update { id, name } => {
            commands::run_update(mode, load_settings()?.location(root), id, &name)
        }
        Commands::Delete { id } => commands::run_delete(mode, load_settings()?.location(root), id),
        Commands::Export { to } => commands::run_export(mode, load_settings()?.location(root), to),
        Commands::Import { from } => {
            commands::run_import(mode, load_settings()?.location(root), from)
        }
        Commands::Stats => commands::run_stats(mode, load_settings()?.location(root)),
        Commands::Serve { port } => {
            let settings = load_settings()?;
            let location = settings.location(root);
            let exchange_dir = settings.exchange_dir(&location);
            commands::run_serve(mode, location, settings.port(port), exchange_dir)
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init { .. } => "init",
        Commands::List => "list",
        Commands::Add { .. } => "add",
        Commands::Update { .. } => "update",
        Commands::Delete { .. } => "delete",
        Commands::Export { .. } => "export",
        Commands::Import { .. } => "import",
        Commands::Stats => "stats",
        Commands::Serve { .. } => "serve",
    }
}
