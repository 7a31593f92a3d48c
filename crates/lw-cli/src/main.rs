use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lw_store::SessionManager;
use tracing_subscriber::EnvFilter;

use lw_cli::commands::{lap, remove, start, status, stop};
use lw_cli::{Cli, Commands, Config, LapAction};

/// Load config and open the session database, ensuring the parent
/// directory exists.
fn open_database(config_path: Option<&std::path::Path>) -> Result<Arc<lw_db::Database>> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = lw_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok(Arc::new(db))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Start { id }) => {
            let db = open_database(cli.config.as_deref())?;
            let manager = SessionManager::new(db);
            start::run(&manager, id).await?;
        }
        Some(Commands::Stop { id }) => {
            let db = open_database(cli.config.as_deref())?;
            let manager = SessionManager::new(db);
            stop::run(&manager, id).await?;
        }
        Some(Commands::Status { id }) => {
            let db = open_database(cli.config.as_deref())?;
            let manager = SessionManager::new(db);
            status::run(&manager, id).await?;
        }
        Some(Commands::Lap { action }) => {
            let db = open_database(cli.config.as_deref())?;
            match action {
                LapAction::Add { id } => lap::add(db.as_ref(), id).await?,
                LapAction::Stop { id, position } => {
                    lap::stop(db.as_ref(), id, *position).await?;
                }
            }
        }
        Some(Commands::Remove { id }) => {
            let db = open_database(cli.config.as_deref())?;
            remove::run(db.as_ref(), id).await?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
