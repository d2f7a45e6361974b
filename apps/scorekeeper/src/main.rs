use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_list::{ControllerOptions, GameListController};
use shared::domain::GameId;
use storage::{GameStore, Storage, StorageOptions};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, normalize_database_url, DEFAULT_CONFIG_FILE};
use console::ConsoleSink;

#[derive(Parser, Debug)]
#[command(about = "Keep track of the games played by your group")]
struct Cli {
    /// Overrides the database url from the config file and environment.
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Print one JSON list event per line.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Create { name: String },
    Rename { id: GameId, name: String },
    Remove { id: GameId },
    Stats { index: usize },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;
    let raw_url = cli.database_url.as_deref().unwrap_or(&settings.database_url);
    let database_url = normalize_database_url(raw_url);

    let storage = Storage::with_options(
        &database_url,
        StorageOptions {
            max_connections: settings.max_connections,
            acquire_timeout: Duration::from_millis(settings.store_timeout_ms),
        },
    )
    .await
    .map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    storage.health_check().await.context("database health check failed")?;
    info!(%database_url, "database ready");

    let show_list = matches!(cli.command, Command::List);
    let mut controller = GameListController::activate(
        storage,
        ConsoleSink::new(cli.json, show_list),
        ControllerOptions {
            store_timeout: Duration::from_millis(settings.store_timeout_ms),
        },
    )
    .await?;

    match cli.command {
        Command::List => {}
        Command::Create { name } => {
            controller.create(&name).await?;
        }
        Command::Rename { id, name } => {
            controller.rename(id, &name).await?;
        }
        Command::Remove { id } => {
            controller.remove(id).await?;
        }
        Command::Stats { index } => {
            let game_id = controller
                .stats_target(index)
                .with_context(|| format!("no game at position {index}"))?;
            if let Some(game) = controller.get(&game_id) {
                println!("{}", console::format_game_line(index, game));
            }
            println!("no statistics recorded for game {game_id} yet");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
