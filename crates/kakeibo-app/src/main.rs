//! Kakeibo application binary - composition root.
//!
//! Ties together all Kakeibo crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Initialize storage (SQLite expense store)
//! 3. Build the dispatcher (entry wizard + query engine)
//! 4. Run a console chat loop over stdin

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use kakeibo_chat::{ChatError, Dispatcher};
use kakeibo_core::config::KakeiboConfig;
use kakeibo_core::types::UserId;
use kakeibo_store::{Database, ExpenseStore, SqliteExpenseStore};

mod cli;
use cli::CliArgs;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = KakeiboConfig::load_or_default(&config_file);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Kakeibo v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join(&config.storage.db_filename);
    let db = Database::new(&db_path)?;
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    let store: Arc<dyn ExpenseStore> = Arc::new(SqliteExpenseStore::new(Arc::new(db)));
    let dispatcher = Dispatcher::new(store, &config.chat);
    let user = UserId(args.user);
    tracing::info!(%user, "Console chat session started");

    // Console chat loop. Each stdin line is one inbound message.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Kakeibo expense diary. Send /start to begin, Ctrl-D to quit.\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        match dispatcher.handle_message(user, text).await {
            Ok(reply) => {
                stdout.write_all(reply.text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                if !reply.options.is_empty() {
                    let options = format!("  [{}]\n", reply.options.join(" | "));
                    stdout.write_all(options.as_bytes()).await?;
                }
            }
            Err(ChatError::Storage(e)) => {
                tracing::error!(error = %e, "Message handling failed");
                stdout
                    .write_all(b"Something went wrong. Please try again.\n")
                    .await?;
            }
            Err(e) => {
                stdout.write_all(e.to_string().as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    tracing::info!("Console chat session ended");
    Ok(())
}
