//! Fake Data Bot - Main Entry Point
//!
//! A Telegram bot that generates synthetic records on `/generate`, keeps
//! them in a CSV file and sends that file on `/csv`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fake_data_bot::commands::CommandHandler;
use fake_data_bot::config::{BotSettings, TelegramConfig};
use fake_data_bot::record::{self, Record};
use fake_data_bot::store::{CsvStore, RecordStore};
use fake_data_bot::telegram::TelegramBot;

/// Telegram bot that generates synthetic test records.
#[derive(Parser, Debug)]
#[command(name = "fake_data_bot")]
#[command(about = "Generate fake records on command and keep them in a CSV file")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Path to the CSV store (overrides `STORE_PATH`).
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Print one generated record and exit without connecting or saving.
    #[arg(long)]
    print_sample: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if args.print_sample {
        println!("{}", record::format_record(&Record::generate()));
        return Ok(());
    }

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Missing credentials stop the process before anything is touched.
    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let mut settings = BotSettings::from_env_with_defaults();
    if let Some(store) = args.store {
        settings.store_path = store;
    }

    let store = Arc::new(CsvStore::new(&settings.store_path));
    let created = store
        .ensure_initialized()
        .context("Failed to initialize record store")?;
    info!(
        "Record store: {} ({})",
        settings.store_path.display(),
        if created { "created" } else { "existing" }
    );

    let handler = CommandHandler::new(Arc::clone(&store), settings.max_export_bytes);

    let (bot, updates) = TelegramBot::connect(&tg_config, &settings)
        .await
        .context("Failed to connect to Telegram")?;

    info!("Starting fake data bot...");
    let outcome = bot.run(updates, &handler).await;

    info!("Shutting down...");
    bot.disconnect();

    outcome.context("Update stream failed")
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
