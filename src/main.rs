//! expiry-predictor: shelf-life based expiry prediction with history.
//!
//! Single-binary CLI that:
//! 1. Loads the shelf-life table from config
//! 2. Predicts expiry dates from a product and a manufacture date
//! 3. Records every successful prediction in a persistent history
//! 4. Lists and deletes history entries

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use expiry_predictor::config::load_config;
use expiry_predictor::render;
use expiry_predictor::{Clock, ExpiryService};
use history_store::KeyValueStore;

/// Predict product expiry dates from shelf life and manufacture date.
#[derive(Parser)]
#[command(name = "expiry-predictor", about = "Shelf-life based expiry predictor")]
struct Cli {
    /// Config file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the expiry date of a product and record it in the history.
    Predict {
        /// Product name, e.g. "milk".
        product: String,
        /// Manufacture date, YYYY-MM-DD.
        mfg_date: Option<String>,
    },
    /// Show the prediction history, newest first.
    History {
        /// Print the stored JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Delete a history entry by id.
    Delete { id: u64 },
    /// List known products and their shelf life.
    Products,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "expiry_predictor=info,history_store=info,prediction_engine=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    debug!("Loaded configuration: {:?}", config);

    let mut service = ExpiryService::from_config(&config)?;
    run(cli.command, &mut service)
}

fn run<S: KeyValueStore, C: Clock>(
    command: Command,
    service: &mut ExpiryService<S, C>,
) -> Result<ExitCode> {
    match command {
        Command::Predict { product, mfg_date } => {
            match service.predict(&product, mfg_date.as_deref()) {
                Ok(outcome) => {
                    println!("{}", render::render_outcome(&outcome));
                    let record = service.record_prediction(outcome)?;
                    debug!("recorded as #{}", record.id);
                }
                Err(e) => {
                    warn!("prediction rejected: {}", e);
                    eprintln!("{}", e.user_message());
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Command::History { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(service.list_records())?);
            } else {
                println!("{}", render::render_history(service.list_records()));
            }
        }
        Command::Delete { id } => {
            if service.remove_record(id)? {
                println!("Deleted entry {id}");
            } else {
                println!("No history entry with id {id}; nothing deleted");
            }
        }
        Command::Products => {
            println!("{}", render::render_products(service.table(), service.today()));
        }
    }

    Ok(ExitCode::SUCCESS)
}
