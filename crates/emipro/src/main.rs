// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emigration Pro - personalized relocation reports.
//!
//! This is the binary entry point: profile and topic selection, checkout,
//! resuming after payment, and the timed report preview.

mod catalog;
mod checkout;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use emipro_config::EmiproConfig;
use emipro_core::EmiproError;
use emipro_export::PdfExporter;
use emipro_flow::ReportFlow;
use emipro_gemini::GeminiProvider;
use emipro_storage::SqliteSessionStore;

/// Emigration Pro - personalized relocation reports.
#[derive(Parser, Debug)]
#[command(name = "emipro", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the report topics.
    Topics,
    /// List destination countries, or the cities of one country.
    Countries {
        /// Country whose cities to list.
        country: Option<String>,
    },
    /// Save a profile and topic selection, then open a checkout.
    Checkout(CheckoutArgs),
    /// Resume after payment: generate the report and open the preview shell.
    Resume {
        /// The address checkout returned to.
        return_url: String,
        /// Where to write the HTML preview.
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,
    },
}

/// Profile and topic selection for `emipro checkout`.
#[derive(Args, Debug)]
struct CheckoutArgs {
    #[arg(long)]
    country: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    profession: String,
    #[arg(long)]
    age: String,
    /// Budget-conscious, Moderate or Luxury.
    #[arg(long, default_value = "Moderate")]
    lifestyle: String,
    /// Topic id; repeat for several (see `emipro topics`).
    #[arg(long = "topic", value_name = "ID", required = true)]
    topics: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => emipro_config::load_and_validate_path(path),
        None => emipro_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            emipro_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Topics) => {
            catalog::print_topics();
            Ok(())
        }
        Some(Commands::Countries { country }) => catalog::print_countries(country.as_deref()),
        Some(Commands::Checkout(args)) => checkout::run_checkout(config, args).await,
        Some(Commands::Resume {
            return_url,
            preview,
        }) => shell::run_resume(config, &return_url, preview).await,
        None => {
            println!("emipro: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("{}: {}", "error".red(), e.user_message());
        std::process::exit(1);
    }
}

/// Wires the generation, storage and export adapters into a [`ReportFlow`].
///
/// The generation key must resolve here. `emipro checkout` attaches the
/// payment processor on top, so a payment is never taken for a report that
/// cannot be generated, while `emipro resume` needs no payment credentials.
fn build_flow(config: EmiproConfig) -> Result<ReportFlow, EmiproError> {
    let provider = GeminiProvider::new(&config)?;
    let store = SqliteSessionStore::new(config.storage.clone());
    let exporter = PdfExporter::new(&config.export);

    Ok(ReportFlow::new(
        config,
        Arc::new(provider),
        Arc::new(store),
        Arc::new(exporter),
    ))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("emipro={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
