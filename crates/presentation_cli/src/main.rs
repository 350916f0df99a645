//! trend-digest CLI
//!
//! Command-line entry point for the digest pipeline: sends a rendered HTML
//! digest through the configured mail transport, or recovers the analysis
//! payload from a file of streamed assistant message records.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use application::extract_analysis;
use clap::{Parser, Subcommand};
use domain::{DeliveryRequest, MessageRecord};
use infrastructure::{AppConfig, Environment, build_dispatch_service, init_tracing};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// trend-digest CLI
#[derive(Parser)]
#[command(name = "trend-digest")]
#[command(author, version, about = "GitHub Trending digest dispatcher", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a rendered digest through the configured mail transport
    ///
    /// Transport, credentials and addresses come from the environment
    /// (EMAIL_TRANSPORT, SMTP_*, RESEND_API_KEY, EMAIL_FROM, EMAIL_TO).
    /// Example: trend-digest send digest.html --language zh-CN
    Send {
        /// Path to the rendered HTML digest body
        html: PathBuf,

        /// Language tag appended to the subject line, e.g. "zh-CN"
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Recover the analysis result from streamed assistant message records
    ///
    /// Reads a JSON array of message records and prints the extracted
    /// analysis result as pretty-printed JSON on stdout.
    /// Example: trend-digest extract messages.json
    Extract {
        /// Path to the JSON array of message records
        messages: PathBuf,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing, letting `-v` flags override the environment default
fn setup_tracing(verbose: u8, environment: Environment) {
    if verbose == 0 {
        init_tracing(environment);
    } else {
        let filter = log_filter_from_verbosity(verbose);
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(filter))
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    }
}

/// Read and parse a file of streamed message records
fn read_messages(path: &Path) -> anyhow::Result<Vec<MessageRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read messages file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Messages file is not a JSON array of records: {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send { html, language } => {
            let config = AppConfig::load().context("Failed to load configuration")?;
            setup_tracing(cli.verbose, config.environment);

            let body = std::fs::read_to_string(&html)
                .with_context(|| format!("Failed to read digest body: {}", html.display()))?;

            let mut request = DeliveryRequest::new(body);
            if let Some(tag) = language {
                request = request.with_language(tag);
            }

            let service = build_dispatch_service(&config);
            match service.deliver(&request).await {
                Ok(()) => println!("✅ Digest delivery completed"),
                Err(e) => {
                    println!("❌ Digest delivery failed: {e}");
                    std::process::exit(1);
                },
            }
        },

        Commands::Extract { messages } => {
            setup_tracing(cli.verbose, Environment::Production);

            let records = read_messages(&messages)?;
            match extract_analysis(&records) {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                },
                Err(e) => {
                    println!("❌ Extraction failed: {e}");
                    std::process::exit(1);
                },
            }
        },
    }

    Ok(())
}
