//! dnaetl - DNA metadata and sequence ETL
//!
//! Reads an input descriptor naming a context directory, validates and
//! filters the participant metadata, analyzes the DNA sequences and writes
//! `<results_path>/<participant_id>.json`.
//!
//! Exit status is 0 on success, 2 for command-line usage errors (clap) and
//! a distinct code per failure category otherwise (see
//! `dnaetl_common::Error::exit_code`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dnaetl::{FilterRules, PipelineOutcome};
use dnaetl_common::config::{self, CONFIG_ENV_VAR};
use dnaetl_common::TomlConfig;
use tracing::{error, info};

/// Command-line arguments for dnaetl
#[derive(Parser, Debug)]
#[command(name = "dnaetl")]
#[command(about = "Validate participant metadata, analyze DNA sequences and write a result document")]
#[command(version)]
struct Args {
    /// Input descriptor JSON with context_path and results_path
    #[arg(short, long, env = "DNAETL_INPUT")]
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let loaded = config::load_config(config_path.as_deref());

    let log_level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&log_level);

    info!(
        "Starting dnaetl v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    match run(&args, config) {
        Ok(outcome) => {
            info!(
                "Participant {} done: {} sequence(s) -> {}",
                outcome.participant_id,
                outcome
                    .document
                    .results
                    .first()
                    .map(|item| item.txt.sequences.len())
                    .unwrap_or(0),
                outcome.output_path.display()
            );
        }
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<dnaetl_common::Error>()
                .map(dnaetl_common::Error::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

fn run(args: &Args, config: TomlConfig) -> Result<PipelineOutcome> {
    let rules = FilterRules::from(config.filter);
    dnaetl::run(&args.input, &rules)
        .with_context(|| format!("Pipeline failed for {}", args.input.display()))
}

/// RUST_LOG takes precedence over the configured level
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
