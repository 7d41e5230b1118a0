//! mlrctl - MLR claims checker
//!
//! Validates experience copy against claim libraries and character limits.

use anyhow::Result;
use clap::Parser;
use mlr_shared::config::MlrConfig;
use mlr_shared::error::MlrError;
use mlrctl::cli::{Cli, Commands};
use mlrctl::commands::{self, CheckArgs};
use mlrctl::errors::EXIT_GENERAL_ERROR;
use mlrctl::logging;
use tracing::debug;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<MlrError>() {
                debug!("Failed with error code {}", err.code());
            }
            eprintln!("Error: {:#}", e);
            EXIT_GENERAL_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = MlrConfig::load(cli.config.as_deref())?;
    logging::init(cli.verbose, &config.logging.level);
    debug!("mlrctl v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Libraries { json } => commands::libraries(&config, json),
        Commands::Check {
            experiences,
            libraries,
            experience_id,
            wait,
            json,
        } => {
            let args = CheckArgs {
                experiences,
                libraries,
                experience_id,
                wait,
                json,
            };
            commands::check(&config, args).await
        }
        Commands::Claim { claim, text } => commands::claim(&claim, &text),
        Commands::Limits => commands::limits(&config),
    }
}
