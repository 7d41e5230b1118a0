//! Command implementations
//!
//! Each command returns the process exit code.

use crate::errors::{EXIT_ISSUES_FOUND, EXIT_NOT_READY, EXIT_SUCCESS};
use crate::output::{render_libraries, render_limits, render_report, render_status, ColorMode};
use anyhow::{bail, Context, Result};
use mlr_shared::config::MlrConfig;
use mlr_shared::error::MlrError;
use mlr_shared::matching::check_claim;
use mlr_shared::poll::cancel_pair;
use mlr_shared::presentation::{build_report, ResultsReport};
use mlr_shared::session::{CheckOutcome, ClaimsSession};
use mlr_shared::source::JsonFileSource;
use mlr_shared::violation::ClaimResults;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments of `mlrctl check`.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub experiences: PathBuf,
    pub libraries: Vec<String>,
    pub experience_id: Option<String>,
    pub wait: bool,
    pub json: bool,
}

/// JSON shape of one checked experience.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub experience_id: String,
    pub results: ClaimResults,
    pub report: ResultsReport,
}

impl From<CheckOutcome> for CheckOutput {
    fn from(outcome: CheckOutcome) -> Self {
        let report = build_report(&outcome.results, outcome.experience_index);
        Self {
            experience_id: outcome.experience_id,
            results: outcome.results,
            report,
        }
    }
}

pub fn libraries(config: &MlrConfig, json: bool) -> Result<i32> {
    let registry = config
        .claim_registry()
        .context("Failed to load claim libraries")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&registry.to_payload())?);
    } else {
        print!("{}", render_libraries(&registry));
    }
    Ok(EXIT_SUCCESS)
}

pub fn limits(config: &MlrConfig) -> Result<i32> {
    print!("{}", render_limits(&config.character_limits()));
    Ok(EXIT_SUCCESS)
}

pub fn claim(claim: &str, text: &str) -> Result<i32> {
    let result = check_claim(text, claim);
    println!(
        "{}",
        render_status(result.status(), result.message(), ColorMode::detect())
    );
    Ok(if result.is_violated() {
        EXIT_ISSUES_FOUND
    } else {
        EXIT_SUCCESS
    })
}

/// Validate experiences from a file and print the reports.
pub async fn check(config: &MlrConfig, args: CheckArgs) -> Result<i32> {
    let outputs = match run_check(config, &args).await {
        Ok(outputs) => outputs,
        Err(e) => {
            let not_ready = match e.downcast_ref::<MlrError>() {
                Some(MlrError::PollExhausted { attempts }) => Some(format!(
                    "No experiences in {} after {} attempts",
                    args.experiences.display(),
                    attempts
                )),
                Some(MlrError::Cancelled) => Some("Cancelled".to_string()),
                _ => None,
            };
            match not_ready {
                Some(message) => {
                    eprintln!("{}", message);
                    return Ok(EXIT_NOT_READY);
                }
                None => return Err(e),
            }
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        let color = ColorMode::detect();
        for (i, output) in outputs.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", render_report(&output.report, color));
        }
    }

    let any_issues = outputs.iter().any(|o| o.report.has_issues());
    Ok(if any_issues {
        EXIT_ISSUES_FOUND
    } else {
        EXIT_SUCCESS
    })
}

/// Load, select and validate every requested experience.
pub async fn run_check(config: &MlrConfig, args: &CheckArgs) -> Result<Vec<CheckOutput>> {
    let validator = config.validator().context("Failed to load claim libraries")?;
    let source = JsonFileSource::new(&args.experiences);
    let mut session = ClaimsSession::new(source, validator);

    if args.wait {
        let (handle, mut signal) = cancel_pair();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
        });
        let result = session
            .wait_for_experiences(&config.poll.to_poll_config(), &mut signal)
            .await;
        ctrl_c.abort();
        result?;
    } else if !session.sync()? {
        bail!("No experiences found in {}", args.experiences.display());
    }

    let library_ids: Vec<String> = if args.libraries.is_empty() {
        session
            .validator()
            .registry()
            .iter()
            .map(|library| library.id.clone())
            .collect()
    } else {
        args.libraries.clone()
    };
    for id in &library_ids {
        if session.validator().registry().get(id).is_none() {
            warn!("Unknown claim library '{}', only length rules apply", id);
        }
        session.select_library(id);
    }

    let positions: Vec<usize> = session
        .experiences()
        .iter()
        .enumerate()
        .filter(|(_, exp)| args.experience_id.as_ref().map_or(true, |id| &exp.id == id))
        .map(|(index, _)| index)
        .collect();
    if let Some(id) = &args.experience_id {
        if positions.is_empty() {
            bail!(
                "Cannot select experience '{}': not in {}",
                id,
                args.experiences.display()
            );
        }
    }

    let mut outputs = Vec::with_capacity(positions.len());
    for index in positions {
        session
            .select_experience_at(index)
            .with_context(|| format!("Cannot select experience {}", index + 1))?;
        let outcome = session.run_check()?;
        info!(
            "Checked experience {} ({} fields)",
            outcome.experience_id,
            outcome.results.len()
        );
        outputs.push(CheckOutput::from(outcome));
    }

    Ok(outputs)
}
