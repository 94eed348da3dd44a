//! `contract-risk`: classify contract clauses, score their risk and explain the findings.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load and compile the rule set ([`config::load_rules`], [`rules::RuleSet::compile`]).
//! 3. Read each input document (files or standard input).
//! 4. Run the [`pipeline`] per document on the blocking pool: normalize ([`text`]),
//!    segment, classify and score each clause ([`clause`]), then aggregate
//!    ([`aggregate`]) into a [`models::ContractAssessment`].
//! 5. Optionally append an audit line per document (`--audit-log`, [`audit`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` when a document failed or an overall band reached `--fail-on`.

mod aggregate;
mod audit;
mod clause;
mod cli;
mod config;
mod detector;
mod error;
mod facts;
mod models;
mod pipeline;
mod report;
mod rules;
mod text;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use audit::AuditRecord;
use cli::{Cli, ReportFormat};
use config::load_rules;
use models::{ContractAssessment, Document, Language, RiskLevel};
use pipeline::Pipeline;
use rules::RuleSet;

/// One document to analyze; a read failure is carried so it is reported
/// alongside the others instead of aborting the run.
struct Input {
    id: String,
    bytes: Result<Vec<u8>>,
}

type Outcome = (String, Result<(Document, ContractAssessment)>);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (config, source) =
        load_rules(&cwd, cli.rules.as_deref()).context("Failed to load rules")?;
    let rules = RuleSet::compile(config).with_context(|| format!("Invalid rules in {}", source))?;
    info!(%source, "rules loaded");

    let pipeline = Arc::new(Pipeline::new(Arc::new(rules)));
    let inputs = read_inputs(&cli.files);
    let deadline = cli.timeout_secs.map(Duration::from_secs);

    let outcomes = analyze_all(pipeline, inputs, cli.lang.tag(), deadline, cli.quiet).await?;

    let mut analyzed: Vec<(Document, ContractAssessment)> = Vec::new();
    let mut failures = 0usize;
    for (id, outcome) in outcomes {
        match outcome {
            Ok((document, assessment)) => {
                if !cli.quiet {
                    eprintln!(
                        "  {} {} {} clauses",
                        "→".cyan(),
                        id,
                        assessment.clauses.len()
                    );
                }
                analyzed.push((document, assessment));
            }
            Err(e) => {
                failures += 1;
                eprintln!("  {} {}: {:#}", "✗".red(), id, e);
            }
        }
    }

    if analyzed.is_empty() {
        eprintln!("No document could be analyzed");
        std::process::exit(1);
    }

    if let Some(path) = &cli.audit_log {
        let records: Vec<AuditRecord<'_>> = analyzed
            .iter()
            .map(|(document, assessment)| AuditRecord::new(document, assessment))
            .collect();
        audit::append(path, &records)?;
        debug!(path = %path.display(), records = records.len(), "audit log appended");
    }

    let assessments: Vec<ContractAssessment> = analyzed.into_iter().map(|(_, a)| a).collect();

    // --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report,
    };
    let pdf_path = cli
        .pdf
        .unwrap_or_else(|| PathBuf::from("contract-risk-report.pdf"));

    match report_format {
        ReportFormat::Terminal => {
            report::terminal::render(&assessments, &source, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assessments)?);
        }
        ReportFormat::Pdf => {
            report::pdf::render(&assessments, &pdf_path)?;
        }
    }

    let fail_on = RiskLevel::from(cli.fail_on);
    let breached = assessments.iter().any(|a| a.score.band >= fail_on);
    if failures > 0 || breached {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "contract_risk=debug" } else { "contract_risk=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn read_inputs(files: &[PathBuf]) -> Vec<Input> {
    files
        .iter()
        .map(|path| {
            if path == Path::new("-") {
                let mut bytes = Vec::new();
                let read = std::io::stdin()
                    .read_to_end(&mut bytes)
                    .map(|_| bytes)
                    .context("Failed to read standard input");
                Input {
                    id: "stdin".to_string(),
                    bytes: read,
                }
            } else {
                Input {
                    id: path.display().to_string(),
                    bytes: std::fs::read(path)
                        .with_context(|| format!("Failed to read {}", path.display())),
                }
            }
        })
        .collect()
}

/// Analyze every input concurrently on the blocking pool.
///
/// Results come back in input order. A document that fails, panics or
/// misses the deadline is reported as an error without affecting the rest.
async fn analyze_all(
    pipeline: Arc<Pipeline>,
    inputs: Vec<Input>,
    language: Option<Language>,
    deadline: Option<Duration>,
    quiet: bool,
) -> Result<Vec<Outcome>> {
    let pb = if !quiet && inputs.len() > 1 {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let futures: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let pipeline = Arc::clone(&pipeline);
            let pb = pb.clone();
            async move {
                let result = match input.bytes {
                    Ok(bytes) => analyze_one(pipeline, &input.id, bytes, language, deadline).await,
                    Err(e) => Err(e),
                };
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                (input.id, result)
            }
        })
        .collect();

    let results = join_all(futures).await;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(results)
}

async fn analyze_one(
    pipeline: Arc<Pipeline>,
    id: &str,
    bytes: Vec<u8>,
    language: Option<Language>,
    deadline: Option<Duration>,
) -> Result<(Document, ContractAssessment)> {
    let task_id = id.to_string();
    let task = tokio::task::spawn_blocking(move || pipeline.analyze(&task_id, &bytes, language));

    // On timeout the blocking task runs to completion and its result is dropped.
    let joined = match deadline {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow!("timed out after {}s", limit.as_secs()))?,
        None => task.await,
    };

    let outcome = joined.context("Analysis task failed")?;
    outcome.with_context(|| format!("Cannot analyze {}", id))
}
