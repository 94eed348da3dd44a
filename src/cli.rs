use std::path::PathBuf;

use clap::Parser;

use crate::models::{Language, RiskLevel};

#[derive(Parser, Debug)]
#[command(
    name = "contract-risk",
    about = "Classify contract clauses, score their risk and explain the findings",
    version
)]
pub struct Cli {
    /// Plain-text contract files to analyze; `-` reads standard input
    #[arg(default_value = "-", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Language of the documents
    #[arg(long, default_value = "auto", value_name = "LANG")]
    pub lang: LanguageArg,

    /// Rule file [default: ./.contract-risk/rules.toml, fallback ~/.config/contract-risk/rules.toml, then built-in rules]
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to contract-risk-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "contract-risk-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Append one JSON line per assessed document to this file
    #[arg(long, value_name = "FILE")]
    pub audit_log: Option<PathBuf>,

    /// Give up on a document after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Exit with status 1 when any document's overall band reaches this level
    #[arg(long, default_value = "high", value_name = "LEVEL")]
    pub fail_on: LevelArg,

    /// Show every clause with its evidence (not just medium/high)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LanguageArg {
    Auto,
    En,
    Hi,
    Unknown,
}

impl LanguageArg {
    /// `None` asks the pipeline to detect the language.
    pub fn tag(self) -> Option<Language> {
        match self {
            LanguageArg::Auto => None,
            LanguageArg::En => Some(Language::En),
            LanguageArg::Hi => Some(Language::Hi),
            LanguageArg::Unknown => Some(Language::Unknown),
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LevelArg {
    Low,
    Medium,
    High,
}

impl From<LevelArg> for RiskLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Low => RiskLevel::Low,
            LevelArg::Medium => RiskLevel::Medium,
            LevelArg::High => RiskLevel::High,
        }
    }
}
