//! Typed failures of the analysis engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Category;

/// Why a document could not be assessed. No partial assessment is ever returned.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input cannot be decoded as text: {0}")]
    UnsupportedEncoding(String),

    #[error("document contains no clauses to assess")]
    EmptyDocument,

    #[error("invalid rule set: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Problems found while loading or compiling a rule set.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read rules file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rule `{rule_id}` has an invalid pattern: {source}")]
    InvalidPattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    UnknownCategory(String),

    #[error("category `{}` has no risk_indicators entry", .0.key())]
    MissingRiskIndicators(Category),

    #[error("category `{}` is listed more than once in risk_indicators", .0.key())]
    DuplicateRiskIndicators(Category),

    #[error("score band thresholds must be finite and increasing (got {low_medium} / {medium_high})")]
    InvalidThresholds { low_medium: f64, medium_high: f64 },

    #[error("weight `{name}` must be a positive number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },
}
