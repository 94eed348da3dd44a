use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::models::{Category, ContractType, RiskLevel};

/// Rules shipped with the binary, used when no rules file is found.
pub const DEFAULT_RULES: &str = include_str!("../rules/default.toml");

/// Root of a rules file (`.contract-risk/rules.toml`), before compilation.
#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    /// Classification rules. Higher `priority` entries are tried first.
    #[serde(default)]
    pub category_patterns: Vec<CategoryPatterns>,
    /// Per-category risk indicators and the level used when none match.
    #[serde(default)]
    pub risk_indicators: Vec<CategoryIndicators>,
    /// Indicators evaluated for every clause, after the category's own list.
    #[serde(default)]
    pub general_indicators: Vec<IndicatorConfig>,
    /// Category key (e.g. `"non_compete"`) → contract type it votes for.
    #[serde(default)]
    pub contract_type_affinity: BTreeMap<String, ContractType>,
    #[serde(default)]
    pub high_impact_categories: Vec<Category>,
    #[serde(default = "default_high_impact_weight")]
    pub high_impact_weight: f64,
    #[serde(default)]
    pub severity_weights: SeverityWeights,
    #[serde(default)]
    pub score_band_thresholds: BandThresholds,
    #[serde(default)]
    pub segmentation: SegmentationRules,
    #[serde(default)]
    pub explanation_templates: Vec<TemplateConfig>,
}

fn default_high_impact_weight() -> f64 {
    2.0
}

#[derive(Debug, Deserialize)]
pub struct CategoryPatterns {
    pub category: Category,
    #[serde(default)]
    pub priority: i32,
    pub patterns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryIndicators {
    pub category: Category,
    /// Level assigned when no indicator matches; also the floor otherwise.
    #[serde(default = "default_level")]
    pub default: RiskLevel,
    /// Remediation offered for a high-risk clause when no indicator has one.
    pub suggestion: Option<String>,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

fn default_level() -> RiskLevel {
    RiskLevel::Low
}

#[derive(Debug, Deserialize)]
pub struct IndicatorConfig {
    pub id: String,
    pub pattern: String,
    pub severity: RiskLevel,
    pub reason: Option<String>,
    pub suggestion: Option<String>,
}

/// Numeric value of each risk level in the weighted mean.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeverityWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        SeverityWeights {
            low: 1.0,
            medium: 2.0,
            high: 3.0,
        }
    }
}

impl SeverityWeights {
    pub fn value(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }
}

/// Band boundaries: Low below `low_medium`, High at or above `medium_high`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BandThresholds {
    pub low_medium: f64,
    pub medium_high: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        BandThresholds {
            low_medium: 1.5,
            medium_high: 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SegmentationRules {
    /// Paragraphs with fewer whitespace-separated tokens are merged forward.
    #[serde(default = "default_min_clause_tokens")]
    pub min_clause_tokens: usize,
}

fn default_min_clause_tokens() -> usize {
    5
}

impl Default for SegmentationRules {
    fn default() -> Self {
        SegmentationRules {
            min_clause_tokens: default_min_clause_tokens(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplateConfig {
    /// Omitted → applies to every category at `level`.
    pub category: Option<Category>,
    pub level: RiskLevel,
    pub template: String,
}

impl RuleConfig {
    pub fn from_toml(content: &str) -> Result<RuleConfig, ConfigurationError> {
        Ok(toml::from_str(content)?)
    }
}

/// Where the active rules came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RulesSource {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for RulesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesSource::File(path) => write!(f, "{}", path.display()),
            RulesSource::BuiltIn => write!(f, "built-in rules"),
        }
    }
}

/// Load the rules configuration, searching in order:
///
/// 1. `rules_override` — path passed via `--rules`
/// 2. `<project_path>/.contract-risk/rules.toml`
/// 3. `~/.config/contract-risk/rules.toml`
/// 4. Built-in [`DEFAULT_RULES`]
pub fn load_rules(
    project_path: &Path,
    rules_override: Option<&Path>,
) -> Result<(RuleConfig, RulesSource), ConfigurationError> {
    if let Some(path) = rules_override {
        return Ok((read_rules(path)?, RulesSource::File(path.to_path_buf())));
    }

    let project_rules = project_path.join(".contract-risk").join("rules.toml");
    if project_rules.exists() {
        return Ok((read_rules(&project_rules)?, RulesSource::File(project_rules)));
    }

    if let Some(home) = dirs::home_dir() {
        let home_rules = home
            .join(".config")
            .join("contract-risk")
            .join("rules.toml");
        if home_rules.exists() {
            return Ok((read_rules(&home_rules)?, RulesSource::File(home_rules)));
        }
    }

    Ok((RuleConfig::from_toml(DEFAULT_RULES)?, RulesSource::BuiltIn))
}

fn read_rules(path: &Path) -> Result<RuleConfig, ConfigurationError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    RuleConfig::from_toml(&content)
}
