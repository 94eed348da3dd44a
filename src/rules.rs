//! Compiled, read-only rule set shared by every analysis.
//!
//! A [`RuleSet`] is built once from a [`RuleConfig`] and then only ever read;
//! callers share it behind an `Arc` across concurrent analyses.

use std::collections::{HashMap, HashSet};
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::config::{
    BandThresholds, IndicatorConfig, RuleConfig, SegmentationRules, SeverityWeights,
};
use crate::error::ConfigurationError;
use crate::models::{Category, ContractType, RiskLevel};

/// One classification rule. Rules are stored in evaluation order.
#[derive(Debug)]
pub struct CategoryRule {
    pub id: String,
    pub category: Category,
    pub pattern: Regex,
}

#[derive(Debug)]
pub struct Indicator {
    pub id: String,
    pub pattern: Regex,
    pub severity: RiskLevel,
    pub reason: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug)]
pub struct IndicatorSet {
    pub default: RiskLevel,
    pub suggestion: Option<String>,
    pub indicators: Vec<Indicator>,
}

#[derive(Debug)]
struct Template {
    category: Option<Category>,
    level: RiskLevel,
    text: String,
}

#[derive(Debug)]
pub struct RuleSet {
    category_rules: Vec<CategoryRule>,
    indicators: HashMap<Category, IndicatorSet>,
    general_indicators: Vec<Indicator>,
    affinity: HashMap<Category, ContractType>,
    high_impact: HashSet<Category>,
    pub high_impact_weight: f64,
    pub severity_weights: SeverityWeights,
    pub thresholds: BandThresholds,
    pub segmentation: SegmentationRules,
    templates: Vec<Template>,
}

impl RuleSet {
    /// Compile and validate a parsed rules file.
    pub fn compile(config: RuleConfig) -> Result<RuleSet, ConfigurationError> {
        validate_numbers(&config)?;

        // Stable sort: equal priorities keep their declaration order.
        let mut entries: Vec<_> = config.category_patterns.iter().collect();
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut category_rules = Vec::new();
        for entry in entries {
            for (n, pattern) in entry.patterns.iter().enumerate() {
                let id = format!("{}.{}", entry.category.key(), n + 1);
                category_rules.push(CategoryRule {
                    pattern: compile_pattern(&id, pattern)?,
                    id,
                    category: entry.category,
                });
            }
        }

        let mut indicators = HashMap::new();
        for entry in config.risk_indicators {
            if indicators.contains_key(&entry.category) {
                return Err(ConfigurationError::DuplicateRiskIndicators(entry.category));
            }
            let compiled = entry
                .indicators
                .into_iter()
                .map(compile_indicator)
                .collect::<Result<Vec<_>, _>>()?;
            indicators.insert(
                entry.category,
                IndicatorSet {
                    default: entry.default,
                    suggestion: entry.suggestion,
                    indicators: compiled,
                },
            );
        }

        // Every category the classifier can emit needs a scoring entry.
        let emitted = category_rules
            .iter()
            .map(|r| r.category)
            .chain(std::iter::once(Category::Other));
        for category in emitted {
            if !indicators.contains_key(&category) {
                return Err(ConfigurationError::MissingRiskIndicators(category));
            }
        }

        let general_indicators = config
            .general_indicators
            .into_iter()
            .map(compile_indicator)
            .collect::<Result<Vec<_>, _>>()?;

        let mut affinity = HashMap::new();
        for (key, contract_type) in config.contract_type_affinity {
            let category: Category = key.parse().map_err(ConfigurationError::UnknownCategory)?;
            affinity.insert(category, contract_type);
        }

        let templates = config
            .explanation_templates
            .into_iter()
            .map(|t| Template {
                category: t.category,
                level: t.level,
                text: t.template,
            })
            .collect();

        Ok(RuleSet {
            category_rules,
            indicators,
            general_indicators,
            affinity,
            high_impact: config.high_impact_categories.into_iter().collect(),
            high_impact_weight: config.high_impact_weight,
            severity_weights: config.severity_weights,
            thresholds: config.score_band_thresholds,
            segmentation: config.segmentation,
            templates,
        })
    }

    /// Classification rules in evaluation order.
    pub fn category_rules(&self) -> &[CategoryRule] {
        &self.category_rules
    }

    pub fn indicators_for(&self, category: Category) -> Option<&IndicatorSet> {
        self.indicators.get(&category)
    }

    pub fn general_indicators(&self) -> &[Indicator] {
        &self.general_indicators
    }

    pub fn affinity(&self, category: Category) -> Option<ContractType> {
        self.affinity.get(&category).copied()
    }

    pub fn is_high_impact(&self, category: Category) -> bool {
        self.high_impact.contains(&category)
    }

    /// Weight of a clause of `category` in the overall score.
    pub fn clause_weight(&self, category: Category) -> f64 {
        if self.is_high_impact(category) {
            self.high_impact_weight
        } else {
            1.0
        }
    }

    /// Map a weighted mean onto a band using the configured thresholds.
    pub fn band(&self, value: f64) -> RiskLevel {
        if value < self.thresholds.low_medium {
            RiskLevel::Low
        } else if value < self.thresholds.medium_high {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Most specific configured template for `(category, level)`.
    pub fn template_for(&self, category: Category, level: RiskLevel) -> Option<&str> {
        self.templates
            .iter()
            .find(|t| t.category == Some(category) && t.level == level)
            .or_else(|| {
                self.templates
                    .iter()
                    .find(|t| t.category.is_none() && t.level == level)
            })
            .map(|t| t.text.as_str())
    }
}

fn compile_pattern(rule_id: &str, pattern: &str) -> Result<Regex, ConfigurationError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigurationError::InvalidPattern {
            rule_id: rule_id.to_string(),
            source,
        })
}

fn compile_indicator(cfg: IndicatorConfig) -> Result<Indicator, ConfigurationError> {
    Ok(Indicator {
        pattern: compile_pattern(&cfg.id, &cfg.pattern)?,
        id: cfg.id,
        severity: cfg.severity,
        reason: cfg.reason,
        suggestion: cfg.suggestion,
    })
}

fn validate_numbers(config: &RuleConfig) -> Result<(), ConfigurationError> {
    let t = config.score_band_thresholds;
    if !t.low_medium.is_finite() || !t.medium_high.is_finite() || t.low_medium >= t.medium_high {
        return Err(ConfigurationError::InvalidThresholds {
            low_medium: t.low_medium,
            medium_high: t.medium_high,
        });
    }

    let w = config.severity_weights;
    let weights = [
        ("high_impact_weight", config.high_impact_weight),
        ("severity_weights.low", w.low),
        ("severity_weights.medium", w.medium),
        ("severity_weights.high", w.high),
    ];
    for (name, value) in weights {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigurationError::InvalidWeight { name, value });
        }
    }
    Ok(())
}

#[cfg(test)]
static BUILTIN: Lazy<Arc<RuleSet>> =
    Lazy::new(|| Arc::new(RuleSet::builtin().expect("built-in rules compile")));

#[cfg(test)]
impl RuleSet {
    /// Parse and compile rules from TOML text.
    pub fn from_toml(content: &str) -> Result<RuleSet, ConfigurationError> {
        RuleSet::compile(RuleConfig::from_toml(content)?)
    }

    /// The rules embedded in the binary.
    pub fn builtin() -> Result<RuleSet, ConfigurationError> {
        RuleSet::from_toml(crate::config::DEFAULT_RULES)
    }

    /// The built-in rules, compiled once per test binary.
    pub fn shared() -> Arc<RuleSet> {
        Arc::clone(&BUILTIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[category_patterns]]
category = "indemnity"
priority = 10
patterns = ['\bindemnif\w*']

[[risk_indicators]]
category = "indemnity"
default = "medium"

[[risk_indicators]]
category = "other"
"#;

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSet::builtin().unwrap();
        assert!(!rules.category_rules().is_empty());
        assert!(rules.is_high_impact(Category::NonCompete));
        assert!(rules.is_high_impact(Category::Indemnity));
        assert!(rules.is_high_impact(Category::Termination));
        assert!(!rules.is_high_impact(Category::Other));
        assert_eq!(rules.affinity(Category::NonCompete), Some(ContractType::Employment));
        assert_eq!(rules.affinity(Category::Other), None);
    }

    #[test]
    fn test_rules_sorted_by_priority_then_declaration() {
        let rules = RuleSet::from_toml(
            r#"
[[category_patterns]]
category = "payment"
priority = 1
patterns = ['pay']

[[category_patterns]]
category = "termination"
priority = 5
patterns = ['end', 'stop']

[[category_patterns]]
category = "rent"
priority = 5
patterns = ['rent']

[[risk_indicators]]
category = "payment"
[[risk_indicators]]
category = "termination"
[[risk_indicators]]
category = "rent"
[[risk_indicators]]
category = "other"
"#,
        )
        .unwrap();

        let ids: Vec<&str> = rules.category_rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["termination.1", "termination.2", "rent.1", "payment.1"]);
    }

    #[test]
    fn test_missing_risk_indicators_is_configuration_error() {
        let err = RuleSet::from_toml(
            r#"
[[category_patterns]]
category = "rent"
patterns = ['rent']

[[risk_indicators]]
category = "other"
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingRiskIndicators(Category::Rent)
        ));
    }

    #[test]
    fn test_other_always_needs_an_entry() {
        let err = RuleSet::from_toml("").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingRiskIndicators(Category::Other)
        ));
    }

    #[test]
    fn test_invalid_pattern_names_the_rule() {
        let err = RuleSet::from_toml(
            r#"
[[risk_indicators]]
category = "other"
indicators = [{ id = "broken", pattern = '(unclosed', severity = "high" }]
"#,
        )
        .unwrap_err();
        match err {
            ConfigurationError::InvalidPattern { rule_id, .. } => assert_eq!(rule_id, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_thresholds_must_increase() {
        let toml = format!(
            "{MINIMAL}\n[score_band_thresholds]\nlow_medium = 2.5\nmedium_high = 1.5\n"
        );
        let err = RuleSet::from_toml(&toml).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_weights_must_be_positive() {
        let toml = format!("high_impact_weight = 0.0\n{MINIMAL}");
        let err = RuleSet::from_toml(&toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidWeight { name: "high_impact_weight", .. }
        ));
    }

    #[test]
    fn test_unknown_affinity_key() {
        let toml = format!("[contract_type_affinity]\nbogus = \"lease\"\n{MINIMAL}");
        let err = RuleSet::from_toml(&toml).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownCategory(_)));
    }

    #[test]
    fn test_duplicate_indicator_entry() {
        let toml = format!("{MINIMAL}\n[[risk_indicators]]\ncategory = \"other\"\n");
        let err = RuleSet::from_toml(&toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DuplicateRiskIndicators(Category::Other)
        ));
    }

    #[test]
    fn test_band_uses_configured_thresholds() {
        let rules = RuleSet::from_toml(MINIMAL).unwrap();
        assert_eq!(rules.band(1.49), RiskLevel::Low);
        assert_eq!(rules.band(1.5), RiskLevel::Medium);
        assert_eq!(rules.band(2.49), RiskLevel::Medium);
        assert_eq!(rules.band(2.5), RiskLevel::High);

        let strict = format!(
            "{MINIMAL}\n[score_band_thresholds]\nlow_medium = 1.2\nmedium_high = 2.0\n"
        );
        let rules = RuleSet::from_toml(&strict).unwrap();
        assert_eq!(rules.band(2.1), RiskLevel::High);
    }

    #[test]
    fn test_template_lookup_prefers_category() {
        let rules = RuleSet::builtin().unwrap();
        let specific = rules.template_for(Category::Indemnity, RiskLevel::High).unwrap();
        let generic = rules.template_for(Category::Payment, RiskLevel::High).unwrap();
        assert!(specific.contains("without a clear limit"));
        assert!(generic.contains("significantly disadvantages"));
    }
}
