use crate::clause::classifier::Classification;
use crate::models::{Evidence, RiskLevel};
use crate::rules::{Indicator, RuleSet};

/// Risk level of one clause and the indicator matches behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub evidence: Vec<Evidence>,
    /// Remediation from the most severe matched indicator carrying one.
    pub suggestion: Option<String>,
}

/// Score a classified clause.
///
/// The level is the worst of the category default and every matched
/// indicator; a single severe match is never averaged away. Evidence keeps
/// every match in rule order: the category's indicators first, then the
/// general ones.
pub fn score(text: &str, classification: &Classification, rules: &RuleSet) -> RiskAssessment {
    let (default, category_indicators) = match rules.indicators_for(classification.category) {
        Some(set) => (set.default, set.indicators.as_slice()),
        None => (RiskLevel::Low, &[][..]),
    };

    let mut level = default;
    let mut evidence = Vec::new();
    let mut suggestion: Option<(RiskLevel, &str)> = None;

    let indicators = category_indicators
        .iter()
        .chain(rules.general_indicators().iter());

    for indicator in indicators {
        let Some(m) = indicator.pattern.find(text) else {
            continue;
        };
        level = level.max(indicator.severity);
        if let Some(s) = indicator.suggestion.as_deref() {
            if suggestion.map_or(true, |(sev, _)| indicator.severity > sev) {
                suggestion = Some((indicator.severity, s));
            }
        }
        evidence.push(matched(indicator, m.as_str()));
    }

    RiskAssessment {
        level,
        evidence,
        suggestion: suggestion.map(|(_, s)| s.to_string()),
    }
}

fn matched(indicator: &Indicator, text: &str) -> Evidence {
    Evidence {
        rule_id: indicator.id.clone(),
        matched: text.to_string(),
        severity: Some(indicator.severity),
        reason: indicator.reason.clone(),
    }
}
