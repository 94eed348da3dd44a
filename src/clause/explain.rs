use crate::clause::scorer::RiskAssessment;
use crate::models::{Category, Clause, ContractAssessment, Evidence, RiskLevel};
use crate::rules::RuleSet;

const FALLBACK_HIGH: &str = "This {category} clause significantly disadvantages one party and may lead to legal or financial harm. {reasons} {evidence}";
const FALLBACK_MEDIUM: &str =
    "This {category} clause creates some imbalance or future uncertainty. {reasons} {evidence}";
const FALLBACK_LOW: &str = "This {category} clause is generally standard and low risk. {reasons}";

/// Most clauses named in the overall explanation.
const MAX_HIGHLIGHTS: usize = 3;

/// Plain-English rationale for one scored clause.
pub fn explain_clause(clause: &Clause, rules: &RuleSet) -> String {
    let category = clause.category_or_other();
    let level = clause.risk_or_low();
    let template = rules
        .template_for(category, level)
        .unwrap_or(match level {
            RiskLevel::High => FALLBACK_HIGH,
            RiskLevel::Medium => FALLBACK_MEDIUM,
            RiskLevel::Low => FALLBACK_LOW,
        });
    fill(template, category, level, &clause.evidence)
}

/// Remediation for a clause rated Medium or above.
///
/// The scorer's indicator suggestion wins; otherwise a High clause falls
/// back to its category's suggestion.
pub fn suggestion_for(
    category: Category,
    risk: &RiskAssessment,
    rules: &RuleSet,
) -> Option<String> {
    match risk.level {
        RiskLevel::Low => None,
        RiskLevel::Medium => risk.suggestion.clone(),
        RiskLevel::High => risk.suggestion.clone().or_else(|| {
            rules
                .indicators_for(category)
                .and_then(|set| set.suggestion.clone())
        }),
    }
}

/// Summary sentence block for the whole contract.
pub fn explain_assessment(assessment: &ContractAssessment) -> String {
    let high = assessment.count_at(RiskLevel::High);
    let medium = assessment.count_at(RiskLevel::Medium);
    let low = assessment.count_at(RiskLevel::Low);
    let total = assessment.clauses.len();

    let mut out = format!(
        "Overall risk is {} (weighted score {:.2}) across {} clause{}: {} high, {} medium, {} low.",
        assessment.score.band,
        assessment.score.value,
        total,
        if total == 1 { "" } else { "s" },
        high,
        medium,
        low,
    );
    out.push_str(&format!(
        " The document reads as {} contract.",
        with_article(&assessment.contract_type.to_string())
    ));

    let focus = if high > 0 {
        Some(RiskLevel::High)
    } else if medium > 0 {
        Some(RiskLevel::Medium)
    } else {
        None
    };

    match focus {
        Some(level) => {
            let named: Vec<String> = assessment
                .clauses
                .iter()
                .filter(|c| c.risk_or_low() == level)
                .take(MAX_HIGHLIGHTS)
                .map(|c| format!("clause {} ({})", c.index + 1, c.category_or_other().phrase()))
                .collect();
            out.push_str(&format!(" Review first: {}.", named.join(", ")));
        }
        None => out.push_str(" No clause needs urgent attention."),
    }
    out
}

fn fill(template: &str, category: Category, level: RiskLevel, evidence: &[Evidence]) -> String {
    let filled = template
        .replace("{category}", category.phrase())
        .replace("{level}", &level.to_string().to_lowercase())
        .replace("{reasons}", &reasons_sentence(evidence))
        .replace("{evidence}", &evidence_sentence(evidence));
    filled.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn reasons_sentence(evidence: &[Evidence]) -> String {
    let mut reasons: Vec<&str> = Vec::new();
    for reason in evidence.iter().filter_map(|e| e.reason.as_deref()) {
        if !reasons.contains(&reason) {
            reasons.push(reason);
        }
    }
    if reasons.is_empty() {
        return String::new();
    }
    format!("Risk factors: {}.", reasons.join("; "))
}

/// Quote matched wording, skipping anything that is not plain English text
/// so explanations stay English for non-English sources.
fn evidence_sentence(evidence: &[Evidence]) -> String {
    let mut quotes: Vec<String> = Vec::new();
    for e in evidence {
        let quoted = format!("\"{}\"", e.matched.trim());
        if is_plain_english(&e.matched) && !quotes.contains(&quoted) {
            quotes.push(quoted);
        }
    }
    if quotes.is_empty() {
        return String::new();
    }
    format!("Flagged wording: {}.", quotes.join(", "))
}

fn is_plain_english(s: &str) -> bool {
    !s.trim().is_empty() && s.chars().all(|c| c.is_ascii() || c == '₹' || c == '’')
}

fn with_article(word: &str) -> String {
    let vowel = word
        .chars()
        .next()
        .map(|c| "AEIOUaeiou".contains(c))
        .unwrap_or(false);
    format!("{} {}", if vowel { "an" } else { "a" }, word)
}
