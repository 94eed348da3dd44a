use crate::models::{Category, ContractType, Evidence};
use crate::rules::RuleSet;

/// Outcome of classifying one clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub contract_type_vote: Option<ContractType>,
    /// Share of all matching rules that belong to the winning category.
    pub confidence: f32,
    /// The rule that decided the category, if any matched.
    pub evidence: Option<Evidence>,
}

/// Classify a clause by the first matching rule in priority order.
///
/// A clause no rule matches is [`Category::Other`] with no vote and zero
/// confidence.
pub fn classify(text: &str, rules: &RuleSet) -> Classification {
    let mut winner: Option<(Category, Evidence)> = None;
    let mut matching = 0usize;
    let mut agreeing = 0usize;

    for rule in rules.category_rules() {
        let Some(m) = rule.pattern.find(text) else {
            continue;
        };
        matching += 1;
        match &winner {
            None => {
                agreeing += 1;
                winner = Some((
                    rule.category,
                    Evidence {
                        rule_id: rule.id.clone(),
                        matched: m.as_str().to_string(),
                        severity: None,
                        reason: None,
                    },
                ));
            }
            Some((category, _)) if *category == rule.category => agreeing += 1,
            Some(_) => {}
        }
    }

    match winner {
        Some((category, evidence)) => Classification {
            category,
            contract_type_vote: rules.affinity(category),
            confidence: agreeing as f32 / matching as f32,
            evidence: Some(evidence),
        },
        None => Classification {
            category: Category::Other,
            contract_type_vote: None,
            confidence: 0.0,
            evidence: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn builtin() -> Arc<RuleSet> {
        RuleSet::shared()
    }

    #[test]
    fn test_non_compete_votes_employment() {
        let c = classify(
            "Employee shall not engage in similar business within 2 years",
            &builtin(),
        );
        assert_eq!(c.category, Category::NonCompete);
        assert_eq!(c.contract_type_vote, Some(ContractType::Employment));
        assert!(c.confidence > 0.0);
        assert_eq!(c.evidence.unwrap().rule_id, "non_compete.2");
    }

    #[test]
    fn test_unmatched_clause_is_other() {
        let c = classify("This page is intentionally left blank.", &builtin());
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.contract_type_vote, None);
        assert_eq!(c.confidence, 0.0);
        assert!(c.evidence.is_none());
    }

    #[test]
    fn test_priority_beats_position_in_text() {
        // Mentions payment first, but indemnity outranks payment.
        let c = classify(
            "Upon payment default the Client shall indemnify the Vendor.",
            &builtin(),
        );
        assert_eq!(c.category, Category::Indemnity);
        assert_eq!(c.contract_type_vote, None);
    }

    #[test]
    fn test_lease_clause_votes_lease() {
        let c = classify("The Tenant shall pay rent on the 5th of every month.", &builtin());
        assert_eq!(c.category, Category::Rent);
        assert_eq!(c.contract_type_vote, Some(ContractType::Lease));
    }

    #[test]
    fn test_confidence_reflects_competing_matches() {
        let rules = builtin();
        let single = classify("The Employee receives an annual bonus.", &rules);
        assert_eq!(single.category, Category::Compensation);
        assert_eq!(single.confidence, 1.0);

        let mixed = classify(
            "The Employee's salary is paid by invoice within ten days.",
            &rules,
        );
        assert_eq!(mixed.category, Category::Compensation);
        assert!(mixed.confidence < 1.0);
    }

    #[test]
    fn test_declaration_order_breaks_priority_ties() {
        let rules = RuleSet::from_toml(
            r#"
[[category_patterns]]
category = "payment"
priority = 1
patterns = ['fee']

[[category_patterns]]
category = "termination"
priority = 1
patterns = ['fee']

[[risk_indicators]]
category = "payment"
[[risk_indicators]]
category = "termination"
[[risk_indicators]]
category = "other"
"#,
        )
        .unwrap();
        assert_eq!(classify("a fee applies", &rules).category, Category::Payment);
        assert_eq!(classify("a fee applies", &rules).confidence, 0.5);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let c = classify("CONFIDENTIALITY. ALL TRADE SECRETS REMAIN PRIVATE.", &builtin());
        assert_eq!(c.category, Category::Confidentiality);
    }
}
