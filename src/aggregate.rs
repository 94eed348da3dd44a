use tracing::debug;

use crate::clause::explain::explain_assessment;
use crate::error::AnalysisError;
use crate::facts::extract_facts;
use crate::models::{
    Clause, ContractAssessment, ContractType, ContractTypeVote, Document, OverallScore,
};
use crate::rules::RuleSet;

/// Combine scored clauses into the final assessment for `document`.
///
/// Fails with [`AnalysisError::EmptyDocument`] when there is nothing to
/// assess; no partial assessment is produced.
pub fn aggregate(
    document: &Document,
    clauses: Vec<Clause>,
    rules: &RuleSet,
) -> Result<ContractAssessment, AnalysisError> {
    if clauses.is_empty() {
        return Err(AnalysisError::EmptyDocument);
    }

    let votes = tally_votes(&clauses);
    let contract_type = resolve_contract_type(&votes);
    let score = overall_score(&clauses, rules);
    debug!(
        document = %document.id,
        %contract_type,
        score = score.value,
        band = %score.band,
        "aggregated {} clauses",
        clauses.len()
    );

    let mut assessment = ContractAssessment {
        document_id: document.id.clone(),
        language: document.language,
        contract_type,
        contract_type_votes: votes,
        score,
        clauses,
        explanation: String::new(),
        facts: extract_facts(&document.text),
    };
    assessment.explanation = explain_assessment(&assessment);
    Ok(assessment)
}

/// Vote totals per contract type, in order of each type's first vote.
pub fn tally_votes(clauses: &[Clause]) -> Vec<ContractTypeVote> {
    let mut tallies: Vec<ContractTypeVote> = Vec::new();
    for vote in clauses.iter().filter_map(|c| c.contract_type_vote) {
        match tallies.iter_mut().find(|t| t.contract_type == vote) {
            Some(t) => t.votes += 1,
            None => tallies.push(ContractTypeVote {
                contract_type: vote,
                votes: 1,
            }),
        }
    }
    tallies
}

/// Highest vote count wins; on a tie the type voted for earliest wins.
pub fn resolve_contract_type(votes: &[ContractTypeVote]) -> ContractType {
    let mut best: Option<&ContractTypeVote> = None;
    for v in votes {
        if best.map_or(true, |b| v.votes > b.votes) {
            best = Some(v);
        }
    }
    best.map(|v| v.contract_type).unwrap_or(ContractType::General)
}

/// Weighted mean of clause severities, banded by the configured thresholds.
///
/// Terms are summed in a canonical order so the result depends only on the
/// multiset of (category, level) pairs, not on clause order.
pub fn overall_score(clauses: &[Clause], rules: &RuleSet) -> OverallScore {
    let mut terms: Vec<(f64, f64)> = clauses
        .iter()
        .map(|c| {
            let weight = rules.clause_weight(c.category_or_other());
            (weight, rules.severity_weights.value(c.risk_or_low()))
        })
        .collect();
    terms.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let (weighted, total_weight) = terms
        .iter()
        .fold((0.0, 0.0), |(n, d), (w, s)| (n + w * s, d + w));
    let value = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    };

    OverallScore {
        value,
        band: rules.band(value),
    }
}
