//! The end-to-end analysis of one document.
//!
//! A [`Pipeline`] owns a shared, read-only [`RuleSet`] and runs the stages in
//! order: normalize, segment, classify, score, explain, aggregate. It holds
//! no other state, so one pipeline can serve any number of documents and
//! threads at once.

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::aggregate::aggregate;
use crate::clause::classifier::classify;
use crate::clause::explain::{explain_clause, suggestion_for};
use crate::clause::scorer::score;
use crate::detector::detect_language;
use crate::error::AnalysisError;
use crate::models::{Clause, ContractAssessment, Document, Language, Span};
use crate::rules::RuleSet;
use crate::text::normalizer::{decode, normalize};
use crate::text::segmenter::segment;

#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: Arc<RuleSet>,
}

impl Pipeline {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Decode and normalize raw text into a [`Document`].
    ///
    /// With no language tag the language is detected from the decoded text,
    /// before the Hindi glossary rewrites Devanagari terms into English.
    pub fn prepare(
        &self,
        id: &str,
        raw: &[u8],
        language: Option<Language>,
    ) -> Result<Document, AnalysisError> {
        let decoded = decode(raw)?;
        let language = language.unwrap_or_else(|| detect_language(&decoded));
        let text = normalize(&decoded, language);
        Ok(Document {
            id: id.to_string(),
            text,
            language,
        })
    }

    /// Assess a prepared document.
    pub fn assess(&self, document: &Document) -> Result<ContractAssessment, AnalysisError> {
        let _span = debug_span!("assess", document = %document.id).entered();

        let spans = segment(&document.text, &self.rules.segmentation);
        if spans.is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }
        debug!(clauses = spans.len(), "segmented");

        let clauses: Vec<Clause> = spans
            .into_iter()
            .enumerate()
            .map(|(index, span)| self.assess_clause(document, index, span))
            .collect();

        aggregate(document, clauses, &self.rules)
    }

    /// Prepare and assess in one step, keeping the normalized document for
    /// callers that record it.
    pub fn analyze(
        &self,
        id: &str,
        raw: &[u8],
        language: Option<Language>,
    ) -> Result<(Document, ContractAssessment), AnalysisError> {
        let document = self.prepare(id, raw, language)?;
        let assessment = self.assess(&document)?;
        Ok((document, assessment))
    }

    fn assess_clause(&self, document: &Document, index: usize, span: Span) -> Clause {
        let text = &document.text[span.start..span.end];
        let classification = classify(text, &self.rules);
        let risk = score(text, &classification, &self.rules);
        let suggestion = suggestion_for(classification.category, &risk, &self.rules);
        debug!(
            index,
            category = %classification.category,
            risk = %risk.level,
            evidence = risk.evidence.len(),
            "clause"
        );

        let mut clause = Clause {
            index,
            span,
            text: text.trim().to_string(),
            category: Some(classification.category),
            contract_type_vote: classification.contract_type_vote,
            confidence: classification.confidence,
            category_evidence: classification.evidence,
            risk: Some(risk.level),
            evidence: risk.evidence,
            explanation: String::new(),
            suggestion,
        };
        clause.explanation = explain_clause(&clause, &self.rules);
        clause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ContractType, RiskLevel};
    use proptest::prelude::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(RuleSet::shared())
    }

    const EMPLOYMENT: &str = "EMPLOYMENT AGREEMENT\n\n\
1. The Employee shall receive a monthly salary of INR 80,000 payable on the last working day.\n\n\
2. The Employee shall not engage in similar business within 2 years of leaving the Company.\n\n\
3. The Employer may terminate this agreement immediately without notice.\n\n\
4. All information shared during the engagement shall be kept confidential by the Employee.";

    #[test]
    fn test_employment_contract_end_to_end() {
        let (_, a) = pipeline()
            .analyze("employment.txt", EMPLOYMENT.as_bytes(), Some(Language::En))
            .unwrap();

        assert_eq!(a.contract_type, ContractType::Employment);
        let categories: Vec<Category> = a.clauses.iter().map(|c| c.category_or_other()).collect();
        assert!(categories.contains(&Category::NonCompete));
        assert!(categories.contains(&Category::Termination));

        let non_compete = a
            .clauses
            .iter()
            .find(|c| c.category == Some(Category::NonCompete))
            .unwrap();
        assert_eq!(non_compete.risk, Some(RiskLevel::High));
        assert!(non_compete.explanation.contains("\"2 years\""));
        assert!(non_compete.suggestion.is_some());
        assert_eq!(a.score.band, RiskLevel::High);
    }

    #[test]
    fn test_clause_indices_are_gapless_and_spans_tile_the_text() {
        let (doc, a) = pipeline()
            .analyze("employment.txt", EMPLOYMENT.as_bytes(), Some(Language::En))
            .unwrap();
        for (i, clause) in a.clauses.iter().enumerate() {
            assert_eq!(clause.index, i);
        }
        assert_eq!(a.clauses.first().unwrap().span.start, 0);
        assert_eq!(a.clauses.last().unwrap().span.end, doc.text.len());
        for pair in a.clauses.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }

    #[test]
    fn test_every_clause_is_fully_assessed() {
        let (_, a) = pipeline()
            .analyze("employment.txt", EMPLOYMENT.as_bytes(), Some(Language::En))
            .unwrap();
        for clause in &a.clauses {
            assert!(clause.category.is_some());
            assert!(clause.risk.is_some());
            assert!(!clause.explanation.is_empty());
            if clause.risk == Some(RiskLevel::Low) {
                assert!(clause.suggestion.is_none());
            }
        }
    }

    #[test]
    fn test_indemnity_scenario_scores_medium() {
        let text = "This page lists the names of the parties to this agreement.\n\n\
The Contractor shall indemnify the Client against any and all claims.";
        let (_, a) = pipeline().analyze("svc", text.as_bytes(), Some(Language::En)).unwrap();
        assert_eq!(a.clauses.len(), 2);
        assert_eq!(a.clauses[0].category, Some(Category::Other));
        assert_eq!(a.clauses[0].risk, Some(RiskLevel::Low));
        assert_eq!(a.clauses[1].category, Some(Category::Indemnity));
        assert_eq!(a.clauses[1].risk, Some(RiskLevel::High));
        assert!((a.score.value - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.score.band, RiskLevel::Medium);
    }

    #[test]
    fn test_empty_and_blank_input_fail() {
        let p = pipeline();
        assert!(matches!(
            p.analyze("empty", b"", Some(Language::En)),
            Err(AnalysisError::EmptyDocument)
        ));
        assert!(matches!(
            p.analyze("blank", b" \r\n\t \n\n ", Some(Language::En)),
            Err(AnalysisError::EmptyDocument)
        ));
    }

    #[test]
    fn test_invalid_bytes_are_rejected() {
        assert!(matches!(
            pipeline().analyze("bin", &[0x66, 0xFF, 0xFE, 0x00, 0x80], Some(Language::En)),
            Err(AnalysisError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_hindi_document_gets_english_explanations() {
        let text = "कर्मचारी को वेतन हर महीने की पहली तारीख को भुगतान किया जाएगा।\n\n\
नियोक्ता बिना सूचना के समाप्ति कर सकता है और कर्मचारी को without notice हटाया जा सकता है।";
        let p = pipeline();
        let doc = p.prepare("hi.txt", text.as_bytes(), None).unwrap();
        assert_eq!(doc.language, Language::Hi);

        let a = p.assess(&doc).unwrap();
        assert_eq!(a.language, Language::Hi);
        for clause in &a.clauses {
            assert!(clause.explanation.is_ascii(), "{}", clause.explanation);
        }
        assert!(a.explanation.is_ascii());
        assert!(a.clauses.iter().any(|c| c.risk == Some(RiskLevel::High)));
    }

    #[test]
    fn test_language_detected_when_untagged() {
        let p = pipeline();
        let doc = p.prepare("en", b"Plain English text here.", None).unwrap();
        assert_eq!(doc.language, Language::En);
        let doc = p.prepare("tagged", b"Plain English text here.", Some(Language::Unknown)).unwrap();
        assert_eq!(doc.language, Language::Unknown);
    }

    #[test]
    fn test_glossary_only_hindi_keeps_hindi_tag() {
        let p = pipeline();
        let text = "कर्मचारी वेतन भुगतान समाप्ति गोपनीय";
        let doc = p.prepare("hi", text.as_bytes(), None).unwrap();
        assert_eq!(doc.text, "employee salary payment termination confidential");
        assert_eq!(doc.language, Language::Hi);

        let (_, a) = p.analyze("hi", text.as_bytes(), None).unwrap();
        assert_eq!(a.language, Language::Hi);
    }

    #[test]
    fn test_zero_width_space_does_not_hide_non_compete() {
        let text = "The Employee shall not\u{200B} engage in similar\u{FEFF} business within 2 years.";
        let (_, a) = pipeline().analyze("nc", text.as_bytes(), None).unwrap();
        assert_eq!(a.clauses.len(), 1);
        assert_eq!(a.clauses[0].category, Some(Category::NonCompete));
        assert_eq!(a.clauses[0].risk, Some(RiskLevel::High));
    }

    #[test]
    fn test_repeated_runs_serialize_identically() {
        let p = pipeline();
        let (_, first) = p.analyze("e", EMPLOYMENT.as_bytes(), Some(Language::En)).unwrap();
        let (_, second) = p.analyze("e", EMPLOYMENT.as_bytes(), Some(Language::En)).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_pipeline_is_shareable_across_threads() {
        let p = Arc::new(pipeline());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || {
                    let (_, a) = p.analyze("t", EMPLOYMENT.as_bytes(), Some(Language::En)).unwrap();
                    serde_json::to_string(&a).unwrap()
                })
            })
            .collect();
        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }

    proptest! {
        #[test]
        fn analysis_is_deterministic(text in "\\PC{1,300}") {
            let p = pipeline();
            let first = p.analyze("p", text.as_bytes(), Some(Language::Unknown));
            let second = p.analyze("p", text.as_bytes(), Some(Language::Unknown));
            match (first, second) {
                (Ok((_, a)), Ok((_, b))) => {
                    prop_assert_eq!(
                        serde_json::to_string(&a).unwrap(),
                        serde_json::to_string(&b).unwrap()
                    );
                }
                (Err(AnalysisError::EmptyDocument), Err(AnalysisError::EmptyDocument)) => {}
                (a, b) => {
                    prop_assert!(false, "diverged: {:?} vs {:?}", a.is_ok(), b.is_ok());
                }
            }
        }
    }
}
