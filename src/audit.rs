use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::{ContractAssessment, ContractType, Document, RiskLevel};

/// One line of the audit trail: what was assessed, when, and the outcome.
///
/// The text itself is not stored, only its SHA-256 over the normalized form,
/// so a later run over the same document can be matched against the record.
#[derive(Debug, Serialize)]
pub struct AuditRecord<'a> {
    pub document_id: &'a str,
    pub sha256: String,
    pub timestamp: String,
    pub contract_type: ContractType,
    pub band: RiskLevel,
    pub assessment: &'a ContractAssessment,
}

impl<'a> AuditRecord<'a> {
    pub fn new(document: &'a Document, assessment: &'a ContractAssessment) -> Self {
        Self {
            document_id: &assessment.document_id,
            sha256: text_digest(&document.text),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            contract_type: assessment.contract_type,
            band: assessment.score.band,
            assessment,
        }
    }
}

pub fn text_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Append records to `path` as JSON lines, creating the file if needed.
pub fn append(path: &Path, records: &[AuditRecord<'_>]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open audit log {}", path.display()))?;

    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")
            .with_context(|| format!("cannot write audit log {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::pipeline::Pipeline;
    use crate::rules::RuleSet;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(
            text_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let pipeline = Pipeline::new(RuleSet::shared());
        let (document, assessment) = pipeline
            .analyze(
                "lease.txt",
                b"The Tenant shall pay rent of INR 20,000 every month to the Landlord.",
                Some(Language::En),
            )
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let record = AuditRecord::new(&document, &assessment);
        append(&path, &[record]).unwrap();
        append(&path, &[AuditRecord::new(&document, &assessment)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["document_id"], "lease.txt");
        assert_eq!(value["contract_type"], "lease");
        assert_eq!(value["sha256"], text_digest(&document.text));
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(value["assessment"]["document_id"], "lease.txt");
    }
}
