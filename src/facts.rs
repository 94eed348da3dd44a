//! Headline facts pulled from the contract text: who the parties are, which
//! amounts are named, and where disputes go.
//!
//! Everything here is best effort. A field that cannot be found is left
//! empty rather than guessed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::KeyFacts;

static PARTY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(landlord|tenant|lessor|lessee|employer|employee|licensor|licensee)[ \t]*:[ \t]*([^\n]+)",
    )
    .expect("party label pattern")
});

static BETWEEN_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bbetween\s+(.+?)\s+and\s+(.+?)(?:\n\n|\(|$)").expect("preamble pattern")
});

static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:\bINR|₹|\bRs\.?)\s*\d[\d,]*(?:\.\d+)?",
        r"(?i)\b\d[\d,]*(?:\.\d+)?\s*(?:lakhs?|crores?)\b",
        r"(?i)\b(?:salary|rent|payment|amount|deposit)\s+of\s+(?:(?:INR|₹|Rs\.?)\s*)?\d[\d,]*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("amount pattern"))
    .collect()
});

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d,]{3,}").expect("digit run"));

static GOVERNING_LAW: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)governed\s+by\s+(?:the\s+)?laws?\s+of\s+(?:the\s+)?([A-Za-z][A-Za-z ]*)",
        r"(?i)\blaws?\s+of\s+(?:the\s+)?([A-Za-z][A-Za-z ]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("governing law pattern"))
    .collect()
});

static JURISDICTION: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bcourts?\s+(?:at|in|of)\s+([A-Za-z][A-Za-z ]*)",
        r"(?i)exclusive\s+jurisdiction\s+(?:of|in)\s+(?:the\s+)?([A-Za-z][A-Za-z ]*)",
        r"(?i)\b([A-Za-z]+)\s+courts?\s+(?:shall|have|will)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("jurisdiction pattern"))
    .collect()
});

/// Words that end a place or party phrase.
const STOP_WORDS: &[&str] = &[
    "and", "shall", "will", "which", "with", "where", "having", "have", "has", "is", "are",
    "for", "to", "only", "alone", "courts", "court",
];

/// Words that are never a jurisdiction on their own.
const NOT_A_PLACE: &[&str] = &["the", "all", "any", "competent", "appropriate", "such", "these"];

pub fn extract_facts(text: &str) -> KeyFacts {
    KeyFacts {
        parties: extract_parties(text),
        amounts: extract_amounts(text),
        governing_law: first_phrase(&GOVERNING_LAW, text),
        jurisdiction: first_phrase(&JURISDICTION, text),
    }
}

fn extract_parties(text: &str) -> Vec<(String, String)> {
    let mut parties: Vec<(String, String)> = Vec::new();
    for caps in PARTY_LABEL.captures_iter(text) {
        let role = title_case(&caps[1]);
        let name = clean_name(&caps[2]);
        if name.is_empty() || parties.iter().any(|(r, _)| *r == role) {
            continue;
        }
        parties.push((role, name));
    }
    if !parties.is_empty() {
        return parties;
    }

    if let Some(caps) = BETWEEN_PREAMBLE.captures(text) {
        let first = clean_name(&caps[1]);
        let second = clean_name(caps[2].split(':').next().unwrap_or_default());
        if !first.is_empty() && !second.is_empty() {
            parties.push(("Party 1".to_string(), first));
            parties.push(("Party 2".to_string(), second));
        }
    }
    parties
}

/// First line of a captured party, cut at the first comma or a capitalised
/// `AND` joining the next party.
fn clean_name(raw: &str) -> String {
    let line = raw.lines().next().unwrap_or_default();
    let line = line.split(" AND ").next().unwrap_or_default();
    let line = line.split(',').next().unwrap_or_default();
    line.trim().trim_end_matches(';').trim().to_string()
}

fn extract_amounts(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, usize, String)> = Vec::new();
    for (order, pattern) in AMOUNT_PATTERNS.iter().enumerate() {
        for m in pattern.find_iter(text) {
            let amount = m.as_str().trim().trim_end_matches(',').to_string();
            if amount.chars().count() > 4 && DIGIT_RUN.is_match(&amount) {
                found.push((m.start(), order, amount));
            }
        }
    }
    found.sort_by_key(|(start, order, _)| (*start, *order));

    let mut amounts: Vec<String> = Vec::new();
    for (_, _, amount) in found {
        if !amounts.contains(&amount) {
            amounts.push(amount);
        }
    }
    amounts
}

fn first_phrase(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .filter_map(|p| p.captures(text))
        .filter_map(|caps| clip_phrase(&caps[1]))
        .next()
}

fn clip_phrase(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|w| !STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    let phrase = words.join(" ");
    if phrase.is_empty() || NOT_A_PLACE.contains(&phrase.to_lowercase().as_str()) {
        None
    } else {
        Some(phrase)
    }
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEASE: &str = "RENT AGREEMENT\n\
Landlord: Ramesh Kumar\n\
Tenant: Anita Sharma\n\n\
1. The Tenant shall pay a monthly rent of INR 25,000 on the 5th of every month.\n\n\
2. A security deposit of ₹1,50,000 is payable. The INR 25,000 figure is revised yearly.\n\n\
3. This agreement is governed by the laws of India and the courts at Pune shall have exclusive jurisdiction.";

    #[test]
    fn test_labelled_parties() {
        let facts = extract_facts(LEASE);
        assert_eq!(
            facts.parties,
            vec![
                ("Landlord".to_string(), "Ramesh Kumar".to_string()),
                ("Tenant".to_string(), "Anita Sharma".to_string()),
            ]
        );
    }

    #[test]
    fn test_between_preamble_fallback() {
        let text = "This Agreement is made BETWEEN\nAcme Software Pvt. Ltd., a company incorporated in India\nAND\nRiya Mehta (the Employee)";
        let facts = extract_facts(text);
        assert_eq!(
            facts.parties,
            vec![
                ("Party 1".to_string(), "Acme Software Pvt. Ltd.".to_string()),
                ("Party 2".to_string(), "Riya Mehta".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_parties_found() {
        assert!(extract_facts("Nothing to see here.").parties.is_empty());
    }

    #[test]
    fn test_amounts_in_document_order_without_duplicates() {
        let facts = extract_facts(LEASE);
        assert_eq!(
            facts.amounts,
            vec![
                "rent of INR 25,000".to_string(),
                "INR 25,000".to_string(),
                "deposit of ₹1,50,000".to_string(),
                "₹1,50,000".to_string(),
            ]
        );
    }

    #[test]
    fn test_lakh_amounts_and_short_numbers() {
        let facts = extract_facts("A bonus of 2 lakhs and a fee of Rs. 12 apply; salary is 12,00,000 lakhs.");
        assert_eq!(facts.amounts, vec!["12,00,000 lakhs".to_string()]);
    }

    #[test]
    fn test_governing_law_and_jurisdiction() {
        let facts = extract_facts(LEASE);
        assert_eq!(facts.governing_law.as_deref(), Some("India"));
        assert_eq!(facts.jurisdiction.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_city_courts_phrasing() {
        let facts = extract_facts("Mumbai courts shall have exclusive jurisdiction over disputes.");
        assert_eq!(facts.jurisdiction.as_deref(), Some("Mumbai"));
        assert_eq!(facts.governing_law, None);
    }

    #[test]
    fn test_generic_courts_are_not_a_place() {
        let facts = extract_facts("The courts shall decide.");
        assert_eq!(facts.jurisdiction, None);
    }
}
