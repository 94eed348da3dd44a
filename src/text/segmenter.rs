use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::SegmentationRules;
use crate::models::Span;

/// Line-initial clause headers: `1.`, `2)`, `3.1`, `(a)`, `b)`, `(iv)`,
/// `Clause 4`, `Section 5`, `Article 6`.
static CLAUSE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^(?:(?:clause|section|article)\s+\d+|\d+(?:\.\d+)+\.?|\d+[.)]|\(?[a-z]\)|\(?[ivx]+\))(?:\s|$)",
    )
    .expect("clause header pattern is valid")
});

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?।]\s+").expect("sentence boundary pattern is valid"));

/// Split canonical text into contiguous clause spans.
///
/// The returned spans cover `text` exactly: the first starts at 0, each
/// subsequent span starts where the previous one ended, and the last ends at
/// `text.len()`. Empty text yields no spans.
pub fn segment(text: &str, rules: &SegmentationRules) -> Vec<Span> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut boundaries = structural_boundaries(text);
    let structural = !boundaries.is_empty();
    if !structural {
        boundaries = sentence_boundaries(text);
    }
    boundaries.remove(&0);
    boundaries.retain(|b| *b < text.len());

    let mut starts: Vec<usize> = vec![0];
    starts.extend(boundaries);

    let raw: Vec<Span> = starts
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            Span::new(*start, end)
        })
        .collect();

    let spans = merge_short(text, raw, rules.min_clause_tokens);
    debug!(
        spans = spans.len(),
        structural,
        "segmented {} bytes",
        text.len()
    );
    spans
}

/// Header line starts and paragraph starts, including offset 0 when the
/// document opens with a header.
fn structural_boundaries(text: &str) -> BTreeSet<usize> {
    let mut boundaries: BTreeSet<usize> = CLAUSE_HEADER.find_iter(text).map(|m| m.start()).collect();
    boundaries.extend(text.match_indices("\n\n").map(|(i, _)| i + 2));
    boundaries
}

fn sentence_boundaries(text: &str) -> BTreeSet<usize> {
    SENTENCE_END.find_iter(text).map(|m| m.end()).collect()
}

/// Fold spans with fewer than `min_tokens` tokens into the following span; a
/// short final span joins the one before it.
fn merge_short(text: &str, spans: Vec<Span>, min_tokens: usize) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    let mut pending: Option<Span> = None;

    for span in spans {
        let span = match pending.take() {
            Some(short) => Span::new(short.start, span.end),
            None => span,
        };
        if token_count(text, span) < min_tokens {
            pending = Some(span);
        } else {
            merged.push(span);
        }
    }

    if let Some(short) = pending {
        match merged.last_mut() {
            Some(last) => last.end = short.end,
            None => merged.push(short),
        }
    }
    merged
}

fn token_count(text: &str, span: Span) -> usize {
    text[span.start..span.end].split_whitespace().count()
}
