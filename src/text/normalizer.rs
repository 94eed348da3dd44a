use unicode_normalization::UnicodeNormalization;

use crate::detector::contains_devanagari;
use crate::error::AnalysisError;
use crate::models::Language;

/// Hindi legal terms rewritten to English so the rule patterns apply.
const HINDI_GLOSSARY: &[(&str, &str)] = &[
    ("समझौता", "agreement"),
    ("कर्मचारी", "employee"),
    ("नियोक्ता", "employer"),
    ("वेतन", "salary"),
    ("समाप्ति", "termination"),
    ("भुगतान", "payment"),
    ("कानून", "law"),
    ("न्यायालय", "court"),
    ("गोपनीय", "confidential"),
    ("क्षतिपूर्ति", "indemnity"),
    ("प्रतिस्पर्धा", "non compete"),
];

/// Canonicalize decoded text for pattern matching.
///
/// The Hindi pass runs when the tag is `hi` or the text contains Devanagari.
pub fn normalize(text: &str, language: Language) -> String {
    let composed: String = text.nfc().collect();
    let collapsed = collapse_whitespace(&composed);

    if language == Language::Hi || contains_devanagari(&collapsed) {
        normalize_hindi(&collapsed)
    } else {
        collapsed
    }
}

/// Decode raw extracted bytes.
///
/// Accepts UTF-8 (with or without BOM) and BOM-prefixed UTF-16 in either byte
/// order. Anything else fails with [`AnalysisError::UnsupportedEncoding`].
pub fn decode(raw: &[u8]) -> Result<String, AnalysisError> {
    if let Some(rest) = raw.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return utf8(rest);
    }
    if let Some(rest) = raw.strip_prefix(&[0xFF, 0xFE]) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = raw.strip_prefix(&[0xFE, 0xFF]) {
        return utf16(rest, u16::from_be_bytes);
    }
    utf8(raw)
}

fn utf8(bytes: &[u8]) -> Result<String, AnalysisError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        AnalysisError::UnsupportedEncoding(format!(
            "invalid UTF-8 at byte {}",
            e.utf8_error().valid_up_to()
        ))
    })
}

fn utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String, AnalysisError> {
    if bytes.len() % 2 != 0 {
        return Err(AnalysisError::UnsupportedEncoding(
            "UTF-16 input has an odd number of bytes".to_string(),
        ));
    }
    let units = bytes.chunks_exact(2).map(|pair| from_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| {
            AnalysisError::UnsupportedEncoding(format!(
                "unpaired UTF-16 surrogate {:#06x}",
                e.unpaired_surrogate()
            ))
        })
}

/// Unify line endings, drop control and invisible format characters, collapse
/// runs of spaces and blank lines. Paragraph breaks survive as a single empty line.
fn collapse_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for line in unified.split('\n') {
        let mut out = String::with_capacity(line.len());
        let mut pending_space = false;
        for c in line.chars() {
            if c.is_whitespace() {
                pending_space = true;
            } else if c.is_control() || is_format(c) {
                continue;
            } else {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
        lines.push(out);
    }

    let mut result = String::with_capacity(unified.len());
    let mut blank_run = 0;
    for line in lines {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !result.is_empty() {
            result.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        blank_run = 0;
        result.push_str(&line);
    }
    result
}

/// Invisible format characters (Unicode category Cf), including zero-width
/// joiners, soft hyphens, bidi controls and stray byte order marks.
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
    )
}

fn normalize_hindi(text: &str) -> String {
    let mut decomposed: String = text.nfd().collect();

    for (hindi, english) in HINDI_GLOSSARY {
        let key: String = hindi.nfd().collect();
        if decomposed.contains(&key) {
            decomposed = decomposed.replace(&key, english);
        }
    }
    decomposed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spaces_and_tabs() {
        assert_eq!(
            normalize("  The   Employee\tshall  ", Language::En),
            "The Employee shall"
        );
    }

    #[test]
    fn test_keeps_single_paragraph_break() {
        let text = "1. First clause\r\n\r\n\r\n\r\n2. Second clause\nstill second";
        assert_eq!(
            normalize(text, Language::En),
            "1. First clause\n\n2. Second clause\nstill second"
        );
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(normalize("pay\u{0007}ment\u{0000}", Language::En), "payment");
    }

    #[test]
    fn test_strips_invisible_format_characters() {
        let text = "shall not\u{200B} engage in non\u{200B}compete\u{FEFF} or simi\u{00AD}lar\u{202E} work";
        assert_eq!(
            normalize(text, Language::En),
            "shall not engage in noncompete or similar work"
        );
    }

    #[test]
    fn test_nfc_composition() {
        // "e" + combining acute composes to a single code point.
        assert_eq!(normalize("caf\u{0065}\u{0301}", Language::En), "caf\u{00E9}");
    }

    #[test]
    fn test_hindi_glossary_and_joiners() {
        let text = "कर्मचारी\u{200D} को वेतन मिलेगा";
        let out = normalize(text, Language::Hi);
        assert!(out.contains("employee"));
        assert!(out.contains("salary"));
        assert!(!out.contains('\u{200D}'));
    }

    #[test]
    fn test_devanagari_triggers_hindi_path_without_tag() {
        let out = normalize("यह समझौता", Language::Unknown);
        assert!(out.ends_with("agreement"));
    }

    #[test]
    fn test_hindi_output_is_decomposed() {
        // क़ (U+0958) decomposes to क + nukta.
        let out = normalize("\u{0958}", Language::Hi);
        assert_eq!(out, "\u{0915}\u{093C}");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let err = decode(&[b'o', b'k', 0xFF, 0xFE, 0xFD]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedEncoding(_)));
    }

    #[test]
    fn test_strips_utf8_bom() {
        let mut raw = vec![0xEF, 0xBB, 0xBF];
        raw.extend_from_slice(b"Lease");
        assert_eq!(decode(&raw).unwrap(), "Lease");
    }

    #[test]
    fn test_decodes_utf16_le() {
        let mut raw = vec![0xFF, 0xFE];
        for unit in "Rent".encode_utf16() {
            raw.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&raw).unwrap(), "Rent");
    }

    #[test]
    fn test_rejects_lone_surrogate() {
        let raw = vec![0xFE, 0xFF, 0xD8, 0x00];
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedEncoding(_)));
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert_eq!(decode(b"").unwrap(), "");
        assert_eq!(normalize(" \n\n \t", Language::En), "");
    }
}
