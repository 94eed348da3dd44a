use crate::models::Language;

/// True when any character falls in the Devanagari block (U+0900–U+097F).
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

/// Guess the language tag of extracted text by script.
///
/// Any Devanagari marks the document as Hindi, since mixed Hindi/English
/// contracts still need the Hindi normalization pass.
pub fn detect_language(text: &str) -> Language {
    if contains_devanagari(text) {
        Language::Hi
    } else if text.chars().any(|c| c.is_ascii_alphabetic()) {
        Language::En
    } else {
        Language::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_hindi() {
        assert_eq!(detect_language("यह समझौता"), Language::Hi);
        assert_eq!(detect_language("Agreement / समझौता"), Language::Hi);
    }

    #[test]
    fn test_detects_english() {
        assert_eq!(detect_language("This Agreement"), Language::En);
    }

    #[test]
    fn test_unknown_without_letters() {
        assert_eq!(detect_language(""), Language::Unknown);
        assert_eq!(detect_language("1. 2. 3."), Language::Unknown);
    }
}
