//! Language classification for inbound text.
//!
//! Two policies exist as independent pure functions; exactly one is active
//! per process, selected by `translate.policy` in the config. They request
//! different language pairs and are not interchangeable, so they are never
//! mixed within a single dispatch. Classification is total and deterministic:
//! every input string (including empty) maps to exactly one pair, with no
//! I/O and no failure modes.

use serde::{Deserialize, Serialize};

/// Which classification policy the dispatcher uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassifyPolicy {
    /// Text made only of ASCII letters, digits, whitespace, and basic
    /// punctuation is English and translated to Thai; everything else is
    /// Thai and translated to English.
    #[default]
    BinaryEnTh,

    /// Thai script wins, then Burmese script, else English. Thai→Burmese,
    /// Burmese→Thai, English→Thai.
    ThreeWayThMyEn,
}

/// Source/target pair requested from the translation provider. Derived per
/// message, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: &'static str,
    pub target: &'static str,
}

impl LanguagePair {
    const fn new(source: &'static str, target: &'static str) -> Self {
        Self { source, target }
    }
}

/// Classify text under the given policy.
pub fn classify(policy: ClassifyPolicy, text: &str) -> LanguagePair {
    match policy {
        ClassifyPolicy::BinaryEnTh => {
            if is_basic_english(text) {
                LanguagePair::new("en", "th")
            } else {
                LanguagePair::new("th", "en")
            }
        }
        ClassifyPolicy::ThreeWayThMyEn => {
            // Thai check runs first: text mixing Thai and Burmese is Thai.
            if has_thai(text) {
                LanguagePair::new("th", "my")
            } else if has_burmese(text) {
                LanguagePair::new("my", "th")
            } else {
                LanguagePair::new("en", "th")
            }
        }
    }
}

/// True when the string is non-empty and every char is an ASCII letter,
/// digit, whitespace, or one of `. , ! ? ; : ' " ( ) -`. Digits- or
/// punctuation-only strings qualify; any char outside the set (so any mixed
/// Thai+English string) does not.
pub fn is_basic_english(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || c.is_ascii_whitespace()
                || matches!(
                    c,
                    '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' | '(' | ')' | '-'
                )
        })
}

/// True when the text contains at least one Thai-script codepoint
/// (U+0E00–U+0E7F).
pub fn has_thai(text: &str) -> bool {
    text.chars().any(|c| ('\u{0E00}'..='\u{0E7F}').contains(&c))
}

/// True when the text contains at least one Burmese-script codepoint
/// (U+1000–U+109F).
pub fn has_burmese(text: &str) -> bool {
    text.chars().any(|c| ('\u{1000}'..='\u{109F}').contains(&c))
}

/// True when the text contains at least one ASCII letter.
pub fn has_latin_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

/// Detector for my→th results where the provider silently fell back to
/// English: Latin letters present, Thai script absent. Heuristic only —
/// legitimate mixed-script translations (proper nouns, units) can misfire,
/// and that is accepted.
pub fn looks_like_english_fallback(translated: &str) -> bool {
    has_latin_letter(translated) && !has_thai(translated)
}
