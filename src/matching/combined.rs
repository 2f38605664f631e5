//! Voice-answer matching: an ordered chain of scorers where the first
//! accepting stage decides the verdict.

use super::fuzzy::{Strictness, check_answer};
use super::levenshtein::similarity;
use super::normalizer::normalize;
use super::phonetic::{articles_for, correct_misheard, phonetic_normalize, strip_article};
use crate::language::Language;
use crate::models::{MatchResult, MatchType};

const FUZZY_THRESHOLD: f64 = 0.85;
const PHONETIC_THRESHOLD: f64 = 0.8;
const PARTIAL_MIN_RATIO: f64 = 0.5;
const PARTIAL_WEIGHT: f64 = 0.9;
const CORE_WORD_THRESHOLD: f64 = 0.8;
const CORE_WORD_WEIGHT: f64 = 0.85;
const MISHEARD_CONFIDENCE: f64 = 0.9;

/// Matches a spoken transcript against the expected foreign text. The
/// language tag selects phonetic tables; an unknown tag falls back to
/// fuzzy-only matching.
pub fn combined_match(actual: &str, expected: &str, language_tag: &str) -> MatchResult {
    combined_match_with(actual, expected, Language::from_tag(language_tag))
}

pub fn combined_match_with(actual: &str, expected: &str, language: Option<Language>) -> MatchResult {
    let normalized_expected = normalize(expected, false);
    let normalized_actual = normalize(actual, false);

    let verdict = |is_correct: bool, similarity: f64, match_type: MatchType| MatchResult {
        is_correct,
        similarity,
        match_type,
        normalized_expected: normalized_expected.clone(),
        normalized_actual: normalized_actual.clone(),
    };

    if normalized_actual == normalized_expected {
        return verdict(true, 1.0, MatchType::Exact);
    }
    if normalized_actual.is_empty() || normalized_expected.is_empty() {
        return verdict(false, 0.0, MatchType::None);
    }

    let corrected = language.and_then(|language| correct_misheard(actual, language));
    if corrected.as_deref() == Some(normalized_expected.as_str()) {
        return verdict(true, MISHEARD_CONFIDENCE, MatchType::Exact);
    }

    let fuzzy = check_answer(expected, actual, Strictness::Normal).similarity;
    if fuzzy >= FUZZY_THRESHOLD {
        return verdict(true, fuzzy, MatchType::Fuzzy);
    }

    let phonetic = match language {
        Some(language) => {
            let expected_key = phonetic_normalize(expected, language);
            let direct = similarity(&phonetic_normalize(actual, language), &expected_key);
            let via_table = corrected
                .as_deref()
                .map(|text| similarity(&phonetic_normalize(text, language), &expected_key))
                .unwrap_or(0.0);
            direct.max(via_table)
        }
        None => 0.0,
    };
    if phonetic >= PHONETIC_THRESHOLD {
        return verdict(true, phonetic, MatchType::Phonetic);
    }

    let stripped_expected = normalize(expected, true);
    let stripped_actual = normalize(actual, true);

    if let Some(ratio) = containment_ratio(&stripped_actual, &stripped_expected) {
        if ratio >= PARTIAL_MIN_RATIO {
            return verdict(true, ratio * PARTIAL_WEIGHT, MatchType::Partial);
        }
    }

    if let Some(language) = language {
        let articles = articles_for(Some(language));
        let core_expected = strip_article(&stripped_expected, &articles);
        let core_actual = strip_article(&stripped_actual, &articles);

        let core_fuzzy = similarity(core_actual, core_expected);
        let core_phonetic = similarity(
            &phonetic_normalize(core_actual, language),
            &phonetic_normalize(core_expected, language),
        );
        let best = core_fuzzy.max(core_phonetic);

        if best >= CORE_WORD_THRESHOLD {
            let match_type = if core_phonetic > core_fuzzy {
                MatchType::Phonetic
            } else {
                MatchType::Fuzzy
            };
            return verdict(true, best * CORE_WORD_WEIGHT, match_type);
        }
    }

    verdict(false, fuzzy.max(phonetic), MatchType::None)
}

/// Length ratio shorter/longer when one string contains the other.
fn containment_ratio(a: &str, b: &str) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    longer
        .contains(shorter)
        .then(|| shorter.chars().count() as f64 / longer.chars().count() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let result = combined_match("  Le Chien ", "le chien", "fr");
        assert!(result.is_correct);
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.similarity, 1.0);
    }

    #[test]
    fn test_misheard_french() {
        let result = combined_match("le shien", "le chien", "french");
        assert!(result.is_correct);
        assert!(matches!(result.match_type, MatchType::Exact | MatchType::Phonetic));
        assert!(result.similarity > 0.85);
    }

    #[test]
    fn test_fuzzy_stage() {
        let result = combined_match("bonjours", "bonjour", "fr");
        assert!(result.is_correct);
        assert_eq!(result.match_type, MatchType::Fuzzy);
    }

    #[test]
    fn test_phonetic_stage() {
        // "wa" -> "oi" and "sh" -> "ch" bring both to "choisi"
        let result = combined_match("shwasi", "choisi", "fr");
        assert!(result.is_correct);
        assert_eq!(result.match_type, MatchType::Phonetic);
    }

    #[test]
    fn test_partial_stage() {
        let result = combined_match("la maison", "maison", "xx");
        assert!(result.is_correct);
        assert_eq!(result.match_type, MatchType::Partial);
        assert!((result.similarity - (6.0 / 9.0) * 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_core_word_stage() {
        // wrong article and plural noun: whole strings score 0.73
        let result = combined_match("les maisons", "la maison", "fr");
        assert!(result.is_correct);
        assert_eq!(result.match_type, MatchType::Fuzzy);
        assert!((result.similarity - (6.0 / 7.0) * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_language_disables_phonetic() {
        let result = combined_match("shwasi", "choisi", "unknown");
        assert!(!result.is_correct);
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.similarity > 0.0);
    }

    #[test]
    fn test_failure_keeps_best_confidence() {
        let result = combined_match("gato", "perro", "es");
        assert!(!result.is_correct);
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.similarity > 0.0);
    }

    #[test]
    fn test_empty_transcript() {
        let result = combined_match("", "chien", "fr");
        assert!(!result.is_correct);
        assert_eq!(result.match_type, MatchType::None);
    }
}
