//! Typed-answer checking under a strictness policy, plus diff rendering
//! for feedback.

use super::levenshtein::{self, EditOp};
use super::normalizer::{fold_char, normalize};
use serde::{Deserialize, Serialize};

/// How much textual deviation is tolerated before an answer is wrong.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Exact match after case/whitespace normalization; accents count.
    Strict,
    #[default]
    Normal,
    Lenient,
}

impl Strictness {
    /// Minimum similarity accepted. Strict accepts only identical strings.
    pub fn threshold(&self) -> f64 {
        match self {
            Strictness::Strict => 1.0,
            Strictness::Normal => 0.85,
            Strictness::Lenient => 0.70,
        }
    }
}

impl std::str::FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "normal" => Ok(Strictness::Normal),
            "lenient" => Ok(Strictness::Lenient),
            other => Err(format!("unknown strictness '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub similarity: f64,
    pub distance: usize,
    pub normalized_expected: String,
    pub normalized_actual: String,
}

pub fn check_answer(expected: &str, actual: &str, strictness: Strictness) -> AnswerCheck {
    let strip = strictness != Strictness::Strict;
    let normalized_expected = normalize(expected, strip);
    let normalized_actual = normalize(actual, strip);

    let distance = levenshtein::distance(&normalized_expected, &normalized_actual);
    let similarity = levenshtein::similarity(&normalized_expected, &normalized_actual);

    let is_correct = match (normalized_expected.is_empty(), normalized_actual.is_empty()) {
        (true, true) => true,
        (true, false) | (false, true) => false,
        (false, false) => match strictness {
            Strictness::Strict => normalized_expected == normalized_actual,
            _ => similarity >= strictness.threshold(),
        },
    };

    AnswerCheck {
        is_correct,
        similarity,
        distance,
        normalized_expected,
        normalized_actual,
    }
}

/// True when the answers differ only by accents.
pub fn has_accent_mismatch_only(a: &str, b: &str) -> bool {
    normalize(a, true) == normalize(b, true) && normalize(a, false) != normalize(b, false)
}

/// A run of the expected text, flagged when the learner got it wrong.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub text: String,
    pub is_highlighted: bool,
}

/// Renders the expected text as runs, highlighting characters the learner
/// substituted or left out. Extra typed characters flag the expected
/// character they were typed in front of (or the last one at the end).
pub fn highlight_differences(expected: &str, actual: &str) -> Vec<DiffSegment> {
    let shown = expected.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalize(expected, true) == normalize(actual, true) {
        if shown.is_empty() {
            return Vec::new();
        }
        return vec![DiffSegment {
            text: shown,
            is_highlighted: false,
        }];
    }

    let expected_chars: Vec<char> = shown.chars().collect();
    let actual_chars: Vec<char> = normalize(actual, false).chars().collect();
    let ops = levenshtein::alignment(&expected_chars, &actual_chars, |a, b| {
        fold_char(a) == fold_char(b)
    });

    let mut flags = vec![false; expected_chars.len()];
    let mut position = 0;
    for op in ops {
        match op {
            EditOp::Keep(_) => position += 1,
            EditOp::Substitute(_) | EditOp::Delete(_) => {
                flags[position] = true;
                position += 1;
            }
            EditOp::Insert(_) => {
                if let Some(flag) = flags.get_mut(position) {
                    *flag = true;
                } else if let Some(last) = flags.last_mut() {
                    *last = true;
                }
            }
        }
    }

    let mut segments: Vec<DiffSegment> = Vec::new();
    for (c, flag) in expected_chars.into_iter().zip(flags) {
        match segments.last_mut() {
            Some(segment) if segment.is_highlighted == flag => segment.text.push(c),
            _ => segments.push(DiffSegment {
                text: c.to_string(),
                is_highlighted: flag,
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_answer_is_correct() {
        for word in ["maison", "la casa", "Straße", "x"] {
            assert!(check_answer(word, word, Strictness::Normal).is_correct);
            assert!(check_answer(word, word, Strictness::Strict).is_correct);
        }
    }

    #[test]
    fn test_accents_strict_vs_normal() {
        assert!(!check_answer("café", "cafe", Strictness::Strict).is_correct);
        assert!(check_answer("café", "cafe", Strictness::Normal).is_correct);
        assert!(check_answer("café", "cafe", Strictness::Lenient).is_correct);
    }

    #[test]
    fn test_strict_ignores_case_and_spacing() {
        let check = check_answer("La Maison", "  la   maison ", Strictness::Strict);
        assert!(check.is_correct);
        assert_eq!(check.distance, 0);
    }

    #[test]
    fn test_thresholds() {
        // 1 edit in 8 chars -> 0.875
        assert!(check_answer("bonjours", "bonjour", Strictness::Normal).is_correct);
        // 3 edits in 6 chars -> 0.5
        assert!(!check_answer("maison", "mezon", Strictness::Lenient).is_correct);
        // 2 edits in 8 chars -> 0.75
        let check = check_answer("elephant", "elefant", Strictness::Normal);
        assert!(!check.is_correct);
        assert_eq!(check.distance, 2);
        assert!(check_answer("elephant", "elefant", Strictness::Lenient).is_correct);
    }

    #[test]
    fn test_empty_inputs() {
        let both = check_answer("", "   ", Strictness::Normal);
        assert!(both.is_correct);
        assert_eq!(both.similarity, 1.0);

        assert!(!check_answer("chien", "", Strictness::Lenient).is_correct);
        assert!(!check_answer("", "chien", Strictness::Lenient).is_correct);
    }

    #[test]
    fn test_accent_mismatch_only() {
        assert!(has_accent_mismatch_only("café", "cafe"));
        assert!(!has_accent_mismatch_only("café", "café"));
        assert!(!has_accent_mismatch_only("café", "cafa"));
    }

    #[test]
    fn test_highlight_accent_slip_unhighlighted() {
        let segments = highlight_differences("Café", "cafe");
        assert_eq!(
            segments,
            vec![DiffSegment {
                text: "Café".to_string(),
                is_highlighted: false
            }]
        );
    }

    #[test]
    fn test_highlight_substitution() {
        let segments = highlight_differences("maison", "maizon");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "mai");
        assert!(!segments[0].is_highlighted);
        assert_eq!(segments[1].text, "s");
        assert!(segments[1].is_highlighted);
        assert_eq!(segments[2].text, "on");
    }

    #[test]
    fn test_highlight_missing_and_extra() {
        let missing = highlight_differences("chat", "cha");
        assert_eq!(missing.last().map(|s| s.text.as_str()), Some("t"));
        assert!(missing.last().is_some_and(|s| s.is_highlighted));

        let extra = highlight_differences("chat", "chats");
        assert!(extra.last().is_some_and(|s| s.is_highlighted));
        let rebuilt: String = extra.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, "chat");
    }
}
