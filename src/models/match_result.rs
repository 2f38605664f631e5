//! Verdict produced by the answer matchers. Never persisted.
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Fuzzy,
    Phonetic,
    Partial,
    None,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    pub is_correct: bool,
    /// Similarity for typed answers, confidence for the voice path.
    pub similarity: f64,
    pub match_type: MatchType,
    pub normalized_expected: String,
    pub normalized_actual: String,
}
