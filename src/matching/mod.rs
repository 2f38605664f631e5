//! String primitives for judging answers: normalization, edit distance,
//! strictness-aware fuzzy checks and the phonetic voice-answer chain.
pub mod combined;
pub mod fuzzy;
pub mod levenshtein;
pub mod normalizer;
pub mod phonetic;

pub use combined::{combined_match, combined_match_with};
pub use fuzzy::{
    AnswerCheck, DiffSegment, Strictness, check_answer, has_accent_mismatch_only,
    highlight_differences,
};
pub use normalizer::normalize;
