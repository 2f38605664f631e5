//! Case, whitespace and diacritic normalization shared by every matcher.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercases, trims and collapses internal whitespace to single spaces.
/// With `strip_diacritics`, combining marks are dropped after NFD
/// decomposition so `café` becomes `cafe`.
pub fn normalize(text: &str, strip_diacritics: bool) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    if strip_diacritics {
        remove_diacritics(&collapsed)
    } else {
        collapsed.nfc().collect()
    }
}

/// Drops combining marks, leaving base letters untouched.
pub fn remove_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Folds a single character for per-character comparisons (diff rendering).
pub fn fold_char(c: char) -> char {
    let lowered = c.to_lowercase().next().unwrap_or(c);
    lowered
        .to_string()
        .nfd()
        .find(|d| !is_combining_mark(*d))
        .unwrap_or(lowered)
}

/// Replaces punctuation with spaces and re-collapses whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
