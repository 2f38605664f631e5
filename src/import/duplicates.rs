//! Duplicate detection for bulk vocabulary imports.
//!
//! Each candidate is compared to every live item in the target scope on
//! both sides (native and foreign). Comparison keys drop accents,
//! punctuation and one leading article. A candidate is flagged when the
//! averaged similarity reaches the threshold, or when its native side is
//! exactly an existing native side. Nothing is written; the caller decides
//! whether to skip, merge or force-insert.

use crate::database::db;
use crate::error::Result;
use crate::language::Language;
use crate::matching::levenshtein::similarity;
use crate::matching::normalizer::{normalize, strip_punctuation};
use crate::matching::phonetic::{articles_for, strip_article};
use crate::models::{DuplicateResult, ImportCandidate, Scope, VocabularyItem};
use log::{debug, info};
use rusqlite::Connection;
use std::collections::BTreeMap;

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.9;

#[derive(Clone, Debug, PartialEq)]
pub struct DuplicateOptions {
    pub threshold: f64,
    /// Language of `source_text`; `None` strips articles of every language.
    pub native_language: Option<Language>,
    /// Language of `target_text`; `None` strips articles of every language.
    pub foreign_language: Option<Language>,
}

impl Default for DuplicateOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
            native_language: None,
            foreign_language: None,
        }
    }
}

struct Keys {
    native: String,
    foreign: String,
}

fn comparison_key(text: &str, articles: &[&str]) -> String {
    let normalized = normalize(text, true);
    let without_article = strip_article(&normalized, articles);
    let cleaned = strip_punctuation(without_article);

    if without_article.len() == normalized.len() {
        // article may have been hidden behind leading punctuation
        strip_article(&cleaned, articles).to_string()
    } else {
        cleaned
    }
}

/// Loads the scope once and checks the whole batch against it.
pub fn check_duplicates(
    candidates: &[ImportCandidate],
    scope: Scope,
    options: &DuplicateOptions,
    conn: &Connection,
) -> Result<BTreeMap<usize, DuplicateResult>> {
    let existing = db::load_scope(scope, conn)?;
    let duplicates = find_duplicates(candidates, &existing, options);

    info!(
        "Duplicate check: {} of {} candidates flagged against {} items in {:?}",
        duplicates.len(),
        candidates.len(),
        existing.len(),
        scope
    );
    Ok(duplicates)
}

/// Flags candidates that duplicate an existing item. Only flagged
/// candidates appear in the map, keyed by their index in `candidates`.
pub fn find_duplicates(
    candidates: &[ImportCandidate],
    existing: &[VocabularyItem],
    options: &DuplicateOptions,
) -> BTreeMap<usize, DuplicateResult> {
    let native_articles = articles_for(options.native_language);
    let foreign_articles = articles_for(options.foreign_language);

    let existing_keys: Vec<(i64, Keys)> = existing
        .iter()
        .filter(|item| !item.is_deleted())
        .map(|item| {
            (
                item.id,
                Keys {
                    native: comparison_key(&item.source_text, &native_articles),
                    foreign: comparison_key(&item.target_text, &foreign_articles),
                },
            )
        })
        .collect();

    let mut duplicates = BTreeMap::new();
    if existing_keys.is_empty() {
        return duplicates;
    }

    for (index, candidate) in candidates.iter().enumerate() {
        let native = comparison_key(&candidate.source_text, &native_articles);
        let foreign = comparison_key(&candidate.target_text, &foreign_articles);

        let mut best: Option<(bool, DuplicateResult)> = None;
        for (id, keys) in &existing_keys {
            let average = (similarity(&native, &keys.native) + similarity(&foreign, &keys.foreign)) / 2.0;
            let same_native = !native.is_empty() && native == keys.native;
            let flagged = average >= options.threshold || same_native;

            let better = match &best {
                None => true,
                Some((best_flagged, best_result)) => {
                    (flagged, average) > (*best_flagged, best_result.similarity)
                }
            };
            if better {
                best = Some((
                    flagged,
                    DuplicateResult {
                        is_duplicate: flagged,
                        duplicate_of: *id,
                        similarity: average,
                    },
                ));
            }
        }

        if let Some((true, result)) = best {
            debug!(
                "Candidate {} ('{}') duplicates item {} ({:.2})",
                index, candidate.source_text, result.duplicate_of, result.similarity
            );
            duplicates.insert(index, result);
        }
    }

    duplicates
}
