//! Per-language spelling tables for speech-recognition artifacts.
//!
//! The recognizer runs in the learner's native-language mode, so a spoken
//! foreign word arrives spelled the way a native speaker would write the
//! sound ("shien" for "chien"). Three immutable tables per language cover
//! this:
//!
//! - ordered substitution pairs, applied to both sides before comparing
//! - whole-word misheard variants with their canonical spelling
//! - leading articles, stripped for core-word comparison

use super::normalizer::{normalize, remove_diacritics};
use crate::language::Language;
use std::collections::HashMap;
use std::sync::LazyLock;

pub struct PhoneticTable {
    pub substitutions: &'static [(&'static str, &'static str)],
    pub misheard: &'static [(&'static str, &'static str)],
    pub articles: &'static [&'static str],
}

static FRENCH: PhoneticTable = PhoneticTable {
    substitutions: &[
        ("sh", "ch"),
        ("zh", "j"),
        ("kw", "qu"),
        ("wah", "oi"),
        ("wa", "oi"),
        ("oo", "ou"),
        ("eau", "o"),
        ("aux", "o"),
        ("au", "o"),
        ("ay", "ai"),
        ("ph", "f"),
    ],
    misheard: &[
        ("shien", "chien"),
        ("shat", "chat"),
        ("shah", "chat"),
        ("mezon", "maison"),
        ("bonjur", "bonjour"),
        ("mercy", "merci"),
        ("wee", "oui"),
        ("pan", "pain"),
        ("luh", "le"),
        ("lah", "la"),
        ("lay", "les"),
        ("bwah", "bois"),
        ("frommage", "fromage"),
    ],
    articles: &["de la", "l'", "le", "la", "les", "un", "une", "des", "du"],
};

static SPANISH: PhoneticTable = PhoneticTable {
    substitutions: &[
        ("ny", "ñ"),
        ("kw", "cu"),
        ("ll", "y"),
        ("rr", "r"),
        ("v", "b"),
        ("k", "c"),
    ],
    misheard: &[
        ("olla", "hola"),
        ("grassias", "gracias"),
        ("keso", "queso"),
        ("ninyo", "niño"),
        ("manyana", "mañana"),
        ("senyor", "señor"),
        ("seenyor", "señor"),
        ("bweno", "bueno"),
    ],
    articles: &["el", "la", "los", "las", "unos", "unas", "una", "un"],
};

static GERMAN: PhoneticTable = PhoneticTable {
    substitutions: &[
        ("ß", "ss"),
        ("sh", "sch"),
        ("oy", "eu"),
        ("ee", "ie"),
        ("ay", "ei"),
        ("ts", "z"),
        ("ck", "k"),
    ],
    misheard: &[
        ("dunker", "danke"),
        ("dunka", "danke"),
        ("house", "haus"),
        ("hunt", "hund"),
        ("ish", "ich"),
        ("fatter", "vater"),
        ("farter", "vater"),
        ("mooter", "mutter"),
        ("shule", "schule"),
        ("dock", "doch"),
    ],
    articles: &[
        "der", "die", "das", "den", "dem", "des", "einen", "einem", "einer", "eines", "eine",
        "ein",
    ],
};

static ITALIAN: PhoneticTable = PhoneticTable {
    substitutions: &[
        ("tch", "c"),
        ("kee", "chi"),
        ("ki", "chi"),
        ("ke", "che"),
        ("ny", "gn"),
        ("ly", "gli"),
        ("sh", "sc"),
        ("ts", "z"),
        ("k", "c"),
    ],
    misheard: &[
        ("chow", "ciao"),
        ("chao", "ciao"),
        ("gratsie", "grazie"),
        ("gratsee", "grazie"),
        ("kasa", "casa"),
        ("aqua", "acqua"),
        ("bwono", "buono"),
        ("praygo", "prego"),
    ],
    articles: &["gli", "il", "lo", "la", "le", "l'", "i", "uno", "una", "un'", "un"],
};

static PORTUGUESE: PhoneticTable = PhoneticTable {
    substitutions: &[
        ("ny", "nh"),
        ("ly", "lh"),
        ("sh", "ch"),
        ("ow", "ão"),
    ],
    misheard: &[
        ("obrigadu", "obrigado"),
        ("nown", "não"),
        ("now", "não"),
        ("sow", "são"),
        ("bong", "bom"),
        ("cowsa", "coisa"),
    ],
    articles: &["os", "as", "o", "a", "umas", "uma", "uns", "um"],
};

static ENGLISH: PhoneticTable = PhoneticTable {
    substitutions: &[("ph", "f"), ("ck", "k")],
    misheard: &[],
    articles: &["the", "an", "a", "to"],
};

pub fn table(language: Language) -> &'static PhoneticTable {
    match language {
        Language::English => &ENGLISH,
        Language::French => &FRENCH,
        Language::Spanish => &SPANISH,
        Language::German => &GERMAN,
        Language::Italian => &ITALIAN,
        Language::Portuguese => &PORTUGUESE,
    }
}

static MISHEARD_INDEX: LazyLock<HashMap<Language, HashMap<&'static str, &'static str>>> =
    LazyLock::new(|| {
        Language::ALL
            .iter()
            .map(|&language| (language, table(language).misheard.iter().copied().collect()))
            .collect()
    });

/// Rewrites a transcript toward canonical spelling and folds accents, so
/// both sides of a comparison land on the same skeleton.
pub fn phonetic_normalize(text: &str, language: Language) -> String {
    let mut rewritten = normalize(text, false);
    for &(from, to) in table(language).substitutions {
        if rewritten.contains(from) {
            rewritten = rewritten.replace(from, to);
        }
    }
    remove_diacritics(&rewritten)
}

/// Replaces known misheard words in the transcript. Returns `None` when no
/// word was in the table.
pub fn correct_misheard(text: &str, language: Language) -> Option<String> {
    let index = MISHEARD_INDEX.get(&language)?;
    let normalized = normalize(text, false);

    if let Some(canonical) = index.get(normalized.as_str()) {
        return Some((*canonical).to_string());
    }

    let mut changed = false;
    let words: Vec<&str> = normalized
        .split(' ')
        .map(|word| match index.get(word) {
            Some(canonical) => {
                changed |= canonical != &word;
                *canonical
            }
            None => word,
        })
        .collect();

    changed.then(|| words.join(" "))
}

/// Removes a single leading article, trying the longest articles first.
/// Text made only of an article is returned unchanged.
pub fn strip_article<'a>(text: &'a str, articles: &[&str]) -> &'a str {
    let mut sorted: Vec<&str> = articles.to_vec();
    sorted.sort_by_key(|article| std::cmp::Reverse(article.chars().count()));

    for article in sorted {
        let rest = if article.ends_with('\'') {
            text.strip_prefix(article)
        } else {
            text.strip_prefix(article)
                .and_then(|rest| rest.strip_prefix(' '))
        };

        if let Some(rest) = rest {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    text
}

/// Articles for one language, or for every known language when the side's
/// language is unknown.
pub fn articles_for(language: Option<Language>) -> Vec<&'static str> {
    match language {
        Some(language) => table(language).articles.to_vec(),
        None => Language::ALL
            .iter()
            .flat_map(|&language| table(language).articles.iter().copied())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_french_substitutions() {
        assert_eq!(phonetic_normalize("le shien", Language::French), "le chien");
        assert_eq!(
            phonetic_normalize("le chien", Language::French),
            phonetic_normalize("le shien", Language::French)
        );
    }

    #[test]
    fn test_spanish_ny_and_accents() {
        assert_eq!(
            phonetic_normalize("ninyo", Language::Spanish),
            phonetic_normalize("niño", Language::Spanish)
        );
    }

    #[test]
    fn test_german_eszett() {
        assert_eq!(
            phonetic_normalize("strasse", Language::German),
            phonetic_normalize("Straße", Language::German)
        );
    }

    #[test]
    fn test_correct_misheard_words() {
        assert_eq!(
            correct_misheard("le shien", Language::French).as_deref(),
            Some("le chien")
        );
        assert_eq!(correct_misheard("Chow", Language::Italian).as_deref(), Some("ciao"));
        assert_eq!(correct_misheard("le chien", Language::French), None);
        assert_eq!(correct_misheard("anything", Language::English), None);
    }

    #[test]
    fn test_strip_article() {
        let french = articles_for(Some(Language::French));
        assert_eq!(strip_article("le chien", &french), "chien");
        assert_eq!(strip_article("l'eau", &french), "eau");
        assert_eq!(strip_article("de la viande", &french), "viande");
        assert_eq!(strip_article("lent", &french), "lent");
        assert_eq!(strip_article("la", &french), "la");
    }

    #[test]
    fn test_union_articles() {
        let all = articles_for(None);
        assert_eq!(strip_article("das haus", &all), "haus");
        assert_eq!(strip_article("the house", &all), "house");
    }
}
