//! Learning session management for spaced repetition practice.
//! Handles multi-round review of due items: every answer is judged,
//! turned into a quality rating, scheduled with SM-2 and persisted.

use super::sm2::calculate_next_review;
use super::{HumanRating, LearningProgress, MatchResult, MatchType, QualityRating, Scope, VocabularyItem};
use crate::database::db;
use crate::error::{EngineError, Result};
use crate::language::Language;
use crate::matching::{
    DiffSegment, Strictness, check_answer, combined_match_with, has_accent_mismatch_only,
    highlight_differences, normalize,
};
use log::{debug, info};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Which side of the item is shown; the other side is the expected answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    NativeToForeign,
    ForeignToNative,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub direction: Direction,
    pub strictness: Strictness,
    pub native_language: Option<Language>,
    pub foreign_language: Option<Language>,
}

impl SessionConfig {
    fn answer_language(&self) -> Option<Language> {
        match self.direction {
            Direction::NativeToForeign => self.foreign_language,
            Direction::ForeignToNative => self.native_language,
        }
    }
}

/// A submitted answer.
#[derive(Clone, Debug, PartialEq)]
pub enum Answer {
    Typed(String),
    /// Text of the picked multiple-choice option.
    Choice(String),
    /// Speech-recognizer transcript.
    Spoken(String),
    /// Learner or parent judged recall themselves.
    Rated(HumanRating),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// `None` for human-rated answers.
    pub match_result: Option<MatchResult>,
    pub quality: QualityRating,
    /// Failed only because of accents; shown as "almost".
    pub accent_only: bool,
    /// Expected text with mistakes flagged; empty unless a typed answer missed.
    pub highlights: Vec<DiffSegment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub evaluation: Evaluation,
    pub progress: LearningProgress,
}

/// Judges one answer against the expected text. Pure; nothing is stored.
pub fn evaluate_answer(
    expected: &str,
    answer: &Answer,
    strictness: Strictness,
    language: Option<Language>,
) -> Evaluation {
    let (match_result, highlights, accent_only) = match answer {
        Answer::Typed(actual) => {
            let check = check_answer(expected, actual, strictness);
            let match_type = if !check.is_correct {
                MatchType::None
            } else if check.distance == 0 {
                MatchType::Exact
            } else {
                MatchType::Fuzzy
            };
            let highlights = if check.is_correct {
                Vec::new()
            } else {
                highlight_differences(expected, actual)
            };
            let accent_only = !check.is_correct && has_accent_mismatch_only(expected, actual);
            let result = MatchResult {
                is_correct: check.is_correct,
                similarity: check.similarity,
                match_type,
                normalized_expected: check.normalized_expected,
                normalized_actual: check.normalized_actual,
            };
            (Some(result), highlights, accent_only)
        }
        Answer::Choice(selected) => {
            let normalized_expected = normalize(expected, false);
            let normalized_actual = normalize(selected, false);
            let is_correct = normalized_expected == normalized_actual;
            let result = MatchResult {
                is_correct,
                similarity: if is_correct { 1.0 } else { 0.0 },
                match_type: if is_correct { MatchType::Exact } else { MatchType::None },
                normalized_expected,
                normalized_actual,
            };
            (Some(result), Vec::new(), false)
        }
        Answer::Spoken(transcript) => {
            let result = combined_match_with(transcript, expected, language);
            let accent_only = !result.is_correct && has_accent_mismatch_only(expected, transcript);
            (Some(result), Vec::new(), accent_only)
        }
        Answer::Rated(_) => (None, Vec::new(), false),
    };

    let quality = match (&match_result, answer) {
        (Some(result), _) => QualityRating::from_match(result, accent_only),
        (None, Answer::Rated(rating)) => QualityRating::from(*rating),
        (None, _) => QualityRating::new(0),
    };

    Evaluation {
        match_result,
        quality,
        accent_only,
        highlights,
    }
}

struct SessionCard {
    item: VocabularyItem,
    progress: Option<LearningProgress>,
    is_learned: bool,
}

/// Manages a practice session with multiple review rounds.
/// Items not passed (quality < 3) are repeated in subsequent rounds.
pub struct LearningSession {
    pub scope: Scope,
    pub config: SessionConfig,
    cards: Vec<SessionCard>,
    current_round_cards: Vec<usize>,
    current_index: usize,
    pub round_number: usize,
}

impl LearningSession {
    /// Starts a session over everything due in `scope` on the current date.
    pub fn start(scope: Scope, config: SessionConfig, conn: &Connection) -> Result<Self> {
        let due = db::get_items_due_for_review(scope, conn)?;
        info!("Starting session over {} due items in {:?}", due.len(), scope);
        Ok(Self::new_from_due_items(scope, config, due))
    }

    pub fn new_from_due_items(
        scope: Scope,
        config: SessionConfig,
        due: Vec<(VocabularyItem, Option<LearningProgress>)>,
    ) -> Self {
        let cards: Vec<SessionCard> = due
            .into_iter()
            .map(|(item, progress)| SessionCard {
                item,
                progress,
                is_learned: false,
            })
            .collect();

        let indices: Vec<usize> = (0..cards.len()).collect();

        Self {
            scope,
            config,
            cards,
            current_round_cards: indices,
            current_index: 0,
            round_number: 1,
        }
    }

    fn current(&self) -> Option<&SessionCard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
    }

    pub fn current_item(&self) -> Option<&VocabularyItem> {
        self.current().map(|card| &card.item)
    }

    pub fn current_progress(&self) -> Option<&LearningProgress> {
        self.current().and_then(|card| card.progress.as_ref())
    }

    /// Text shown to the learner for the current item.
    pub fn prompt(&self) -> Option<&str> {
        self.current_item().map(|item| match self.config.direction {
            Direction::NativeToForeign => item.source_text.as_str(),
            Direction::ForeignToNative => item.target_text.as_str(),
        })
    }

    pub fn expected_answer(&self) -> Option<&str> {
        self.current_item().map(|item| match self.config.direction {
            Direction::NativeToForeign => item.target_text.as_str(),
            Direction::ForeignToNative => item.source_text.as_str(),
        })
    }

    /// Grades the current item, schedules it and persists the new progress.
    /// Items with quality >= 3 are marked learned for this session.
    pub fn submit(&mut self, answer: &Answer, conn: &Connection) -> Result<Verdict> {
        let &actual_idx = self
            .current_round_cards
            .get(self.current_index)
            .ok_or(EngineError::NoCurrentCard)?;
        let expected = self.expected_answer().ok_or(EngineError::NoCurrentCard)?;

        let evaluation = evaluate_answer(
            expected,
            answer,
            self.config.strictness,
            self.config.answer_language(),
        );

        let today = db::get_current_date(conn)?;
        let card = self
            .cards
            .get_mut(actual_idx)
            .ok_or(EngineError::NoCurrentCard)?;
        let progress =
            calculate_next_review(card.progress.as_ref(), card.item.id, evaluation.quality, today);

        db::save_progress(&progress, conn)?;
        debug!(
            "Item {} graded {} -> interval {}d, ease {:.2}",
            card.item.id,
            evaluation.quality.value(),
            progress.interval,
            progress.ease_factor
        );

        card.is_learned = evaluation.quality.is_pass();
        card.progress = Some(progress.clone());

        Ok(Verdict {
            evaluation,
            progress,
        })
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with items that weren't passed.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed_indices: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| self.cards.get(idx).is_some_and(|card| !card.is_learned))
            .collect();

        if !failed_indices.is_empty() {
            self.current_round_cards = failed_indices;
            self.current_index = 0;
            self.round_number += 1;
            debug!(
                "Round {} with {} items to retry",
                self.round_number,
                self.current_round_cards.len()
            );
        }
    }

    pub fn learned_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.cards.get(idx).is_some_and(|card| card.is_learned))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    /// True when the round is empty or every item in it was passed.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.learned_count() == self.total_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportCandidate, Placement};
    use chrono::{Days, NaiveDate};

    fn setup() -> Connection {
        let conn = db::open_in_memory().unwrap();
        db::set_current_date(NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(), &conn).unwrap();
        for (source, target) in [("der Hund", "le chien"), ("die Katze", "le chat")] {
            db::add_vocabulary_item(&ImportCandidate::new(source, target), &Placement::default(), &conn)
                .unwrap();
        }
        conn
    }

    fn french() -> SessionConfig {
        SessionConfig {
            foreign_language: Some(Language::French),
            native_language: Some(Language::German),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_evaluate_typed() {
        let perfect = evaluate_answer("le chien", &Answer::Typed("Le chien".into()), Strictness::Normal, None);
        assert_eq!(perfect.quality.value(), 5);
        assert!(perfect.highlights.is_empty());

        let wrong = evaluate_answer("le chien", &Answer::Typed("le chat".into()), Strictness::Normal, None);
        assert!(!wrong.quality.is_pass());
        assert!(wrong.highlights.iter().any(|s| s.is_highlighted));
    }

    #[test]
    fn test_evaluate_accent_slip_strict() {
        let result = evaluate_answer("café", &Answer::Typed("cafe".into()), Strictness::Strict, None);
        assert!(result.accent_only);
        assert_eq!(result.quality.value(), 2);
        assert!(result.highlights.iter().all(|s| !s.is_highlighted));
    }

    #[test]
    fn test_evaluate_choice_and_rating() {
        let right = evaluate_answer("le chat", &Answer::Choice("le chat".into()), Strictness::Normal, None);
        assert_eq!(right.quality.value(), 5);
        let wrong = evaluate_answer("le chat", &Answer::Choice("le chien".into()), Strictness::Normal, None);
        assert_eq!(wrong.quality.value(), 1);

        let rated = evaluate_answer("le chat", &Answer::Rated(HumanRating::Hard), Strictness::Normal, None);
        assert!(rated.match_result.is_none());
        assert_eq!(rated.quality.value(), 3);
    }

    #[test]
    fn test_evaluate_spoken() {
        let result = evaluate_answer(
            "le chien",
            &Answer::Spoken("le shien".into()),
            Strictness::Normal,
            Some(Language::French),
        );
        assert!(result.quality.is_pass());
    }

    #[test]
    fn test_session_rounds_and_persistence() {
        let conn = setup();
        let mut session = LearningSession::start(Scope::All, french(), &conn).unwrap();
        assert_eq!(session.total_count(), 2);
        assert_eq!(session.prompt(), Some("der Hund"));

        assert_eq!(session.remaining_count(), 2);

        let verdict = session.submit(&Answer::Typed("le chien".into()), &conn).unwrap();
        assert_eq!(session.remaining_count(), 1);
        assert_eq!(verdict.progress.interval, 1);
        assert_eq!(verdict.progress.repetitions, 1);
        let today = db::get_current_date(&conn).unwrap();
        assert_eq!(verdict.progress.next_review_date, today + Days::new(1));
        session.next_card();

        let verdict = session.submit(&Answer::Spoken("la vache".into()), &conn).unwrap();
        assert_eq!(verdict.progress.repetitions, 0);
        session.next_card();

        // failed item comes back in round two
        assert_eq!(session.round_number, 2);
        assert_eq!(session.total_count(), 1);
        assert_eq!(session.remaining_count(), 1);
        assert_eq!(session.expected_answer(), Some("le chat"));
        assert!(!session.is_completed());

        session.submit(&Answer::Rated(HumanRating::Good), &conn).unwrap();
        assert!(session.is_completed());

        let stored = db::get_progress(verdict.progress.item_id, &conn).unwrap().unwrap();
        assert_eq!(stored.total_reviews, 2);
        assert_eq!(stored.correct_reviews, 1);
    }

    #[test]
    fn test_reverse_direction() {
        let conn = setup();
        let config = SessionConfig {
            direction: Direction::ForeignToNative,
            ..french()
        };
        let mut session = LearningSession::start(Scope::Unsorted, config, &conn).unwrap();
        assert_eq!(session.prompt(), Some("le chien"));
        let verdict = session.submit(&Answer::Typed("der hund".into()), &conn).unwrap();
        assert!(verdict.evaluation.quality.is_pass());
    }

    #[test]
    fn test_empty_session() {
        let conn = db::open_in_memory().unwrap();
        let mut session = LearningSession::start(Scope::All, SessionConfig::default(), &conn).unwrap();
        assert!(session.is_completed());
        assert!(matches!(
            session.submit(&Answer::Typed("x".into()), &conn),
            Err(EngineError::NoCurrentCard)
        ));
    }
}
