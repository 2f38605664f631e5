use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Longest scheduling gap, in days (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// SM-2 state for one vocabulary item. Replaced, never mutated, on each
/// grading; `None` in place of a progress record means "never reviewed".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningProgress {
    pub item_id: i64,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub total_reviews: u32,
    pub correct_reviews: u32,
    pub next_review_date: NaiveDate,
    pub last_review_date: Option<NaiveDate>,
}

impl LearningProgress {
    /// Unreviewed state, due immediately.
    pub fn fresh(item_id: i64, today: NaiveDate) -> Self {
        Self {
            item_id,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            total_reviews: 0,
            correct_reviews: 0,
            next_review_date: today,
            last_review_date: None,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total_reviews == 0 {
            0.0
        } else {
            self.correct_reviews as f64 / self.total_reviews as f64
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }
}
