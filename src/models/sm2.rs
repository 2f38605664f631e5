//! SM-2 (SuperMemo 2) spaced repetition, failure-preserving variant.
//!
//! - Quality 0-2: repetitions reset, item comes back tomorrow, ease untouched
//! - Quality 3-5: interval grows 1 day → 6 days → previous × ease
//! - Ease moves by 0.1 - (5-q)(0.08 + (5-q)0.02) on passes, floor 1.3
//! - Next review date is fixed at grading time from the review date
//! - Intervals are capped at `MAX_INTERVAL_DAYS`; ease has no ceiling

use super::learning_progress::{LearningProgress, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR};
use super::quality::{HumanRating, QualityRating};
use chrono::{Days, NaiveDate};

/// Grades one review. `previous` is `None` for an item never reviewed.
pub fn calculate_next_review(
    previous: Option<&LearningProgress>,
    item_id: i64,
    quality: QualityRating,
    today: NaiveDate,
) -> LearningProgress {
    let current = previous
        .cloned()
        .unwrap_or_else(|| LearningProgress::fresh(item_id, today));
    let q = quality.value() as f64;

    let (ease_factor, interval, repetitions) = if quality.is_pass() {
        let repetitions = current.repetitions + 1;
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            _ => (current.interval as f64 * current.ease_factor)
                .round()
                .clamp(1.0, MAX_INTERVAL_DAYS as f64) as u32,
        };
        let ease = current.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
        (ease.max(MIN_EASE_FACTOR), interval, repetitions)
    } else {
        (current.ease_factor.max(MIN_EASE_FACTOR), 1, 0)
    };

    LearningProgress {
        item_id: current.item_id,
        ease_factor,
        interval,
        repetitions,
        total_reviews: current.total_reviews + 1,
        correct_reviews: current.correct_reviews + u32::from(quality.is_pass()),
        next_review_date: today
            .checked_add_days(Days::new(interval as u64))
            .unwrap_or(NaiveDate::MAX),
        last_review_date: Some(today),
    }
}

/// Intervals each coarse rating would produce, in Again/Hard/Good order.
pub fn preview_intervals(
    previous: Option<&LearningProgress>,
    item_id: i64,
    today: NaiveDate,
) -> [u32; 3] {
    [HumanRating::Again, HumanRating::Hard, HumanRating::Good]
        .map(|rating| calculate_next_review(previous, item_id, rating.into(), today).interval)
}
