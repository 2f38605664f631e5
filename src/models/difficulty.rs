//! Difficulty tiers from lifetime review accuracy, independent of the
//! scheduler. All reviews weigh the same regardless of age.
use super::LearningProgress;
use serde::Serialize;

pub const MIN_REVIEWS_FOR_TIER: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Struggling,
    VeryHard,
    Hard,
}

/// `None` when there are too few reviews or the item is going well.
pub fn classify(progress: &LearningProgress) -> Option<DifficultyTier> {
    if progress.total_reviews < MIN_REVIEWS_FOR_TIER {
        return None;
    }

    let accuracy = progress.accuracy();
    if accuracy < 0.3 {
        Some(DifficultyTier::Struggling)
    } else if accuracy < 0.5 {
        Some(DifficultyTier::VeryHard)
    } else if accuracy < 0.7 {
        Some(DifficultyTier::Hard)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn with_reviews(total: u32, correct: u32) -> LearningProgress {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        LearningProgress {
            total_reviews: total,
            correct_reviews: correct,
            ..LearningProgress::fresh(1, today)
        }
    }

    #[test]
    fn test_needs_minimum_reviews() {
        assert_eq!(classify(&with_reviews(2, 0)), None);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(classify(&with_reviews(10, 2)), Some(DifficultyTier::Struggling));
        assert_eq!(classify(&with_reviews(10, 3)), Some(DifficultyTier::VeryHard));
        assert_eq!(classify(&with_reviews(10, 5)), Some(DifficultyTier::Hard));
        assert_eq!(classify(&with_reviews(10, 7)), None);
    }
}
