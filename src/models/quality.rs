//! Recall-quality ratings that feed the scheduler.
//!
//! 0: blackout, 1: wrong, 2: wrong but close (accent slip),
//! 3: right with difficulty, 4: right after hesitation, 5: perfect.

use super::{MatchResult, MatchType};
use serde::{Deserialize, Serialize};

pub const PASS_THRESHOLD: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualityRating(u8);

impl QualityRating {
    /// Values above 5 clamp to 5.
    pub fn new(value: u8) -> Self {
        Self(value.min(5))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_pass(&self) -> bool {
        self.0 >= PASS_THRESHOLD
    }

    /// Derives a rating from an automatic verdict. `accent_only_miss`
    /// softens a failure caused only by accents.
    pub fn from_match(result: &MatchResult, accent_only_miss: bool) -> Self {
        if result.is_correct {
            return match result.match_type {
                MatchType::Exact if result.similarity >= 1.0 => Self(5),
                _ if result.similarity >= 0.9 => Self(4),
                _ => Self(3),
            };
        }

        if accent_only_miss {
            Self(2)
        } else if result.normalized_actual.is_empty() {
            Self(0)
        } else {
            Self(1)
        }
    }
}

/// Coarse rating given by a learner or parent instead of an automatic check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanRating {
    Again,
    Hard,
    Good,
}

impl From<HumanRating> for QualityRating {
    fn from(rating: HumanRating) -> Self {
        match rating {
            HumanRating::Again => QualityRating(1),
            HumanRating::Hard => QualityRating(3),
            HumanRating::Good => QualityRating(5),
        }
    }
}

impl std::str::FromStr for HumanRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(HumanRating::Again),
            "hard" | "3" => Ok(HumanRating::Hard),
            "good" | "5" => Ok(HumanRating::Good),
            other => Err(format!("unknown rating '{}'", other)),
        }
    }
}
