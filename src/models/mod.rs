pub mod difficulty;
pub mod duplicate;
pub mod learning_progress;
pub mod learning_session;
pub mod match_result;
pub mod quality;
pub mod sm2;
pub mod vocabulary_item;

pub use difficulty::DifficultyTier;
pub use duplicate::{DuplicateResult, ImportCandidate};
pub use learning_progress::LearningProgress;
pub use learning_session::{Answer, Direction, LearningSession, SessionConfig, Verdict};
pub use match_result::{MatchResult, MatchType};
pub use quality::{HumanRating, QualityRating};
pub use vocabulary_item::{Placement, Scope, VocabularyItem};
