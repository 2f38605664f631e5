pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod import;
pub mod language;
pub mod matching;
pub mod models;

pub use error::{EngineError, Result};
pub use language::Language;
pub use models::{
    Answer, DuplicateResult, ImportCandidate, LearningProgress, LearningSession, MatchResult,
    MatchType, QualityRating, Scope, VocabularyItem,
};
