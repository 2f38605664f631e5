use serde::{Deserialize, Serialize};

/// One row of a bulk import, before it becomes a vocabulary item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportCandidate {
    #[serde(alias = "sourceText")]
    pub source_text: String,
    #[serde(alias = "targetText")]
    pub target_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ImportCandidate {
    pub fn new(source_text: &str, target_text: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            notes: None,
        }
    }
}

/// Best existing match for a flagged import candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuplicateResult {
    pub is_duplicate: bool,
    /// Id of the existing vocabulary item.
    pub duplicate_of: i64,
    pub similarity: f64,
}
