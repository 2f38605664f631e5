//! A vocabulary item pairs a native-language text with its foreign
//! translation. Items are soft-deleted, never removed.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: i64,
    pub book_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub section_id: Option<i64>,
    /// Native-language side.
    pub source_text: String,
    /// Foreign-language side.
    pub target_text: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl VocabularyItem {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_unsorted(&self) -> bool {
        self.book_id.is_none() && self.chapter_id.is_none() && self.section_id.is_none()
    }

    pub fn placement(&self) -> Placement {
        Placement {
            book_id: self.book_id,
            chapter_id: self.chapter_id,
            section_id: self.section_id,
        }
    }
}

/// Where a new item is filed. The default is "unsorted".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub book_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub section_id: Option<i64>,
}

/// A slice of the vocabulary loaded for practice or duplicate checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Book(i64),
    Chapter(i64),
    Section(i64),
    Unsorted,
    All,
}

impl Scope {
    /// The narrowest scope a placement belongs to.
    pub fn of(placement: &Placement) -> Self {
        match (placement.section_id, placement.chapter_id, placement.book_id) {
            (Some(section), _, _) => Scope::Section(section),
            (None, Some(chapter), _) => Scope::Chapter(chapter),
            (None, None, Some(book)) => Scope::Book(book),
            (None, None, None) => Scope::Unsorted,
        }
    }

    pub fn contains(&self, item: &VocabularyItem) -> bool {
        match self {
            Scope::Book(id) => item.book_id == Some(*id),
            Scope::Chapter(id) => item.chapter_id == Some(*id),
            Scope::Section(id) => item.section_id == Some(*id),
            Scope::Unsorted => item.is_unsorted(),
            Scope::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(book: Option<i64>, chapter: Option<i64>, section: Option<i64>) -> VocabularyItem {
        VocabularyItem {
            id: 1,
            book_id: book,
            chapter_id: chapter,
            section_id: section,
            source_text: "der Hund".to_string(),
            target_text: "le chien".to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_unsorted_item() {
        let card = item(None, None, None);
        assert!(card.is_unsorted());
        assert!(Scope::Unsorted.contains(&card));
        assert!(!Scope::Book(1).contains(&card));
        assert_eq!(Scope::of(&card.placement()), Scope::Unsorted);
    }

    #[test]
    fn test_scope_of_prefers_narrowest() {
        let card = item(Some(1), Some(2), Some(3));
        assert_eq!(Scope::of(&card.placement()), Scope::Section(3));
        assert!(Scope::Book(1).contains(&card));
        assert!(Scope::Chapter(2).contains(&card));
        assert!(Scope::All.contains(&card));
        assert!(!Scope::Unsorted.contains(&card));
    }
}
