use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type CardId = i64;

/// Text rendered in place of an absent side of a card.
pub const MISSING_TEXT: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct FlashCard {
    #[sqlx(rename = "uid")]
    pub id: CardId,
    #[sqlx(rename = "english_card")]
    pub english: Option<String>,
    #[sqlx(rename = "vietnamese_card")]
    pub vietnamese: Option<String>,
}

impl FlashCard {
    pub fn display_english(&self) -> &str {
        self.english.as_deref().unwrap_or(MISSING_TEXT)
    }

    pub fn display_vietnamese(&self) -> &str {
        self.vietnamese.as_deref().unwrap_or(MISSING_TEXT)
    }
}

/// A card that has not been stored yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCard {
    pub english: Option<String>,
    pub vietnamese: Option<String>,
}

impl NewCard {
    pub fn new(english: impl Into<String>, vietnamese: impl Into<String>) -> Self {
        Self {
            english: Some(english.into()),
            vietnamese: Some(vietnamese.into()),
        }
    }
}

/// Result of an ignore-on-conflict insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(CardId),
    /// The pair already exists; nothing was written.
    Ignored,
    Failed(String),
}

impl InsertOutcome {
    pub fn id(&self) -> Option<CardId> {
        match self {
            InsertOutcome::Inserted(id) => Some(*id),
            _ => None,
        }
    }
}

/// Per-field search criteria. `exact` selects equality, otherwise substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    pub english: String,
    pub exact_english: bool,
    pub vietnamese: String,
    pub exact_vietnamese: bool,
}

impl CardFilter {
    pub fn english(term: impl Into<String>, exact: bool) -> Self {
        Self {
            english: term.into(),
            exact_english: exact,
            ..Self::default()
        }
    }

    pub fn vietnamese(term: impl Into<String>, exact: bool) -> Self {
        Self {
            vietnamese: term.into(),
            exact_vietnamese: exact,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_text_renders_placeholder() {
        let card = FlashCard {
            id: 1,
            english: Some("hello".into()),
            vietnamese: None,
        };
        assert_eq!(card.display_english(), "hello");
        assert_eq!(card.display_vietnamese(), "N/A");
    }
}
