use crate::db::{CardStore, FlashCard};
use crate::error::MenuError;
use rand::seq::SliceRandom;
use tracing::debug;

/// A small randomized deck. Each card shows its English side first; `next`
/// only moves on once the Vietnamese side has been revealed, and the deck is
/// reshuffled every time it wraps around.
#[derive(Debug, Clone)]
pub struct StudySession {
    cards: Vec<FlashCard>,
    index: usize,
    revealed: bool,
}

impl StudySession {
    pub async fn start(store: &CardStore, size: usize) -> Result<Self, MenuError> {
        let cards = store.get_random_subset(size).await?;
        debug!(size, drawn = cards.len(), "study session started");
        Ok(Self::from_cards(cards))
    }

    pub fn from_cards(cards: Vec<FlashCard>) -> Self {
        Self {
            cards,
            index: 0,
            revealed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[FlashCard] {
        &self.cards
    }

    pub fn current(&self) -> Option<&FlashCard> {
        self.cards.get(self.index)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Text on the visible side of the current card.
    pub fn visible_text(&self) -> Option<&str> {
        self.current().map(|card| {
            if self.revealed {
                card.display_vietnamese()
            } else {
                card.display_english()
            }
        })
    }

    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Advance to the next card. Returns false while the answer is still hidden.
    pub fn next(&mut self) -> bool {
        if !self.revealed || self.cards.is_empty() {
            return false;
        }
        self.index = (self.index + 1) % self.cards.len();
        if self.index == 0 {
            self.cards.shuffle(&mut rand::rng());
        }
        self.revealed = false;
        true
    }

    pub fn progress(&self) -> String {
        if self.cards.is_empty() {
            return "No flashcards found".to_string();
        }
        format!("Card {} of {}", self.index + 1, self.cards.len())
    }
}
