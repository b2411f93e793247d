//! A player's ordered pile of cards.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::{Card, StateError};

/// A player-scoped ordered pile of cards. Unpositioned; cards are appended
/// at the end and the order is player-visible, so removals must preserve the
/// order of the remaining cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    /// Unique id within a room's hand table (wire name `hand_id`).
    #[serde(rename = "hand_id", default)]
    pub id: String,

    #[serde(default)]
    pub cards: Vector<Card>,
}

impl Hand {
    /// Creates an empty hand.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cards: Vector::new(),
        }
    }

    /// Number of cards in the hand.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the hand holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Appends a card at the end.
    pub fn add(&self, card: Card) -> Hand {
        let mut cards = self.cards.clone();
        cards.push_back(card);
        Hand {
            cards,
            ..self.clone()
        }
    }

    /// Removes the card at `idx`.
    ///
    /// # Errors
    /// `OutOfRange` when `idx` is not a valid position.
    pub fn remove_at(&self, idx: usize) -> Result<Hand, StateError> {
        let len = self.cards.len();
        if idx >= len {
            return Err(StateError::OutOfRange { index: idx, len });
        }
        let mut cards = self.cards.clone();
        cards.remove(idx);
        Ok(Hand {
            cards,
            ..self.clone()
        })
    }

    /// Looks at the card at `idx`. Returns `None` when out of range.
    pub fn peek(&self, idx: usize) -> Option<Card> {
        self.cards.get(idx).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_at_end() {
        let hand = Hand::new("p1")
            .add(Card::new("Queen", ""))
            .add(Card::new("King", ""));
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.cards[1].front, "King");
    }

    #[test]
    fn test_remove_at_preserves_order() {
        let hand = Hand::new("p1")
            .add(Card::new("3", ""))
            .add(Card::new("5", ""))
            .add(Card::new("Queen", ""));
        let hand = hand.remove_at(1).unwrap();
        assert_eq!(hand.cards[0].front, "3");
        assert_eq!(hand.cards[1].front, "Queen");
    }

    #[test]
    fn test_remove_at_out_of_range_leaves_hand_unchanged() {
        let hand = Hand::new("p1").add(Card::new("A", ""));
        assert_eq!(
            hand.remove_at(5),
            Err(StateError::OutOfRange { index: 5, len: 1 })
        );
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn test_peek() {
        let hand = Hand::new("p1").add(Card::new("3", "")).add(Card::new("5", ""));
        assert_eq!(hand.peek(1).unwrap().front, "5");
        assert_eq!(hand.peek(5), None);
    }

    #[test]
    fn test_wire_field_names() {
        let hand = Hand::new("p1");
        let json = serde_json::to_value(&hand).unwrap();
        assert_eq!(json["hand_id"], "p1");
        assert!(json["cards"].as_array().unwrap().is_empty());
    }
}
