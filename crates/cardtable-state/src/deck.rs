//! A positioned, ordered pile of cards.

use im::Vector;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{Card, StateError};

const SUITS: [char; 4] = ['H', 'D', 'S', 'C'];
const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

/// An ordered pile of cards at a position on the table.
///
/// Index 0 is the bottom of the pile and the last index is the top — "top"
/// operations act on the end of the sequence. Every operation returns a new
/// `Deck`; the card sequence is a persistent vector, so the untouched prefix
/// is shared between the old and new values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Unique id within a room's deck table.
    pub id: String,

    /// Table position as an ordered `(x, y)` pair.
    #[serde(default)]
    pub position: (i32, i32),

    /// Bottom-to-top card sequence.
    #[serde(default)]
    pub cards: Vector<Card>,
}

impl Deck {
    /// Creates an empty deck.
    pub fn new(id: impl Into<String>, position: (i32, i32)) -> Self {
        Self {
            id: id.into(),
            position,
            cards: Vector::new(),
        }
    }

    /// Creates a standard 52-card deck: suits H, D, S, C crossed with ranks
    /// 2..10, J, Q, K, A, fronts rendered as suit+rank (`"H2"` .. `"CA"`),
    /// all face down.
    pub fn standard52(id: impl Into<String>, position: (i32, i32)) -> Self {
        let cards = SUITS
            .iter()
            .flat_map(|suit| {
                RANKS
                    .iter()
                    .map(move |rank| Card::new(format!("{suit}{rank}"), ""))
            })
            .collect();
        Self {
            id: id.into(),
            position,
            cards,
        }
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns a deck with the cards permuted uniformly at random.
    pub fn shuffle(&self) -> Deck {
        self.shuffle_with(&mut rand::rng())
    }

    /// Like [`shuffle`](Self::shuffle), with a caller-supplied RNG so tests
    /// can be deterministic.
    pub fn shuffle_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Deck {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        cards.shuffle(rng);
        Deck {
            cards: cards.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Removes the top `n` cards.
    ///
    /// # Errors
    /// `OutOfRange` when `n` exceeds the card count; the count is never
    /// clamped.
    pub fn remove_top(&self, n: usize) -> Result<Deck, StateError> {
        let len = self.cards.len();
        if n > len {
            return Err(StateError::OutOfRange { index: n, len });
        }
        Ok(Deck {
            cards: self.cards.take(len - n),
            ..self.clone()
        })
    }

    /// Removes the bottom `n` cards.
    ///
    /// # Errors
    /// `OutOfRange` when `n` exceeds the card count.
    pub fn remove_bottom(&self, n: usize) -> Result<Deck, StateError> {
        let len = self.cards.len();
        if n > len {
            return Err(StateError::OutOfRange { index: n, len });
        }
        Ok(Deck {
            cards: self.cards.skip(n),
            ..self.clone()
        })
    }

    /// Appends one card to the top.
    pub fn add_top(&self, card: Card) -> Deck {
        let mut cards = self.cards.clone();
        cards.push_back(card);
        Deck {
            cards,
            ..self.clone()
        }
    }

    /// Returns a deck at the new position; cards untouched.
    pub fn move_to(&self, x: i32, y: i32) -> Deck {
        Deck {
            position: (x, y),
            ..self.clone()
        }
    }

    /// Turns the whole pile over: reverses the card order and flips every
    /// card.
    pub fn flip_all(&self) -> Deck {
        Deck {
            cards: self.cards.iter().rev().map(|c| c.flip(None)).collect(),
            ..self.clone()
        }
    }

    /// Looks at the card `idx` positions from the top (or from the bottom if
    /// requested). Returns `None` when out of range — peeking never fails.
    pub fn peek(&self, idx: usize, from_bottom: bool) -> Option<Card> {
        let len = self.cards.len();
        if idx >= len {
            return None;
        }
        let at = if from_bottom { idx } else { len - 1 - idx };
        self.cards.get(at).cloned()
    }
}
