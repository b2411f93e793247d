//! The room snapshot and its transition engine.

use im::{HashMap, OrdSet};
use serde::{Deserialize, Serialize};

use crate::{Card, Deck, Hand, StateError};

/// The authoritative state of one shared tabletop: decks and hands keyed by
/// id, plus the set of player ids present in the room.
///
/// A `Room` is a persistent value. Every transition takes `&self` and
/// returns a new `Room`; the input is never mutated and stays valid for any
/// other reader holding it. Only the touched deck/hand entry and the
/// containing map get new identity — everything else is shared structurally,
/// so snapshots are cheap to take and keep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub players: OrdSet<String>,

    #[serde(default)]
    pub decks: HashMap<String, Deck>,

    #[serde(default)]
    pub hands: HashMap<String, Hand>,

    /// Monotone counter feeding minted deck ids. Never decreases, so ids
    /// stay unique for the room's lifetime even after decks are deleted.
    #[serde(default)]
    deck_seq: u64,
}

impl Room {
    /// Creates an empty room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one deck entry, leaving everything else shared.
    fn with_deck<F>(&self, deck_id: &str, f: F) -> Result<Room, StateError>
    where
        F: FnOnce(&Deck) -> Result<Deck, StateError>,
    {
        let deck = self
            .decks
            .get(deck_id)
            .ok_or_else(|| StateError::DeckNotFound(deck_id.to_string()))?;
        let next = f(deck)?;
        Ok(Room {
            decks: self.decks.update(deck_id.to_string(), next),
            ..self.clone()
        })
    }

    /// Replaces one hand entry, leaving everything else shared.
    fn with_hand<F>(&self, hand_id: &str, f: F) -> Result<Room, StateError>
    where
        F: FnOnce(&Hand) -> Result<Hand, StateError>,
    {
        let hand = self
            .hands
            .get(hand_id)
            .ok_or_else(|| StateError::HandNotFound(hand_id.to_string()))?;
        let next = f(hand)?;
        Ok(Room {
            hands: self.hands.update(hand_id.to_string(), next),
            ..self.clone()
        })
    }

    // -----------------------------------------------------------------
    // Deck transitions
    // -----------------------------------------------------------------

    /// Shuffles a deck uniformly at random.
    pub fn shuffle(&self, deck_id: &str) -> Result<Room, StateError> {
        self.with_deck(deck_id, |deck| Ok(deck.shuffle()))
    }

    /// Removes the top `n` cards from a deck. An emptied deck stays in the
    /// table.
    pub fn remove_top(&self, deck_id: &str, n: usize) -> Result<Room, StateError> {
        self.with_deck(deck_id, |deck| deck.remove_top(n))
    }

    /// Appends a card to the top of a deck.
    pub fn add_top(&self, deck_id: &str, card: Card) -> Result<Room, StateError> {
        self.with_deck(deck_id, |deck| Ok(deck.add_top(card)))
    }

    /// Flips the card `idx` positions from the top of a deck (0 = top),
    /// toggling its face or setting it to `face_up` if given.
    pub fn flip_deck_card(
        &self,
        deck_id: &str,
        idx: usize,
        face_up: Option<bool>,
    ) -> Result<Room, StateError> {
        self.with_deck(deck_id, |deck| {
            let len = deck.cards.len();
            if idx >= len {
                return Err(StateError::OutOfRange { index: idx, len });
            }
            let at = len - 1 - idx;
            let flipped = deck.cards[at].flip(face_up);
            Ok(Deck {
                cards: deck.cards.update(at, flipped),
                ..deck.clone()
            })
        })
    }

    /// Turns a whole deck over.
    pub fn flip_deck(&self, deck_id: &str) -> Result<Room, StateError> {
        self.with_deck(deck_id, |deck| Ok(deck.flip_all()))
    }

    /// Repositions a deck.
    pub fn move_deck(&self, deck_id: &str, x: i32, y: i32) -> Result<Room, StateError> {
        self.with_deck(deck_id, |deck| Ok(deck.move_to(x, y)))
    }

    /// Creates and stores a new deck of the given type, returning the new
    /// room and the minted deck id. Only `"standard52"` is defined; an
    /// unknown type is a no-op returning the room unchanged and an empty id.
    pub fn initialize_deck(&self, pos: (i32, i32), deck_type: &str) -> (Room, String) {
        if deck_type != "standard52" {
            return (self.clone(), String::new());
        }
        let id = format!("standard_52_{}", self.deck_seq);
        let deck = Deck::standard52(id.clone(), pos);
        let room = Room {
            decks: self.decks.update(id.clone(), deck),
            deck_seq: self.deck_seq + 1,
            ..self.clone()
        };
        (room, id)
    }

    /// Moves the top `n` cards of a deck (relative order preserved) into a
    /// new deck at `pos`, returning the new room and the minted deck id.
    pub fn split_deck(
        &self,
        deck_id: &str,
        n: usize,
        pos: (i32, i32),
    ) -> Result<(Room, String), StateError> {
        let source = self
            .decks
            .get(deck_id)
            .ok_or_else(|| StateError::DeckNotFound(deck_id.to_string()))?;
        let len = source.cards.len();
        if n > len {
            return Err(StateError::OutOfRange { index: n, len });
        }
        let new_id = format!("{}_copy_{}", deck_id, self.deck_seq);
        let split = Deck {
            id: new_id.clone(),
            position: pos,
            cards: source.cards.skip(len - n),
        };
        let remainder = Deck {
            cards: source.cards.take(len - n),
            ..source.clone()
        };
        let room = Room {
            decks: self
                .decks
                .update(deck_id.to_string(), remainder)
                .update(new_id.clone(), split),
            deck_seq: self.deck_seq + 1,
            ..self.clone()
        };
        Ok((room, new_id))
    }

    /// Moves `n` cards from the named end of a deck into the end of a hand,
    /// first-drawn appended first. Drawing more cards than the deck holds is
    /// a no-op returning the room unchanged.
    pub fn draw_card(
        &self,
        hand_id: &str,
        deck_id: &str,
        n: usize,
        from_bottom: bool,
    ) -> Result<Room, StateError> {
        let hand = self
            .hands
            .get(hand_id)
            .ok_or_else(|| StateError::HandNotFound(hand_id.to_string()))?;
        let deck = self
            .decks
            .get(deck_id)
            .ok_or_else(|| StateError::DeckNotFound(deck_id.to_string()))?;

        let len = deck.cards.len();
        if n > len {
            return Ok(self.clone());
        }

        let (remaining, drawn): (im::Vector<Card>, Vec<Card>) = if from_bottom {
            (deck.cards.skip(n), deck.cards.take(n).iter().cloned().collect())
        } else {
            (
                deck.cards.take(len - n),
                deck.cards.skip(len - n).iter().rev().cloned().collect(),
            )
        };

        let mut new_hand = hand.clone();
        for card in drawn {
            new_hand = new_hand.add(card);
        }
        let new_deck = Deck {
            cards: remaining,
            ..deck.clone()
        };

        Ok(Room {
            decks: self.decks.update(deck_id.to_string(), new_deck),
            hands: self.hands.update(hand_id.to_string(), new_hand),
            ..self.clone()
        })
    }

    /// Removes and returns the card `idx` positions from the top of a deck
    /// (0 = top). The deck entry is deleted entirely when it becomes empty.
    /// A missing deck id or an out-of-range index returns the room unchanged
    /// and `None` — this inquiry-style removal never fails.
    pub fn remove_card_from_deck(&self, deck_id: &str, idx: usize) -> (Room, Option<Card>) {
        let Some(deck) = self.decks.get(deck_id) else {
            return (self.clone(), None);
        };
        let len = deck.cards.len();
        if idx >= len {
            return (self.clone(), None);
        }
        let at = len - 1 - idx;
        let mut cards = deck.cards.clone();
        let removed = cards.remove(at);
        let decks = if cards.is_empty() {
            self.decks.without(deck_id)
        } else {
            self.decks.update(
                deck_id.to_string(),
                Deck {
                    cards,
                    ..deck.clone()
                },
            )
        };
        (
            Room {
                decks,
                ..self.clone()
            },
            Some(removed),
        )
    }

    /// Inserts or overwrites a deck under its own id.
    pub fn add_deck(&self, deck: Deck) -> Room {
        Room {
            decks: self.decks.update(deck.id.clone(), deck),
            ..self.clone()
        }
    }

    // -----------------------------------------------------------------
    // Hand transitions
    // -----------------------------------------------------------------

    /// Inserts or overwrites a hand under its own id.
    pub fn add_hand(&self, hand: Hand) -> Room {
        Room {
            hands: self.hands.update(hand.id.clone(), hand),
            ..self.clone()
        }
    }

    /// Removes the card at `n` from a hand.
    pub fn remove_nth(&self, hand_id: &str, n: usize) -> Result<Room, StateError> {
        self.with_hand(hand_id, |hand| hand.remove_at(n))
    }

    /// Appends a card to a hand.
    pub fn add_card_to_hand(&self, hand_id: &str, card: Card) -> Result<Room, StateError> {
        self.with_hand(hand_id, |hand| Ok(hand.add(card)))
    }

    /// Flips the card at `idx` in a hand, toggling or setting its face.
    pub fn flip_hand_card(
        &self,
        hand_id: &str,
        idx: usize,
        face_up: Option<bool>,
    ) -> Result<Room, StateError> {
        self.with_hand(hand_id, |hand| {
            let len = hand.cards.len();
            if idx >= len {
                return Err(StateError::OutOfRange { index: idx, len });
            }
            let flipped = hand.cards[idx].flip(face_up);
            Ok(Hand {
                cards: hand.cards.update(idx, flipped),
                ..hand.clone()
            })
        })
    }

    // -----------------------------------------------------------------
    // Inquiries (read-only, never fail)
    // -----------------------------------------------------------------

    /// Looks at a deck card by position from the named end. `None` for a
    /// missing deck or an out-of-range index.
    pub fn deck_peek(&self, deck_id: &str, idx: usize, from_bottom: bool) -> Option<Card> {
        self.decks.get(deck_id)?.peek(idx, from_bottom)
    }

    /// Looks at a hand card by index. `None` for a missing hand or an
    /// out-of-range index.
    pub fn hand_peek(&self, hand_id: &str, n: usize) -> Option<Card> {
        self.hands.get(hand_id)?.peek(n)
    }

    // -----------------------------------------------------------------
    // Player set
    // -----------------------------------------------------------------

    /// Adds a player id to the room's player set.
    pub fn add_player(&self, player_id: &str) -> Room {
        Room {
            players: self.players.update(player_id.to_string()),
            ..self.clone()
        }
    }

    /// Removes a player id from the set. Decks and hands are untouched.
    pub fn remove_player(&self, player_id: &str) -> Room {
        Room {
            players: self.players.without(player_id),
            ..self.clone()
        }
    }
}
