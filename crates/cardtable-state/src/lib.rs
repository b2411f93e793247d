//! Immutable value model and transition engine for Cardtable rooms.
//!
//! Everything in this crate is a persistent value: a [`Room`] maps deck and
//! hand ids to [`Deck`] and [`Hand`] values, and every operation returns a
//! new snapshot instead of mutating in place. Untouched entries are shared
//! structurally between snapshots (via `im` collections), so holding on to a
//! past snapshot is always safe and cloning the current one is O(1).
//!
//! # Key types
//!
//! - [`Card`] — front/back faces and orientation
//! - [`Deck`] — a positioned, ordered pile of cards (index 0 = bottom)
//! - [`Hand`] — a player-scoped ordered pile of cards
//! - [`Room`] — the authoritative per-room state and its transitions
//! - [`StateError`] — the `NotFound` / `OutOfRange` failure taxonomy

mod card;
mod deck;
mod error;
mod hand;
mod room;

pub use card::Card;
pub use deck::Deck;
pub use error::StateError;
pub use hand::Hand;
pub use room::Room;
