//! A single playing card.

use serde::{Deserialize, Serialize};

/// A playing card with a front face, a back face, and an orientation.
///
/// The wire names (`card_front`, `card_back`, `face_up`) are part of the
/// snapshot format clients parse — keep the serde renames intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// The face shown when the card is face up (e.g. `"H2"`, `"SK"`).
    #[serde(rename = "card_front", default)]
    pub front: String,

    /// The face shown when the card is face down.
    #[serde(rename = "card_back", default)]
    pub back: String,

    /// Whether the card currently shows its front.
    #[serde(default)]
    pub face_up: bool,
}

impl Card {
    /// Creates a face-down card.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            face_up: false,
        }
    }

    /// Returns a card with `face_up` toggled, or set to `new_face` if given.
    pub fn flip(&self, new_face: Option<bool>) -> Card {
        Card {
            face_up: new_face.unwrap_or(!self.face_up),
            ..self.clone()
        }
    }
}
