//! The closed set of game actions a client may submit.

use cardtable_state::{Card, Deck};
use serde::{Deserialize, Serialize};

use crate::{ActionEnvelope, ProtocolError};

fn one() -> usize {
    1
}

fn standard52() -> String {
    "standard52".to_string()
}

/// A tagged game action with its typed argument record.
///
/// The serde representation is exactly the wire shape,
/// `{"action": <kind>, "args": {...}}`, so the enum doubles as the schema:
/// unknown kinds and malformed or missing arguments fail to parse, and
/// [`Action::parse`] reports them as `InvalidAction` without touching any
/// room state. Optional arguments carry the same defaults the original wire
/// contract had (`n` = 1, `idx` = 0, `deck_type` = `"standard52"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "args", rename_all = "snake_case")]
pub enum Action {
    Shuffle {
        deck_id: String,
    },
    RemoveTop {
        deck_id: String,
        #[serde(default = "one")]
        n: usize,
    },
    AddTop {
        deck_id: String,
        card: Card,
    },
    FlipDeckCard {
        deck_id: String,
        #[serde(default)]
        idx: usize,
        #[serde(default)]
        face_up: Option<bool>,
    },
    FlipDeck {
        deck_id: String,
    },
    MoveDeck {
        deck_id: String,
        pos: (i32, i32),
    },
    InitializeDeck {
        #[serde(default)]
        pos: (i32, i32),
        #[serde(default = "standard52")]
        deck_type: String,
    },
    SplitDeck {
        deck_id: String,
        n: usize,
        pos: (i32, i32),
    },
    DrawCard {
        hand_id: String,
        deck_id: String,
        #[serde(default = "one")]
        n: usize,
        #[serde(default)]
        from_bottom: bool,
    },
    RemoveCardFromDeck {
        deck_id: String,
        idx: usize,
    },
    AddDeck {
        deck: Deck,
    },
    RemoveNth {
        hand_id: String,
        n: usize,
    },
    AddCardToHand {
        hand_id: String,
        card: Card,
    },
    FlipHandCard {
        hand_id: String,
        idx: usize,
        #[serde(default)]
        face_up: Option<bool>,
    },
    DeckPeek {
        deck_id: String,
        #[serde(default)]
        idx: usize,
        #[serde(default)]
        from_bottom: bool,
    },
    HandPeek {
        hand_id: String,
        idx: usize,
    },
}

impl Action {
    /// Converts a raw wire envelope into a typed action.
    ///
    /// # Errors
    /// `ProtocolError::InvalidAction` for an unknown kind or a malformed
    /// argument bundle. The error message names the offending kind so it can
    /// be reported back to the submitter.
    pub fn parse(envelope: &ActionEnvelope) -> Result<Action, ProtocolError> {
        let value = serde_json::json!({
            "action": envelope.action,
            "args": envelope.args,
        });
        serde_json::from_value(value).map_err(|e| {
            ProtocolError::InvalidAction(format!("`{}`: {e}", envelope.action))
        })
    }
}
