//! The action interpreter: untrusted wire input → pure room transition.
//!
//! This is the single trust boundary between client-submitted data and the
//! state engine. Every required argument is validated (by the typed
//! [`Action`] parse) before any room operation runs, and every failure comes
//! back as a structured [`ApplyError`] — the room is never left partially
//! updated and the session never crashes on bad input.

use cardtable_protocol::{Action, ActionEnvelope, ProtocolError};
use cardtable_state::{Card, Room};

use crate::ApplyError;

/// The outcome of interpreting one action against a snapshot.
#[derive(Debug, Clone)]
pub enum Applied {
    /// A new snapshot to install and broadcast.
    Installed(Room),

    /// A defined no-op (unknown deck type, overdrawn draw, removal miss):
    /// nothing to install, the current snapshot is re-broadcast unchanged.
    Unchanged,

    /// A read-only inquiry result for the submitter; nothing installed or
    /// broadcast.
    Peeked(Option<Card>),
}

/// Parses a raw envelope and applies it to the snapshot.
///
/// # Errors
/// `InvalidAction` for an unknown kind or malformed arguments; otherwise
/// whatever typed failure the room transition reports.
pub fn apply_envelope(room: &Room, envelope: &ActionEnvelope) -> Result<Applied, ApplyError> {
    let action = Action::parse(envelope).map_err(|e| match e {
        ProtocolError::InvalidAction(msg) => ApplyError::InvalidAction(msg),
        other => ApplyError::InvalidAction(other.to_string()),
    })?;
    apply(room, action)
}

/// Applies a typed action to the snapshot.
pub fn apply(room: &Room, action: Action) -> Result<Applied, ApplyError> {
    let applied = match action {
        Action::Shuffle { deck_id } => Applied::Installed(room.shuffle(&deck_id)?),
        Action::RemoveTop { deck_id, n } => Applied::Installed(room.remove_top(&deck_id, n)?),
        Action::AddTop { deck_id, card } => Applied::Installed(room.add_top(&deck_id, card)?),
        Action::FlipDeckCard {
            deck_id,
            idx,
            face_up,
        } => Applied::Installed(room.flip_deck_card(&deck_id, idx, face_up)?),
        Action::FlipDeck { deck_id } => Applied::Installed(room.flip_deck(&deck_id)?),
        Action::MoveDeck { deck_id, pos } => {
            Applied::Installed(room.move_deck(&deck_id, pos.0, pos.1)?)
        }
        Action::InitializeDeck { pos, deck_type } => {
            let (next, id) = room.initialize_deck(pos, &deck_type);
            if id.is_empty() {
                Applied::Unchanged
            } else {
                Applied::Installed(next)
            }
        }
        Action::SplitDeck { deck_id, n, pos } => {
            Applied::Installed(room.split_deck(&deck_id, n, pos)?.0)
        }
        Action::DrawCard {
            hand_id,
            deck_id,
            n,
            from_bottom,
        } => {
            let next = room.draw_card(&hand_id, &deck_id, n, from_bottom)?;
            // Overdrawing is a defined no-op; the op returns the input room.
            if next == *room {
                Applied::Unchanged
            } else {
                Applied::Installed(next)
            }
        }
        Action::RemoveCardFromDeck { deck_id, idx } => {
            let (next, removed) = room.remove_card_from_deck(&deck_id, idx);
            if removed.is_some() {
                Applied::Installed(next)
            } else {
                Applied::Unchanged
            }
        }
        Action::AddDeck { deck } => Applied::Installed(room.add_deck(deck)),
        Action::RemoveNth { hand_id, n } => Applied::Installed(room.remove_nth(&hand_id, n)?),
        Action::AddCardToHand { hand_id, card } => {
            Applied::Installed(room.add_card_to_hand(&hand_id, card)?)
        }
        Action::FlipHandCard {
            hand_id,
            idx,
            face_up,
        } => Applied::Installed(room.flip_hand_card(&hand_id, idx, face_up)?),
        Action::DeckPeek {
            deck_id,
            idx,
            from_bottom,
        } => Applied::Peeked(room.deck_peek(&deck_id, idx, from_bottom)),
        Action::HandPeek { hand_id, idx } => Applied::Peeked(room.hand_peek(&hand_id, idx)),
    };
    Ok(applied)
}
