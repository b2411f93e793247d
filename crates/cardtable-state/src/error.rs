//! Error types for room state transitions.

/// Errors that can occur while applying a transition to a room.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The referenced deck id is absent from the room's deck table.
    #[error("deck `{0}` not found")]
    DeckNotFound(String),

    /// The referenced hand id is absent from the room's hand table.
    #[error("hand `{0}` not found")]
    HandNotFound(String),

    /// An index or count is outside the valid bounds for a card pile.
    /// Explicit counts are rejected rather than clamped — callers that want
    /// "as many as available" must check first.
    #[error("index or count {index} out of range for {len} cards")]
    OutOfRange { index: usize, len: usize },
}
