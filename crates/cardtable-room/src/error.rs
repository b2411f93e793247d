//! Error types for the room layer.

use cardtable_protocol::{FailureKind, PlayerId, RoomCode};
use cardtable_state::StateError;

/// Errors that can occur during session operations (join/leave plumbing).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session's command channel is closed or the actor is gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),

    /// The player id is already connected to this room.
    #[error("player {0} already joined room {1}")]
    AlreadyJoined(PlayerId, RoomCode),

    /// The player id is not connected to this room.
    #[error("player {0} has not joined room {1}")]
    NotJoined(PlayerId, RoomCode),
}

/// Why a submitted action was rejected. The room state is untouched in
/// every case.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// Unknown action kind or malformed/missing arguments.
    #[error("invalid action {0}")]
    InvalidAction(String),

    /// A state transition failed with a typed error.
    #[error(transparent)]
    State(#[from] StateError),
}

impl ApplyError {
    /// The wire-level failure family, for the `action_failed` report.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidAction(_) => FailureKind::InvalidAction,
            Self::State(StateError::OutOfRange { .. }) => FailureKind::OutOfRange,
            Self::State(_) => FailureKind::NotFound,
        }
    }
}
