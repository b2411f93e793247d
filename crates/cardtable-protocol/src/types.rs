//! Core wire types: identities, envelopes, and server messages.

use std::fmt;

use cardtable_state::{Card, Room};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity within a room.
///
/// Newtype over the client-chosen name string, so a player id can't be
/// confused with a room code or a deck id in a signature. Serializes as the
/// bare string (`#[serde(transparent)]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The code naming one game room (e.g. `"mcI5j0Kw"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// The first frame a client sends: which room to enter and who they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub room: RoomCode,
    pub player: PlayerId,
}

/// An inbound action exactly as it appears on the wire:
/// `{"action": <kind>, "args": {...}}`.
///
/// The `args` value stays untyped here. Converting the envelope into a typed
/// [`Action`](crate::Action) is the trust boundary — it happens inside the
/// room's serialized lane, and failures become `InvalidAction` reports
/// instead of crashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    pub action: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Which family of failure a rejected action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A referenced deck or hand id is absent.
    NotFound,
    /// An index or count is outside the valid bounds.
    OutOfRange,
    /// Unknown action kind, or malformed/missing arguments.
    InvalidAction,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::OutOfRange => write!(f, "out_of_range"),
            Self::InvalidAction => write!(f, "invalid_action"),
        }
    }
}

/// Messages the server pushes to connected players.
///
/// Internally tagged (`"type"` field) so clients can switch on one string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The authoritative room state after an installed action. `version` is
    /// the room's install counter: strictly increasing, identical order for
    /// every player in the room.
    Snapshot { version: u64, room: Room },

    /// The submitted action was rejected; the room is unchanged. Sent to the
    /// submitter only.
    ActionFailed { kind: FailureKind, message: String },

    /// Result of a read-only peek. Sent to the submitter only.
    PeekResult { card: Option<Card> },

    /// A connection-level problem (bad join request, undecodable frame).
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
