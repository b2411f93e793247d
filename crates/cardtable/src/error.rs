//! Unified error type for the Cardtable server.

use cardtable_protocol::ProtocolError;
use cardtable_room::SessionError;
use cardtable_transport::TransportError;

/// Top-level error that wraps all crate-specific errors. The `#[from]`
/// attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CardtableError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid action).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (room unavailable, join bookkeeping).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The connection never produced a valid join request.
    #[error("join failed: {0}")]
    Join(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let top: CardtableError = err.into();
        assert!(matches!(top, CardtableError::Transport(_)));
        assert!(top.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidAction("`bogus`".into());
        let top: CardtableError = err.into();
        assert!(matches!(top, CardtableError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Unavailable(cardtable_protocol::RoomCode::new("r"));
        let top: CardtableError = err.into();
        assert!(matches!(top, CardtableError::Session(_)));
    }
}
