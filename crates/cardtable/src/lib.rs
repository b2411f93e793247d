//! # Cardtable
//!
//! A multiplayer shared-tabletop session server. Clients join a named room
//! over a WebSocket, submit card and deck actions, and receive the updated
//! authoritative room snapshot after every applied action.
//!
//! The layers, leaf to root:
//!
//! ```text
//! cardtable-state     immutable Card/Deck/Hand/Room values + transitions
//! cardtable-protocol  wire types, typed actions, JSON codec
//! cardtable-room      per-room session actors, interpreter, registry
//! cardtable-transport WebSocket transport
//! cardtable           server accept loop + per-connection handler (this crate)
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cardtable::prelude::*;
//!
//! # async fn run() -> Result<(), CardtableError> {
//! let server = CardtableServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::CardtableError;
pub use server::{CardtableServer, CardtableServerBuilder};

/// Commonly used types, re-exported for one-line imports.
pub mod prelude {
    pub use cardtable_protocol::{
        Action, ActionEnvelope, Codec, FailureKind, JoinRequest, JsonCodec, PlayerId, RoomCode,
        ServerMessage,
    };
    pub use cardtable_room::{RoomRegistry, SessionHandle};
    pub use cardtable_state::{Card, Deck, Hand, Room};

    pub use crate::{CardtableError, CardtableServer, CardtableServerBuilder};
}
