//! Wire protocol for Cardtable.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`JoinRequest`], [`ActionEnvelope`], [`ServerMessage`],
//!   [`PlayerId`], [`RoomCode`]) — the structures that travel on the wire.
//! - **Actions** ([`Action`]) — the closed set of game operations a client
//!   may submit, with one typed argument record per kind.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are converted
//!   to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong at this layer.
//!
//! The protocol layer sits between transport (raw bytes) and the room layer
//! (sessions and state). It knows nothing about connections or rooms — only
//! how messages are shaped.

mod action;
mod codec;
mod error;
mod types;

pub use action::Action;
pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{ActionEnvelope, FailureKind, JoinRequest, PlayerId, RoomCode, ServerMessage};
