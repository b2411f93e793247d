//! Room sessions for Cardtable.
//!
//! Each room runs as an isolated Tokio task (actor model) owning the current
//! [`Room`](cardtable_state::Room) snapshot. The actor's mailbox is the
//! room's single-writer lane: joins, leaves, and action submissions are
//! applied strictly one at a time, and every installed snapshot is fanned
//! out to per-player outbound queues.
//!
//! # Key types
//!
//! - [`SessionHandle`] — send commands to a running room session
//! - [`RoomRegistry`] — process-wide room-code → session table
//! - [`Applied`] / [`apply_envelope`] — the action interpreter, the single
//!   trust boundary between client input and the pure state engine
//! - [`SessionError`] / [`ApplyError`] — failure taxonomy at this layer

mod error;
mod interpret;
mod registry;
mod session;

pub use error::{ApplyError, SessionError};
pub use interpret::{Applied, apply, apply_envelope};
pub use registry::RoomRegistry;
pub use session::{PlayerSender, SessionHandle, SessionInfo};
