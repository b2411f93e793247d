//! Room registry: the process-wide room-code → session table.

use std::collections::HashMap;

use cardtable_protocol::RoomCode;
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::SessionHandle;
use crate::session::spawn_session;

/// Length of generated room codes.
pub const ROOM_CODE_LEN: usize = 8;

/// Default command mailbox size for session actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks every live room session, creating them lazily on first reference.
///
/// Rooms are never torn down — they live until process exit. Callers guard
/// concurrent access (the insert-if-absent step) with one coarse lock around
/// the registry; everything after `get_or_create` goes through the session
/// handle and needs no registry access.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, SessionHandle>,
    channel_size: usize,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }

    /// Returns the session for `code`, spawning it if this is the first
    /// reference.
    pub fn get_or_create(&mut self, code: &RoomCode) -> SessionHandle {
        if let Some(handle) = self.rooms.get(code) {
            return handle.clone();
        }
        let handle = spawn_session(code.clone(), self.channel_size);
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(room_code = %code, rooms = self.rooms.len(), "room created");
        handle
    }

    /// Returns `true` if a session exists for `code`.
    pub fn exists(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// All live room codes.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    /// Mints a fresh alphanumeric room code not currently in use.
    pub fn allocate_code(&self) -> RoomCode {
        loop {
            let code: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(ROOM_CODE_LEN)
                .map(char::from)
                .collect();
            let code = RoomCode(code);
            if !self.exists(&code) {
                return code;
            }
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
