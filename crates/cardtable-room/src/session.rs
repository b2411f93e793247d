//! Room session actor: an isolated Tokio task owning one room's state.
//!
//! The actor's mailbox is the room's single-writer lane. Each command —
//! join, leave, submit — runs to completion before the next is taken, so
//! "read current snapshot → compute next → install → broadcast" is atomic
//! with respect to every other submitter of the same room. Rooms in
//! different sessions run fully in parallel.
//!
//! Delivery is decoupled from the lane: each player has an unbounded
//! outbound queue drained by their connection's writer task, so a slow or
//! dead connection never stalls other players' turns.

use std::collections::HashMap;

use cardtable_protocol::{ActionEnvelope, PlayerId, RoomCode, ServerMessage};
use cardtable_state::{Hand, Room};
use tokio::sync::{mpsc, oneshot};

use crate::interpret::{Applied, apply_envelope};
use crate::SessionError;

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a session actor through its mailbox.
pub(crate) enum SessionCommand {
    /// Register a player connection and push them the current snapshot.
    Join {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },

    /// Remove a player connection. Decks and hands are untouched.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },

    /// Apply one action from a player (fire-and-forget; failures flow back
    /// through the submitter's outbound queue).
    Submit {
        player_id: PlayerId,
        envelope: ActionEnvelope,
    },

    /// Request session metadata.
    Info { reply: oneshot::Sender<SessionInfo> },
}

/// A snapshot of session metadata (not the room state itself).
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub room_code: RoomCode,
    pub player_count: usize,
    /// Install counter of the current snapshot.
    pub version: u64,
}

/// Handle to a running session actor. Cheap to clone; the registry holds
/// one per room.
#[derive(Clone)]
pub struct SessionHandle {
    room_code: RoomCode,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// The room code this session serves.
    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    /// Registers a player and their outbound queue with the room.
    pub async fn join(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Join {
                player_id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))?
    }

    /// Removes a player from the room.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))?
    }

    /// Submits an action envelope on behalf of a player.
    ///
    /// The mailbox is bounded, so a room flooded with submissions applies
    /// backpressure here instead of queuing without limit.
    pub async fn submit(
        &self,
        player_id: PlayerId,
        envelope: ActionEnvelope,
    ) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Submit {
                player_id,
                envelope,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))
    }

    /// Requests the current session metadata.
    pub async fn info(&self) -> Result<SessionInfo, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.room_code.clone()))
    }
}

/// The internal session actor. Runs inside a Tokio task.
struct SessionActor {
    room_code: RoomCode,
    /// The single mutable cell: the current snapshot. Swapped, never
    /// mutated in place.
    current: Room,
    /// Install counter; bumped once per installed snapshot.
    version: u64,
    /// Per-player outbound queues.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!(room_code = %self.room_code, "room session started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Join {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, sender);
                    let _ = reply.send(result);
                }
                SessionCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id);
                    let _ = reply.send(result);
                }
                SessionCommand::Submit {
                    player_id,
                    envelope,
                } => {
                    self.handle_submit(player_id, envelope);
                }
                SessionCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(room_code = %self.room_code, "room session stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        if self.senders.contains_key(&player_id) {
            return Err(SessionError::AlreadyJoined(
                player_id,
                self.room_code.clone(),
            ));
        }

        let mut room = self.current.add_player(player_id.as_str());
        // First join for this id also gets them an empty hand. A rejoin
        // keeps whatever cards the hand already holds.
        if !room.hands.contains_key(player_id.as_str()) {
            room = room.add_hand(Hand::new(player_id.as_str()));
        }
        self.install(room);

        self.senders.insert(player_id.clone(), sender);
        tracing::info!(
            room_code = %self.room_code,
            %player_id,
            players = self.senders.len(),
            "player joined"
        );

        // Only the requester gets a snapshot at join time; other players
        // pick up the new player set with the next broadcast.
        self.send_to(
            &player_id,
            ServerMessage::Snapshot {
                version: self.version,
                room: self.current.clone(),
            },
        );

        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<(), SessionError> {
        if self.senders.remove(&player_id).is_none() {
            return Err(SessionError::NotJoined(player_id, self.room_code.clone()));
        }

        let room = self.current.remove_player(player_id.as_str());
        self.install(room);

        tracing::info!(
            room_code = %self.room_code,
            %player_id,
            players = self.senders.len(),
            "player left"
        );

        Ok(())
    }

    fn handle_submit(&mut self, player_id: PlayerId, envelope: ActionEnvelope) {
        if !self.senders.contains_key(&player_id) {
            tracing::warn!(
                room_code = %self.room_code,
                %player_id,
                "action from non-member, ignoring"
            );
            return;
        }

        match apply_envelope(&self.current, &envelope) {
            Ok(Applied::Installed(room)) => {
                self.install(room);
                self.broadcast_snapshot();
            }
            Ok(Applied::Unchanged) => {
                // Defined no-op: everyone still gets the (unchanged)
                // authoritative snapshot for this turn.
                self.broadcast_snapshot();
            }
            Ok(Applied::Peeked(card)) => {
                self.send_to(&player_id, ServerMessage::PeekResult { card });
            }
            Err(e) => {
                tracing::debug!(
                    room_code = %self.room_code,
                    %player_id,
                    action = %envelope.action,
                    error = %e,
                    "action rejected"
                );
                self.send_to(
                    &player_id,
                    ServerMessage::ActionFailed {
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                );
            }
        }
    }

    /// Swaps the current snapshot. This is the only mutation in the room's
    /// lifecycle; past snapshots stay valid for anyone still holding one.
    fn install(&mut self, room: Room) {
        self.current = room;
        self.version += 1;
    }

    fn broadcast_snapshot(&self) {
        let msg = ServerMessage::Snapshot {
            version: self.version,
            room: self.current.clone(),
        };
        for player_id in self.senders.keys() {
            self.send_to(player_id, msg.clone());
        }
    }

    /// Sends to a single player. Silently drops if the receiver is gone —
    /// a dead connection must never block the lane.
    fn send_to(&self, player_id: &PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(player_id) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            room_code: self.room_code.clone(),
            player_count: self.senders.len(),
            version: self.version,
        }
    }
}

/// Spawns a new session actor task and returns a handle to it.
///
/// `channel_size` bounds the command mailbox — when it fills up, submitters
/// wait instead of queuing without limit.
pub(crate) fn spawn_session(room_code: RoomCode, channel_size: usize) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = SessionActor {
        room_code: room_code.clone(),
        current: Room::new(),
        version: 0,
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        room_code,
        sender: tx,
    }
}
