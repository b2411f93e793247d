//! Per-connection handler: join, then stream actions.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. First frame must be a `JoinRequest` naming the room and player
//!   2. The registry hands back (or lazily creates) the room session
//!   3. A writer task drains the player's outbound queue to the socket
//!   4. The reader loop decodes action envelopes and submits them
//!   5. Disconnect (clean or not) triggers `leave` promptly

use std::sync::Arc;
use std::time::Duration;

use cardtable_protocol::{ActionEnvelope, Codec, JoinRequest, PlayerId, ServerMessage};
use cardtable_room::SessionHandle;
use cardtable_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::CardtableError;
use crate::server::ServerState;

/// How long a connection may sit idle before its first frame.
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), CardtableError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let conn = Arc::new(conn);

    // --- Step 1: join request ---
    let request = read_join_request(&conn, &state).await?;
    let player_id = request.player.clone();

    // --- Step 2: room session ---
    let handle = {
        let mut rooms = state.rooms.lock().await;
        rooms.get_or_create(&request.room)
    };

    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = handle.join(player_id.clone(), tx.clone()).await {
        let msg = ServerMessage::Error {
            message: e.to_string(),
        };
        if let Ok(bytes) = state.codec.encode(&msg) {
            let _ = conn.send(&bytes).await;
        }
        return Err(CardtableError::Session(e));
    }

    tracing::info!(%conn_id, %player_id, room_code = %request.room, "player connected");

    // --- Step 3: writer task ---
    // Drains the outbound queue (session broadcasts + this handler's own
    // error reports) to the socket. Exits when every sender is gone: the
    // session drops its sender on leave and `tx` is dropped below.
    let writer = tokio::spawn(drain_outbound(rx, Arc::clone(&conn), state.codec));

    // --- Step 4: reader loop ---
    read_actions(&conn, &state, &handle, &player_id, &tx).await;

    // --- Step 5: cleanup ---
    if let Err(e) = handle.leave(player_id.clone()).await {
        tracing::debug!(%player_id, error = %e, "leave failed");
    }
    drop(tx);
    let _ = writer.await;

    tracing::info!(%conn_id, %player_id, "player disconnected");
    Ok(())
}

/// Receives and decodes the join request, bounded by [`JOIN_TIMEOUT`].
async fn read_join_request(
    conn: &WebSocketConnection,
    state: &ServerState,
) -> Result<JoinRequest, CardtableError> {
    let data = match tokio::time::timeout(JOIN_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(CardtableError::Join(
                "connection closed before join".into(),
            ));
        }
        Ok(Err(e)) => return Err(CardtableError::Transport(e)),
        Err(_) => return Err(CardtableError::Join("join request timed out".into())),
    };

    match state.codec.decode::<JoinRequest>(&data) {
        Ok(request) => Ok(request),
        Err(e) => {
            let msg = ServerMessage::Error {
                message: format!("expected a join request: {e}"),
            };
            if let Ok(bytes) = state.codec.encode(&msg) {
                let _ = conn.send(&bytes).await;
            }
            Err(CardtableError::Join(e.to_string()))
        }
    }
}

/// Decodes inbound frames as action envelopes and submits them until the
/// connection ends.
async fn read_actions(
    conn: &WebSocketConnection,
    state: &ServerState,
    handle: &SessionHandle,
    player_id: &PlayerId,
    tx: &mpsc::UnboundedSender<ServerMessage>,
) {
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                return;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return;
            }
        };

        let envelope: ActionEnvelope = match state.codec.decode(&data) {
            Ok(envelope) => envelope,
            Err(e) => {
                // Undecodable frames get an error on this player's own
                // queue; the room never sees them.
                let _ = tx.send(ServerMessage::Error {
                    message: format!("undecodable frame: {e}"),
                });
                continue;
            }
        };

        if handle.submit(player_id.clone(), envelope).await.is_err() {
            tracing::warn!(%player_id, "room session gone, closing connection");
            return;
        }
    }
}

/// Writer task body: encode and send until the queue closes.
async fn drain_outbound(
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    conn: Arc<WebSocketConnection>,
    codec: impl Codec,
) {
    while let Some(msg) = rx.recv().await {
        let bytes = match codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode outbound message");
                continue;
            }
        };
        if conn.send(&bytes).await.is_err() {
            // Peer is gone; stop draining. The reader loop notices the
            // closed socket and triggers leave.
            return;
        }
    }
}
