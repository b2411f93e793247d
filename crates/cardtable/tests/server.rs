//! End-to-end tests: a real server, real WebSocket clients, and the full
//! join → act → broadcast flow.

use std::time::Duration;

use cardtable::prelude::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns its address.
async fn start_server() -> String {
    let server = CardtableServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send_json(ws: &mut ClientWs, value: Value) {
    let bytes = serde_json::to_vec(&value).expect("encode");
    ws.send(Message::Binary(bytes.into())).await.expect("send");
}

/// Receives the next data frame as JSON, or panics after one second.
async fn recv_json(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(1), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("recv error");
        match msg {
            Message::Binary(_) | Message::Text(_) => {
                return serde_json::from_slice(&msg.into_data()).expect("decode");
            }
            _ => continue,
        }
    }
}

/// Returns `true` if no frame arrives within 50 ms.
async fn silent(ws: &mut ClientWs) -> bool {
    tokio::time::timeout(Duration::from_millis(50), ws.next())
        .await
        .is_err()
}

/// Connects and joins, returning the socket and the join snapshot.
async fn join(addr: &str, room: &str, player: &str) -> (ClientWs, Value) {
    let mut ws = connect(addr).await;
    send_json(&mut ws, json!({"room": room, "player": player})).await;
    let snapshot = recv_json(&mut ws).await;
    assert_eq!(snapshot["type"], "snapshot");
    (ws, snapshot)
}

// =========================================================================
// Join flow
// =========================================================================

#[tokio::test]
async fn test_join_pushes_the_current_snapshot() {
    let addr = start_server().await;
    let (_ws, snapshot) = join(&addr, "mcI5j0Kw", "Ma").await;

    assert_eq!(snapshot["room"]["players"], json!(["Ma"]));
    assert!(snapshot["version"].as_u64().unwrap() >= 1);
    // Joining created the player's empty hand.
    assert_eq!(snapshot["room"]["hands"]["Ma"]["hand_id"], "Ma");
}

#[tokio::test]
async fn test_join_with_garbage_first_frame_reports_error() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send_json(&mut ws, json!({"name": "hello"})).await;

    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
}

#[tokio::test]
async fn test_players_accumulate_across_connections() {
    let addr = start_server().await;
    let (_ws1, snap1) = join(&addr, "mcI5j0Kw", "Evan").await;
    let (_ws2, snap2) = join(&addr, "mcI5j0Kw", "Ben").await;

    assert_eq!(snap1["room"]["players"], json!(["Evan"]));
    assert_eq!(snap2["room"]["players"], json!(["Ben", "Evan"]));
}

// =========================================================================
// Action flow (wire shapes pinned by the original clients)
// =========================================================================

#[tokio::test]
async fn test_initialize_deck_wire_shape() {
    let addr = start_server().await;
    let (mut ws, _) = join(&addr, "mcI5j0Kw", "Ma").await;

    send_json(
        &mut ws,
        json!({"action": "initialize_deck", "args": {"pos": [2, 2]}}),
    )
    .await;

    let snapshot = recv_json(&mut ws).await;
    assert_eq!(snapshot["type"], "snapshot");

    let deck = &snapshot["room"]["decks"]["standard_52_0"];
    assert_eq!(deck["id"], "standard_52_0");
    assert_eq!(deck["position"], json!([2, 2]));
    let cards = deck["cards"].as_array().expect("cards array");
    assert_eq!(cards.len(), 52);

    let fronts: Vec<&str> = cards
        .iter()
        .map(|c| c["card_front"].as_str().unwrap())
        .collect();
    for front in ["H2", "DQ", "SK", "CA"] {
        assert!(fronts.contains(&front), "missing {front}");
    }
}

#[tokio::test]
async fn test_actions_broadcast_to_every_player() {
    let addr = start_server().await;
    let (mut ws_a, _) = join(&addr, "shared", "ana").await;
    let (mut ws_b, _) = join(&addr, "shared", "ben").await;

    send_json(
        &mut ws_a,
        json!({"action": "initialize_deck", "args": {"pos": [0, 0]}}),
    )
    .await;

    let snap_a = recv_json(&mut ws_a).await;
    let snap_b = recv_json(&mut ws_b).await;
    assert_eq!(snap_a, snap_b, "all players see the same snapshot");
    assert_eq!(
        snap_a["room"]["decks"]["standard_52_0"]["cards"]
            .as_array()
            .unwrap()
            .len(),
        52
    );
}

#[tokio::test]
async fn test_draw_card_moves_cards_between_tables() {
    let addr = start_server().await;
    let (mut ws, _) = join(&addr, "solo", "Ma").await;

    send_json(
        &mut ws,
        json!({"action": "initialize_deck", "args": {"pos": [0, 0]}}),
    )
    .await;
    let _ = recv_json(&mut ws).await;

    send_json(
        &mut ws,
        json!({"action": "draw_card",
               "args": {"hand_id": "Ma", "deck_id": "standard_52_0", "n": 3}}),
    )
    .await;

    let snapshot = recv_json(&mut ws).await;
    assert_eq!(
        snapshot["room"]["decks"]["standard_52_0"]["cards"]
            .as_array()
            .unwrap()
            .len(),
        49
    );
    let hand = snapshot["room"]["hands"]["Ma"]["cards"].as_array().unwrap();
    assert_eq!(hand.len(), 3);
    // First card drawn is the old top of the deck.
    assert_eq!(hand[0]["card_front"], "CA");
}

#[tokio::test]
async fn test_failed_action_is_reported_to_submitter_only() {
    let addr = start_server().await;
    let (mut ws_a, _) = join(&addr, "shared", "ana").await;
    let (mut ws_b, _) = join(&addr, "shared", "ben").await;

    send_json(&mut ws_a, json!({"action": "bogus", "args": {}})).await;

    let reply = recv_json(&mut ws_a).await;
    assert_eq!(reply["type"], "action_failed");
    assert_eq!(reply["kind"], "invalid_action");

    assert!(silent(&mut ws_b).await, "other players receive nothing");
}

#[tokio::test]
async fn test_undecodable_frame_reports_without_killing_connection() {
    let addr = start_server().await;
    let (mut ws, _) = join(&addr, "solo", "Ma").await;

    ws.send(Message::Binary(b"not json".to_vec().into()))
        .await
        .unwrap();
    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["type"], "error");

    // The connection still works.
    send_json(
        &mut ws,
        json!({"action": "initialize_deck", "args": {"pos": [1, 1]}}),
    )
    .await;
    let snapshot = recv_json(&mut ws).await;
    assert_eq!(snapshot["type"], "snapshot");
}

#[tokio::test]
async fn test_disconnect_removes_player_from_the_room() {
    let addr = start_server().await;
    let (ws_a, _) = join(&addr, "shared", "ana").await;
    let (mut ws_b, _) = join(&addr, "shared", "ben").await;

    drop(ws_a);
    // Leave is asynchronous; give the handler a moment.
    tokio::time::sleep(Duration::from_millis(50)).await;

    send_json(
        &mut ws_b,
        json!({"action": "initialize_deck", "args": {"pos": [0, 0]}}),
    )
    .await;
    let snapshot = recv_json(&mut ws_b).await;
    assert_eq!(snapshot["room"]["players"], json!(["ben"]));
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let addr = start_server().await;
    let (mut ws_a, _) = join(&addr, "room-a", "ana").await;
    let (mut ws_b, _) = join(&addr, "room-b", "ben").await;

    send_json(
        &mut ws_a,
        json!({"action": "initialize_deck", "args": {"pos": [0, 0]}}),
    )
    .await;
    let _ = recv_json(&mut ws_a).await;

    assert!(silent(&mut ws_b).await, "room b must not hear room a");
}
