//! Per-connection handler: message dispatch and disconnect cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Spawn a writer task that drains the connection's outbox — the
//!      channel rooms broadcast into — onto the socket.
//!   2. Loop: receive frames → decode → dispatch to the registry or the
//!      connection's room.
//!   3. On close: remove the room from the registry and evict the peer.
//!
//! Rejections of any kind go only to this connection; nothing here can
//! take down the process or another room.

use std::sync::Arc;

use gridlock_protocol::{ClientMessage, Codec, JsonCodec, Mark, ServerMessage};
use gridlock_room::{ParticipantSender, RoomCode, RoomError, RoomHandle};
use gridlock_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GridlockError;
use crate::server::ServerState;

/// Routing metadata while seated in a room.
///
/// The handle is the room actor's mailbox address; the registry stays
/// authoritative for which rooms are alive, so a seat whose room has
/// halted is just stale metadata waiting to be cleared.
struct Seat {
    handle: RoomHandle,
    mark: Mark,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), GridlockError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let conn = Arc::new(conn);
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
    spawn_writer(Arc::clone(&conn), state.codec, outbox_rx);

    let mut seat: Option<Seat> = None;
    let result = loop {
        match conn.recv().await {
            Ok(Some(frame)) => {
                dispatch(&state, &outbox_tx, &mut seat, &frame).await;
            }
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed");
                break Ok(());
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break Err(GridlockError::Transport(e));
            }
        }
    };

    // Disconnect cleanup: deregister the room first so no new joiner can
    // land in it, then evict the remaining participant. A match is never
    // left waiting for a peer that will not return.
    if let Some(seat) = seat.take() {
        state.registry.lock().await.remove(&seat.handle);
        seat.handle.leave(seat.mark).await;
    }

    result
}

/// Spawns the task that serializes this connection's outbound traffic.
///
/// Everything the connection ever sends — acks, broadcasts, rejections —
/// funnels through one channel, so clients observe a single consistent
/// ordering. When the peer is gone the writer just drains and exits;
/// senders never learn or care.
fn spawn_writer(
    conn: Arc<WebSocketConnection>,
    codec: JsonCodec,
    mut outbox: mpsc::UnboundedReceiver<ServerMessage>,
) {
    tokio::spawn(async move {
        while let Some(msg) = outbox.recv().await {
            let bytes = match codec.encode(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "outbound encode failed");
                    continue;
                }
            };
            if conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });
}

/// Decodes one inbound frame and routes it.
async fn dispatch(
    state: &ServerState,
    outbox: &ParticipantSender,
    seat: &mut Option<Seat>,
    frame: &[u8],
) {
    // Two-stage decode separates "not even JSON" from "JSON that isn't a
    // known message" (unknown discriminator, missing field, wrong type).
    // Both are sender-only rejections; the connection stays open.
    let value: serde_json::Value = match state.codec.decode(frame) {
        Ok(value) => value,
        Err(_) => {
            send_error(outbox, "Invalid message.");
            return;
        }
    };
    let msg: ClientMessage = match serde_json::from_value(value) {
        Ok(msg) => msg,
        Err(_) => {
            send_error(outbox, "Invalid payload.");
            return;
        }
    };

    match msg {
        ClientMessage::CreateRoom => {
            create_room(state, outbox, seat).await;
        }
        ClientMessage::JoinRoom { room_code } => {
            join_room(state, outbox, seat, &room_code).await;
        }
        ClientMessage::Move { index } => {
            play(outbox, seat, index).await;
        }
        ClientMessage::Reset => {
            reset(outbox, seat).await;
        }
    }
}

async fn create_room(
    state: &ServerState,
    outbox: &ParticipantSender,
    seat: &mut Option<Seat>,
) {
    if live_seat(seat).is_some() {
        send_error(outbox, &RoomError::AlreadyInRoom.to_string());
        return;
    }

    let handle = state.registry.lock().await.create_room(outbox.clone());
    // The room_created ack was queued by the room itself, ahead of any
    // broadcast a fast joiner could trigger.
    *seat = Some(Seat {
        handle,
        mark: Mark::X,
    });
}

async fn join_room(
    state: &ServerState,
    outbox: &ParticipantSender,
    seat: &mut Option<Seat>,
    input: &str,
) {
    if live_seat(seat).is_some() {
        send_error(outbox, &RoomError::AlreadyInRoom.to_string());
        return;
    }

    let code = match RoomCode::parse(input) {
        Ok(code) => code,
        Err(e) => {
            send_error(outbox, &e.to_string());
            return;
        }
    };

    // Clone the handle out of the registry lock, then negotiate with the
    // room without holding it.
    let Some(handle) = state.registry.lock().await.lookup(&code) else {
        send_error(outbox, &RoomError::NotFound.to_string());
        return;
    };

    match handle.join(outbox.clone()).await {
        Ok(mark) => {
            // room_joined and start are already queued, in that order.
            *seat = Some(Seat { handle, mark });
        }
        Err(e) => send_error(outbox, &e.to_string()),
    }
}

async fn play(
    outbox: &ParticipantSender,
    seat: &mut Option<Seat>,
    index: i64,
) {
    let Some((handle, mark)) = current_room(seat) else {
        send_error(outbox, &RoomError::NotInRoom.to_string());
        return;
    };

    match handle.play(mark, index).await {
        Ok(Ok(())) => {} // accepted; the room broadcast the new state
        Ok(Err(rejection)) => send_error(outbox, &rejection.to_string()),
        Err(_) => {
            // Lost a race with the room's teardown.
            *seat = None;
            send_error(outbox, &RoomError::NotInRoom.to_string());
        }
    }
}

async fn reset(outbox: &ParticipantSender, seat: &mut Option<Seat>) {
    let Some((handle, _)) = current_room(seat) else {
        send_error(outbox, &RoomError::NotInRoom.to_string());
        return;
    };

    if handle.reset().await.is_err() {
        *seat = None;
        send_error(outbox, &RoomError::NotInRoom.to_string());
    }
}

/// Resolves the live seat, clearing stale metadata first.
///
/// A seat goes stale when the peer disconnected and the room halted: the
/// eviction already reached this client as `opponent_left`, and dropping
/// the metadata here is what frees the connection to create or join again.
fn live_seat(seat: &mut Option<Seat>) -> Option<&Seat> {
    if seat.as_ref().is_some_and(|s| s.handle.is_closed()) {
        *seat = None;
    }
    seat.as_ref()
}

/// Like [`live_seat`], but hands out owned values so callers can clear
/// the seat while awaiting the room.
fn current_room(seat: &mut Option<Seat>) -> Option<(RoomHandle, Mark)> {
    live_seat(seat).map(|s| (s.handle.clone(), s.mark))
}

fn send_error(outbox: &ParticipantSender, message: &str) {
    let _ = outbox.send(ServerMessage::Error {
        message: message.to_string(),
    });
}
