//! Per-connection handler: outbound pump and message routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler, plus a writer task draining the connection's outbound
//! channel onto the socket. Room operations push into that channel
//! from wherever they run; only the writer task sends on the socket.

use std::sync::Arc;

use croquis_protocol::{decode, encode, ClientMessage, ServerMessage};
use croquis_room::{Client, ClientId, Room};
use croquis_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::CroquisError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), CroquisError> {
    let conn = Arc::new(conn);
    let client_id = ClientId::new(conn.id().into_inner());
    tracing::debug!(
        conn_id = %conn.id(),
        %client_id,
        "handling new connection"
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut client = Client::new(client_id, tx);

    // Writer task: the only path that sends on this socket.
    let writer = {
        let conn = Arc::clone(&conn);
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let text = match encode(&msg) {
                    Ok(text) => text,
                    Err(error) => {
                        tracing::error!(
                            %client_id,
                            %error,
                            "dropping unencodable message"
                        );
                        continue;
                    }
                };
                if conn.send(&text).await.is_err() {
                    break;
                }
            }
        })
    };

    let mut result = Ok(());
    loop {
        let text = match conn.recv().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(%client_id, "connection closed");
                break;
            }
            Err(e) => {
                result = Err(CroquisError::Transport(e));
                break;
            }
        };

        let msg: ClientMessage = match decode(&text) {
            Ok(msg) => msg,
            Err(error) => {
                tracing::warn!(
                    %client_id,
                    %error,
                    "malformed client message dropped"
                );
                continue;
            }
        };

        dispatch(&state, &mut client, msg).await;
    }

    // A dropped socket counts as leaving the room. No room_left is sent
    // since there is nobody left to read it.
    leave_current_room(&state, &mut client).await;
    writer.abort();
    result
}

/// Routes one decoded client message.
async fn dispatch(
    state: &ServerState,
    client: &mut Client,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::JoinRoom {
            room_code,
            nickname,
        } => {
            join_room(state, client, room_code, nickname).await;
        }

        ClientMessage::LeaveRoom => {
            if leave_current_room(state, client).await {
                client.send(ServerMessage::RoomLeft);
            } else {
                tracing::debug!(
                    client = %client.id(),
                    "leave_room without a room dropped"
                );
            }
        }

        ClientMessage::Chat { message } => {
            if let Some(room) = current_room(state, client).await {
                room.chat(client.id(), message).await;
            }
        }

        ClientMessage::Draw(stroke) => {
            if let Some(room) = current_room(state, client).await {
                room.stroke(client.id(), stroke).await;
            }
        }

        ClientMessage::StartGame => {
            if let Some(room) = current_room(state, client).await {
                room.start_round(client.id(), state.words.as_ref()).await;
            }
        }

        ClientMessage::DrawImage { image_data } => {
            if let Some(room) = current_room(state, client).await {
                room.share_image(client.id(), image_data).await;
            }
        }

        ClientMessage::Unknown => {
            tracing::debug!(
                client = %client.id(),
                "unknown message type ignored"
            );
        }
    }
}

/// Puts the client into a room, creating it on first use.
async fn join_room(
    state: &ServerState,
    client: &mut Client,
    room_code: String,
    nickname: String,
) {
    if client.room_code().is_some() {
        tracing::debug!(
            client = %client.id(),
            "join_room while already in a room dropped"
        );
        return;
    }

    // The first join fixes the display name; a rejoin under a new
    // nickname keeps the original.
    let name = client.nickname().unwrap_or(&nickname).to_owned();

    // A room can be retired between lookup and insert. The retired room
    // refuses the join, so look the code up again and land in the
    // replacement.
    loop {
        let room = state.rooms.get_or_create(&room_code).await;
        if room
            .join(client.id(), name.clone(), client.sender())
            .await
            .is_some()
        {
            break;
        }
    }

    client.joined(nickname, room_code);
}

/// Removes the client from its room, if any, retiring the room when it
/// empties. Returns whether the client was in a room.
async fn leave_current_room(
    state: &ServerState,
    client: &mut Client,
) -> bool {
    let Some(code) = client.left() else {
        return false;
    };
    if let Some(room) = state.rooms.get(&code).await {
        if room.leave(client.id()).await {
            state.rooms.remove_if_empty(&code).await;
        }
    }
    true
}

/// Looks up the room the client is currently in.
async fn current_room(
    state: &ServerState,
    client: &Client,
) -> Option<Arc<Room>> {
    let Some(code) = client.room_code() else {
        tracing::debug!(
            client = %client.id(),
            "message outside a room dropped"
        );
        return None;
    };
    state.rooms.get(code).await
}
