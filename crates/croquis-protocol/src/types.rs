//! Core types of the croquis wire format.
//!
//! Every frame on the wire is a JSON object with a `"type"` discriminator
//! in snake_case and payload fields in camelCase, matching the browser
//! client. Inbound frames deserialize to [`ClientMessage`], outbound
//! frames serialize from [`ServerMessage`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stroke: one drawing event
// ---------------------------------------------------------------------------

/// A single drawing event from the drawer's canvas.
///
/// Strokes are forwarded to room members verbatim; the server never
/// interprets them. Every field is optional on the wire: a pen-up event
/// arrives as just `{"type":"draw","isDragging":false}`, so missing
/// fields fill in with zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stroke {
    /// Canvas x coordinate.
    pub x: f64,
    /// Canvas y coordinate.
    pub y: f64,
    /// True while the pen is down and moving; false on pen-up.
    pub is_dragging: bool,
    /// CSS color of the stroke.
    pub color: String,
    /// Brush width in pixels.
    pub line_width: f64,
    /// Drawing tool, e.g. `"pen"` or `"eraser"`.
    pub tool: String,
}

// ---------------------------------------------------------------------------
// ClientMessage: inbound
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// `#[serde(tag = "type")]` makes the enum internally tagged:
/// `{ "type": "join_room", "roomCode": "ABCD", "nickname": "alice" }`.
/// Unknown discriminators fall into [`ClientMessage::Unknown`] instead of
/// failing to parse; unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// Join the room named by `room_code`, creating it if absent.
    /// `nickname` is the display name other players see.
    JoinRoom { room_code: String, nickname: String },

    /// Leave the current room.
    LeaveRoom,

    /// Chat text. While a round is active, text from anyone but the
    /// drawer is evaluated as a guess.
    Chat { message: String },

    /// A drawing stroke. Accepted only from the current drawer.
    Draw(Stroke),

    /// Start a round. Accepted only from the current drawer.
    StartGame,

    /// A full-canvas snapshot as base64 text. Accepted only from the
    /// current drawer.
    DrawImage { image_data: String },

    /// Catch-all for unrecognized `"type"` values; the router ignores it.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// ServerMessage: outbound
// ---------------------------------------------------------------------------

/// Messages the server sends to clients.
///
/// Same tagging scheme as [`ClientMessage`]. Players are referenced by
/// display name; client ids never appear on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// To the joiner: you are in `room_code`, these are the players.
    RoomJoined {
        room_code: String,
        players: Vec<String>,
    },

    /// Privately to the drawer: you hold the pen.
    YouAreDrawer,

    /// Broadcast after a join; carries the updated roster.
    PlayerJoined { players: Vec<String> },

    /// Broadcast after a departure; carries the updated roster.
    PlayerLeft { players: Vec<String> },

    /// To a client whose explicit leave was processed.
    RoomLeft,

    /// Ordinary chat line (including wrong guesses and drawer chatter).
    ChatMessage { sender: String, message: String },

    /// A stroke re-broadcast from the drawer.
    Draw(Stroke),

    /// Privately to the drawer: the word for this round.
    WordToDraw { word: String },

    /// Broadcast when a round starts. Does not carry the word.
    GameStarted,

    /// Broadcast when a guess matches: who won, the word, and elapsed
    /// seconds since the round started.
    CorrectGuess {
        winner: String,
        word: String,
        time: f64,
    },

    /// Broadcast after rotation; names the new drawer.
    NewDrawer { drawer: String },

    /// A canvas snapshot re-broadcast from the drawer.
    DrawImage { image_data: String },
}

// =========================================================================
// Tests
// =========================================================================
