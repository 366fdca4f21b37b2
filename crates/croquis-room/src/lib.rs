//! Room lifecycle and game state for croquis.
//!
//! Everything stateful about the game lives here: which clients exist,
//! which rooms they are in, who holds the pen, and what the hidden word
//! is. The crate is transport-agnostic; it sees only [`ClientId`]s and
//! the outbound channel each connection registered.
//!
//! # Key types
//!
//! - [`Room`]: the state machine for one game instance
//! - [`RoomRegistry`]: process-wide map from room code to [`Room`]
//! - [`Client`]: per-connection identity and room association
//! - [`WordSupplier`] / [`WordList`]: where round words come from

mod client;
mod registry;
mod room;
mod words;

pub use client::Client;
pub use registry::RoomRegistry;
pub use room::{Room, RoomSnapshot};
pub use words::{WordList, WordSupplier};

use std::fmt;

use croquis_protocol::ServerMessage;
use tokio::sync::mpsc;

/// Opaque identifier for a connected client.
///
/// Minted by the server when a connection is accepted. Never appears on
/// the wire; players are referenced by display name there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

impl ClientId {
    /// Creates a new `ClientId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// Channel sender that pushes outbound messages to one client's writer
/// task.
///
/// Unbounded on purpose: room operations send while holding the room
/// lock and must never suspend there.
pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;
