//! Room: the state machine for one game instance.
//!
//! A room owns its membership, the current drawer, the active word, and
//! the round clock, all behind one per-room lock. Every operation takes
//! the lock for its full critical section and performs its companion
//! sends inside it, so no broadcast can observe a roster inconsistent
//! with the mutation that triggered it. Sends go through unbounded
//! channels and never suspend, so the lock is held across pure state
//! mutation only.
//!
//! The room states are implicit in the data: no members is `Empty`
//! (the registry retires the room), members without a word is
//! `Waiting`, and a set word is an active round.

use std::collections::HashMap;
use std::time::Instant;

use croquis_protocol::{validate_image, ServerMessage, Stroke};
use rand::seq::IndexedRandom;
use tokio::sync::Mutex;

use crate::{ClientId, OutboundSender, WordSupplier};

/// One member of a room.
struct Member {
    name: String,
    sender: OutboundSender,
}

/// Mutable room state. Guarded by the room's lock.
struct RoomInner {
    members: HashMap<ClientId, Member>,
    /// The member holding the pen. `Some` from the first join onward,
    /// and always a current member.
    drawer: Option<ClientId>,
    /// The active round's word. `None` between rounds, never `Some("")`.
    word: Option<String>,
    /// When the active round started. Set and cleared with `word`.
    round_started: Option<Instant>,
    /// Set once by the registry when the room is retired. A closed room
    /// refuses joins.
    closed: bool,
}

/// A point-in-time view of a room, for logging and tests.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    /// Display names of current members.
    pub players: Vec<String>,
    /// Ids of current members.
    pub member_ids: Vec<ClientId>,
    /// The current drawer, if assigned.
    pub drawer: Option<ClientId>,
    /// The active word, if a round is running.
    pub word: Option<String>,
}

/// One isolated game instance.
pub struct Room {
    code: String,
    inner: Mutex<RoomInner>,
}

impl Room {
    pub(crate) fn new(code: String) -> Self {
        Self {
            code,
            inner: Mutex::new(RoomInner {
                members: HashMap::new(),
                drawer: None,
                word: None,
                round_started: None,
                closed: false,
            }),
        }
    }

    /// Returns the room's code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Adds a member and announces it.
    ///
    /// The first member becomes the drawer. The joiner receives
    /// `room_joined` (and `you_are_drawer` if first); everyone,
    /// including the joiner, then receives `player_joined` with the
    /// updated roster.
    ///
    /// Returns the roster, or `None` if the room has been retired by
    /// the registry, in which case the caller should look the code up
    /// again and join the replacement room.
    pub async fn join(
        &self,
        client: ClientId,
        name: String,
        sender: OutboundSender,
    ) -> Option<Vec<String>> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return None;
        }

        let first = inner.members.is_empty();
        inner.members.insert(
            client,
            Member {
                name: name.clone(),
                sender,
            },
        );
        if first {
            inner.drawer = Some(client);
        }

        let roster = inner.roster();
        inner.send_to(
            client,
            ServerMessage::RoomJoined {
                room_code: self.code.clone(),
                players: roster.clone(),
            },
        );
        if first {
            inner.send_to(client, ServerMessage::YouAreDrawer);
        }
        inner.broadcast(ServerMessage::PlayerJoined {
            players: roster.clone(),
        });

        tracing::info!(
            room = %self.code,
            %client,
            player = %name,
            players = roster.len(),
            "player joined"
        );
        Some(roster)
    }

    /// Removes a member and announces it to those remaining.
    ///
    /// A departing drawer takes the round with them: the word and clock
    /// are cleared, and if anyone remains the pen rotates before
    /// `player_left` goes out. Unknown clients are a no-op.
    ///
    /// Returns true if the room is now empty; the caller must then ask
    /// the registry to retire it. That is the sole deletion trigger.
    pub async fn leave(&self, client: ClientId) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(member) = inner.members.remove(&client) else {
            return inner.members.is_empty();
        };

        if inner.drawer == Some(client) {
            inner.drawer = None;
            inner.word = None;
            inner.round_started = None;
            if !inner.members.is_empty() {
                inner.rotate_drawer(Some(client));
            }
        }

        let roster = inner.roster();
        inner.broadcast(ServerMessage::PlayerLeft { players: roster });

        tracing::info!(
            room = %self.code,
            %client,
            player = %member.name,
            players = inner.members.len(),
            "player left"
        );
        inner.members.is_empty()
    }

    /// Starts a round: draws a word, sends it privately to the drawer,
    /// and broadcasts `game_started` (without the word).
    ///
    /// Only the current drawer may start a round; anyone else is
    /// dropped. An empty word from the supplier leaves the room in
    /// `Waiting` rather than starting an unguessable round.
    pub async fn start_round(
        &self,
        initiator: ClientId,
        words: &dyn WordSupplier,
    ) {
        let mut inner = self.inner.lock().await;
        if inner.drawer != Some(initiator) {
            tracing::debug!(
                room = %self.code,
                client = %initiator,
                "start_game from non-drawer dropped"
            );
            return;
        }

        let word = words.next_word();
        if word.is_empty() {
            tracing::warn!(
                room = %self.code,
                "word supplier returned an empty word, round not started"
            );
            return;
        }

        inner.word = Some(word.clone());
        inner.round_started = Some(Instant::now());
        inner.send_to(initiator, ServerMessage::WordToDraw { word });
        inner.broadcast(ServerMessage::GameStarted);

        tracing::info!(
            room = %self.code,
            drawer = %initiator,
            "round started"
        );
    }

    /// Handles chat text, which doubles as the guess channel.
    ///
    /// Text from the drawer is always plain chat, whatever it says.
    /// From anyone else, an exact case-sensitive match against the
    /// active word wins the round: `correct_guess` goes out with the
    /// elapsed seconds, the word clears, and the pen rotates. Anything
    /// else is broadcast as `chat_message`. Non-members are dropped.
    pub async fn chat(&self, sender: ClientId, text: String) {
        let mut inner = self.inner.lock().await;
        let Some(member) = inner.members.get(&sender) else {
            tracing::debug!(
                room = %self.code,
                client = %sender,
                "chat from non-member dropped"
            );
            return;
        };
        let sender_name = member.name.clone();

        let guessed = inner.drawer != Some(sender)
            && inner.word.as_deref() == Some(text.as_str());
        if !guessed {
            inner.broadcast(ServerMessage::ChatMessage {
                sender: sender_name,
                message: text,
            });
            return;
        }

        let elapsed = inner
            .round_started
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        inner.word = None;
        inner.round_started = None;
        inner.broadcast(ServerMessage::CorrectGuess {
            winner: sender_name.clone(),
            word: text,
            time: elapsed,
        });

        tracing::info!(
            room = %self.code,
            winner = %sender_name,
            elapsed,
            "word guessed"
        );

        let previous = inner.drawer;
        inner.rotate_drawer(previous);
    }

    /// Hands the pen to a randomly chosen member.
    ///
    /// The previous drawer is not eligible while another member exists;
    /// a sole remaining member draws again. Each hand-over sends
    /// `you_are_drawer` privately and broadcasts `new_drawer`. Empty
    /// rooms are a no-op.
    pub async fn rotate_drawer(&self) {
        let mut inner = self.inner.lock().await;
        let previous = inner.drawer;
        inner.rotate_drawer(previous);
    }

    /// Re-broadcasts a stroke from the drawer to every member,
    /// including the drawer. Strokes from anyone else are dropped.
    pub async fn stroke(&self, sender: ClientId, stroke: Stroke) {
        let inner = self.inner.lock().await;
        if inner.drawer != Some(sender) {
            tracing::debug!(
                room = %self.code,
                client = %sender,
                "draw from non-drawer dropped"
            );
            return;
        }
        inner.broadcast(ServerMessage::Draw(stroke));
    }

    /// Validates and re-broadcasts a canvas snapshot from the drawer.
    ///
    /// The payload must decode as base64; malformed payloads are logged
    /// and dropped without reaching any member.
    pub async fn share_image(&self, sender: ClientId, image_data: String) {
        let inner = self.inner.lock().await;
        if inner.drawer != Some(sender) {
            tracing::debug!(
                room = %self.code,
                client = %sender,
                "draw_image from non-drawer dropped"
            );
            return;
        }

        match validate_image(&image_data) {
            Ok(size) => {
                tracing::debug!(
                    room = %self.code,
                    size,
                    "canvas snapshot broadcast"
                );
                inner.broadcast(ServerMessage::DrawImage { image_data });
            }
            Err(error) => {
                tracing::warn!(
                    room = %self.code,
                    client = %sender,
                    %error,
                    "invalid image payload dropped"
                );
            }
        }
    }

    /// Delivers a message to every current member.
    pub async fn broadcast(&self, msg: ServerMessage) {
        self.inner.lock().await.broadcast(msg);
    }

    /// Takes a point-in-time view of the room.
    pub async fn snapshot(&self) -> RoomSnapshot {
        let inner = self.inner.lock().await;
        RoomSnapshot {
            players: inner.roster(),
            member_ids: inner.members.keys().copied().collect(),
            drawer: inner.drawer,
            word: inner.word.clone(),
        }
    }

    /// Marks the room closed if it has no members, so a concurrent join
    /// cannot land in a room the registry is about to unlink. Called by
    /// the registry with the registry lock held; lock order is always
    /// registry first, then room.
    pub(crate) async fn retire_if_empty(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.members.is_empty() {
            inner.closed = true;
            true
        } else {
            false
        }
    }
}

impl RoomInner {
    fn roster(&self) -> Vec<String> {
        self.members.values().map(|m| m.name.clone()).collect()
    }

    /// Picks a new drawer from the members, excluding `previous` unless
    /// that would leave nobody, and announces the hand-over.
    fn rotate_drawer(&mut self, previous: Option<ClientId>) {
        let mut pool: Vec<ClientId> = self
            .members
            .keys()
            .copied()
            .filter(|id| Some(*id) != previous)
            .collect();
        if pool.is_empty() {
            // Sole member was the previous drawer; they draw again.
            pool = self.members.keys().copied().collect();
        }

        let Some(next) = pool.choose(&mut rand::rng()).copied() else {
            return;
        };
        let Some(member) = self.members.get(&next) else {
            return;
        };
        let name = member.name.clone();

        self.drawer = Some(next);
        self.send_to(next, ServerMessage::YouAreDrawer);
        self.broadcast(ServerMessage::NewDrawer { drawer: name });
    }

    /// Delivers `msg` to every member. A dead channel is logged and
    /// skipped; the member is removed by its own disconnect path, never
    /// here.
    fn broadcast(&self, msg: ServerMessage) {
        for (id, member) in &self.members {
            if member.sender.send(msg.clone()).is_err() {
                tracing::debug!(
                    client = %id,
                    "dropping message to closed channel"
                );
            }
        }
    }

    /// Delivers `msg` to one member, silently skipping non-members and
    /// dead channels.
    fn send_to(&self, client: ClientId, msg: ServerMessage) {
        if let Some(member) = self.members.get(&client) {
            if member.sender.send(msg).is_err() {
                tracing::debug!(
                    client = %client,
                    "dropping message to closed channel"
                );
            }
        }
    }
}
