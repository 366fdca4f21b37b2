//! The room registry: code -> room lookup with create-on-first-join.
//!
//! The registry lock and the per-room locks are separate levels.
//! Registry operations touch only the map; the one exception is
//! `remove_if_empty`, which takes the room lock while holding the
//! registry lock. That order (registry, then room) is fixed and no
//! path takes the locks the other way around.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::Room;

/// All live rooms, keyed by room code.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, Arc<Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up a room by code, creating it if it does not exist.
    /// Concurrent callers with the same code get the same room.
    pub async fn get_or_create(&self, code: &str) -> Arc<Room> {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get(code) {
            return Arc::clone(room);
        }
        let room = Arc::new(Room::new(code.to_owned()));
        rooms.insert(code.to_owned(), Arc::clone(&room));
        tracing::info!(room = %code, "room created");
        room
    }

    /// Looks up a room by code without creating it.
    pub async fn get(&self, code: &str) -> Option<Arc<Room>> {
        self.rooms.lock().await.get(code).map(Arc::clone)
    }

    /// Unlinks a room unconditionally. Safe to call for codes that are
    /// already gone.
    pub async fn remove(&self, code: &str) {
        if self.rooms.lock().await.remove(code).is_some() {
            tracing::info!(room = %code, "room removed");
        }
    }

    /// Retires and unlinks the room if it has no members.
    ///
    /// The check and the unlink happen under the registry lock, and the
    /// room is marked closed before it disappears from the map, so a
    /// join racing this call either lands before the check (keeping the
    /// room alive) or sees the closed flag and retries through
    /// `get_or_create`.
    pub async fn remove_if_empty(&self, code: &str) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get(code) else {
            return false;
        };
        if room.retire_if_empty().await {
            rooms.remove(code);
            tracing::info!(room = %code, "empty room removed");
            true
        } else {
            false
        }
    }

    /// Number of live rooms.
    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }

    /// Whether a room with this code currently exists.
    pub async fn contains(&self, code: &str) -> bool {
        self.rooms.lock().await.contains_key(code)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
