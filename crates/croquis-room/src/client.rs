//! Per-connection client state, tracked by the message router.

use croquis_protocol::ServerMessage;

use crate::{ClientId, OutboundSender};

/// One connected participant.
///
/// Holds identity and the room association. The association is weak: a
/// room code, resolved through the registry when needed, never a
/// reference into the room. Created when a connection is accepted and
/// dropped when its task ends.
pub struct Client {
    id: ClientId,
    nickname: Option<String>,
    room_code: Option<String>,
    sender: OutboundSender,
}

impl Client {
    /// Creates a client for a freshly accepted connection.
    pub fn new(id: ClientId, sender: OutboundSender) -> Self {
        Self {
            id,
            nickname: None,
            room_code: None,
            sender,
        }
    }

    /// Returns this client's id.
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Display name, fixed by the first join.
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Code of the room this client is currently in, if any.
    pub fn room_code(&self) -> Option<&str> {
        self.room_code.as_deref()
    }

    /// Records a completed join. The first join fixes the nickname;
    /// later joins keep the original.
    pub fn joined(&mut self, nickname: String, room_code: String) {
        self.nickname.get_or_insert(nickname);
        self.room_code = Some(room_code);
    }

    /// Clears the room association, returning the code that was set.
    pub fn left(&mut self) -> Option<String> {
        self.room_code.take()
    }

    /// Pushes a message directly to this client's writer. Silently
    /// drops if the writer is gone.
    pub fn send(&self, msg: ServerMessage) {
        let _ = self.sender.send(msg);
    }

    /// Clones the outbound channel handle for room membership.
    pub fn sender(&self) -> OutboundSender {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn client() -> (Client, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Client::new(ClientId::new(1), tx), rx)
    }

    #[test]
    fn test_new_client_has_no_name_or_room() {
        let (client, _rx) = client();
        assert!(client.nickname().is_none());
        assert!(client.room_code().is_none());
    }

    #[test]
    fn test_first_join_fixes_the_nickname() {
        let (mut client, _rx) = client();
        client.joined("alice".into(), "ABCD".into());
        assert_eq!(client.nickname(), Some("alice"));
        assert_eq!(client.room_code(), Some("ABCD"));

        client.left();
        client.joined("impostor".into(), "EFGH".into());
        assert_eq!(client.nickname(), Some("alice"));
        assert_eq!(client.room_code(), Some("EFGH"));
    }

    #[test]
    fn test_left_clears_and_returns_the_room_code() {
        let (mut client, _rx) = client();
        client.joined("alice".into(), "ABCD".into());
        assert_eq!(client.left(), Some("ABCD".into()));
        assert!(client.room_code().is_none());
        assert_eq!(client.left(), None);
    }

    #[test]
    fn test_send_delivers_to_the_writer_channel() {
        let (client, mut rx) = client();
        client.send(ServerMessage::RoomLeft);
        assert_eq!(rx.try_recv().unwrap(), ServerMessage::RoomLeft);
    }

    #[test]
    fn test_send_to_closed_channel_does_not_panic() {
        let (client, rx) = client();
        drop(rx);
        client.send(ServerMessage::RoomLeft);
    }
}
