//! Integration tests driving full game flows through the registry.

use std::sync::Arc;

use croquis_protocol::{ServerMessage, Stroke};
use croquis_room::{ClientId, RoomRegistry, WordSupplier};
use tokio::sync::mpsc::{self, UnboundedReceiver};

// =========================================================================
// Helpers
// =========================================================================

struct FixedWords(&'static str);

impl WordSupplier for FixedWords {
    fn next_word(&self) -> String {
        self.0.to_owned()
    }
}

fn cid(id: u64) -> ClientId {
    ClientId::new(id)
}

fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

async fn join(
    registry: &RoomRegistry,
    code: &str,
    id: u64,
    name: &str,
) -> UnboundedReceiver<ServerMessage> {
    let (tx, rx) = mpsc::unbounded_channel();
    let room = registry.get_or_create(code).await;
    room.join(cid(id), name.into(), tx)
        .await
        .expect("room should accept the join");
    rx
}

// =========================================================================
// Two-player game: join, round, guess, rotation.
// =========================================================================

#[tokio::test]
async fn test_two_player_round_from_join_to_rotation() {
    let registry = RoomRegistry::new();

    let mut alice = join(&registry, "GAME", 1, "alice").await;
    let alice_msgs = drain(&mut alice);
    assert!(matches!(
        &alice_msgs[0],
        ServerMessage::RoomJoined { room_code, players }
            if room_code == "GAME" && players == &["alice".to_owned()]
    ));
    assert_eq!(alice_msgs[1], ServerMessage::YouAreDrawer);

    let mut bob = join(&registry, "GAME", 2, "bob").await;
    drain(&mut bob);
    drain(&mut alice);

    let room = registry.get("GAME").await.expect("room should exist");

    // Alice holds the pen and starts a round.
    room.start_round(cid(1), &FixedWords("Soleil")).await;
    assert_eq!(
        drain(&mut alice),
        vec![
            ServerMessage::WordToDraw { word: "Soleil".into() },
            ServerMessage::GameStarted,
        ]
    );
    assert_eq!(drain(&mut bob), vec![ServerMessage::GameStarted]);

    // Alice draws; both canvases receive the stroke.
    let stroke = Stroke {
        x: 1.0,
        y: 2.0,
        is_dragging: false,
        color: "#ff0000".into(),
        line_width: 3.0,
        tool: "pen".into(),
    };
    room.stroke(cid(1), stroke.clone()).await;
    assert_eq!(drain(&mut alice), vec![ServerMessage::Draw(stroke.clone())]);
    assert_eq!(drain(&mut bob), vec![ServerMessage::Draw(stroke)]);

    // Bob misses, then hits.
    room.chat(cid(2), "Lune".into()).await;
    assert!(matches!(
        drain(&mut bob).as_slice(),
        [ServerMessage::ChatMessage { sender, message }]
            if sender == "bob" && message == "Lune"
    ));
    drain(&mut alice);

    room.chat(cid(2), "Soleil".into()).await;

    let bob_msgs = drain(&mut bob);
    assert!(matches!(
        &bob_msgs[0],
        ServerMessage::CorrectGuess { winner, word, time }
            if winner == "bob" && word == "Soleil" && *time >= 0.0
    ));
    // With two players the pen must land on the guesser.
    assert_eq!(bob_msgs[1], ServerMessage::YouAreDrawer);
    assert_eq!(
        bob_msgs[2],
        ServerMessage::NewDrawer { drawer: "bob".into() }
    );

    let alice_msgs = drain(&mut alice);
    assert!(matches!(
        &alice_msgs[0],
        ServerMessage::CorrectGuess { winner, .. } if winner == "bob"
    ));
    assert!(!alice_msgs.contains(&ServerMessage::YouAreDrawer));

    // The round is over; a late guess of the old word is plain chat.
    room.chat(cid(1), "Soleil".into()).await;
    assert!(matches!(
        drain(&mut alice).as_slice(),
        [ServerMessage::ChatMessage { .. }]
    ));
}

// =========================================================================
// Drawer departure mid-round.
// =========================================================================

#[tokio::test]
async fn test_drawer_departure_ends_the_round_and_rotates() {
    let registry = RoomRegistry::new();

    let mut alice = join(&registry, "GAME", 1, "alice").await;
    let mut bob = join(&registry, "GAME", 2, "bob").await;
    let mut carol = join(&registry, "GAME", 3, "carol").await;

    let room = registry.get("GAME").await.expect("room should exist");
    room.start_round(cid(1), &FixedWords("Dragon")).await;
    drain(&mut alice);
    drain(&mut bob);
    drain(&mut carol);

    assert!(!room.leave(cid(1)).await);
    registry.remove_if_empty("GAME").await;
    assert!(registry.contains("GAME").await);

    let snap = room.snapshot().await;
    assert_eq!(snap.word, None, "the round dies with the drawer");
    let drawer = snap.drawer.expect("a remaining member should draw");
    assert_ne!(drawer, cid(1));

    for rx in [&mut bob, &mut carol] {
        let msgs = drain(rx);
        assert!(msgs
            .iter()
            .any(|m| matches!(m, ServerMessage::NewDrawer { .. })));
        assert!(msgs.iter().any(|m| matches!(
            m,
            ServerMessage::PlayerLeft { players } if players.len() == 2
        )));
    }

    // The dead round's word no longer wins anything.
    let guesser = if drawer == cid(2) { cid(3) } else { cid(2) };
    room.chat(guesser, "Dragon".into()).await;
    assert!(matches!(
        drain(&mut bob).as_slice(),
        [ServerMessage::ChatMessage { .. }]
    ));
}

// =========================================================================
// Room lifecycle through the registry.
// =========================================================================

#[tokio::test]
async fn test_deserted_room_is_retired_and_recreated_fresh() {
    let registry = RoomRegistry::new();

    let mut alice = join(&registry, "GAME", 1, "alice").await;
    drain(&mut alice);

    let room = registry.get("GAME").await.expect("room should exist");
    room.start_round(cid(1), &FixedWords("Pirate")).await;

    assert!(room.leave(cid(1)).await);
    assert!(registry.remove_if_empty("GAME").await);
    assert!(!registry.contains("GAME").await);

    // The same code now names a brand-new room with no leftover state.
    let mut bob = join(&registry, "GAME", 2, "bob").await;
    let fresh = registry.get("GAME").await.expect("room should exist");
    assert!(!Arc::ptr_eq(&room, &fresh));

    let snap = fresh.snapshot().await;
    assert_eq!(snap.players, vec!["bob".to_owned()]);
    assert_eq!(snap.drawer, Some(cid(2)));
    assert_eq!(snap.word, None);

    let msgs = drain(&mut bob);
    assert!(msgs.contains(&ServerMessage::YouAreDrawer));
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let registry = RoomRegistry::new();

    let mut alice = join(&registry, "AAAA", 1, "alice").await;
    let mut bob = join(&registry, "BBBB", 2, "bob").await;
    drain(&mut alice);
    drain(&mut bob);

    let room_a = registry.get("AAAA").await.expect("room should exist");
    room_a.chat(cid(1), "only for room A".into()).await;

    assert_eq!(
        drain(&mut alice),
        vec![ServerMessage::ChatMessage {
            sender: "alice".into(),
            message: "only for room A".into(),
        }]
    );
    assert!(drain(&mut bob).is_empty());

    // Each room's first member drew their own pen.
    let snap_b = registry.get("BBBB").await.unwrap().snapshot().await;
    assert_eq!(snap_b.drawer, Some(cid(2)));
}

#[tokio::test]
async fn test_membership_checks_are_per_room() {
    let registry = RoomRegistry::new();

    let mut alice = join(&registry, "AAAA", 1, "alice").await;
    let _bob = join(&registry, "BBBB", 2, "bob").await;
    drain(&mut alice);

    // Bob is a member elsewhere; room A still drops him.
    let room_a = registry.get("AAAA").await.expect("room should exist");
    room_a.chat(cid(2), "wrong room".into()).await;
    room_a.stroke(cid(2), Stroke::default()).await;

    assert!(drain(&mut alice).is_empty());
}
