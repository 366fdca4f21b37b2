//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a tokio-tungstenite client to
//! verify that frames actually flow over the network.

use std::time::Duration;

use croquis_transport::{Connection, Transport, WebSocketTransport};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Binds a transport on an OS-assigned port and returns it with the
/// address clients should dial.
async fn bind_transport() -> (WebSocketTransport, String) {
    let transport = WebSocketTransport::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = transport.local_addr().expect("should have an address");
    (transport, addr.to_string())
}

async fn connect_client(addr: &str) -> ClientWs {
    let url = format!("ws://{addr}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("client should connect");
    ws
}

#[tokio::test]
async fn test_accept_and_exchange_text_frames() {
    let (mut transport, addr) = bind_transport().await;

    let server_handle = tokio::spawn(async move {
        transport.accept().await.expect("should accept")
    });

    let mut client_ws = connect_client(&addr).await;
    let server_conn = server_handle.await.expect("task should complete");

    assert!(server_conn.id().into_inner() > 0);

    // Server sends, client receives a text frame.
    server_conn
        .send(r#"{"type":"game_started"}"#)
        .await
        .expect("send should succeed");

    let msg = client_ws.next().await.unwrap().unwrap();
    assert!(msg.is_text());
    assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"game_started"}"#);

    // Client sends, server receives.
    client_ws
        .send(Message::text(r#"{"type":"leave_room"}"#))
        .await
        .unwrap();

    let received = server_conn
        .recv()
        .await
        .expect("recv should succeed")
        .expect("should have a frame");
    assert_eq!(received, r#"{"type":"leave_room"}"#);

    server_conn.close().await.expect("close should succeed");
}

#[tokio::test]
async fn test_binary_frame_with_utf8_json_is_accepted() {
    let (mut transport, addr) = bind_transport().await;

    let server_handle = tokio::spawn(async move {
        transport.accept().await.expect("should accept")
    });

    let mut client_ws = connect_client(&addr).await;
    let server_conn = server_handle.await.unwrap();

    client_ws
        .send(Message::Binary(b"{\"type\":\"start_game\"}".to_vec().into()))
        .await
        .unwrap();

    let received = server_conn.recv().await.unwrap().unwrap();
    assert_eq!(received, r#"{"type":"start_game"}"#);
}

#[tokio::test]
async fn test_recv_returns_none_on_client_close() {
    let (mut transport, addr) = bind_transport().await;

    let server_handle = tokio::spawn(async move {
        transport.accept().await.expect("should accept")
    });

    let mut client_ws = connect_client(&addr).await;
    let server_conn = server_handle.await.unwrap();

    client_ws.send(Message::Close(None)).await.unwrap();

    let result = server_conn.recv().await.expect("recv should not error");
    assert!(result.is_none(), "should return None on client close");
}

#[tokio::test]
async fn test_send_completes_while_recv_is_pending() {
    // A parked recv must not hold a lock that send needs: the server
    // pushes broadcasts to clients whose reads are always pending.
    let (mut transport, addr) = bind_transport().await;

    let server_handle = tokio::spawn(async move {
        transport.accept().await.expect("should accept")
    });

    let mut client_ws = connect_client(&addr).await;
    let server_conn = std::sync::Arc::new(server_handle.await.unwrap());

    // Park a recv on the idle socket.
    let recv_conn = server_conn.clone();
    let recv_task = tokio::spawn(async move { recv_conn.recv().await });

    // Give the recv task time to take the stream half.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The send must complete promptly even with the recv outstanding.
    tokio::time::timeout(
        Duration::from_secs(1),
        server_conn.send(r#"{"type":"you_are_drawer"}"#),
    )
    .await
    .expect("send should not be blocked by a pending recv")
    .expect("send should succeed");

    let msg = client_ws.next().await.unwrap().unwrap();
    assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"you_are_drawer"}"#);

    // Unblock and finish the parked recv.
    client_ws
        .send(Message::text(r#"{"type":"chat","message":"hi"}"#))
        .await
        .unwrap();
    let received = recv_task.await.unwrap().unwrap();
    assert_eq!(
        received.as_deref(),
        Some(r#"{"type":"chat","message":"hi"}"#)
    );
}
