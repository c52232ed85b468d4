//! WebSocket session integration tests
//!
//! Runs the server on an ephemeral port and talks to it with a real
//! tokio-tungstenite client.

mod common;

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use taskbeat::backend::realtime::frames::TIMEOUT_REASON;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use common::{spawn_server, test_config, test_state};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(addr: SocketAddr, query: &str) -> Client {
    let url = format!("ws://{addr}/v1/websocket/ws{query}");
    let (client, _) = connect_async(url).await.expect("upgrade should succeed");
    client
}

async fn next_message(client: &mut Client) -> Message {
    tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("server should answer within 5s")
        .expect("stream should not end")
        .expect("frame should be valid")
}

async fn expect_close(client: &mut Client) -> (u16, String) {
    loop {
        match next_message(client).await {
            Message::Close(Some(frame)) => return (u16::from(frame.code), frame.reason.as_str().to_string()),
            Message::Close(None) => panic!("close frame without a code"),
            _ => continue,
        }
    }
}

#[tokio::test]
async fn echoes_and_answers_heartbeats() {
    let state = test_state(test_config().build().unwrap());
    let addr = spawn_server(state.clone()).await;
    let token = state.jwt.issue("alice").unwrap();

    let mut client = connect(addr, &format!("?token={token}")).await;

    client.send(Message::text("hello")).await.unwrap();
    assert_eq!(next_message(&mut client).await, Message::text("echo: hello"));

    client.send(Message::text("PING")).await.unwrap();
    assert_eq!(next_message(&mut client).await, Message::text("pong"));

    assert_eq!(state.sessions.active_count(), 1);
    client.close(None).await.unwrap();
}

#[tokio::test]
async fn invalid_token_is_closed_with_policy_violation() {
    let state = test_state(test_config().build().unwrap());
    let addr = spawn_server(state.clone()).await;

    let mut client = connect(addr, "?token=not-a-jwt").await;
    assert_eq!(expect_close(&mut client).await, (1008, "Invalid token.".to_string()));
    assert_eq!(state.sessions.opened_total(), 0);
}

#[tokio::test]
async fn missing_token_is_closed_with_policy_violation() {
    let state = test_state(test_config().build().unwrap());
    let addr = spawn_server(state.clone()).await;

    let mut client = connect(addr, "").await;
    assert_eq!(expect_close(&mut client).await, (1008, "Invalid token.".to_string()));
    assert_eq!(state.sessions.opened_total(), 0);
}

#[tokio::test]
async fn expired_token_is_closed_with_its_reason() {
    let state = test_state(test_config().build().unwrap());
    let addr = spawn_server(state.clone()).await;
    let token = state
        .jwt
        .issue_with_expiry("alice", chrono::Utc::now().timestamp() - 3600)
        .unwrap();

    let mut client = connect(addr, &format!("?token={token}")).await;
    assert_eq!(
        expect_close(&mut client).await,
        (1008, "Signature has expired.".to_string())
    );
    assert_eq!(state.sessions.opened_total(), 0);
}

#[tokio::test]
async fn token_expired_seconds_ago_is_refused() {
    let state = test_state(test_config().build().unwrap());
    let addr = spawn_server(state.clone()).await;
    let token = state
        .jwt
        .issue_with_expiry("alice", chrono::Utc::now().timestamp() - 30)
        .unwrap();

    let mut client = connect(addr, &format!("?token={token}")).await;
    assert_eq!(
        expect_close(&mut client).await,
        (1008, "Signature has expired.".to_string())
    );
    assert_eq!(state.sessions.opened_total(), 0);
}

#[tokio::test]
async fn silent_client_times_out() {
    let config = test_config()
        .keepalive(Duration::from_millis(500), Duration::from_millis(50))
        .build()
        .unwrap();
    let state = test_state(config);
    let addr = spawn_server(state.clone()).await;
    let token = state.jwt.issue("alice").unwrap();

    let mut client = connect(addr, &format!("?token={token}")).await;
    assert_eq!(expect_close(&mut client).await, (1000, TIMEOUT_REASON.to_string()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.sessions.active_count(), 0);
    assert_eq!(state.sessions.opened_total(), 1);
}

#[tokio::test]
async fn heartbeats_keep_the_session_open() {
    let config = test_config()
        .keepalive(Duration::from_millis(500), Duration::from_millis(50))
        .build()
        .unwrap();
    let state = test_state(config);
    let addr = spawn_server(state.clone()).await;
    let token = state.jwt.issue("alice").unwrap();

    let mut client = connect(addr, &format!("?token={token}")).await;
    for _ in 0..6 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        client.send(Message::text("ping")).await.unwrap();
        assert_eq!(next_message(&mut client).await, Message::text("pong"));
    }
    assert_eq!(state.sessions.active_count(), 1);
}
