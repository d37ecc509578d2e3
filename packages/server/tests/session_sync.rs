//! End-to-end tests: the real router on an ephemeral port, driven over
//! WebSocket and HTTP.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use sharepad_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemorySessionRepository, InMemorySnapshotRepository},
    },
    ui::{AppState, Server},
};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(200);

/// Start a server with in-memory stores and return its address
async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = AppState::new(
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(InMemorySnapshotRepository::default()),
        Arc::new(WebSocketMessagePusher::default()),
    );
    let router = Server::new(state).router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

async fn connect(addr: SocketAddr) -> Ws {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    ws
}

async fn send(ws: &mut Ws, message: Value) {
    ws.send(Message::Text(message.to_string().into()))
        .await
        .unwrap();
}

/// Next text frame as JSON
async fn recv(ws: &mut Ws) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn assert_silent(ws: &mut Ws) {
    let result = tokio::time::timeout(SILENCE, ws.next()).await;
    assert!(result.is_err(), "unexpected message: {:?}", result);
}

/// Join and return the joiner's own `joined` acknowledgement
async fn join(ws: &mut Ws, session_id: &str, display_name: &str) -> Value {
    send(
        ws,
        json!({"type": "join", "sessionId": session_id, "displayName": display_name}),
    )
    .await;
    let joined = recv(ws).await;
    assert_eq!(joined["type"], "joined");
    joined
}

async fn members(addr: SocketAddr, session_id: &str) -> Vec<String> {
    let body: Value = reqwest::get(format!("http://{}/api/sessions/{}/members", addr, session_id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["connectionId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_two_participants_collaborate() {
    // テスト項目: 参加、同期、編集の配信、切断の一連の流れ
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;

    // when (操作): Alice が参加
    let alice_joined = join(&mut alice, "room1", "Alice").await;
    let alice_id = alice_joined["connectionId"].as_str().unwrap().to_string();

    // then (期待する結果):
    assert_eq!(
        alice_joined["members"],
        json!([{"connectionId": alice_id, "displayName": "Alice"}])
    );
    assert_eq!(members(addr, "room1").await, vec![alice_id.clone()]);

    // when (操作): Bob が参加
    let bob_joined = join(&mut bob, "room1", "Bob").await;
    let bob_id = bob_joined["connectionId"].as_str().unwrap().to_string();

    // then (期待する結果): 両者が同じ joined を受け取る
    let expected = json!({
        "type": "joined",
        "members": [
            {"connectionId": alice_id, "displayName": "Alice"},
            {"connectionId": bob_id, "displayName": "Bob"},
        ],
        "displayName": "Bob",
        "connectionId": bob_id,
    });
    assert_eq!(bob_joined, expected);
    assert_eq!(recv(&mut alice).await, expected);

    // when (操作): Bob が Alice に sync-code
    send(
        &mut bob,
        json!({"type": "sync-code", "targetConnectionId": alice_id, "text": "x=1"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "code-change", "text": "x=1"})
    );

    // when (操作): Alice が編集
    send(
        &mut alice,
        json!({"type": "code-change", "sessionId": "room1", "text": "x=2"}),
    )
    .await;

    // then (期待する結果): Bob だけが受け取る
    assert_eq!(
        recv(&mut bob).await,
        json!({"type": "code-change", "text": "x=2"})
    );
    assert_silent(&mut alice).await;

    // when (操作): Bob が切断
    bob.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "disconnected", "connectionId": bob_id, "displayName": "Bob"})
    );
    assert_eq!(members(addr, "room1").await, vec![alice_id]);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    // テスト項目: 別セッションの参加者には編集も参加通知も届かない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    let mut carol = connect(addr).await;
    join(&mut alice, "room1", "Alice").await;
    join(&mut carol, "room2", "Carol").await;
    join(&mut bob, "room1", "Bob").await;
    recv(&mut alice).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "code-change", "sessionId": "room1", "text": "only room1"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv(&mut bob).await["text"], "only room1");
    assert_silent(&mut carol).await;
}

#[tokio::test]
async fn test_code_change_before_join_is_rejected() {
    // テスト項目: 未参加の接続からの code-change は送信者にだけエラーが返る
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut stranger = connect(addr).await;
    join(&mut alice, "room1", "Alice").await;

    // when (操作):
    send(
        &mut stranger,
        json!({"type": "code-change", "sessionId": "room1", "text": "intrusion"}),
    )
    .await;

    // then (期待する結果):
    let reply = recv(&mut stranger).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "not-joined");
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_code_change_to_foreign_session_is_rejected() {
    // テスト項目: 参加していないセッション宛ての code-change は拒否される
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut carol = connect(addr).await;
    join(&mut alice, "room1", "Alice").await;
    join(&mut carol, "room2", "Carol").await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "code-change", "sessionId": "room2", "text": "hijack"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv(&mut alice).await["code"], "not-joined");
    assert_silent(&mut carol).await;
}

#[tokio::test]
async fn test_second_join_is_rejected_without_closing() {
    // テスト項目: 二回目の join はエラーになるが接続は維持される
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room1", "Alice").await;
    join(&mut bob, "room1", "Bob").await;
    recv(&mut alice).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "join", "sessionId": "room2", "displayName": "Alice"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv(&mut alice).await["code"], "already-joined");
    assert_silent(&mut bob).await;

    send(
        &mut alice,
        json!({"type": "code-change", "sessionId": "room1", "text": "still here"}),
    )
    .await;
    assert_eq!(recv(&mut bob).await["text"], "still here");
}

#[tokio::test]
async fn test_malformed_frame_is_rejected() {
    // テスト項目: 解釈できないフレームには invalid-message が返る
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;

    // when (操作):
    alice
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(recv(&mut alice).await["code"], "invalid-message");
    join(&mut alice, "room1", "Alice").await;
}

#[tokio::test]
async fn test_sync_code_to_departed_peer_is_dropped() {
    // テスト項目: 切断済みの宛先への sync-code は黙って破棄される
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room1", "Alice").await;
    let bob_id = join(&mut bob, "room1", "Bob").await["connectionId"]
        .as_str()
        .unwrap()
        .to_string();
    recv(&mut alice).await;
    bob.close(None).await.unwrap();
    assert_eq!(recv(&mut alice).await["type"], "disconnected");

    // when (操作):
    send(
        &mut alice,
        json!({"type": "sync-code", "targetConnectionId": bob_id, "text": "late"}),
    )
    .await;

    // then (期待する結果):
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_snapshot_load_and_save() {
    // テスト項目: スナップショットの読み込み（初回は空）と保存
    // given (前提条件):
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/session/new-room", addr);

    // when (操作):
    let initial: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    let saved: Value = client
        .post(format!("{}/save", url))
        .json(&json!({"text": "hello"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let reloaded: Value = client.get(&url).send().await.unwrap().json().await.unwrap();

    // then (期待する結果):
    assert_eq!(initial, json!({"text": ""}));
    assert_eq!(saved["text"], "hello");
    assert!(saved["savedAt"].as_str().unwrap().ends_with("+00:00"));
    assert_eq!(reloaded, json!({"text": "hello"}));
}

#[tokio::test]
async fn test_long_session_id_joins_and_round_trips_snapshot() {
    // テスト項目: 500 バイトのセッション ID でも参加とスナップショットの保存・読み込みができる
    // given (前提条件):
    let addr = start_server().await;
    let session_id = format!("room-{}", "x".repeat(495));
    let client = reqwest::Client::new();
    let url = format!("http://{}/session/{}", addr, session_id);
    let mut alice = connect(addr).await;

    // when (操作):
    let joined = join(&mut alice, &session_id, "Alice").await;
    let saved = client
        .post(format!("{}/save", url))
        .json(&json!({"text": "long"}))
        .send()
        .await
        .unwrap();
    let reloaded: Value = client.get(&url).send().await.unwrap().json().await.unwrap();

    // then (期待する結果):
    assert_eq!(session_id.len(), 500);
    assert_eq!(
        members(addr, &session_id).await,
        vec![joined["connectionId"].as_str().unwrap().to_string()]
    );
    assert_eq!(saved.status(), reqwest::StatusCode::OK);
    assert_eq!(reloaded, json!({"text": "long"}));
}

#[tokio::test]
async fn test_empty_session_id_join_is_rejected() {
    // テスト項目: 空のセッション ID での join は invalid-message になり、接続は維持される
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "join", "sessionId": "", "displayName": "Alice"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv(&mut alice).await["code"], "invalid-message");
    join(&mut alice, "room1", "Alice").await;
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェック
    // given (前提条件):
    let addr = start_server().await;

    // when (操作):
    let body: Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}
