//! Domain logic for client-side operations.
//!
//! Pure state transitions of the local editor, kept free of I/O so they are
//! easy to test.

use sharepad_server::infrastructure::dto::websocket::{ClientMessage, MemberInfo, ServerMessage};

use crate::error::ClientError;

/// A line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text appended to the buffer
    Append(String),
    Show,
    Clear,
    Save,
    Who,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line {
            "/show" => Self::Show,
            "/clear" => Self::Clear,
            "/save" => Self::Save,
            "/who" => Self::Who,
            "/quit" => Self::Quit,
            other if other.starts_with('/') => Self::Unknown(other.to_string()),
            other => Self::Append(other.to_string()),
        }
    }
}

/// Local view of the session: the shared buffer and the roster.
///
/// The buffer survives reconnects; the connection id and roster belong to one
/// WebSocket connection and are reset by [`EditorState::reset_connection`].
#[derive(Debug, Clone)]
pub struct EditorState {
    session_id: String,
    display_name: String,
    buffer: String,
    connection_id: Option<String>,
    members: Vec<MemberInfo>,
}

impl EditorState {
    pub fn new(session_id: String, display_name: String, buffer: String) -> Self {
        Self {
            session_id,
            display_name,
            buffer,
            connection_id: None,
            members: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    pub fn join_message(&self) -> ClientMessage {
        ClientMessage::Join {
            session_id: self.session_id.clone(),
            display_name: self.display_name.clone(),
        }
    }

    /// Append a line and return the edit to broadcast (the whole buffer)
    pub fn append_line(&mut self, line: &str) -> ClientMessage {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
        self.code_change()
    }

    pub fn clear(&mut self) -> ClientMessage {
        self.buffer.clear();
        self.code_change()
    }

    /// Forget everything tied to the previous connection
    pub fn reset_connection(&mut self) {
        self.connection_id = None;
        self.members.clear();
    }

    /// Apply a message from the server.
    ///
    /// The server queues the joiner's own `joined` before any later membership
    /// notice, so the first `joined` on a connection is always our acknowledgement.
    /// Display names are not unique and play no part in that decision.
    ///
    /// Returns the reply to send, if any: a newcomer gets our buffer as `sync-code`.
    pub fn apply(&mut self, message: &ServerMessage) -> Option<ClientMessage> {
        match message {
            ServerMessage::Joined {
                members,
                connection_id,
                ..
            } => {
                self.members = members.clone();
                match &self.connection_id {
                    None => {
                        // 自分の参加確認
                        self.connection_id = Some(connection_id.clone());
                        None
                    }
                    Some(me) if me != connection_id && !self.buffer.is_empty() => {
                        Some(ClientMessage::SyncCode {
                            target_connection_id: connection_id.clone(),
                            text: self.buffer.clone(),
                        })
                    }
                    _ => None,
                }
            }
            ServerMessage::CodeChange { text } => {
                self.buffer = text.clone();
                None
            }
            ServerMessage::Disconnected { connection_id, .. } => {
                self.members.retain(|m| &m.connection_id != connection_id);
                None
            }
            ServerMessage::Error { .. } => None,
        }
    }

    fn code_change(&self) -> ClientMessage {
        ClientMessage::CodeChange {
            session_id: self.session_id.clone(),
            text: self.buffer.clone(),
        }
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // スナップショットの取得失敗は再接続では解決しない
    if matches!(error, ClientError::SnapshotRequest(_)) {
        return false;
    }

    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(connection_id: &str, display_name: &str) -> MemberInfo {
        MemberInfo {
            connection_id: connection_id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn joined(members: Vec<MemberInfo>, connection_id: &str, display_name: &str) -> ServerMessage {
        ServerMessage::Joined {
            members,
            display_name: display_name.to_string(),
            connection_id: connection_id.to_string(),
        }
    }

    /// Alice が "room1" に参加済みの状態
    fn joined_alice(buffer: &str) -> EditorState {
        let mut state = EditorState::new(
            "room1".to_string(),
            "Alice".to_string(),
            buffer.to_string(),
        );
        state.apply(&joined(vec![member("a", "Alice")], "a", "Alice"));
        state
    }

    #[test]
    fn test_parse_commands() {
        // テスト項目: 入力行がコマンドに変換される
        // given (前提条件):
        let lines = ["/show", "/clear", "/save", "/who", "/quit", "/nope", "x = 1"];

        // when (操作):
        let commands: Vec<Command> = lines.iter().map(|l| Command::parse(l)).collect();

        // then (期待する結果):
        assert_eq!(
            commands,
            vec![
                Command::Show,
                Command::Clear,
                Command::Save,
                Command::Who,
                Command::Quit,
                Command::Unknown("/nope".to_string()),
                Command::Append("x = 1".to_string()),
            ]
        );
    }

    #[test]
    fn test_own_joined_sets_connection_id() {
        // テスト項目: 自分の joined で接続 ID とメンバーが記録され、返信はしない
        // given (前提条件):
        let mut state = EditorState::new("room1".to_string(), "Alice".to_string(), "x=1".to_string());

        // when (操作):
        let reply = state.apply(&joined(vec![member("a", "Alice")], "a", "Alice"));

        // then (期待する結果):
        assert_eq!(reply, None);
        assert_eq!(state.connection_id(), Some("a"));
        assert_eq!(state.members(), &[member("a", "Alice")]);
    }

    #[test]
    fn test_peer_with_same_name_is_not_mistaken_for_me() {
        // テスト項目: 同じ表示名の参加者が後から来ても、自分の接続 ID は変わらず sync-code を送る
        // given (前提条件):
        let mut state = joined_alice("x=1");

        // when (操作):
        let reply = state.apply(&joined(
            vec![member("a", "Alice"), member("c", "Alice")],
            "c",
            "Alice",
        ));

        // then (期待する結果):
        assert_eq!(state.connection_id(), Some("a"));
        assert_eq!(
            reply,
            Some(ClientMessage::SyncCode {
                target_connection_id: "c".to_string(),
                text: "x=1".to_string(),
            })
        );
    }

    #[test]
    fn test_first_joined_is_own_among_same_names() {
        // テスト項目: 同名の参加者が既にいても、最初の joined の接続 ID が自分になる
        // given (前提条件):
        let mut state = EditorState::new("room1".to_string(), "Alice".to_string(), String::new());

        // when (操作):
        let reply = state.apply(&joined(
            vec![member("x", "Alice"), member("a", "Alice")],
            "a",
            "Alice",
        ));

        // then (期待する結果):
        assert_eq!(reply, None);
        assert_eq!(state.connection_id(), Some("a"));
    }

    #[test]
    fn test_newcomer_receives_sync_code() {
        // テスト項目: 他の参加者が来たら自分のバッファを sync-code で送る
        // given (前提条件):
        let mut state = joined_alice("x=1");

        // when (操作):
        let reply = state.apply(&joined(
            vec![member("a", "Alice"), member("b", "Bob")],
            "b",
            "Bob",
        ));

        // then (期待する結果):
        assert_eq!(
            reply,
            Some(ClientMessage::SyncCode {
                target_connection_id: "b".to_string(),
                text: "x=1".to_string(),
            })
        );
        assert_eq!(state.members().len(), 2);
    }

    #[test]
    fn test_empty_buffer_is_not_synced() {
        // テスト項目: バッファが空なら新規参加者のスナップショットを上書きしない
        // given (前提条件):
        let mut state = joined_alice("");

        // when (操作):
        let reply = state.apply(&joined(
            vec![member("a", "Alice"), member("b", "Bob")],
            "b",
            "Bob",
        ));

        // then (期待する結果):
        assert_eq!(reply, None);
    }

    #[test]
    fn test_code_change_replaces_buffer() {
        // テスト項目: code-change でバッファ全体が置き換わる
        // given (前提条件):
        let mut state = joined_alice("old");

        // when (操作):
        state.apply(&ServerMessage::CodeChange {
            text: "new".to_string(),
        });

        // then (期待する結果):
        assert_eq!(state.buffer(), "new");
    }

    #[test]
    fn test_disconnected_removes_member() {
        // テスト項目: disconnected で該当メンバーがロスターから消える
        // given (前提条件):
        let mut state = joined_alice("");
        state.apply(&joined(
            vec![member("a", "Alice"), member("b", "Bob")],
            "b",
            "Bob",
        ));

        // when (操作):
        state.apply(&ServerMessage::Disconnected {
            connection_id: "b".to_string(),
            display_name: "Bob".to_string(),
        });

        // then (期待する結果):
        assert_eq!(state.members(), &[member("a", "Alice")]);
    }

    #[test]
    fn test_append_and_clear_broadcast_whole_buffer() {
        // テスト項目: 追記とクリアはバッファ全体を code-change として返す
        // given (前提条件):
        let mut state = joined_alice("x=1");

        // when (操作):
        let appended = state.append_line("y=2");
        let cleared = state.clear();

        // then (期待する結果):
        assert_eq!(
            appended,
            ClientMessage::CodeChange {
                session_id: "room1".to_string(),
                text: "x=1\ny=2".to_string(),
            }
        );
        assert_eq!(
            cleared,
            ClientMessage::CodeChange {
                session_id: "room1".to_string(),
                text: String::new(),
            }
        );
    }

    #[test]
    fn test_reset_connection_keeps_buffer() {
        // テスト項目: 再接続の準備で接続情報は消えるがバッファは残る
        // given (前提条件):
        let mut state = joined_alice("x=1");

        // when (操作):
        state.reset_connection();

        // then (期待する結果):
        assert_eq!(state.connection_id(), None);
        assert!(state.members().is_empty());
        assert_eq!(state.buffer(), "x=1");
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_on_snapshot_error() {
        // テスト項目: スナップショットの取得失敗では再接続しない
        // given (前提条件):
        let error = ClientError::SnapshotRequest("500".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }
}
