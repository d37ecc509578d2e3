//! Message formatting utilities for client display.

use chrono::{DateTime, Local};
use sharepad_server::infrastructure::dto::websocket::{ErrorCode, MemberInfo};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the roster of the session
    ///
    /// # Arguments
    ///
    /// * `members` - Members in join order
    /// * `current_connection_id` - This client's connection id (to mark as "me")
    pub fn format_roster(members: &[MemberInfo], current_connection_id: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Participants:\n");

        if members.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for member in members {
                let is_me = Some(member.connection_id.as_str()) == current_connection_id;
                let me_suffix = if is_me { " (me)" } else { "" };
                output.push_str(&format!("{}{}\n", member.display_name, me_suffix));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_participant_joined(display_name: &str) -> String {
        format!("\n+ {} joined\n", display_name)
    }

    pub fn format_participant_left(display_name: &str) -> String {
        format!("\n- {} left\n", display_name)
    }

    /// Format the whole buffer between rules
    pub fn format_buffer(text: &str) -> String {
        let body = if text.is_empty() { "(empty)" } else { text };
        format!(
            "\n\n------------------------------------------------------------\n\
             {}\n\
             ------------------------------------------------------------\n",
            body
        )
    }

    pub fn format_error(code: ErrorCode, message: &str) -> String {
        let code = match code {
            ErrorCode::AlreadyJoined => "already-joined",
            ErrorCode::NotJoined => "not-joined",
            ErrorCode::InvalidMessage => "invalid-message",
        };
        format!("\n! [{}] {}\n", code, message)
    }

    /// Format a save confirmation, converting `savedAt` to local time
    ///
    /// Falls back to the raw value if the server sent something that is not RFC 3339.
    pub fn format_saved(saved_at: &str) -> String {
        let when = DateTime::parse_from_rfc3339(saved_at)
            .map(|t| {
                t.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|_| saved_at.to_string());
        format!("saved at {}\n", when)
    }

    pub fn format_unknown_command(command: &str) -> String {
        format!(
            "unknown command '{}' (available: /show /clear /save /who /quit)\n",
            command
        )
    }
}
