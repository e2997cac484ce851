//! Conversation state for one chat: the append-only message log and the
//! ring of recently read file snippets that gets folded into prompts.
//!
//! The log itself is never truncated; `truncate_history` bounds only the
//! view handed to the prompt builder.

use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most recent files remembered for prompt context.
const MAX_FILE_SNIPPETS: usize = 5;
/// Per-snippet preview cap, in characters.
pub const SNIPPET_PREVIEW_CHARS: usize = 2000;
/// Marker appended when a snippet was cut at the preview cap.
pub const TRUNCATION_MARKER: &str = "… [truncated]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSnippet {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
    file_snippets: VecDeque<FileSnippet>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, content));
        self.messages.last().expect("just pushed")
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Remember a file the assistant just read. The newest entry wins a
    /// slot; re-reading a path moves it to the front instead of
    /// duplicating it.
    pub fn record_snippet(&mut self, path: impl Into<String>, content: &str) {
        let path = path.into();
        self.file_snippets.retain(|s| s.path != path);

        let content = if content.chars().count() > SNIPPET_PREVIEW_CHARS {
            let preview: String = content.chars().take(SNIPPET_PREVIEW_CHARS).collect();
            format!("{preview}{TRUNCATION_MARKER}")
        } else {
            content.to_string()
        };

        self.file_snippets.push_front(FileSnippet { path, content });
        self.file_snippets.truncate(MAX_FILE_SNIPPETS);
    }

    pub fn snippets(&self) -> impl Iterator<Item = &FileSnippet> {
        self.file_snippets.iter()
    }
}

/// Bound a transcript to a character budget, most-recent-first.
///
/// Walks messages from newest to oldest accumulating content length and
/// stops before the message that would push the total past `max_chars`.
/// The single newest message is always kept, even when it alone exceeds
/// the budget, so the result is never empty for a non-empty input.
/// Chronological order is preserved in the returned subsequence.
pub fn truncate_history(messages: &[ChatMessage], max_chars: usize) -> Vec<ChatMessage> {
    let mut kept: Vec<ChatMessage> = Vec::new();
    let mut total = 0usize;

    for message in messages.iter().rev() {
        let len = message.content.chars().count();
        if kept.is_empty() || total + len <= max_chars {
            total += len;
            kept.push(message.clone());
        } else {
            break;
        }
    }

    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message_of_len(len: usize) -> ChatMessage {
        ChatMessage::new(Role::User, "x".repeat(len))
    }

    #[test]
    fn budget_keeps_newest_messages_only() {
        // 800, 900, 1000 chars oldest to newest with a 1500 budget:
        // the newest (1000) fits, adding 900 would reach 1900, so only
        // the newest survives.
        let messages = vec![message_of_len(800), message_of_len(900), message_of_len(1000)];
        let kept = truncate_history(&messages, 1500);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, messages[2].id);
    }

    #[test]
    fn oversized_newest_message_is_still_kept() {
        let messages = vec![message_of_len(100), message_of_len(5000)];
        let kept = truncate_history(&messages, 1000);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, messages[1].id);
    }

    #[test]
    fn kept_messages_stay_in_chronological_order() {
        let messages = vec![
            message_of_len(100),
            message_of_len(200),
            message_of_len(300),
        ];
        let kept = truncate_history(&messages, 600);
        let ids: Vec<_> = kept.iter().map(|m| m.id.clone()).collect();
        let expected: Vec<_> = messages.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(truncate_history(&[], 1000).is_empty());
    }

    #[test]
    fn snippet_ring_caps_and_deduplicates() {
        let mut log = ConversationLog::new();
        for i in 0..7 {
            log.record_snippet(format!("/home/user/f{i}.txt"), "content");
        }
        assert_eq!(log.snippets().count(), 5);

        log.record_snippet("/home/user/f6.txt", "fresh");
        assert_eq!(log.snippets().count(), 5);
        assert_eq!(log.snippets().next().unwrap().content, "fresh");
    }

    #[test]
    fn long_snippet_gets_truncation_marker() {
        let mut log = ConversationLog::new();
        log.record_snippet("/home/user/big.txt", &"y".repeat(SNIPPET_PREVIEW_CHARS + 50));
        let snippet = log.snippets().next().unwrap();
        assert!(snippet.content.ends_with(TRUNCATION_MARKER));
        assert!(snippet.content.chars().count() < SNIPPET_PREVIEW_CHARS + TRUNCATION_MARKER.len() + 1);
    }
}
