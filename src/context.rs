//! Bounded prompt context, rebuilt fresh before every model call.

use std::path::Path;

use serde::Serialize;

use crate::conversation::{truncate_history, ChatMessage, ConversationLog, FileSnippet, Role};
use crate::settings::Settings;
use crate::workspace;

/// History character budget for the first model call of a turn.
const HISTORY_BUDGET_INITIAL: usize = 8000;
/// Tighter budget for follow-up calls, which also carry tool results.
const HISTORY_BUDGET_FOLLOW_UP: usize = 4000;
/// At most this many non-system messages are considered at all.
const MAX_HISTORY_MESSAGES: usize = 20;
/// Directory entries beyond this cap are summarized by count.
const MAX_LISTING_ENTRIES: usize = 200;

/// Which model call of the turn this context feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Initial,
    FollowUp,
}

/// Everything the model gateway embeds in its preamble. Snapshot of one
/// instant; never mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct AiContext {
    pub current_path: String,
    pub folders: Vec<String>,
    pub files: Vec<String>,
    /// Entries dropped from the listing by the cap, zero when complete.
    pub listing_overflow: usize,
    pub history: Vec<ChatMessage>,
    pub file_snippets: Vec<FileSnippet>,
    pub allow_root_access: bool,
}

pub fn build_context(
    current_path: &Path,
    log: &ConversationLog,
    settings: &Settings,
    generation: Generation,
) -> AiContext {
    let (mut folders, mut files) = (Vec::new(), Vec::new());
    let mut listing_overflow = 0;
    match workspace::list_directory(current_path) {
        Ok(entries) => {
            let total = entries.len();
            if total > MAX_LISTING_ENTRIES {
                listing_overflow = total - MAX_LISTING_ENTRIES;
            }
            for entry in entries.into_iter().take(MAX_LISTING_ENTRIES) {
                if entry.is_dir {
                    folders.push(entry.name);
                } else {
                    files.push(entry.name);
                }
            }
        }
        Err(e) => {
            tracing::warn!(path = %current_path.display(), error = %e, "directory listing failed for context");
        }
    }

    let budget = match generation {
        Generation::Initial => HISTORY_BUDGET_INITIAL,
        Generation::FollowUp => HISTORY_BUDGET_FOLLOW_UP,
    };
    let non_system: Vec<ChatMessage> = log
        .messages()
        .iter()
        .filter(|m| m.role != Role::System)
        .cloned()
        .collect();
    let start = non_system.len().saturating_sub(MAX_HISTORY_MESSAGES);
    let history = truncate_history(&non_system[start..], budget);

    AiContext {
        current_path: current_path.display().to_string(),
        folders,
        files,
        listing_overflow,
        history,
        file_snippets: log.snippets().cloned().collect(),
        allow_root_access: settings.allow_root_access,
    }
}
