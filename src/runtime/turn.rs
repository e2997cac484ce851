//! Turn state machine pieces: phases, result summaries for the
//! follow-up prompt, and the per-turn iteration ceiling.

use crate::tools::{ToolPayload, ToolResult, ToolStatus};

/// Where the active turn currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingProposal,
    AwaitingConfirmation,
    Executing,
    AwaitingFollowup,
}

/// Ceiling on follow-up rounds per turn. A reasoner that keeps
/// proposing tools past this point gets cut off with
/// [`FOLLOW_UP_LIMIT_REPLY`] as the final answer.
pub const MAX_FOLLOW_UP_ROUNDS: usize = 8;

pub const FOLLOW_UP_LIMIT_REPLY: &str =
    "Stopping here: this request needed more tool rounds than allowed in a single turn. \
The actions already confirmed have run; please re-ask for whatever remains.";

/// Read excerpts in follow-up prompts are cut at this many characters.
const READ_EXCERPT_CHARS: usize = 1500;
const EXCERPT_MARKER: &str = "…(truncated)";

/// Render one result as a line (or block) the reasoner can act on.
/// Total over status and payload kind.
pub fn summarize_result(result: &ToolResult) -> String {
    match result.status {
        ToolStatus::Denied => format!("{}: denied by user", result.tool),
        ToolStatus::Error => format!(
            "{}: error: {}",
            result.tool,
            result.error.as_deref().unwrap_or("unknown failure")
        ),
        ToolStatus::Success => match &result.payload {
            Some(ToolPayload::FileContent { path, content }) => {
                format!("read_file {path}: success\n{}", excerpt(content))
            }
            Some(ToolPayload::Listing { path, folders, files }) => {
                let mut out = format!(
                    "read_directory {path}: {} folders, {} files\n",
                    folders.len(),
                    files.len()
                );
                for name in folders {
                    out.push_str(&format!("- {name}/\n"));
                }
                for name in files {
                    out.push_str(&format!("- {name}\n"));
                }
                out.trim_end().to_string()
            }
            Some(ToolPayload::Tree { path, rendered }) => {
                format!("get_tree {path}:\n{}", rendered.trim_end())
            }
            Some(ToolPayload::Written { path }) => format!("write_file: wrote {path}"),
            Some(ToolPayload::DirectoryCreated { path }) => {
                format!("create_directory: created {path}")
            }
            Some(ToolPayload::Renamed { from, to }) => {
                format!("rename_file: renamed {from} to {to}")
            }
            Some(ToolPayload::Deleted { path }) => format!("delete_item: deleted {path}"),
            Some(ToolPayload::Copied { from, to }) => format!("copy_file: copied {from} to {to}"),
            Some(ToolPayload::Moved { from, to }) => format!("move_item: moved {from} to {to}"),
            Some(ToolPayload::Media { path, mime, size_bytes, .. }) => {
                format!("process_file: attached {path} ({mime}, {size_bytes} bytes)")
            }
            Some(ToolPayload::Navigated { path }) => {
                format!("navigate_user: user is now viewing {path}")
            }
            None => format!("{}: success", result.tool),
        },
    }
}

/// The re-prompt folding a round's outcomes back to the reasoner.
pub fn follow_up_prompt(original_prompt: &str, summaries: &[String]) -> String {
    format!(
        "The user asked: {original_prompt}\n\nTool results:\n{}\n\n\
If the request is now satisfied, reply with a short final answer and no tool calls. \
Otherwise call the further tools you need.",
        summaries.join("\n")
    )
}

fn excerpt(content: &str) -> String {
    if content.chars().count() > READ_EXCERPT_CHARS {
        let cut: String = content.chars().take(READ_EXCERPT_CHARS).collect();
        format!("{cut}{EXCERPT_MARKER}")
    } else {
        content.to_string()
    }
}
