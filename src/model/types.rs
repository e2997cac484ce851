use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::policy::{classify, Risk};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("auth error: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// One structured proposal parsed from the reasoner's response. Exactly
/// one variant per tool in the catalogue; anything the parser cannot
/// type lands in `Malformed` and is never executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolRequest {
    ReadFile { path: String },
    WriteFile { path: String, content: String },
    ReadDirectory { path: String },
    GetTree { path: String },
    CreateDirectory { path: String, name: String },
    Rename { path: String, new_name: String },
    Delete { path: String },
    Copy { source: String, destination: String },
    Move { source: String, destination: String },
    ProcessMedia { path: String },
    Navigate { path: String },
    Malformed { name: String, reason: String },
}

impl ToolRequest {
    /// Type a function call from the wire. Total: unknown names and
    /// missing required parameters produce `Malformed` rather than an
    /// error, so every proposal the model makes gets an id and a
    /// recorded outcome.
    pub fn parse(name: &str, args: &Value) -> ToolRequest {
        let result = match name {
            "read_file" => required(args, "path").map(|path| ToolRequest::ReadFile { path }),
            "write_file" => required(args, "path").and_then(|path| {
                required(args, "content").map(|content| ToolRequest::WriteFile { path, content })
            }),
            "read_directory" => {
                required(args, "path").map(|path| ToolRequest::ReadDirectory { path })
            }
            "get_tree" => required(args, "path").map(|path| ToolRequest::GetTree { path }),
            "create_directory" => required(args, "path").and_then(|path| {
                required(args, "name").map(|name| ToolRequest::CreateDirectory { path, name })
            }),
            "rename_file" => required(args, "path").and_then(|path| {
                required(args, "newName").map(|new_name| ToolRequest::Rename { path, new_name })
            }),
            "delete_item" => required(args, "path").map(|path| ToolRequest::Delete { path }),
            "copy_file" => required(args, "path").and_then(|source| {
                required(args, "destinationPath")
                    .map(|destination| ToolRequest::Copy { source, destination })
            }),
            "move_item" => required(args, "sourcePath").and_then(|source| {
                required(args, "destinationPath")
                    .map(|destination| ToolRequest::Move { source, destination })
            }),
            "process_file" => required(args, "path").map(|path| ToolRequest::ProcessMedia { path }),
            "navigate_user" => required(args, "path").map(|path| ToolRequest::Navigate { path }),
            _ => Err("unknown tool".to_string()),
        };

        result.unwrap_or_else(|reason| ToolRequest::Malformed {
            name: name.to_string(),
            reason,
        })
    }

    /// Canonical wire name of the tool this request targets.
    pub fn wire_name(&self) -> &str {
        match self {
            ToolRequest::ReadFile { .. } => "read_file",
            ToolRequest::WriteFile { .. } => "write_file",
            ToolRequest::ReadDirectory { .. } => "read_directory",
            ToolRequest::GetTree { .. } => "get_tree",
            ToolRequest::CreateDirectory { .. } => "create_directory",
            ToolRequest::Rename { .. } => "rename_file",
            ToolRequest::Delete { .. } => "delete_item",
            ToolRequest::Copy { .. } => "copy_file",
            ToolRequest::Move { .. } => "move_item",
            ToolRequest::ProcessMedia { .. } => "process_file",
            ToolRequest::Navigate { .. } => "navigate_user",
            ToolRequest::Malformed { name, .. } => name,
        }
    }

    /// Human-readable description shown next to the confirmation prompt.
    pub fn describe(&self) -> String {
        match self {
            ToolRequest::ReadFile { path } => format!("Read file {path}"),
            ToolRequest::WriteFile { path, content } => {
                format!("Write {} characters to {path}", content.chars().count())
            }
            ToolRequest::ReadDirectory { path } => format!("List directory {path}"),
            ToolRequest::GetTree { path } => format!("Render directory tree of {path}"),
            ToolRequest::CreateDirectory { path, name } => {
                format!("Create directory {name} in {path}")
            }
            ToolRequest::Rename { path, new_name } => format!("Rename {path} to {new_name}"),
            ToolRequest::Delete { path } => format!("Delete {path}"),
            ToolRequest::Copy { source, destination } => {
                format!("Copy {source} to {destination}")
            }
            ToolRequest::Move { source, destination } => {
                format!("Move {source} to {destination}")
            }
            ToolRequest::ProcessMedia { path } => format!("Attach media file {path}"),
            ToolRequest::Navigate { path } => format!("Open {path} in the file view"),
            ToolRequest::Malformed { name, .. } => format!("Execute {name}"),
        }
    }

    /// Malformed proposals are always high risk regardless of the wire
    /// name they arrived under.
    pub fn risk(&self) -> Risk {
        match self {
            ToolRequest::Malformed { .. } => Risk::High,
            other => classify(other.wire_name()),
        }
    }
}

fn required(args: &Value, key: &str) -> Result<String, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("missing required parameter: {key}"))
}

/// A risk-classified, confirmable proposal. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCall {
    pub id: String,
    pub request: ToolRequest,
    pub description: String,
    pub risk: Risk,
}

impl ToolCall {
    pub fn from_request(request: ToolRequest) -> Self {
        let description = request.describe();
        let risk = request.risk();
        Self {
            id: Uuid::new_v4().to_string(),
            request,
            description,
            risk,
        }
    }
}

/// What one gateway round returned: free text and zero or more
/// proposals.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }
}
