//! Result and error types for tool execution.

use serde::{Deserialize, Serialize};

use crate::model::ToolCall;

/// Errors raised while executing a single tool call. All of them are
/// converted to `error` ToolResults at the dispatch boundary; nothing
/// propagates past it.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("access denied: {path}")]
    AccessDenied { path: String },
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("{path} is not a {expected}")]
    WrongType { path: String, expected: &'static str },
    #[error("execution failed: {0}")]
    Execution(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
    Denied,
}

/// Kind-specific success payload. One variant per tool so formatting
/// downstream is a total match instead of a chain of presence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolPayload {
    FileContent { path: String, content: String },
    Listing { path: String, folders: Vec<String>, files: Vec<String> },
    Tree { path: String, rendered: String },
    Written { path: String },
    DirectoryCreated { path: String },
    Renamed { from: String, to: String },
    Deleted { path: String },
    Copied { from: String, to: String },
    Moved { from: String, to: String },
    Media { path: String, mime: String, size_bytes: u64, data_base64: String },
    Navigated { path: String },
}

/// Recorded outcome of one tool call. Exactly one of these eventually
/// exists per issued call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    /// Wire name of the tool, kept for result formatting.
    pub tool: String,
    pub status: ToolStatus,
    pub payload: Option<ToolPayload>,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(call: &ToolCall, payload: ToolPayload) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool: call.request.wire_name().to_string(),
            status: ToolStatus::Success,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(call: &ToolCall, error: &ToolError) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool: call.request.wire_name().to_string(),
            status: ToolStatus::Error,
            payload: None,
            error: Some(error.to_string()),
        }
    }

    pub fn denied(call: &ToolCall) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool: call.request.wire_name().to_string(),
            status: ToolStatus::Denied,
            payload: None,
            error: None,
        }
    }
}
