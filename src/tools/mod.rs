//! Tool execution: dispatch over the typed request union, guarded path
//! resolution, and conversion of every failure into a structured
//! result.

pub mod fs;
pub mod media;
mod types;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use crate::model::{ToolCall, ToolRequest};
use crate::policy::{AccessGuard, PathDecision};

pub use types::{ToolError, ToolPayload, ToolResult, ToolStatus};

/// Everything one execution needs: the guard, the sandbox override from
/// the current settings snapshot, and the directory relative paths
/// resolve against.
pub struct ExecutionContext<'a> {
    pub guard: &'a AccessGuard,
    pub allow_root: bool,
    pub current_path: &'a Path,
}

impl ExecutionContext<'_> {
    /// Resolve a raw path through the guard. Every path-bearing
    /// parameter goes through here before any filesystem call.
    pub(crate) fn authorize(&self, raw: &str) -> Result<PathBuf, ToolError> {
        match self.guard.evaluate(raw, self.allow_root, Some(self.current_path)) {
            PathDecision::Allow(path) => Ok(path),
            PathDecision::Deny { path, .. } => Err(ToolError::AccessDenied {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Execute one approved tool call, one at a time. Total: every request
/// variant, including `Malformed`, produces a ToolResult and no error
/// escapes this boundary.
pub fn execute(ctx: &ExecutionContext, call: &ToolCall) -> ToolResult {
    tracing::debug!(tool = call.request.wire_name(), id = %call.id, "executing tool call");

    let outcome = match &call.request {
        ToolRequest::ReadFile { path } => fs::read_file(ctx, path),
        ToolRequest::WriteFile { path, content } => fs::write_file(ctx, path, content),
        ToolRequest::ReadDirectory { path } => fs::read_directory(ctx, path),
        ToolRequest::GetTree { path } => fs::get_tree(ctx, path),
        ToolRequest::CreateDirectory { path, name } => fs::create_directory(ctx, path, name),
        ToolRequest::Rename { path, new_name } => fs::rename(ctx, path, new_name),
        ToolRequest::Delete { path } => fs::delete(ctx, path),
        ToolRequest::Copy { source, destination } => fs::copy(ctx, source, destination),
        ToolRequest::Move { source, destination } => fs::move_item(ctx, source, destination),
        ToolRequest::ProcessMedia { path } => media::process_file(ctx, path),
        ToolRequest::Navigate { path } => fs::navigate(ctx, path),
        ToolRequest::Malformed { name, reason } => {
            Err(ToolError::InvalidInput(format!("{name}: {reason}")))
        }
    };

    match outcome {
        Ok(payload) => ToolResult::success(call, payload),
        Err(error) => {
            tracing::debug!(tool = call.request.wire_name(), error = %error, "tool call failed");
            ToolResult::failure(call, &error)
        }
    }
}
