//! Turns a bounded context plus a request into text and typed,
//! risk-classified tool proposals.

use crate::context::AiContext;
use crate::conversation::Role;
use crate::model::client::ChatClient;
use crate::model::schema::tool_descriptors;
use crate::model::types::{ModelError, ModelReply, ToolCall, ToolRequest};
use crate::settings::Settings;

/// Textual fallback when no credential is configured. The turn still
/// terminates cleanly; nothing is raised.
pub const NOT_CONFIGURED_REPLY: &str =
    "No API key is configured. Add a key in settings (or set DIRPILOT_API_KEY) to enable the assistant.";

#[derive(Debug, Default)]
pub struct ModelGateway;

impl ModelGateway {
    pub fn new() -> Self {
        Self
    }

    /// One reasoner round. Settings are taken per call, never cached, so
    /// a settings update between rounds is always observed.
    pub async fn propose(
        &self,
        settings: &Settings,
        context: &AiContext,
        request_text: &str,
    ) -> Result<ModelReply, ModelError> {
        let api_key = match settings.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                tracing::info!("model call skipped: no credential configured");
                return Ok(ModelReply::text_only(NOT_CONFIGURED_REPLY));
            }
        };

        let client = ChatClient::new(api_key, settings.model.clone(), settings.base_url.clone());
        let tools = tool_descriptors(settings.multimedia_support);
        let user = format!("{}\n\n{request_text}", context_preamble(context));

        let outcome = client.chat(SYSTEM_PROMPT, &user, &tools).await?;

        let tool_calls: Vec<ToolCall> = outcome
            .tool_calls
            .into_iter()
            .map(|raw| ToolCall::from_request(ToolRequest::parse(&raw.name, &raw.arguments)))
            .collect();

        tracing::debug!(
            proposals = tool_calls.len(),
            has_text = outcome.content.is_some(),
            "gateway round complete"
        );

        Ok(ModelReply {
            text: outcome.content.unwrap_or_default(),
            tool_calls,
        })
    }
}

const SYSTEM_PROMPT: &str = "You are the assistant inside a desktop file manager. \
You help the user organize, inspect, and transform files in the directory they are viewing. \
Use the provided tools for every filesystem action instead of describing shell commands. \
Each tool call you propose is shown to the user for confirmation before it runs, and some may be denied. \
Paths may be absolute or relative to the current directory. \
When the request is satisfied, answer with a short plain-text summary and no further tool calls.";

fn context_preamble(context: &AiContext) -> String {
    let mut out = String::new();

    out.push_str(&format!("Current directory: {}\n", context.current_path));

    out.push_str("\nFolders:\n");
    if context.folders.is_empty() {
        out.push_str("(none)\n");
    }
    for name in &context.folders {
        out.push_str(&format!("- {name}/\n"));
    }

    out.push_str("\nFiles:\n");
    if context.files.is_empty() {
        out.push_str("(none)\n");
    }
    for name in &context.files {
        out.push_str(&format!("- {name}\n"));
    }
    if context.listing_overflow > 0 {
        out.push_str(&format!("({} more entries not shown)\n", context.listing_overflow));
    }

    if !context.history.is_empty() {
        out.push_str("\nConversation so far:\n");
        for message in &context.history {
            let speaker = match message.role {
                Role::User => "User",
                Role::Ai => "Assistant",
                Role::System => "System",
            };
            out.push_str(&format!("{speaker}: {}\n", message.content));
        }
    }

    if !context.file_snippets.is_empty() {
        out.push_str("\nRecently read files:\n");
        for snippet in &context.file_snippets {
            out.push_str(&format!("--- {} ---\n{}\n", snippet.path, snippet.content));
        }
    }

    if context.allow_root_access {
        out.push_str("\nNote: sandbox override is enabled; paths outside the home directory are permitted.\n");
    }

    out
}
