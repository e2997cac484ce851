//! Headless agent core for an AI file manager desktop app.
//!
//! One user utterance flows through context construction, a tool-calling
//! model round, per-proposal human confirmation, sandboxed execution,
//! and follow-up rounds until the model answers in plain text. The
//! desktop shell embeds [`AgentSession`] and forwards accept/deny
//! decisions into it; nothing in this crate depends on a UI framework.
//!
//! # Architecture
//!
//! - `policy`: path sandbox (AccessGuard) and risk classification
//! - `settings`: persisted credential/flags with env overrides
//! - `conversation`: append-only chat log, history truncation, snippets
//! - `workspace`: directory listing boundary
//! - `context`: bounded prompt context, rebuilt per model call
//! - `model`: chat client, tool schema, gateway parsing proposals
//! - `tools`: guarded execution of filesystem/navigation actions
//! - `runtime`: confirmation gate, turn state machine, session facade

mod context;
mod conversation;
mod model;
mod policy;
mod runtime;
mod settings;
mod tools;
mod workspace;

pub use context::{build_context, AiContext, Generation};
pub use conversation::{ChatMessage, ConversationLog, FileSnippet, Role};
pub use model::{
    tool_descriptors, ModelError, ModelGateway, ModelReply, ToolCall, ToolDescriptor, ToolRequest,
    NOT_CONFIGURED_REPLY,
};
pub use policy::{classify, AccessGuard, PathDecision, Risk};
pub use runtime::{
    AgentSession, Decision, ToolCallView, TurnError, TurnEvent, TurnPhase, FOLLOW_UP_LIMIT_REPLY,
    MAX_FOLLOW_UP_ROUNDS,
};
pub use settings::{Settings, SettingsError, SettingsPatch, SettingsStore};
pub use tools::{execute, ExecutionContext, ToolError, ToolPayload, ToolResult, ToolStatus};
pub use workspace::{list_directory, DirEntryInfo};

/// Bootstrap for embedders: load `.env` if present and install the fmt
/// subscriber. Library users that bring their own subscriber skip this.
pub fn init_tracing() {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
