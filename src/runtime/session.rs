//! The session facade the presentation layer talks to: submit a prompt,
//! decide on proposals, read the tally, receive the final answer.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::{build_context, Generation};
use crate::conversation::{ChatMessage, ConversationLog, Role};
use crate::model::{ModelError, ModelGateway, ModelReply, ToolCall};
use crate::policy::{AccessGuard, Risk};
use crate::runtime::confirmation::{ConfirmationGate, Decision};
use crate::runtime::turn::{
    follow_up_prompt, summarize_result, TurnPhase, FOLLOW_UP_LIMIT_REPLY, MAX_FOLLOW_UP_ROUNDS,
};
use crate::settings::SettingsStore;
use crate::tools::{execute, ExecutionContext, ToolPayload, ToolResult, ToolStatus};

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("a turn is already in progress")]
    TurnInProgress,
    #[error("no proposals are awaiting confirmation")]
    NoActiveTurn,
    #[error("unknown or already resolved tool call: {0}")]
    UnknownToolCall(String),
    #[error("auto-confirm requires exactly one pending low-risk call")]
    AutoConfirmUnavailable,
    #[error("model call failed: {0}")]
    Upstream(#[from] ModelError),
}

/// Proposal view handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallView {
    pub id: String,
    pub tool: String,
    pub description: String,
    pub risk: Risk,
}

impl From<&ToolCall> for ToolCallView {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            tool: call.request.wire_name().to_string(),
            description: call.description.clone(),
            risk: call.risk,
        }
    }
}

/// What the session hands back after `submit`/`decide`.
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// The turn terminated with a final answer.
    Reply { text: String },
    /// New proposals await confirmation.
    Proposals {
        calls: Vec<ToolCallView>,
        resolved: usize,
        issued: usize,
    },
    /// A proposal was resolved but others are still pending.
    Progress { resolved: usize, issued: usize },
}

/// One conversation with the assistant. Each turn runs on a single
/// logical thread of control: proposals execute one at a time, in the
/// order decisions arrive, and the follow-up fires only when the result
/// count matches the issued count.
pub struct AgentSession {
    store: SettingsStore,
    guard: AccessGuard,
    gateway: ModelGateway,
    log: ConversationLog,
    gate: ConfirmationGate,
    phase: TurnPhase,
    current_path: PathBuf,
    original_prompt: String,
    follow_up_rounds: usize,
}

impl AgentSession {
    pub fn new(store: SettingsStore, guard: AccessGuard, start_path: PathBuf) -> Self {
        Self {
            store,
            guard,
            gateway: ModelGateway::new(),
            log: ConversationLog::new(),
            gate: ConfirmationGate::new(),
            phase: TurnPhase::Idle,
            current_path: start_path,
            original_prompt: String::new(),
            follow_up_rounds: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// (resolved, issued) for the active turn.
    pub fn tally(&self) -> (usize, usize) {
        self.gate.tally()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.messages()
    }

    /// Start a turn from a user utterance.
    pub async fn submit(&mut self, prompt: &str) -> Result<TurnEvent, TurnError> {
        if self.phase != TurnPhase::Idle {
            return Err(TurnError::TurnInProgress);
        }

        self.log.push(Role::User, prompt);
        self.original_prompt = prompt.to_string();
        self.follow_up_rounds = 0;
        self.gate.reset();
        self.phase = TurnPhase::AwaitingProposal;

        let settings = self.store.effective();
        let context = build_context(&self.current_path, &self.log, &settings, Generation::Initial);
        let reply = match self.gateway.propose(&settings, &context, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                // Fail the turn, never retry; recovery is the caller's call.
                self.phase = TurnPhase::Idle;
                return Err(e.into());
            }
        };

        self.apply_reply(reply)
    }

    /// Resolve one pending proposal. Accepting executes it immediately;
    /// denying records the result without touching storage.
    pub async fn decide(
        &mut self,
        tool_call_id: &str,
        decision: Decision,
    ) -> Result<TurnEvent, TurnError> {
        if self.phase != TurnPhase::AwaitingConfirmation {
            return Err(TurnError::NoActiveTurn);
        }
        let call = self
            .gate
            .take(tool_call_id)
            .ok_or_else(|| TurnError::UnknownToolCall(tool_call_id.to_string()))?;

        match decision {
            Decision::Deny => {
                tracing::info!(tool = call.request.wire_name(), id = %call.id, "proposal denied");
                self.gate.record(ToolResult::denied(&call));
            }
            Decision::Accept => {
                self.phase = TurnPhase::Executing;
                let settings = self.store.effective();
                let ctx = ExecutionContext {
                    guard: &self.guard,
                    allow_root: settings.allow_root_access,
                    current_path: &self.current_path,
                };
                let result = execute(&ctx, &call);
                self.absorb_result(&result);
                self.gate.record(result);
                self.phase = TurnPhase::AwaitingConfirmation;
            }
        }

        if !self.gate.all_resolved() {
            let (resolved, issued) = self.gate.tally();
            return Ok(TurnEvent::Progress { resolved, issued });
        }
        self.follow_up().await
    }

    /// Confirmation shortcut: legal only when exactly one low-risk call
    /// is pending.
    pub async fn auto_confirm(&mut self) -> Result<TurnEvent, TurnError> {
        let id = self
            .gate
            .auto_confirm_candidate()
            .ok_or(TurnError::AutoConfirmUnavailable)?;
        self.decide(&id, Decision::Accept).await
    }

    /// Fold a finished round's results back to the reasoner and route
    /// its answer: more proposals or a terminal reply.
    async fn follow_up(&mut self) -> Result<TurnEvent, TurnError> {
        self.follow_up_rounds += 1;
        if self.follow_up_rounds > MAX_FOLLOW_UP_ROUNDS {
            tracing::warn!(rounds = self.follow_up_rounds, "follow-up ceiling reached");
            self.log.push(Role::Ai, FOLLOW_UP_LIMIT_REPLY);
            self.phase = TurnPhase::Idle;
            return Ok(TurnEvent::Reply {
                text: FOLLOW_UP_LIMIT_REPLY.to_string(),
            });
        }

        self.phase = TurnPhase::AwaitingFollowup;
        let summaries: Vec<String> = self
            .gate
            .unfolded_results()
            .iter()
            .map(summarize_result)
            .collect();
        let prompt = follow_up_prompt(&self.original_prompt, &summaries);

        let settings = self.store.effective();
        let context = build_context(&self.current_path, &self.log, &settings, Generation::FollowUp);
        let reply = match self.gateway.propose(&settings, &context, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                self.phase = TurnPhase::Idle;
                return Err(e.into());
            }
        };

        self.apply_reply(reply)
    }

    /// Route one gateway reply: terminal text or a new confirmation
    /// round.
    fn apply_reply(&mut self, reply: ModelReply) -> Result<TurnEvent, TurnError> {
        if reply.tool_calls.is_empty() {
            let text = if reply.text.trim().is_empty() {
                "Done.".to_string()
            } else {
                reply.text
            };
            self.log.push(Role::Ai, text.as_str());
            self.phase = TurnPhase::Idle;
            return Ok(TurnEvent::Reply { text });
        }

        if !reply.text.trim().is_empty() {
            self.log.push(Role::Ai, reply.text.as_str());
        }
        let views: Vec<ToolCallView> = reply.tool_calls.iter().map(ToolCallView::from).collect();
        self.gate.add_proposals(&reply.tool_calls);
        self.phase = TurnPhase::AwaitingConfirmation;

        let (resolved, issued) = self.gate.tally();
        Ok(TurnEvent::Proposals {
            calls: views,
            resolved,
            issued,
        })
    }

    /// Session-level side effects of a successful execution: navigation
    /// moves the current directory, reads feed the snippet ring.
    fn absorb_result(&mut self, result: &ToolResult) {
        if result.status != ToolStatus::Success {
            return;
        }
        match &result.payload {
            Some(ToolPayload::Navigated { path }) => {
                self.current_path = PathBuf::from(path);
            }
            Some(ToolPayload::FileContent { path, content }) => {
                self.log.record_snippet(path.clone(), content);
            }
            _ => {}
        }
    }
}
