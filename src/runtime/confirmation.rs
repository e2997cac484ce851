//! Pending-proposal bookkeeping for the active turn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::ToolCall;
use crate::policy::Risk;
use crate::tools::ToolResult;

/// Human verdict on one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Deny,
}

/// Tracks the proposals of one turn across its rounds: which are still
/// awaiting a decision, how many were issued, and the results recorded
/// so far in resolution order.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: HashMap<String, ToolCall>,
    order: Vec<String>,
    issued: usize,
    results: Vec<ToolResult>,
    folded: usize,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous turn entirely.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.order.clear();
        self.issued = 0;
        self.results.clear();
        self.folded = 0;
    }

    /// Register a round of freshly proposed calls.
    pub fn add_proposals(&mut self, calls: &[ToolCall]) {
        for call in calls {
            self.issued += 1;
            self.order.push(call.id.clone());
            self.pending.insert(call.id.clone(), call.clone());
        }
    }

    /// Remove a pending call for resolution. `None` when the id is
    /// unknown or already resolved.
    pub fn take(&mut self, tool_call_id: &str) -> Option<ToolCall> {
        let call = self.pending.remove(tool_call_id)?;
        self.order.retain(|id| id != tool_call_id);
        Some(call)
    }

    /// Record an outcome. Results keep resolution order, which may
    /// differ from proposal order.
    pub fn record(&mut self, result: ToolResult) {
        self.results.push(result);
    }

    /// (resolved, issued) for the active turn.
    pub fn tally(&self) -> (usize, usize) {
        (self.results.len(), self.issued)
    }

    /// The follow-up trigger condition: every issued call has a result.
    pub fn all_resolved(&self) -> bool {
        self.pending.is_empty() && self.results.len() == self.issued
    }

    /// Pending calls in proposal order.
    pub fn pending(&self) -> Vec<&ToolCall> {
        self.order
            .iter()
            .filter_map(|id| self.pending.get(id))
            .collect()
    }

    /// The auto-confirm shortcut applies only to a single pending
    /// low-risk call; multiple pending calls or any high-risk call must
    /// go through explicit confirmation.
    pub fn auto_confirm_candidate(&self) -> Option<String> {
        if self.pending.len() != 1 {
            return None;
        }
        let call = self.pending.values().next()?;
        if call.risk == Risk::Low {
            Some(call.id.clone())
        } else {
            None
        }
    }

    /// Results recorded since the last fold, for the next follow-up
    /// prompt.
    pub fn unfolded_results(&mut self) -> Vec<ToolResult> {
        let fresh = self.results[self.folded..].to_vec();
        self.folded = self.results.len();
        fresh
    }

    pub fn results(&self) -> &[ToolResult] {
        &self.results
    }
}
