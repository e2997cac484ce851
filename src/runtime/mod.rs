//! Turn orchestration: confirmation gate, state machine, session
//! facade.

mod confirmation;
mod session;
mod turn;


pub use confirmation::{ConfirmationGate, Decision};
pub use session::{AgentSession, ToolCallView, TurnError, TurnEvent};
pub use turn::{
    follow_up_prompt, summarize_result, TurnPhase, FOLLOW_UP_LIMIT_REPLY, MAX_FOLLOW_UP_ROUNDS,
};
