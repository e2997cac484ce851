//! Model gateway: prompt construction, the upstream chat client, and
//! parsing of structured function calls into risk-classified proposals.

mod client;
mod gateway;
mod schema;
mod types;


pub use client::{ChatClient, ChatOutcome, RawToolCall};
pub use gateway::{ModelGateway, NOT_CONFIGURED_REPLY};
pub use schema::{tool_descriptors, ToolDescriptor};
pub use types::{ModelError, ModelReply, ToolCall, ToolRequest};
