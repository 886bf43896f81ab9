//! Chat orchestration for the contech assistant.
//!
//! - `conversation` - transcript and OpenAI-shaped message types
//! - `llm` - the `ChatModel` seam and its OpenAI-compatible client
//! - `tools` - tool registry, typed argument contracts, and the dispatcher
//! - `runtime` - `AgentRuntime`, the bounded model/tool/model loop
//!
//! The model only chooses tools and phrases answers. Every number it reports comes from the
//! deterministic estimators in `contech-core`.

pub mod conversation;
pub mod llm;
pub mod runtime;
pub mod tools;

pub use conversation::{ConversationMessage, Role, ToolCallRequest, Transcript};
pub use llm::{ChatModel, ChatReply, ChatRequest, LlmError, OpenAiChatModel};
pub use runtime::{AgentError, AgentRuntime, ChatOutcome, RuntimeBuildError};
pub use tools::{ToolDispatcher, ToolEnvelope, ToolKind, ToolRegistry};
