use std::sync::Arc;

use contech_core::config::AppConfig;
use contech_core::estimating::PricingTableError;
use contech_core::{ApplicationError, Estimator};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::conversation::{ConversationMessage, ToolCallRequest, Transcript};
use crate::llm::{ChatModel, ChatRequest, LlmError, OpenAiChatModel};
use crate::tools::{ToolDispatcher, ToolRegistry};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] LlmError),
    #[error("arguments for tool `{tool}` are not valid JSON: {source}")]
    ToolArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<AgentError> for ApplicationError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::Provider(error) => ApplicationError::Provider(error.to_string()),
            error @ AgentError::ToolArguments { .. } => {
                ApplicationError::ToolArguments(error.to_string())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeBuildError {
    #[error("pricing tables could not be loaded: {0}")]
    Pricing(#[from] PricingTableError),
    #[error("chat model client could not be built: {0}")]
    Model(#[from] LlmError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChatOutcome {
    pub response: String,
    pub tools_used: Vec<String>,
}

/// Runs one chat exchange: a model turn that may request tools, the tool round, and a
/// closing model turn without tools. At most two model round trips per call; tool calls
/// requested after the tool round are not honoured.
#[derive(Clone)]
pub struct AgentRuntime {
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry>,
    dispatcher: ToolDispatcher,
}

impl AgentRuntime {
    pub fn new(model: Arc<dyn ChatModel>, dispatcher: ToolDispatcher) -> Self {
        Self { model, registry: Arc::new(ToolRegistry::default()), dispatcher }
    }

    /// Loads pricing tables and builds the OpenAI-compatible client described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, RuntimeBuildError> {
        let tables = Arc::new(config.estimating.pricing_tables()?);
        let dispatcher = ToolDispatcher::new(Estimator::new(tables))
            .with_default_markup(config.estimating.default_markup);
        let model = OpenAiChatModel::from_config(&config.llm)?;
        Ok(Self::new(Arc::new(model), dispatcher))
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    pub async fn chat(
        &self,
        history: Vec<ConversationMessage>,
        correlation_id: &str,
    ) -> Result<ChatOutcome, AgentError> {
        let mut transcript = Transcript::new(history);
        info!(
            event_name = "agent.chat.start",
            correlation_id,
            messages = transcript.len(),
            "chat request received"
        );

        let first = self
            .model
            .complete(ChatRequest::with_tools(
                transcript.messages().to_vec(),
                self.registry.descriptors().to_vec(),
            ))
            .await?;

        if !first.wants_tools() {
            info!(
                event_name = "agent.chat.completed",
                correlation_id,
                tools_used = 0,
                "answered without tools"
            );
            return Ok(ChatOutcome {
                response: first.content.unwrap_or_default(),
                tools_used: Vec::new(),
            });
        }

        let mut tools_used = Vec::with_capacity(first.tool_calls.len());
        for call in first.tool_calls {
            let arguments = parse_arguments(&call)?;
            let tool = call.function.name.clone();
            tools_used.push(tool.clone());

            let envelope = self.dispatcher.dispatch(&tool, &arguments);
            info!(
                event_name = "agent.tool.executed",
                correlation_id,
                tool = %tool,
                success = envelope.is_success(),
                "tool call resolved"
            );

            let call_id = call.id.clone();
            transcript.push(ConversationMessage::assistant_tool_call(call));
            transcript.push(ConversationMessage::tool_result(call_id, envelope.to_json_string()));
        }

        let last =
            self.model.complete(ChatRequest::without_tools(transcript.into_messages())).await?;
        info!(
            event_name = "agent.chat.completed",
            correlation_id,
            tools_used = tools_used.len(),
            "answered after tool round"
        );

        Ok(ChatOutcome { response: last.content.unwrap_or_default(), tools_used })
    }
}

fn parse_arguments(call: &ToolCallRequest) -> Result<Value, AgentError> {
    let raw = call.function.arguments.trim();
    if raw.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw).map_err(|source| AgentError::ToolArguments {
        tool: call.function.name.clone(),
        source,
    })
}
