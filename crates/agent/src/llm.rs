use std::time::Duration;

use async_trait::async_trait;
use contech_core::config::LlmConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::conversation::{ConversationMessage, ToolCallRequest};
use crate::tools::ToolDescriptor;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat model request timed out after {0}s")]
    Timeout(u64),
    #[error("chat model transport failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("chat model returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat model response could not be decoded: {0}")]
    Decode(String),
    #[error("chat model returned no choices")]
    EmptyResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ConversationMessage>,
    pub tools: Vec<ToolDescriptor>,
}

impl ChatRequest {
    pub fn with_tools(messages: Vec<ConversationMessage>, tools: Vec<ToolDescriptor>) -> Self {
        Self { messages, tools }
    }

    pub fn without_tools(messages: Vec<ConversationMessage>) -> Self {
        Self { messages, tools: Vec::new() }
    }

    /// Tool choice is only sent when there is something to choose from.
    pub fn tool_choice(&self) -> Option<ToolChoice> {
        (!self.tools.is_empty()).then_some(ToolChoice::Auto)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self { content: None, tool_calls: calls }
    }

    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError>;
}

/// Client for any endpoint that speaks the OpenAI chat-completions protocol.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    model: String,
    temperature: Option<f32>,
    timeout_secs: u64,
}

impl OpenAiChatModel {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LlmError::Transport)?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.endpoint_base()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn wire_request<'a>(&'a self, request: &'a ChatRequest) -> WireRequest<'a> {
        let tools = (!request.tools.is_empty()).then(|| {
            request
                .tools
                .iter()
                .map(|tool| WireTool {
                    tool_type: "function",
                    function: WireFunction {
                        name: &tool.name,
                        description: &tool.description,
                        parameters: &tool.parameters,
                    },
                })
                .collect()
        });

        WireRequest {
            model: &self.model,
            messages: &request.messages,
            tools,
            tool_choice: request.tool_choice(),
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError> {
        debug!(
            event_name = "agent.llm.request",
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion request"
        );

        let mut builder = self.client.post(&self.endpoint).json(&self.wire_request(&request));
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|error| self.classify(error))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let body = response.text().await.map_err(|error| self.classify(error))?;
        parse_reply(&body)
    }
}

impl OpenAiChatModel {
    fn classify(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout(self.timeout_secs)
        } else {
            LlmError::Transport(error)
        }
    }
}

fn parse_reply(body: &str) -> Result<ChatReply, LlmError> {
    let response: WireResponse =
        serde_json::from_str(body).map_err(|error| LlmError::Decode(error.to_string()))?;
    let choice = response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;

    Ok(ChatReply {
        content: choice.message.content,
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
    })
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallRequest>>,
}
