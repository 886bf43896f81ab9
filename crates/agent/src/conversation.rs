use serde::{Deserialize, Serialize};

/// Standing instructions placed ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "\
You are contech, a construction assistant that gets work done with tools rather than talk.

How to behave:
- When someone asks for a number, a quantity, a cost, or a document, call the matching tool and report its real result.
- Do not describe what you could do when you can simply do it.
- Keep answers short and in plain language; anyone on a job site should be able to follow them.
- When someone asks what you can do or which tools exist, call list_available_tools.
- If a tool reports an error, say what was missing and what values are available.

You can generate proposals, work out material quantities and costs, price labor and equipment, \
and build complete project estimates with markup.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object exactly as the model produced it.
    pub arguments: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type", default = "function_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn function_call_type() -> String {
    "function".to_string()
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: function_call_type(),
            function: FunctionCall { name: name.into(), arguments: arguments.into() },
        }
    }
}

/// One turn of a chat transcript, shaped the way OpenAI-compatible endpoints expect it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: Some(content.into()), tool_call_id: None, tool_calls: None }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Records that the assistant invoked `call`, with its original id and arguments.
    pub fn assistant_tool_call(call: ToolCallRequest) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            tool_call_id: None,
            tool_calls: Some(vec![call]),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }
}

/// Append-only message sequence for one chat request, always led by [`SYSTEM_PROMPT`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ConversationMessage>,
}

impl Transcript {
    pub fn new(history: Vec<ConversationMessage>) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ConversationMessage::system(SYSTEM_PROMPT));
        messages.extend(history);
        Self { messages }
    }

    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<ConversationMessage> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ConversationMessage, Role, ToolCallRequest, Transcript, SYSTEM_PROMPT};

    #[test]
    fn transcript_starts_with_system_prompt() {
        let transcript =
            Transcript::new(vec![ConversationMessage::user("price 100ft of 6 inch pipe")]);

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(transcript.messages()[0].content.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(transcript.messages()[1].role, Role::User);
    }

    #[test]
    fn tool_call_turn_serializes_with_null_content() {
        let call = ToolCallRequest::new(
            "call_1",
            "calculate_labor_cost",
            r#"{"labor_type":"operator","hours":40}"#,
        );
        let message = ConversationMessage::assistant_tool_call(call);
        let value = serde_json::to_value(message).expect("serialize");

        assert_eq!(
            value,
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "calculate_labor_cost",
                        "arguments": "{\"labor_type\":\"operator\",\"hours\":40}"
                    }
                }]
            })
        );
    }

    #[test]
    fn tool_result_keeps_correlation_id() {
        let value = serde_json::to_value(ConversationMessage::tool_result("call_9", "{}"))
            .expect("serialize");

        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_9");
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn provider_tool_calls_without_type_default_to_function() {
        let call: ToolCallRequest = serde_json::from_value(json!({
            "id": "call_2",
            "function": {"name": "list_available_tools", "arguments": "{}"}
        }))
        .expect("deserialize");

        assert_eq!(call.call_type, "function");
    }
}
