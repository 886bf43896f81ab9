use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use contech_agent::tools::ToolSummary;
use contech_agent::{AgentRuntime, ConversationMessage, Role};
use contech_core::{ApplicationError, InterfaceError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Clone, Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatPayload {
    pub messages: Vec<IncomingMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub tools_used: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolSummary>,
}

/// Failure body keeps the success shape so clients can render it the same way.
#[derive(Debug)]
pub struct ChatFailure {
    status: StatusCode,
    error: InterfaceError,
}

impl IntoResponse for ChatFailure {
    fn into_response(self) -> Response {
        let body = ChatResponse {
            response: self.error.user_message().to_string(),
            tools_used: Vec::new(),
        };
        let mut response = (self.status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(self.error.correlation_id()) {
            response.headers_mut().insert(CORRELATION_HEADER, value);
        }
        response
    }
}

pub fn router(runtime: AgentRuntime) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/tools", get(list_tools))
        .with_state(runtime)
}

pub async fn chat(
    State(runtime): State<AgentRuntime>,
    headers: HeaderMap,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<(HeaderMap, Json<ChatResponse>), ChatFailure> {
    let correlation_id = correlation_id(&headers);
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return Err(bad_request(&correlation_id, &rejection.body_text())),
    };
    let history = validate_history(payload, &correlation_id)?;

    info!(
        event_name = "api.chat.received",
        correlation_id = %correlation_id,
        messages = history.len(),
        "chat request accepted"
    );

    match runtime.chat(history, &correlation_id).await {
        Ok(outcome) => {
            info!(
                event_name = "api.chat.completed",
                correlation_id = %correlation_id,
                tools_used = ?outcome.tools_used,
                response_chars = outcome.response.chars().count(),
                "chat request completed"
            );
            let mut response_headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                response_headers.insert(CORRELATION_HEADER, value);
            }
            Ok((
                response_headers,
                Json(ChatResponse { response: outcome.response, tools_used: outcome.tools_used }),
            ))
        }
        Err(agent_error) => {
            error!(
                event_name = "api.chat.failed",
                correlation_id = %correlation_id,
                error = %agent_error,
                "chat request failed"
            );
            let error = ApplicationError::from(agent_error).into_interface(correlation_id);
            Err(ChatFailure { status: StatusCode::INTERNAL_SERVER_ERROR, error })
        }
    }
}

pub async fn list_tools(State(runtime): State<AgentRuntime>) -> Json<ToolListResponse> {
    Json(ToolListResponse { tools: runtime.registry().summaries() })
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn bad_request(correlation_id: &str, reason: &str) -> ChatFailure {
    warn!(event_name = "api.chat.rejected", correlation_id, reason, "chat request rejected");
    ChatFailure {
        status: StatusCode::BAD_REQUEST,
        error: InterfaceError::BadRequest {
            message: reason.to_string(),
            correlation_id: correlation_id.to_string(),
        },
    }
}

fn validate_history(
    payload: ChatPayload,
    correlation_id: &str,
) -> Result<Vec<ConversationMessage>, ChatFailure> {
    if payload.messages.is_empty() {
        return Err(bad_request(correlation_id, "messages must not be empty"));
    }
    if payload.messages.iter().any(|message| message.role == Role::Tool) {
        return Err(bad_request(correlation_id, "tool messages cannot be supplied by the caller"));
    }

    Ok(payload
        .messages
        .into_iter()
        .map(|message| ConversationMessage::new(message.role, message.content))
        .collect())
}
