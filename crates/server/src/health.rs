use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use contech_agent::AgentRuntime;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub tools_available: usize,
    pub ai_model: String,
    pub checked_at: String,
}

pub fn router(runtime: AgentRuntime) -> Router {
    Router::new().route("/health", get(health)).with_state(runtime)
}

/// Informational only; does not probe the chat provider.
pub async fn health(State(runtime): State<AgentRuntime>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contech",
        tools_available: runtime.registry().len(),
        ai_model: runtime.model_name().to_string(),
        checked_at: Utc::now().to_rfc3339(),
    })
}
