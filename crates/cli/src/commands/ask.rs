use contech_agent::{AgentRuntime, ConversationMessage};
use contech_core::config::{AppConfig, LoadOptions};
use contech_core::ApplicationError;

use crate::commands::CommandResult;

const CORRELATION_ID: &str = "cli-ask";

pub fn run(message: &str) -> CommandResult {
    if message.trim().is_empty() {
        return CommandResult::failure("ask", "invalid_argument", "message must not be empty", 2);
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let agent = match AgentRuntime::from_config(&config) {
        Ok(agent) => agent,
        Err(error) => return CommandResult::failure("ask", "runtime_init", error.to_string(), 3),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let history = vec![ConversationMessage::user(message)];
    match runtime.block_on(agent.chat(history, CORRELATION_ID)) {
        Ok(outcome) => CommandResult::json("ask", &outcome),
        Err(error) => match ApplicationError::from(error) {
            ApplicationError::ToolArguments(message) => {
                CommandResult::failure("ask", "tool_arguments", message, 4)
            }
            other => CommandResult::failure("ask", "provider", other.to_string(), 4),
        },
    }
}
