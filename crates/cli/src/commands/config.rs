use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use contech_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let llm = &config.llm;
    vec![
        Field {
            key: "llm.provider",
            value: format!("{:?}", llm.provider),
            env_keys: &["CONTECH_LLM_PROVIDER"],
        },
        Field { key: "llm.model", value: llm.model.clone(), env_keys: &["CONTECH_LLM_MODEL"] },
        Field {
            key: "llm.base_url",
            value: llm.endpoint_base(),
            env_keys: &["CONTECH_LLM_BASE_URL"],
        },
        Field {
            key: "llm.api_key",
            value: if llm.api_key.is_some() { "<redacted>" } else { "<unset>" }.to_string(),
            env_keys: &["CONTECH_LLM_API_KEY", "OPENAI_API_KEY"],
        },
        Field {
            key: "llm.timeout_secs",
            value: llm.timeout_secs.to_string(),
            env_keys: &["CONTECH_LLM_TIMEOUT_SECS"],
        },
        Field {
            key: "llm.temperature",
            value: llm.temperature.map_or_else(|| "<unset>".to_string(), |value| value.to_string()),
            env_keys: &["CONTECH_LLM_TEMPERATURE"],
        },
        Field {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["CONTECH_SERVER_BIND_ADDRESS"],
        },
        Field {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["CONTECH_SERVER_PORT"],
        },
        Field {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["CONTECH_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key: "estimating.pricing_path",
            value: config
                .estimating
                .pricing_path
                .as_ref()
                .map_or_else(|| "<builtin>".to_string(), |path| path.display().to_string()),
            env_keys: &["CONTECH_ESTIMATING_PRICING_PATH"],
        },
        Field {
            key: "estimating.default_markup",
            value: config.estimating.default_markup.to_string(),
            env_keys: &["CONTECH_ESTIMATING_DEFAULT_MARKUP"],
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["CONTECH_LOGGING_LEVEL", "CONTECH_LOG_LEVEL"],
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["CONTECH_LOGGING_FORMAT", "CONTECH_LOG_FORMAT"],
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("contech.toml"), PathBuf::from("config/contech.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
