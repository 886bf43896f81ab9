mod bootstrap;
mod chat;
mod health;

use std::time::Duration;

use anyhow::Result;
use axum::Router;
use contech_agent::AgentRuntime;
use contech_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use contech_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn app(runtime: AgentRuntime) -> Router {
    chat::router(runtime.clone()).merge(health::router(runtime))
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging must be up before bootstrap so its events are recorded.
    let config = bootstrap::load_config(LoadOptions::default())?;
    init_logging(&config);

    let app_state = bootstrap::bootstrap_with_config(config)?;
    let server = &app_state.config.server;
    let address = format!("{}:{}", server.bind_address, server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        ai_model = %app_state.runtime.model_name(),
        "contech-server listening"
    );

    let grace = Duration::from_secs(app_state.config.server.graceful_shutdown_secs);
    axum::serve(listener, app(app_state.runtime))
        .with_graceful_shutdown(wait_for_shutdown(grace))
        .await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "contech-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown(grace: Duration) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for shutdown signal"
        );
        return;
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "draining in-flight requests"
    );
    // Hard stop if draining outlives the grace period.
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!(
            event_name = "system.server.grace_expired",
            correlation_id = "shutdown",
            "graceful shutdown window elapsed; exiting"
        );
        std::process::exit(1);
    });
}
