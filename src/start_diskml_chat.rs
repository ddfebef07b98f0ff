//! Startup helpers for the chat server binary.

use std::process::ExitCode;

use crate::chat::config::ChatConfig;
use crate::server::{self, AppState};

/// Run the server (used by the `diskml-chat` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting diskml-chat v{}", env!("CARGO_PKG_VERSION"));

    let config = ChatConfig::from_env();
    tracing::info!(
        "Generation endpoint: {} (model {})",
        config.base_url,
        config.model
    );

    let port = config.port;
    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server(state, port)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
