mod app;
mod auth;
mod config;
mod error;
mod state;
mod store;
mod therapy;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mirror_mirror=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;
    if state.config.therapy.remote.is_some() {
        tracing::info!("remote therapy model configured, local templates on standby");
    } else {
        tracing::info!("no remote model configured, using local templates");
    }

    let app = app::build_app(state);
    app::serve(app).await
}
