use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pmprep_ai::{ClaudeClient, WhisperClient};
use pmprep_api::{build_router, state::AppState};
use pmprep_config::Settings;
use pmprep_services::{auth::AuthService, storage::AudioStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("failed to load settings")?;

    let db = pmprep_db::connect(&settings.mongodb.uri, &settings.mongodb.database)
        .await
        .context("failed to connect to MongoDB")?;
    pmprep_db::indexes::ensure_indexes(&db).await?;

    let audio = AudioStore::new(&settings.storage.upload_dir);
    audio.init().await.context("failed to create upload dir")?;

    let transcriber = Arc::new(WhisperClient::new(
        &settings.transcription.base_url,
        &settings.transcription.api_key,
        &settings.transcription.model,
        Duration::from_secs(settings.transcription.timeout_secs),
    )?);
    let evaluator = Arc::new(ClaudeClient::new(
        &settings.evaluation.base_url,
        &settings.evaluation.api_key,
        &settings.evaluation.model,
        settings.evaluation.max_tokens,
        Duration::from_secs(settings.evaluation.timeout_secs),
    )?);

    let auth = AuthService::new(
        settings.auth.jwt_secret.clone(),
        settings.auth.token_ttl_secs,
    );
    let state = AppState::new(&db, auth, audio, transcriber, evaluator);
    let app = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "pmprep-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
