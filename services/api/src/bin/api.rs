//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, OpenAiQuizAdapter},
    config::Config,
    error::ApiError,
    web::{self, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Model Adapter ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let quiz_adapter = Arc::new(OpenAiQuizAdapter::new(
        Client::with_config(openai_config),
        config.quiz_model.clone(),
    ));
    info!(model = %config.quiz_model, "Quiz model configured");

    // --- 4. Build the Shared AppState ---
    let templates = config.load_prompt_templates()?;
    let app_state = Arc::new(AppState::new(
        db_adapter.clone(),
        db_adapter,
        quiz_adapter,
        templates,
    ));

    // --- 5. Start the Server ---
    let app = web::router(app_state);
    info!("Starting server on {}", config.bind_address);
    info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
