use std::sync::Arc;
use std::time::Duration;

use alexandria_api::{
    config::Config,
    db::{create_pool, init_schema, PgStore},
    routes::{create_router, AppState},
    services::{OpenAiProvider, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alexandria_api=info,tower_http=info".into()),
        )
        .init();

    // Connect to the database and make sure the schema exists
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;

    let provider = OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.ai_timeout_secs),
    )?;

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        recommender: Arc::new(Recommender::new(Arc::new(provider))),
        api_key: config.api_key.clone(),
    };

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, model = %config.openai_model, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
