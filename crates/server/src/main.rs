use briefing::{BriefingGenerator, OpenRouterClient};
use server::config::ServerConfig;
use server::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let briefing_generator = config.openrouter_api_key.as_ref().map(|api_key| {
        BriefingGenerator::new(
            OpenRouterClient::new(api_key.clone(), config.openrouter_base_url.clone()),
            config.briefing_model.clone(),
        )
    });
    if briefing_generator.is_none() {
        tracing::warn!("SCENARIO_OPENROUTER_API_KEY not set; debrief generation disabled");
    }

    let state = AppState::new(pool, briefing_generator);
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
