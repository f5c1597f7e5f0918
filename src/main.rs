use std::sync::Arc;

use farrin_api::{
    config::Config,
    db::{self, DestinationStore, MemoryStore, PgStore, ProfileStore},
    routes::{create_router, AppState},
    services::{FeatureMappings, HttpScoringClient, RecommendationService},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    tracing::info!("Starting Farrin recommendations API...");

    let (profiles, destinations): (Arc<dyn ProfileStore>, Arc<dyn DestinationStore>) =
        match config.database_url.as_deref() {
            Some(database_url) => {
                let pool = db::create_pool(database_url, config.db_max_connections).await?;
                tracing::info!(max_connections = config.db_max_connections, "Connected to PostgreSQL");
                let store = Arc::new(PgStore::new(pool));
                (
                    store.clone() as Arc<dyn ProfileStore>,
                    store as Arc<dyn DestinationStore>,
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, serving seeded in-memory demo data");
                let store = MemoryStore::new();
                db::seed_demo_data(&store).await?;
                let store = Arc::new(store);
                (
                    store.clone() as Arc<dyn ProfileStore>,
                    store as Arc<dyn DestinationStore>,
                )
            }
        };

    let mappings = Arc::new(FeatureMappings::load_or_default(&config.feature_mappings_path));
    let model = Arc::new(HttpScoringClient::new(
        config.scoring_service_url.clone(),
        config.scoring_timeout(),
    )?);

    let service = RecommendationService::new(profiles, destinations, model, mappings);
    let app = create_router(AppState::new(service));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
