use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use sentimind_api::{
    api::{create_router, AppState},
    cache::Cache,
    config::Config,
    services::{
        dataset::LocalDataset,
        genres::{GenreCatalog, GenreResolver, MoodGenreMap, OppositeGenreMap},
        providers::{CatalogProvider, TmdbProvider},
        recommend::Recommender,
        retriever::CandidateRetriever,
        sentiment::SentimentScorer,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let dataset = Arc::new(LocalDataset::load(&config.dataset_path)?);
    let provider: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::new(
        Cache::new(),
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
        Duration::from_secs(config.cache_ttl_secs),
    )?);

    let catalog = GenreCatalog::tmdb();
    let resolver = GenreResolver::new(
        catalog.clone(),
        MoodGenreMap::default_map(),
        OppositeGenreMap::default_map(),
        dataset.clone(),
        provider.clone(),
    );
    let retriever = CandidateRetriever::new(dataset, provider.clone(), catalog);

    let recommender = Arc::new(Recommender::new(
        SentimentScorer::new(),
        resolver,
        retriever,
        provider,
        config.result_limit,
    ));

    let app = create_router(AppState::new(recommender));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
