use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{TmdbMovie, TmdbPage},
    services::providers::CatalogProvider,
};

/// TMDB catalog provider
///
/// Consumes three endpoints: `/discover/movie` (genre discovery sorted by
/// popularity), `/search/movie` (title search) and `/trending/movie/day`.
/// Responses are cached with the configured TTL, so repeat queries inside
/// the window never re-issue the network call. The full page is cached and
/// the caller's limit applied afterwards, keeping the cache key independent
/// of the requested length.
#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: Duration,
}

impl TmdbProvider {
    /// Creates a provider with a per-request timeout on all outbound calls
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            cache,
            cache_ttl,
        })
    }

    /// Issues a GET and unwraps the paged listing envelope
    async fn get_page(&self, url: &str, query: &[(&str, &str)]) -> AppResult<Vec<TmdbMovie>> {
        let response = self.http_client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Retrieval(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let page: TmdbPage = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse TMDB response: {}", e)))?;

        Ok(page.results)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover_by_genre(&self, genre_id: u64, limit: usize) -> AppResult<Vec<TmdbMovie>> {
        let movies: AppResult<Vec<TmdbMovie>> = cached!(
            self.cache,
            CacheKey::Discover(genre_id),
            self.cache_ttl,
            async {
                let url = format!("{}/discover/movie", self.api_url);
                let genre_param = genre_id.to_string();

                let results = self
                    .get_page(
                        &url,
                        &[
                            ("api_key", self.api_key.as_str()),
                            ("with_genres", genre_param.as_str()),
                            ("sort_by", "popularity.desc"),
                        ],
                    )
                    .await?;

                tracing::info!(
                    genre_id,
                    results = results.len(),
                    provider = "tmdb",
                    "Genre discovery completed"
                );

                Ok::<_, AppError>(results)
            }
        );

        Ok(movies?.into_iter().take(limit).collect())
    }

    async fn search_title(&self, query: &str) -> AppResult<Vec<TmdbMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::Validation(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search(query.to_string()),
            self.cache_ttl,
            async {
                let url = format!("{}/search/movie", self.api_url);

                let results = self
                    .get_page(&url, &[("api_key", self.api_key.as_str()), ("query", query)])
                    .await?;

                tracing::info!(
                    query = %query,
                    results = results.len(),
                    provider = "tmdb",
                    "Title search completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    async fn trending(&self, limit: usize) -> AppResult<Vec<TmdbMovie>> {
        let movies: AppResult<Vec<TmdbMovie>> = cached!(
            self.cache,
            CacheKey::Trending,
            self.cache_ttl,
            async {
                let url = format!("{}/trending/movie/day", self.api_url);

                let results = self
                    .get_page(&url, &[("api_key", self.api_key.as_str())])
                    .await?;

                tracing::info!(
                    results = results.len(),
                    provider = "tmdb",
                    "Trending feed fetched"
                );

                Ok::<_, AppError>(results)
            }
        );

        Ok(movies?.into_iter().take(limit).collect())
    }
}
