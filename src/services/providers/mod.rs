/// Movie catalog provider abstraction
///
/// The pipeline consumes three catalog operations: genre discovery sorted
/// by popularity, title search, and the trending feed. Keeping them behind
/// a trait lets tests substitute a scripted catalog for the real API.
use crate::{error::AppResult, models::TmdbMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Movies in a genre, most popular first
    async fn discover_by_genre(&self, genre_id: u64, limit: usize) -> AppResult<Vec<TmdbMovie>>;

    /// Movies matching a free-text title query, best match first
    async fn search_title(&self, query: &str) -> AppResult<Vec<TmdbMovie>>;

    /// The day's trending movies
    async fn trending(&self, limit: usize) -> AppResult<Vec<TmdbMovie>>;
}
