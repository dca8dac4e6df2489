use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{GenreTag, Mood, MovieCandidate},
    services::{dataset::LocalDataset, genres::GenreCatalog, providers::CatalogProvider},
};

/// Retrieves ranked movie candidates for a single genre
///
/// The local dataset wins whenever it has at least one row matching the
/// (genre, mood) filter; the remote catalog is consulted only when the
/// local source comes up empty. Merging across genres happens one level
/// up, in the merger.
#[derive(Clone)]
pub struct CandidateRetriever {
    dataset: Arc<LocalDataset>,
    provider: Arc<dyn CatalogProvider>,
    catalog: GenreCatalog,
}

impl CandidateRetriever {
    pub fn new(
        dataset: Arc<LocalDataset>,
        provider: Arc<dyn CatalogProvider>,
        catalog: GenreCatalog,
    ) -> Self {
        Self {
            dataset,
            provider,
            catalog,
        }
    }

    /// Fetches up to `limit` candidates for a genre, excluding the given
    /// catalog id (the reviewed movie itself) from remote results
    pub async fn fetch(
        &self,
        genre: &GenreTag,
        mood: Option<Mood>,
        limit: usize,
        exclude_id: Option<u64>,
    ) -> AppResult<Vec<MovieCandidate>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let local = self.dataset.sample(genre, mood, limit);
        if !local.is_empty() {
            tracing::debug!(
                genre = %genre,
                results = local.len(),
                source = "local",
                "Candidates retrieved"
            );
            return Ok(local);
        }

        self.fetch_remote(genre, limit, exclude_id).await
    }

    async fn fetch_remote(
        &self,
        genre: &GenreTag,
        limit: usize,
        exclude_id: Option<u64>,
    ) -> AppResult<Vec<MovieCandidate>> {
        let genre_id = self.catalog.id_of(genre).ok_or_else(|| {
            AppError::Config(format!("Genre '{}' is not in the catalog vocabulary", genre))
        })?;

        // One extra result so excluding the reviewed movie cannot leave
        // the list short.
        let movies = self
            .provider
            .discover_by_genre(genre_id, limit.saturating_add(1))
            .await?;

        let candidates: Vec<MovieCandidate> = movies
            .into_iter()
            .filter(|movie| exclude_id.map_or(true, |id| movie.id != id))
            .take(limit)
            .map(|movie| movie.into_candidate(genre))
            .collect();

        tracing::debug!(
            genre = %genre,
            results = candidates.len(),
            source = "remote",
            "Candidates retrieved"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TmdbMovie;
    use crate::services::dataset::DatasetRow;
    use crate::services::providers::MockCatalogProvider;

    fn movie(id: u64, title: &str) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.to_string(),
            poster_path: None,
            genre_ids: vec![27],
            release_date: Some("1980-05-23".to_string()),
        }
    }

    fn row(title: &str, genre: &str) -> DatasetRow {
        DatasetRow {
            title: title.to_string(),
            genre: genre.to_string(),
            mood: None,
            release_year: None,
        }
    }

    fn retriever_with(rows: Vec<DatasetRow>, provider: MockCatalogProvider) -> CandidateRetriever {
        CandidateRetriever::new(
            Arc::new(LocalDataset::from_rows(rows)),
            Arc::new(provider),
            GenreCatalog::tmdb(),
        )
    }

    #[tokio::test]
    async fn test_local_rows_win_over_remote() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_discover_by_genre().times(0);

        let retriever = retriever_with(vec![row("Airplane!", "Comedy")], provider);
        let candidates = retriever
            .fetch(&GenreTag::new("Comedy"), None, 5, None)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Airplane!");
    }

    #[tokio::test]
    async fn test_zero_local_matches_falls_back_to_remote() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_discover_by_genre()
            .withf(|genre_id, _| *genre_id == 27)
            .returning(|_, _| Ok(vec![movie(1, "The Shining"), movie(2, "Alien")]));

        // Dataset has rows, just none for Horror.
        let retriever = retriever_with(vec![row("Airplane!", "Comedy")], provider);
        let candidates = retriever
            .fetch(&GenreTag::new("Horror"), None, 5, None)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "The Shining");
        assert_eq!(candidates[0].external_id, Some(1));
        assert_eq!(candidates[0].genre, "Horror");
        assert_eq!(candidates[0].release_year, Some("1980".to_string()));
    }

    #[tokio::test]
    async fn test_remote_excludes_the_reviewed_movie() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_discover_by_genre()
            // limit + 1 buffer requested so exclusion cannot shorten the list
            .withf(|_, limit| *limit == 3)
            .returning(|_, _| Ok(vec![movie(1, "A"), movie(2, "B"), movie(3, "C")]));

        let retriever = retriever_with(vec![], provider);
        let candidates = retriever
            .fetch(&GenreTag::new("Horror"), None, 2, Some(2))
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.external_id != Some(2)));
    }

    #[tokio::test]
    async fn test_remote_failure_propagates_as_retrieval_error() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_discover_by_genre()
            .returning(|_, _| Err(AppError::Retrieval("status 503".to_string())));

        let retriever = retriever_with(vec![], provider);
        let result = retriever.fetch(&GenreTag::new("Horror"), None, 5, None).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().is_retrieval());
    }

    #[tokio::test]
    async fn test_unknown_genre_is_a_config_error() {
        let retriever = retriever_with(vec![], MockCatalogProvider::new());
        let result = retriever.fetch(&GenreTag::new("Polka"), None, 5, None).await;

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_zero_limit_short_circuits() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_discover_by_genre().times(0);

        let retriever = retriever_with(vec![], provider);
        let candidates = retriever
            .fetch(&GenreTag::new("Horror"), None, 0, None)
            .await
            .unwrap();

        assert!(candidates.is_empty());
    }
}
