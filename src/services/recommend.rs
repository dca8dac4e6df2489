use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{GenreTag, Mood, MovieCandidate, SentimentScore, TmdbMovie},
    services::{
        genres::{GenreCatalog, GenreResolver},
        merge::{self, GenreRecommendations},
        mood,
        providers::CatalogProvider,
        retriever::CandidateRetriever,
        sentiment::SentimentScorer,
    },
};

/// Full pipeline output: the classified mood plus per-genre candidate lists
#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub mood: Mood,
    /// Compound polarity, absent when scoring was skipped for empty input
    pub score: Option<f64>,
    pub genres: Vec<GenreRecommendations>,
    pub generated_at: DateTime<Utc>,
}

/// Orchestrates the mood-to-recommendation pipeline
///
/// Scoring, classification and genre resolution run sequentially; retrieval
/// fans out one task per resolved genre and the merger is the join point.
/// This is the single error boundary: a retrieval failure for one genre
/// degrades that genre to an empty list without aborting the rest, while an
/// unresolvable title hint fails the whole call.
pub struct Recommender {
    scorer: SentimentScorer,
    resolver: GenreResolver,
    retriever: CandidateRetriever,
    provider: Arc<dyn CatalogProvider>,
    default_limit: usize,
}

impl Recommender {
    pub fn new(
        scorer: SentimentScorer,
        resolver: GenreResolver,
        retriever: CandidateRetriever,
        provider: Arc<dyn CatalogProvider>,
        default_limit: usize,
    ) -> Self {
        Self {
            scorer,
            resolver,
            retriever,
            provider,
            default_limit,
        }
    }

    pub fn catalog(&self) -> &GenreCatalog {
        self.resolver.catalog()
    }

    /// Scores standalone text: the sentiment analysis operation.
    /// Empty text is rejected here, unlike `recommend`.
    pub fn analyze(&self, text: &str) -> AppResult<(SentimentScore, Mood)> {
        let score = self.scorer.score(text)?;
        Ok((score, mood::classify(score)))
    }

    /// Runs the full pipeline: text and/or a reviewed title in, mood plus
    /// per-genre deduplicated candidate lists out
    pub async fn recommend(
        &self,
        text: Option<&str>,
        title_hint: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<Recommendation> {
        let limit = limit.unwrap_or(self.default_limit);

        // Empty input skips scoring entirely; Neutral is the documented
        // default mood.
        let (score, mood) = match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => {
                let score = self.scorer.score(text)?;
                (Some(score.value()), mood::classify(score))
            }
            None => (None, Mood::Neutral),
        };

        tracing::info!(mood = %mood, scored = score.is_some(), "Mood classified");

        let title_hint = title_hint.map(str::trim).filter(|t| !t.is_empty());
        let (genres, exclude_id) = match title_hint {
            Some(title) => {
                let resolved = self.resolver.genre_for_review(title, mood).await?;
                (vec![resolved.genre], resolved.external_id)
            }
            None => (self.resolver.genres_for_mood(mood)?, None),
        };

        // On the title path the resolved genre already encodes the
        // reaction to the mood, so the dataset's mood column is not
        // filtered on again.
        let mood_filter = if title_hint.is_some() { None } else { Some(mood) };

        let trending = self.fetch_trending(limit).await;
        let groups = self
            .fetch_genres(&genres, mood_filter, limit, exclude_id, &trending)
            .await?;

        Ok(Recommendation {
            mood,
            score,
            genres: merge::merge_groups(groups, limit),
            generated_at: Utc::now(),
        })
    }

    /// Best-effort trending feed; any catalog failure degrades to an empty
    /// supplement
    async fn fetch_trending(&self, limit: usize) -> Vec<TmdbMovie> {
        match self.provider.trending(limit).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, "Trending feed unavailable, continuing without it");
                Vec::new()
            }
        }
    }

    /// Fans out one retrieval task per genre and joins the results
    async fn fetch_genres(
        &self,
        genres: &[GenreTag],
        mood: Option<Mood>,
        limit: usize,
        exclude_id: Option<u64>,
        trending: &[TmdbMovie],
    ) -> AppResult<Vec<(GenreTag, Vec<Vec<MovieCandidate>>)>> {
        let mut tasks = Vec::new();

        for genre in genres {
            let retriever = self.retriever.clone();
            let genre = genre.clone();
            let task = tokio::spawn(async move {
                let result = retriever.fetch(&genre, mood, limit, exclude_id).await;
                (genre, result)
            });
            tasks.push(task);
        }

        let mut groups = Vec::new();
        for task in tasks {
            let (genre, result) = task.await.map_err(|e| AppError::Internal(e.to_string()))?;

            let retrieved = match result {
                Ok(candidates) => candidates,
                Err(e) if e.is_retrieval() => {
                    tracing::warn!(
                        genre = %genre,
                        error = %e,
                        "Retrieval failed for genre, degrading to an empty list"
                    );
                    Vec::new()
                }
                Err(e) => return Err(e),
            };

            let from_trending = self.trending_for_genre(&genre, trending, exclude_id);
            groups.push((genre, vec![retrieved, from_trending]));
        }

        Ok(groups)
    }

    /// Trending entries tagged with the genre's catalog id contribute to
    /// that genre's group behind the discovery results
    fn trending_for_genre(
        &self,
        genre: &GenreTag,
        trending: &[TmdbMovie],
        exclude_id: Option<u64>,
    ) -> Vec<MovieCandidate> {
        let Some(genre_id) = self.resolver.catalog().id_of(genre) else {
            return Vec::new();
        };

        trending
            .iter()
            .filter(|movie| movie.genre_ids.contains(&genre_id))
            .filter(|movie| exclude_id.map_or(true, |id| movie.id != id))
            .map(|movie| movie.clone().into_candidate(genre))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dataset::{DatasetRow, LocalDataset};
    use crate::services::genres::{MoodGenreMap, OppositeGenreMap};
    use crate::services::providers::MockCatalogProvider;

    fn movie(id: u64, title: &str, genre_ids: Vec<u64>) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.to_string(),
            poster_path: None,
            genre_ids,
            release_date: Some("2019-06-01".to_string()),
        }
    }

    fn recommender_with(rows: Vec<DatasetRow>, provider: MockCatalogProvider) -> Recommender {
        let dataset = Arc::new(LocalDataset::from_rows(rows));
        let provider: Arc<dyn CatalogProvider> = Arc::new(provider);
        let catalog = GenreCatalog::tmdb();

        let resolver = GenreResolver::new(
            catalog.clone(),
            MoodGenreMap::default_map(),
            OppositeGenreMap::default_map(),
            dataset.clone(),
            provider.clone(),
        );
        let retriever = CandidateRetriever::new(dataset, provider.clone(), catalog);

        Recommender::new(SentimentScorer::new(), resolver, retriever, provider, 5)
    }

    fn provider_with_discover() -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider.expect_discover_by_genre().returning(|genre_id, _| {
            Ok(vec![
                movie(genre_id * 10 + 1, "First", vec![genre_id]),
                movie(genre_id * 10 + 2, "Second", vec![genre_id]),
            ])
        });
        provider.expect_trending().returning(|_| Ok(vec![]));
        provider
    }

    #[tokio::test]
    async fn test_positive_text_yields_positive_genre_groups() {
        let recommender = recommender_with(vec![], provider_with_discover());

        let recommendation = recommender
            .recommend(Some("I absolutely loved this!"), None, None)
            .await
            .unwrap();

        assert_eq!(recommendation.mood, Mood::Positive);
        assert!(recommendation.score.unwrap() > 0.2);

        let genres: Vec<&str> = recommendation.genres.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(genres, vec!["Comedy", "Romance", "Action"]);
        assert!(recommendation.genres.iter().all(|g| !g.movies.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_text_defaults_to_neutral() {
        let recommender = recommender_with(vec![], provider_with_discover());

        let recommendation = recommender.recommend(Some("   "), None, None).await.unwrap();

        assert_eq!(recommendation.mood, Mood::Neutral);
        assert_eq!(recommendation.score, None);

        let genres: Vec<&str> = recommendation.genres.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(genres, vec!["Drama", "Mystery", "Science Fiction"]);
    }

    #[tokio::test]
    async fn test_unresolvable_title_hint_aborts_the_call() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_search_title().returning(|_| Ok(vec![]));

        let recommender = recommender_with(vec![], provider);
        let result = recommender
            .recommend(Some("great movie"), Some("No Such Title"), None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_negative_review_of_horror_recommends_romance() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_title()
            .returning(|_| Ok(vec![movie(694, "The Shining", vec![27])]));
        provider.expect_trending().returning(|_| Ok(vec![]));
        provider
            .expect_discover_by_genre()
            .withf(|genre_id, _| *genre_id == 10749)
            .returning(|_, _| {
                Ok(vec![
                    movie(694, "The Shining", vec![27]),
                    movie(11036, "The Notebook", vec![10749]),
                ])
            });

        let recommender = recommender_with(vec![], provider);
        let recommendation = recommender
            .recommend(Some("I hated it, truly awful and disappointing."), Some("The Shining"), None)
            .await
            .unwrap();

        assert_eq!(recommendation.mood, Mood::Negative);
        assert_eq!(recommendation.genres.len(), 1);
        assert_eq!(recommendation.genres[0].genre.as_str(), "Romance");

        // The reviewed movie never recommends itself.
        let movies = &recommendation.genres[0].movies;
        assert!(movies.iter().all(|c| c.external_id != Some(694)));
        assert!(movies.iter().any(|c| c.title == "The Notebook"));
    }

    #[tokio::test]
    async fn test_retrieval_failure_degrades_single_genre() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_trending().returning(|_| Ok(vec![]));
        provider.expect_discover_by_genre().returning(|genre_id, _| {
            // Only the Comedy bucket fails.
            if genre_id == 35 {
                Err(AppError::Retrieval("status 503".to_string()))
            } else {
                Ok(vec![movie(genre_id, "Survivor", vec![genre_id])])
            }
        });

        let recommender = recommender_with(vec![], provider);
        let recommendation = recommender
            .recommend(Some("I absolutely loved this!"), None, None)
            .await
            .unwrap();

        let comedy = recommendation
            .genres
            .iter()
            .find(|g| g.genre.as_str() == "Comedy")
            .unwrap();
        assert!(comedy.movies.is_empty());

        let others: Vec<_> = recommendation
            .genres
            .iter()
            .filter(|g| g.genre.as_str() != "Comedy")
            .collect();
        assert!(others.iter().all(|g| !g.movies.is_empty()));
    }

    #[tokio::test]
    async fn test_trending_supplements_matching_genre_after_discovery() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_trending()
            .returning(|_| Ok(vec![movie(900, "Trending Romance", vec![10749])]));
        provider.expect_discover_by_genre().returning(|genre_id, _| {
            Ok(vec![movie(genre_id, "Discovered", vec![genre_id])])
        });

        let recommender = recommender_with(vec![], provider);
        let recommendation = recommender
            .recommend(Some("I absolutely loved this!"), None, None)
            .await
            .unwrap();

        let romance = recommendation
            .genres
            .iter()
            .find(|g| g.genre.as_str() == "Romance")
            .unwrap();

        assert_eq!(romance.movies[0].title, "Discovered");
        assert!(romance.movies.iter().any(|c| c.title == "Trending Romance"));

        // Trending entries only land in genres they are tagged with.
        let comedy = recommendation
            .genres
            .iter()
            .find(|g| g.genre.as_str() == "Comedy")
            .unwrap();
        assert!(comedy.movies.iter().all(|c| c.title != "Trending Romance"));
    }

    #[tokio::test]
    async fn test_trending_failure_is_soft() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_trending()
            .returning(|_| Err(AppError::Retrieval("status 500".to_string())));
        provider.expect_discover_by_genre().returning(|genre_id, _| {
            Ok(vec![movie(genre_id, "Still Works", vec![genre_id])])
        });

        let recommender = recommender_with(vec![], provider);
        let recommendation = recommender
            .recommend(Some("I absolutely loved this!"), None, None)
            .await
            .unwrap();

        assert!(recommendation.genres.iter().all(|g| !g.movies.is_empty()));
    }

    #[tokio::test]
    async fn test_local_dataset_feeds_mood_path() {
        let rows = vec![
            DatasetRow {
                title: "Local Comedy".to_string(),
                genre: "Comedy".to_string(),
                mood: Some("positive".to_string()),
                release_year: Some("2001".to_string()),
            },
        ];

        // Comedy is served locally; the other genres still hit remote.
        let mut provider = MockCatalogProvider::new();
        provider.expect_trending().returning(|_| Ok(vec![]));
        provider
            .expect_discover_by_genre()
            .withf(|genre_id, _| *genre_id != 35)
            .returning(|genre_id, _| Ok(vec![movie(genre_id, "Remote", vec![genre_id])]));

        let recommender = recommender_with(rows, provider);
        let recommendation = recommender
            .recommend(Some("I absolutely loved this!"), None, None)
            .await
            .unwrap();

        let comedy = recommendation
            .genres
            .iter()
            .find(|g| g.genre.as_str() == "Comedy")
            .unwrap();
        assert_eq!(comedy.movies.len(), 1);
        assert_eq!(comedy.movies[0].title, "Local Comedy");
        assert_eq!(comedy.movies[0].external_id, None);
    }

    #[test]
    fn test_analyze_rejects_empty_text() {
        let recommender = recommender_with(vec![], MockCatalogProvider::new());
        assert!(matches!(recommender.analyze("  "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_analyze_classifies_text() {
        let recommender = recommender_with(vec![], MockCatalogProvider::new());
        let (score, mood) = recommender.analyze("I absolutely loved this!").unwrap();
        assert!(score.value() > 0.2);
        assert_eq!(mood, Mood::Positive);
    }
}
