use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{GenreTag, Mood},
    services::{dataset::LocalDataset, providers::CatalogProvider},
};

/// Fixed genre vocabulary: catalog genre names and their TMDB integer ids
///
/// Injected at construction, never computed, so tests can run against
/// alternate tables. Entry order is preserved for listing.
#[derive(Debug, Clone)]
pub struct GenreCatalog {
    entries: Vec<(GenreTag, u64)>,
}

impl GenreCatalog {
    pub fn new(entries: Vec<(GenreTag, u64)>) -> Self {
        Self { entries }
    }

    /// The standard TMDB movie genre table
    pub fn tmdb() -> Self {
        Self::new(vec![
            (GenreTag::new("Action"), 28),
            (GenreTag::new("Adventure"), 12),
            (GenreTag::new("Animation"), 16),
            (GenreTag::new("Comedy"), 35),
            (GenreTag::new("Crime"), 80),
            (GenreTag::new("Documentary"), 99),
            (GenreTag::new("Drama"), 18),
            (GenreTag::new("Family"), 10751),
            (GenreTag::new("Fantasy"), 14),
            (GenreTag::new("Horror"), 27),
            (GenreTag::new("Mystery"), 9648),
            (GenreTag::new("Romance"), 10749),
            (GenreTag::new("Science Fiction"), 878),
            (GenreTag::new("Thriller"), 53),
        ])
    }

    /// Catalog id for a tag, matched case-insensitively
    pub fn id_of(&self, tag: &GenreTag) -> Option<u64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_str().eq_ignore_ascii_case(tag.as_str()))
            .map(|(_, id)| *id)
    }

    /// Vocabulary tag for a free-text genre name, trimmed and
    /// case-insensitive
    pub fn tag_by_name(&self, name: &str) -> Option<&GenreTag> {
        let needle = name.trim();
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_str().eq_ignore_ascii_case(needle))
            .map(|(entry, _)| entry)
    }

    /// Vocabulary tag for a catalog id
    pub fn tag_by_id(&self, id: u64) -> Option<&GenreTag> {
        self.entries
            .iter()
            .find(|(_, entry_id)| *entry_id == id)
            .map(|(entry, _)| entry)
    }

    pub fn entries(&self) -> &[(GenreTag, u64)] {
        &self.entries
    }
}

/// Mood → ordered genre list
///
/// Insertion order is display priority: the first genre renders first in
/// the grouped output.
#[derive(Debug, Clone)]
pub struct MoodGenreMap {
    entries: Vec<(Mood, Vec<GenreTag>)>,
}

impl MoodGenreMap {
    /// Builds a map, failing fast when any mood is left unmapped so an
    /// incomplete table surfaces at startup rather than mid-request
    pub fn new(entries: Vec<(Mood, Vec<GenreTag>)>) -> AppResult<Self> {
        for mood in Mood::ALL {
            if !entries.iter().any(|(entry, _)| *entry == mood) {
                return Err(AppError::Config(format!(
                    "MoodGenreMap has no entry for mood '{}'",
                    mood
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The shipped mood-to-genre table. Negative moods get deliberately
    /// lighter genres than the input sentiment.
    pub fn default_map() -> Self {
        Self {
            entries: vec![
                (
                    Mood::Positive,
                    vec![
                        GenreTag::new("Comedy"),
                        GenreTag::new("Romance"),
                        GenreTag::new("Action"),
                    ],
                ),
                (
                    Mood::Neutral,
                    vec![
                        GenreTag::new("Drama"),
                        GenreTag::new("Mystery"),
                        GenreTag::new("Science Fiction"),
                    ],
                ),
                (
                    Mood::Negative,
                    vec![
                        GenreTag::new("Comedy"),
                        GenreTag::new("Animation"),
                        GenreTag::new("Family"),
                    ],
                ),
            ],
        }
    }

    pub fn genres_for(&self, mood: Mood) -> Option<&[GenreTag]> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == mood)
            .map(|(_, genres)| genres.as_slice())
    }
}

/// Contrasting genres for negative reviews
///
/// Keyed by the reviewed movie's catalog genre id; ids without an entry
/// fall back to the default tag.
#[derive(Debug, Clone)]
pub struct OppositeGenreMap {
    entries: HashMap<u64, GenreTag>,
    default: GenreTag,
}

impl OppositeGenreMap {
    pub fn new(entries: HashMap<u64, GenreTag>, default: GenreTag) -> Self {
        Self { entries, default }
    }

    /// The shipped contrast table
    pub fn default_map() -> Self {
        let entries = HashMap::from([
            (27, GenreTag::new("Romance")),     // Horror
            (53, GenreTag::new("Family")),      // Thriller
            (18, GenreTag::new("Comedy")),      // Drama
            (80, GenreTag::new("Comedy")),      // Crime
            (9648, GenreTag::new("Animation")), // Mystery
        ]);

        Self::new(entries, GenreTag::new("Comedy"))
    }

    pub fn opposite_of(&self, genre_id: u64) -> &GenreTag {
        self.entries.get(&genre_id).unwrap_or(&self.default)
    }
}

/// The genre resolved for a reviewed title, with the catalog id of the
/// reviewed movie itself when it was found remotely (so retrieval can
/// exclude it from its own recommendations)
#[derive(Debug, Clone)]
pub struct ResolvedReview {
    pub genre: GenreTag,
    pub external_id: Option<u64>,
}

/// Resolves moods and reviewed titles into target genres
pub struct GenreResolver {
    catalog: GenreCatalog,
    mood_map: MoodGenreMap,
    opposite_map: OppositeGenreMap,
    dataset: Arc<LocalDataset>,
    provider: Arc<dyn CatalogProvider>,
}

impl GenreResolver {
    pub fn new(
        catalog: GenreCatalog,
        mood_map: MoodGenreMap,
        opposite_map: OppositeGenreMap,
        dataset: Arc<LocalDataset>,
        provider: Arc<dyn CatalogProvider>,
    ) -> Self {
        Self {
            catalog,
            mood_map,
            opposite_map,
            dataset,
            provider,
        }
    }

    pub fn catalog(&self) -> &GenreCatalog {
        &self.catalog
    }

    /// Direct MoodGenreMap lookup
    pub fn genres_for_mood(&self, mood: Mood) -> AppResult<Vec<GenreTag>> {
        self.mood_map
            .genres_for(mood)
            .map(|genres| genres.to_vec())
            .ok_or_else(|| AppError::Config(format!("No genre mapping for mood '{}'", mood)))
    }

    /// Resolves the genre to recommend for a reviewed title
    ///
    /// The title's own genre comes from the local dataset first, then the
    /// catalog search endpoint. For a Negative mood the resolved genre is
    /// swapped for its contrast from the OppositeGenreMap; otherwise it is
    /// kept unchanged.
    pub async fn genre_for_review(&self, title: &str, mood: Mood) -> AppResult<ResolvedReview> {
        let (resolved, external_id) = self.resolve_title_genre(title).await?;

        let genre = if mood == Mood::Negative {
            let genre_id = self.catalog.id_of(&resolved).ok_or_else(|| {
                AppError::Config(format!("Genre '{}' is missing from the catalog table", resolved))
            })?;
            let opposite = self.opposite_map.opposite_of(genre_id).clone();

            tracing::debug!(
                reviewed_genre = %resolved,
                contrast = %opposite,
                "Swapped in contrasting genre for negative review"
            );

            opposite
        } else {
            resolved
        };

        Ok(ResolvedReview { genre, external_id })
    }

    async fn resolve_title_genre(&self, title: &str) -> AppResult<(GenreTag, Option<u64>)> {
        if let Some(row) = self.dataset.find_title(title) {
            // A local row whose genre is not in the vocabulary cannot
            // drive a discover query; fall through to the remote path.
            if let Some(tag) = self.catalog.tag_by_name(&row.genre) {
                tracing::debug!(title = %title, genre = %tag, source = "local", "Resolved review title");
                return Ok((tag.clone(), None));
            }
        }

        let results = self.provider.search_title(title).await?;
        let top = results.first().ok_or_else(|| {
            AppError::NotFound(format!("No movie found matching '{}'", title))
        })?;

        let tag = top
            .genre_ids
            .iter()
            .find_map(|id| self.catalog.tag_by_id(*id))
            .ok_or_else(|| {
                AppError::NotFound(format!("Could not determine a genre for '{}'", top.title))
            })?;

        tracing::debug!(
            title = %title,
            genre = %tag,
            external_id = top.id,
            source = "remote",
            "Resolved review title"
        );

        Ok((tag.clone(), Some(top.id)))
    }
}
