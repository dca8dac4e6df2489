use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A genre label from the catalog vocabulary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GenreTag(String);

impl GenreTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GenreTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single movie proposed as a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCandidate {
    pub title: String,
    /// Catalog id, when the candidate came from the remote source
    pub external_id: Option<u64>,
    /// Poster URI fragment as returned by the catalog
    pub poster_path: Option<String>,
    /// Genre the candidate was retrieved under; free text for local rows
    pub genre: String,
    /// 4-digit release year, when known
    pub release_year: Option<String>,
}

impl MovieCandidate {
    /// Identity used for deduplication: the catalog id when present and
    /// non-zero, otherwise the case-normalized title.
    pub fn dedup_key(&self) -> DedupKey {
        match self.external_id {
            Some(id) if id != 0 => DedupKey::Id(id),
            _ => DedupKey::Title(self.title.trim().to_lowercase()),
        }
    }
}

/// Deduplication identity for a candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Id(u64),
    Title(String),
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie record from the TMDB API
///
/// Every optional field may be null or absent; normalization must not fail
/// on any combination of missing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl TmdbMovie {
    /// Normalizes the raw record into a candidate under the genre it was
    /// retrieved for.
    pub fn into_candidate(self, genre: &GenreTag) -> MovieCandidate {
        let release_year = release_year_of(self.release_date.as_deref());

        MovieCandidate {
            title: self.title,
            external_id: Some(self.id),
            poster_path: self.poster_path,
            genre: genre.as_str().to_string(),
            release_year,
        }
    }
}

/// Extracts the 4-digit year from a `YYYY-MM-DD` release date.
/// Empty or malformed dates yield None.
fn release_year_of(date: Option<&str>) -> Option<String> {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// A paged TMDB listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}
