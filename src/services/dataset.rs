use std::path::Path;

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{GenreTag, Mood, MovieCandidate},
};

/// One row of the local movie dataset
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    pub title: String,
    pub genre: String,
    /// Precomputed mood label, when the dataset carries one
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub release_year: Option<String>,
}

impl DatasetRow {
    fn to_candidate(&self) -> MovieCandidate {
        MovieCandidate {
            title: self.title.clone(),
            external_id: None,
            poster_path: None,
            genre: self.genre.clone(),
            release_year: self.release_year.clone(),
        }
    }
}

/// Preloaded local movie dataset
///
/// Backed by a CSV file with `title` and `genre` columns plus optional
/// `mood` and `release_year`. Loaded once at startup; rows without a mood
/// label match any mood filter.
pub struct LocalDataset {
    rows: Vec<DatasetRow>,
}

impl LocalDataset {
    /// Loads the dataset from a CSV file.
    /// A missing file yields an empty dataset rather than an error.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Local dataset file not found, starting with an empty dataset"
            );
            return Ok(Self { rows: Vec::new() });
        }

        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::Internal(format!("Failed to open dataset {}: {}", path.display(), e))
        })?;

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: DatasetRow = record
                .map_err(|e| AppError::Internal(format!("Failed to parse dataset record: {}", e)))?;
            rows.push(row);
        }

        tracing::info!(path = %path.display(), rows = rows.len(), "Loaded local movie dataset");

        Ok(Self { rows })
    }

    /// Builds a dataset from in-memory rows
    pub fn from_rows(rows: Vec<DatasetRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive, whitespace-trimmed exact title match
    pub fn find_title(&self, title: &str) -> Option<&DatasetRow> {
        let needle = title.trim().to_lowercase();
        self.rows
            .iter()
            .find(|row| row.title.trim().to_lowercase() == needle)
    }

    /// Number of rows matching the (genre, mood) filter
    pub fn match_count(&self, genre: &GenreTag, mood: Option<Mood>) -> usize {
        self.rows
            .iter()
            .filter(|row| Self::matches(row, genre, mood))
            .count()
    }

    /// Uniform random sample without replacement of rows matching the
    /// (genre, mood) filter, of size min(limit, matches)
    pub fn sample(&self, genre: &GenreTag, mood: Option<Mood>, limit: usize) -> Vec<MovieCandidate> {
        let matching: Vec<&DatasetRow> = self
            .rows
            .iter()
            .filter(|row| Self::matches(row, genre, mood))
            .collect();

        let mut rng = rand::thread_rng();
        matching
            .choose_multiple(&mut rng, limit.min(matching.len()))
            .map(|row| row.to_candidate())
            .collect()
    }

    fn matches(row: &DatasetRow, genre: &GenreTag, mood: Option<Mood>) -> bool {
        if !row.genre.trim().eq_ignore_ascii_case(genre.as_str()) {
            return false;
        }

        match (mood, &row.mood) {
            (Some(mood), Some(label)) => label.trim().eq_ignore_ascii_case(&mood.to_string()),
            // Unlabeled rows match any mood; an absent filter matches everything.
            _ => true,
        }
    }
}
