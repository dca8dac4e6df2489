use std::collections::HashSet;

use serde::Serialize;

use crate::models::{GenreTag, MovieCandidate};

/// One genre's deduplicated, display-ready candidate list
#[derive(Debug, Clone, Serialize)]
pub struct GenreRecommendations {
    pub genre: GenreTag,
    pub movies: Vec<MovieCandidate>,
}

/// Stable first-wins deduplication across candidate lists
///
/// Later occurrences of a key are dropped whole, never merged field by
/// field; survivors keep their input order.
pub fn dedup<I>(lists: I) -> Vec<MovieCandidate>
where
    I: IntoIterator<Item = Vec<MovieCandidate>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for candidate in list {
            if seen.insert(candidate.dedup_key()) {
                merged.push(candidate);
            }
        }
    }

    merged
}

/// Merges each genre's contributing lists (genre discovery plus the
/// trending feed), dedups them together, then truncates to the display
/// limit. Genre order is preserved as given.
pub fn merge_groups(
    groups: Vec<(GenreTag, Vec<Vec<MovieCandidate>>)>,
    limit: usize,
) -> Vec<GenreRecommendations> {
    groups
        .into_iter()
        .map(|(genre, lists)| {
            let mut movies = dedup(lists);
            movies.truncate(limit);
            GenreRecommendations { genre, movies }
        })
        .collect()
}
