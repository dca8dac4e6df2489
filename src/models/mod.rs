mod mood;
mod movie;

pub use mood::{Mood, SentimentScore};
pub use movie::{DedupKey, GenreTag, MovieCandidate, TmdbMovie, TmdbPage};
