use vader_sentiment::SentimentIntensityAnalyzer;

use crate::{
    error::{AppError, AppResult},
    models::SentimentScore,
};

/// Lexicon-based sentiment scorer
///
/// Wraps a single VADER analyzer constructed at startup and reused for the
/// process lifetime, so the lexicon is loaded once rather than per call.
/// Scoring is deterministic for a fixed lexicon version.
pub struct SentimentScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Scores free text, returning the compound polarity in [-1, 1]
    ///
    /// Empty or whitespace-only text is rejected before the analyzer runs.
    pub fn score(&self, text: &str) -> AppResult<SentimentScore> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "Text to analyze cannot be empty".to_string(),
            ));
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);

        Ok(SentimentScore::new(compound))
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}
