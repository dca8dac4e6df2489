use crate::models::{Mood, SentimentScore};

/// Compound scores strictly above this classify as Positive.
///
/// One constant pair for the whole pipeline; the VADER compound scale is
/// the only scale in play, so these are never mixed with another scorer's
/// thresholds.
pub const POSITIVE_THRESHOLD: f64 = 0.2;

/// Compound scores strictly below this classify as Negative
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Maps a compound polarity score to a discrete mood
///
/// The three regions partition [-1, 1] with strict inequalities on both
/// sides, so scores sitting exactly on a threshold classify as Neutral.
pub fn classify(score: SentimentScore) -> Mood {
    let value = score.value();

    if value > POSITIVE_THRESHOLD {
        Mood::Positive
    } else if value < NEGATIVE_THRESHOLD {
        Mood::Negative
    } else {
        Mood::Neutral
    }
}
