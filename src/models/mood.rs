use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Discrete sentiment category derived from a continuous polarity score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

impl Mood {
    /// All moods, in classification order
    pub const ALL: [Mood; 3] = [Mood::Positive, Mood::Neutral, Mood::Negative];
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mood::Positive => write!(f, "positive"),
            Mood::Neutral => write!(f, "neutral"),
            Mood::Negative => write!(f, "negative"),
        }
    }
}

/// Compound polarity score in [-1, 1]
///
/// Derived fresh per request and never stored; out-of-range inputs are
/// clamped at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SentimentScore(f64);

impl SentimentScore {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(-1.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_serialization() {
        assert_eq!(serde_json::to_string(&Mood::Positive).unwrap(), "\"positive\"");
        assert_eq!(serde_json::to_string(&Mood::Neutral).unwrap(), "\"neutral\"");
        assert_eq!(serde_json::to_string(&Mood::Negative).unwrap(), "\"negative\"");
    }

    #[test]
    fn test_mood_display() {
        assert_eq!(format!("{}", Mood::Positive), "positive");
        assert_eq!(format!("{}", Mood::Negative), "negative");
    }

    #[test]
    fn test_score_clamped_to_range() {
        assert_eq!(SentimentScore::new(1.5).value(), 1.0);
        assert_eq!(SentimentScore::new(-2.0).value(), -1.0);
        assert_eq!(SentimentScore::new(0.42).value(), 0.42);
    }
}
