//! Keyword rows produced by the two analysis stages.

use serde::{Deserialize, Serialize};

/// A token and how many times the analyzer emitted it across the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub token: String,
    pub frequency: u64,
}

impl KeywordFrequency {
    pub fn new(token: impl Into<String>, frequency: u64) -> Self {
        Self {
            token: token.into(),
            frequency,
        }
    }
}

impl<S: Into<String>> From<(S, u64)> for KeywordFrequency {
    fn from((token, frequency): (S, u64)) -> Self {
        Self::new(token, frequency)
    }
}

/// Per-keyword statistics from the streaming aggregator.
///
/// `frequency` is carried over verbatim from extraction (a token count),
/// while `review_count` counts records whose content contains the keyword
/// as a substring. The two are measured differently and are not reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStats {
    pub keyword: String,
    pub frequency: u64,
    /// Always greater than zero; keywords without matches are omitted.
    pub review_count: u64,
    /// Percentage of matching records labelled positive, in `[0, 100]`.
    pub positive_rate: f64,
    /// Mean star rating of matching records.
    pub avg_rating: f64,
}
