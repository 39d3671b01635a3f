//! Core data types: review records, keyword rows, and the error taxonomy.

pub mod error;
pub mod keyword;
pub mod record;

pub use error::{AnalyzerError, KwError, KwResult};
pub use keyword::{KeywordFrequency, KeywordStats};
pub use record::{SentimentLabel, TextRecord, MAX_STAR, MIN_STAR};
