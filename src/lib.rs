//! Review keywords: top-N keyword extraction over large review corpora and
//! per-keyword sentiment statistics computed by streaming the records.
//!
//! Two stages, each usable on its own:
//!
//! 1. [`FrequencyExtractor`] batches texts through a pluggable
//!    [`MorphAnalyzer`] and ranks tokens by frequency.
//! 2. [`StreamingAggregator`] scans records chunk by chunk and reports, per
//!    keyword, how many reviews mention it, the share labelled positive,
//!    and their mean rating.
//!
//! [`KeywordPipeline`] chains both and memoizes each stage in a
//! [`ResultCache`] keyed by a [`Fingerprint`] of its inputs.

pub mod cache;
pub mod config;
pub mod engine;
pub mod format;
pub mod index;
pub mod types;

pub use cache::{CacheStats, Fingerprint, FingerprintBuilder, ResultCache};
pub use config::AnalysisConfig;
pub use engine::{
    compare_keywords, extract_keywords, filter_min_reviews, find_reviews, normalize,
    parse_cutoff, summarize_reviews, AnalysisSummary, CancelFlag, CommandAnalyzer, FnAnalyzer,
    FrequencyExtractor, KeywordComparison, KeywordPipeline, KeywordReport, LogObserver,
    MorphAnalyzer, NoopObserver, Progress, ProgressObserver, RecordFilter, ReviewQuery,
    ReviewSort, ReviewSummary, SentimentBreakdown, Stage, StopWordAnalyzer, StreamingAggregator,
    WhitespaceAnalyzer,
};
pub use index::TokenHistogram;
pub use types::{
    AnalyzerError, KeywordFrequency, KeywordStats, KwError, KwResult, SentimentLabel, TextRecord,
};
