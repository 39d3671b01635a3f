//! Analysis engine: tokenization seam, the two stages, and what sits around them.

pub mod aggregator;
pub mod analyzer;
pub mod explore;
pub mod extractor;
pub mod pipeline;
pub mod progress;
pub mod scope;
pub mod summary;

pub use aggregator::StreamingAggregator;
pub use analyzer::{CommandAnalyzer, FnAnalyzer, MorphAnalyzer, StopWordAnalyzer, WhitespaceAnalyzer};
pub use explore::{
    compare_keywords, find_reviews, parse_cutoff, summarize_reviews, KeywordComparison,
    ReviewQuery, ReviewSort, ReviewSummary, DEFAULT_REVIEW_LIMIT, MAX_COMPARED_KEYWORDS,
};
pub use extractor::{extract_keywords, normalize, FrequencyExtractor};
pub use pipeline::{KeywordPipeline, KeywordReport};
pub use progress::{CancelFlag, LogObserver, NoopObserver, Progress, ProgressObserver, Stage};
pub use scope::RecordFilter;
pub use summary::{filter_min_reviews, AnalysisSummary, SentimentBreakdown};
