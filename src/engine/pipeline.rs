//! Two-stage keyword analysis with memoization.

use std::sync::Arc;

use serde::Serialize;

use crate::cache::{Fingerprint, ResultCache};
use crate::config::AnalysisConfig;
use crate::engine::aggregator::StreamingAggregator;
use crate::engine::analyzer::MorphAnalyzer;
use crate::engine::extractor::FrequencyExtractor;
use crate::engine::progress::{NoopObserver, ProgressObserver};
use crate::engine::scope::RecordFilter;
use crate::engine::summary::{filter_min_reviews, AnalysisSummary};
use crate::types::{KeywordFrequency, KeywordStats, KwResult, TextRecord};

/// Output of [`KeywordPipeline::run`].
#[derive(Debug, Clone, Serialize)]
pub struct KeywordReport {
    /// Extraction output, most frequent first.
    pub keywords: Vec<KeywordFrequency>,
    /// Aggregated rows passing `min_review_count`.
    pub stats: Vec<KeywordStats>,
    pub summary: AnalysisSummary,
}

/// Runs extraction then aggregation, caching each stage by fingerprint.
///
/// The caches belong to the pipeline value; drop it, or call
/// [`clear_caches`](Self::clear_caches), to release them.
pub struct KeywordPipeline<A> {
    analyzer: A,
    config: AnalysisConfig,
    extractions: ResultCache<Vec<KeywordFrequency>>,
    aggregations: ResultCache<Vec<KeywordStats>>,
}

impl<A: MorphAnalyzer> KeywordPipeline<A> {
    /// Validates `config` up front.
    pub fn new(analyzer: A, config: AnalysisConfig) -> KwResult<Self> {
        config.validate()?;
        Ok(Self {
            analyzer,
            config,
            extractions: ResultCache::new(),
            aggregations: ResultCache::new(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Cached top-N keyword extraction over `texts`.
    pub fn extract<S: AsRef<str>>(&self, texts: &[S]) -> KwResult<Arc<Vec<KeywordFrequency>>> {
        self.extract_with(texts, &NoopObserver)
    }

    pub fn extract_with<S: AsRef<str>>(
        &self,
        texts: &[S],
        observer: &dyn ProgressObserver,
    ) -> KwResult<Arc<Vec<KeywordFrequency>>> {
        let key = Fingerprint::extraction(texts, self.analyzer.id(), &self.config);
        self.extractions.get_or_compute(key, || {
            FrequencyExtractor::new(&self.analyzer).extract_with(texts, &self.config, observer)
        })
    }

    /// Cached aggregation of `records` over an arbitrary keyword list.
    pub fn aggregate(
        &self,
        records: &[TextRecord],
        keywords: &[KeywordFrequency],
    ) -> KwResult<Arc<Vec<KeywordStats>>> {
        self.aggregate_with(records, keywords, &NoopObserver)
    }

    pub fn aggregate_with(
        &self,
        records: &[TextRecord],
        keywords: &[KeywordFrequency],
        observer: &dyn ProgressObserver,
    ) -> KwResult<Arc<Vec<KeywordStats>>> {
        let key = Fingerprint::aggregation(records, keywords, self.config.chunk_size);
        self.aggregations.get_or_compute(key, || {
            StreamingAggregator::new(self.config.chunk_size)?
                .aggregate_with(records, keywords, observer)
        })
    }

    /// Extract keywords from record content, aggregate them, apply the
    /// `min_review_count` filter, and summarise.
    pub fn run(&self, records: &[TextRecord]) -> KwResult<KeywordReport> {
        self.run_with(records, &NoopObserver)
    }

    pub fn run_with(
        &self,
        records: &[TextRecord],
        observer: &dyn ProgressObserver,
    ) -> KwResult<KeywordReport> {
        let texts: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
        let keywords = self.extract_with(&texts, observer)?;
        let stats = self.aggregate_with(records, &keywords, observer)?;
        let stats = filter_min_reviews(stats.as_ref().clone(), self.config.min_review_count);
        let summary = AnalysisSummary::compute(&stats, records);
        Ok(KeywordReport {
            keywords: keywords.as_ref().clone(),
            stats,
            summary,
        })
    }

    /// [`run`](Self::run) over the records `scope` admits. Summary totals
    /// count only the scoped records.
    pub fn run_scoped(
        &self,
        records: &[TextRecord],
        scope: &RecordFilter,
    ) -> KwResult<KeywordReport> {
        self.run_scoped_with(records, scope, &NoopObserver)
    }

    pub fn run_scoped_with(
        &self,
        records: &[TextRecord],
        scope: &RecordFilter,
        observer: &dyn ProgressObserver,
    ) -> KwResult<KeywordReport> {
        let scoped = scope.apply(records);
        if scoped.is_empty() && !records.is_empty() {
            log::warn!("no records match the requested scope");
        }
        self.run_with(&scoped, observer)
    }

    /// Number of memoized (extraction, aggregation) results.
    pub fn cached_entries(&self) -> (usize, usize) {
        (self.extractions.len(), self.aggregations.len())
    }

    pub fn clear_caches(&self) {
        self.extractions.clear();
        self.aggregations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyzer::WhitespaceAnalyzer;
    use crate::types::{KwError, SentimentLabel};

    #[test]
    fn test_new_validates_config() {
        let config = AnalysisConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(
            KeywordPipeline::new(WhitespaceAnalyzer, config),
            Err(KwError::InvalidConfiguration { field: "top_n", .. })
        ));
    }

    #[test]
    fn test_run_populates_both_caches() {
        let pipeline = KeywordPipeline::new(WhitespaceAnalyzer, AnalysisConfig::default()).unwrap();
        let records = vec![
            TextRecord::new("good sound", 5, SentimentLabel::Positive),
            TextRecord::new("bad sound", 1, SentimentLabel::Negative),
        ];
        let first = pipeline.run(&records).unwrap();
        assert_eq!(pipeline.cached_entries(), (1, 1));
        let second = pipeline.run(&records).unwrap();
        assert_eq!(pipeline.cached_entries(), (1, 1));
        assert_eq!(first.stats, second.stats);

        pipeline.clear_caches();
        assert_eq!(pipeline.cached_entries(), (0, 0));
    }

    #[test]
    fn test_run_scoped_only_sees_admitted_records() {
        let pipeline = KeywordPipeline::new(WhitespaceAnalyzer, AnalysisConfig::default()).unwrap();
        let mut naver = TextRecord::new("loud speaker", 5, SentimentLabel::Positive);
        naver.platform = Some("naver".into());
        let mut coupang = TextRecord::new("quiet fan", 2, SentimentLabel::Negative);
        coupang.platform = Some("coupang".into());
        let records = vec![naver, coupang];

        let scope = RecordFilter::new().with_platforms(["naver"]);
        let report = pipeline.run_scoped(&records, &scope).unwrap();
        let tokens: Vec<&str> = report.keywords.iter().map(|k| k.token.as_str()).collect();
        assert_eq!(tokens, vec!["loud", "speaker"]);
        assert_eq!(report.summary.total_reviews, 1);
        assert_eq!(report.summary.mean_rating, Some(5.0));

        let nobody = RecordFilter::new().with_product("missing");
        let empty = pipeline.run_scoped(&records, &nobody).unwrap();
        assert!(empty.keywords.is_empty());
        assert!(empty.stats.is_empty());
    }
}
