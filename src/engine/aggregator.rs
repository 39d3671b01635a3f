//! Streaming per-keyword statistics.
//!
//! Records are scanned in chunks. For each chunk and each keyword, matching
//! records are folded straight into running counters, so nothing beyond one
//! chunk and the accumulator table is ever held. This costs
//! O(records × keywords) substring scans, which stays cheap because the
//! keyword list is bounded by `top_n`.

use indexmap::IndexMap;

use crate::config::require_positive;
use crate::engine::progress::{slice_count, NoopObserver, Progress, ProgressObserver, Stage};
use crate::types::{KeywordFrequency, KeywordStats, KwError, KwResult, TextRecord};

/// Running totals for one keyword.
#[derive(Debug, Clone)]
struct Accumulator {
    keyword: String,
    frequency: u64,
    review_count: u64,
    positive_count: u64,
    rating_sum: u64,
}

impl Accumulator {
    fn new(keyword: &KeywordFrequency) -> Self {
        Self {
            keyword: keyword.token.clone(),
            frequency: keyword.frequency,
            review_count: 0,
            positive_count: 0,
            rating_sum: 0,
        }
    }

    /// Fold one chunk's records into the totals.
    fn absorb(&mut self, chunk: &[TextRecord]) {
        let keyword = self.keyword.as_str();
        for record in chunk.iter().filter(|r| r.content.contains(keyword)) {
            self.review_count += 1;
            if record.is_positive() {
                self.positive_count += 1;
            }
            self.rating_sum += u64::from(record.star);
        }
    }

    fn finish(self) -> Option<KeywordStats> {
        if self.review_count == 0 {
            return None;
        }
        let n = self.review_count as f64;
        Some(KeywordStats {
            keyword: self.keyword,
            frequency: self.frequency,
            review_count: self.review_count,
            positive_rate: self.positive_count as f64 / n * 100.0,
            avg_rating: self.rating_sum as f64 / n,
        })
    }
}

/// Build one accumulator per distinct keyword.
///
/// A keyword listed twice keeps the slot of its first occurrence and the
/// frequency of its last.
fn accumulators(keywords: &[KeywordFrequency]) -> Vec<Accumulator> {
    let mut accs: IndexMap<&str, Accumulator> = IndexMap::with_capacity(keywords.len());
    for kw in keywords {
        accs.entry(kw.token.as_str())
            .and_modify(|acc| acc.frequency = kw.frequency)
            .or_insert_with(|| Accumulator::new(kw));
    }
    accs.into_values().collect()
}

/// Computes [`KeywordStats`] by streaming records in fixed-size chunks.
#[derive(Debug, Clone, Copy)]
pub struct StreamingAggregator {
    chunk_size: usize,
}

impl StreamingAggregator {
    /// Fails with `InvalidConfiguration` if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> KwResult<Self> {
        require_positive("chunk_size", chunk_size)?;
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Per-keyword statistics, in keyword order, zero-match keywords omitted.
    pub fn aggregate(
        &self,
        records: &[TextRecord],
        keywords: &[KeywordFrequency],
    ) -> KwResult<Vec<KeywordStats>> {
        self.aggregate_with(records, keywords, &NoopObserver)
    }

    /// Like [`aggregate`](Self::aggregate), consulting `observer` before each chunk.
    pub fn aggregate_with(
        &self,
        records: &[TextRecord],
        keywords: &[KeywordFrequency],
        observer: &dyn ProgressObserver,
    ) -> KwResult<Vec<KeywordStats>> {
        let mut accs = accumulators(keywords);
        let total = slice_count(records.len(), self.chunk_size);

        for (index, chunk) in records.chunks(self.chunk_size).enumerate() {
            let progress = Progress {
                stage: Stage::Aggregation,
                boundary: index,
                total,
            };
            if observer.on_boundary(progress).is_break() {
                log::info!("aggregation cancelled before chunk {}/{}", index + 1, total);
                return Err(KwError::Cancelled {
                    stage: Stage::Aggregation,
                    boundary: index,
                });
            }

            for acc in accs.iter_mut() {
                acc.absorb(chunk);
            }
            log::debug!("chunk {}/{}: {} records", index + 1, total, chunk.len());
        }

        let stats: Vec<KeywordStats> = accs.into_iter().filter_map(Accumulator::finish).collect();
        log::info!(
            "aggregated {} records over {} keywords, {} with matches",
            records.len(),
            keywords.len(),
            stats.len()
        );
        Ok(stats)
    }
}
