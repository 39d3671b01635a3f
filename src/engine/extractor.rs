//! Frequency extraction: batch texts through the analyzer into a histogram.

use crate::config::AnalysisConfig;
use crate::engine::analyzer::MorphAnalyzer;
use crate::engine::progress::{slice_count, NoopObserver, Progress, ProgressObserver, Stage};
use crate::index::TokenHistogram;
use crate::types::{KeywordFrequency, KwError, KwResult};

/// Separator placed between texts of one batch.
const BATCH_SEPARATOR: &str = " ";

/// Replace every char that is neither alphanumeric nor whitespace with a space.
///
/// Unicode-aware: Hangul, CJK, accented Latin, and non-ASCII digits survive.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Extracts the most frequent analyzer tokens from a corpus.
///
/// Texts are processed in contiguous batches of `batch_size` to bound how
/// much text a single analyzer call sees. The resulting ranking does not
/// depend on the batch size.
pub struct FrequencyExtractor<'a, A: ?Sized> {
    analyzer: &'a A,
}

impl<'a, A: MorphAnalyzer + ?Sized> FrequencyExtractor<'a, A> {
    pub fn new(analyzer: &'a A) -> Self {
        Self { analyzer }
    }

    /// Top `config.top_n` tokens by descending frequency.
    pub fn extract<S: AsRef<str>>(
        &self,
        texts: &[S],
        config: &AnalysisConfig,
    ) -> KwResult<Vec<KeywordFrequency>> {
        self.extract_with(texts, config, &NoopObserver)
    }

    /// Like [`extract`](Self::extract), consulting `observer` before each batch.
    pub fn extract_with<S: AsRef<str>>(
        &self,
        texts: &[S],
        config: &AnalysisConfig,
        observer: &dyn ProgressObserver,
    ) -> KwResult<Vec<KeywordFrequency>> {
        config.validate_extraction()?;

        let total = slice_count(texts.len(), config.batch_size);
        let mut histogram = TokenHistogram::new();

        for (batch, slice) in texts.chunks(config.batch_size).enumerate() {
            let progress = Progress {
                stage: Stage::Extraction,
                boundary: batch,
                total,
            };
            if observer.on_boundary(progress).is_break() {
                log::info!("extraction cancelled before batch {}/{}", batch + 1, total);
                return Err(KwError::Cancelled {
                    stage: Stage::Extraction,
                    boundary: batch,
                });
            }

            let joined = slice
                .iter()
                .map(|text| text.as_ref())
                .collect::<Vec<&str>>()
                .join(BATCH_SEPARATOR);
            let normalized = normalize(&joined);

            let tokens = self
                .analyzer
                .tokenize(&normalized)
                .map_err(|source| KwError::AnalyzerFailure { batch, source })?;

            let mut kept = 0usize;
            for token in tokens
                .iter()
                .filter(|token| token.chars().count() >= config.min_length)
            {
                histogram.add(token);
                kept += 1;
            }
            log::debug!(
                "batch {}/{}: {} texts, {} tokens kept of {}",
                batch + 1,
                total,
                slice.len(),
                kept,
                tokens.len()
            );
        }

        let top = histogram.top(config.top_n);
        log::info!(
            "extracted {} keywords from {} texts ({} distinct tokens, analyzer {})",
            top.len(),
            texts.len(),
            histogram.len(),
            self.analyzer.id()
        );
        Ok(top)
    }
}

/// One-shot convenience over [`FrequencyExtractor`].
pub fn extract_keywords<A, S>(
    analyzer: &A,
    texts: &[S],
    config: &AnalysisConfig,
) -> KwResult<Vec<KeywordFrequency>>
where
    A: MorphAnalyzer + ?Sized,
    S: AsRef<str>,
{
    FrequencyExtractor::new(analyzer).extract(texts, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_punctuation() {
        assert_eq!(normalize("great!battery,life"), "great battery life");
        assert_eq!(normalize("a-b_c"), "a b c");
    }

    #[test]
    fn test_normalize_keeps_unicode_letters_and_whitespace() {
        assert_eq!(normalize("배터리가 좋아요!!"), "배터리가 좋아요  ");
        assert_eq!(normalize("café\tnaïve"), "café\tnaïve");
        assert_eq!(normalize("５점"), "５점");
    }

    #[test]
    fn test_normalize_is_char_for_char() {
        let input = "😀 emoji… «quotes»";
        assert_eq!(normalize(input).chars().count(), input.chars().count());
    }
}
