//! Deterministic fingerprints over analysis inputs.

use std::fmt;

use crate::config::AnalysisConfig;
use crate::types::{KeywordFrequency, TextRecord};

const EXTRACTION_DOMAIN: &str = "review-keywords/extraction/v1";
const AGGREGATION_DOMAIN: &str = "review-keywords/aggregation/v1";

/// A 32-byte BLAKE3 digest identifying one computation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Key for extraction: every text, the analyzer, and the options that
    /// shape the ranking (`top_n`, `min_length`, `batch_size`).
    pub fn extraction<S: AsRef<str>>(
        texts: &[S],
        analyzer_id: &str,
        config: &AnalysisConfig,
    ) -> Self {
        let mut b = FingerprintBuilder::new(EXTRACTION_DOMAIN);
        b.str(analyzer_id)
            .usize(config.top_n)
            .usize(config.min_length)
            .usize(config.batch_size)
            .usize(texts.len());
        for text in texts {
            b.str(text.as_ref());
        }
        b.finish()
    }

    /// Key for aggregation: the fields of each record the aggregator reads,
    /// the keyword list in order, and `chunk_size`.
    pub fn aggregation(
        records: &[TextRecord],
        keywords: &[KeywordFrequency],
        chunk_size: usize,
    ) -> Self {
        let mut b = FingerprintBuilder::new(AGGREGATION_DOMAIN);
        b.usize(chunk_size).usize(records.len());
        for record in records {
            b.str(&record.content)
                .u64(u64::from(record.star))
                .str(record.pred_label.as_str());
        }
        b.usize(keywords.len());
        for kw in keywords {
            b.str(&kw.token).u64(kw.frequency);
        }
        b.finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

/// Incremental, unambiguous hashing of typed fields.
///
/// Strings are length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
pub struct FingerprintBuilder {
    hasher: blake3::Hasher,
}

impl FingerprintBuilder {
    pub fn new(domain: &str) -> Self {
        let mut builder = Self {
            hasher: blake3::Hasher::new(),
        };
        builder.str(domain);
        builder
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    pub fn usize(&mut self, value: usize) -> &mut Self {
        self.u64(value as u64)
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        self.u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn finish(&self) -> Fingerprint {
        Fingerprint(*self.hasher.finalize().as_bytes())
    }
}
