//! Error types for keyword extraction and aggregation.

use thiserror::Error;

use crate::engine::progress::Stage;

/// Boxed error returned by a [`MorphAnalyzer`](crate::MorphAnalyzer).
pub type AnalyzerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors surfaced by this crate.
///
/// Empty input is not an error: an empty corpus yields an empty result.
#[derive(Error, Debug)]
pub enum KwError {
    /// A size or count option was zero.
    #[error("invalid configuration: `{field}` must be at least 1 (got {value})")]
    InvalidConfiguration { field: &'static str, value: usize },

    /// An external analyzer command line named no program.
    #[error("invalid configuration: analyzer command {command:?} names no program")]
    InvalidAnalyzerCommand { command: String },

    /// The morphological analyzer failed on a batch. The partial histogram
    /// built from earlier batches is discarded.
    #[error("analyzer failed on batch {batch}: {source}")]
    AnalyzerFailure {
        batch: usize,
        #[source]
        source: AnalyzerError,
    },

    /// A progress observer asked to stop at a batch or chunk boundary.
    #[error("{stage} cancelled at boundary {boundary}")]
    Cancelled { stage: Stage, boundary: usize },

    /// An input record could not be parsed or failed validation.
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("configuration file error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KwError {
    /// Whether the failure came from the analyzer rather than the inputs.
    pub fn is_analyzer_failure(&self) -> bool {
        matches!(self, Self::AnalyzerFailure { .. })
    }
}

pub type KwResult<T> = Result<T, KwError>;
