//! Analysis configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{KwError, KwResult};

/// Options for both analysis stages.
///
/// `batch_size` and `chunk_size` only affect memory and CPU burst; results
/// are identical for any valid value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of keywords retained by extraction.
    pub top_n: usize,
    /// Minimum token length in characters.
    pub min_length: usize,
    /// Texts handed to the analyzer per call.
    pub batch_size: usize,
    /// Records scanned per aggregation chunk.
    pub chunk_size: usize,
    /// Rows with fewer matching reviews are dropped from the final report.
    pub min_review_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 50,
            min_length: 2,
            batch_size: 1_000,
            chunk_size: 1_000,
            min_review_count: 1,
        }
    }
}

impl AnalysisConfig {
    /// Fail fast on any zero-valued option.
    pub fn validate(&self) -> KwResult<()> {
        self.validate_extraction()?;
        require_positive("chunk_size", self.chunk_size)?;
        require_positive("min_review_count", self.min_review_count)
    }

    /// Check only the options extraction reads.
    pub fn validate_extraction(&self) -> KwResult<()> {
        require_positive("top_n", self.top_n)?;
        require_positive("min_length", self.min_length)?;
        require_positive("batch_size", self.batch_size)
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> KwResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> KwResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded analysis config from {}", path.display());
        Ok(config)
    }
}

pub(crate) fn require_positive(field: &'static str, value: usize) -> KwResult<()> {
    if value == 0 {
        return Err(KwError::InvalidConfiguration { field, value });
    }
    Ok(())
}
