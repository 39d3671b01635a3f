//! Record scoping by platform, category and product.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::TextRecord;

/// Restricts a record set before analysis.
///
/// Each empty criterion admits everything. A non-empty criterion excludes
/// records that lack the field entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    /// Allowed platforms, exact match.
    pub platforms: Vec<String>,
    /// Allowed categories, exact match.
    pub categories: Vec<String>,
    /// Only this product's reviews.
    pub product_id: Option<String>,
}

fn admits(allowed: &[String], value: Option<&String>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.contains(v))
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.categories.is_empty() && self.product_id.is_none()
    }

    pub fn matches(&self, record: &TextRecord) -> bool {
        admits(&self.platforms, record.platform.as_ref())
            && admits(&self.categories, record.category.as_ref())
            && match &self.product_id {
                Some(id) => record.product_id.as_ref() == Some(id),
                None => true,
            }
    }

    /// Matching records in input order. Borrows when nothing is filtered.
    pub fn apply<'r>(&self, records: &'r [TextRecord]) -> Cow<'r, [TextRecord]> {
        if self.is_empty() {
            return Cow::Borrowed(records);
        }
        let kept: Vec<TextRecord> = records.iter().filter(|r| self.matches(r)).cloned().collect();
        log::debug!("record filter kept {} of {}", kept.len(), records.len());
        Cow::Owned(kept)
    }

    /// In-place variant of [`apply`](Self::apply) for owned record sets.
    pub fn retain(&self, records: &mut Vec<TextRecord>) {
        if !self.is_empty() {
            records.retain(|r| self.matches(r));
        }
    }
}
