//! Look up the reviews behind a keyword.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{SentimentLabel, TextRecord, MAX_STAR, MIN_STAR};

/// Default cap on returned reviews.
pub const DEFAULT_REVIEW_LIMIT: usize = 50;

/// Most keywords shown side by side by the comparison view.
pub const MAX_COMPARED_KEYWORDS: usize = 5;

/// Ordering applied to matching reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSort {
    /// Most recent first; undated reviews last.
    #[default]
    Newest,
    HighestRated,
    LowestRated,
    /// Positive, then neutral, then negative; higher stars first within a label.
    PositiveFirst,
}

impl std::str::FromStr for ReviewSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "highest" | "highest-rated" => Ok(Self::HighestRated),
            "lowest" | "lowest-rated" => Ok(Self::LowestRated),
            "positive" | "positive-first" => Ok(Self::PositiveFirst),
            other => Err(format!("unknown review sort '{}'", other)),
        }
    }
}

/// Filters for [`find_reviews`].
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    /// Matched case-insensitively against review content.
    pub keyword: String,
    /// Allowed labels. Empty = all labels.
    pub labels: Vec<SentimentLabel>,
    pub min_star: u8,
    pub max_star: u8,
    pub sort: ReviewSort,
    pub limit: usize,
}

impl ReviewQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            labels: Vec::new(),
            min_star: MIN_STAR,
            max_star: MAX_STAR,
            sort: ReviewSort::default(),
            limit: DEFAULT_REVIEW_LIMIT,
        }
    }
}

fn label_rank(label: SentimentLabel) -> u8 {
    match label {
        SentimentLabel::Positive => 0,
        SentimentLabel::Neutral => 1,
        SentimentLabel::Negative => 2,
    }
}

fn compare(sort: ReviewSort, a: &TextRecord, b: &TextRecord) -> Ordering {
    match sort {
        ReviewSort::Newest => match (a.created_at, b.created_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        ReviewSort::HighestRated => b.star.cmp(&a.star),
        ReviewSort::LowestRated => a.star.cmp(&b.star),
        ReviewSort::PositiveFirst => label_rank(a.pred_label)
            .cmp(&label_rank(b.pred_label))
            .then_with(|| b.star.cmp(&a.star)),
    }
}

fn admits(query: &ReviewQuery, needle: &str, record: &TextRecord) -> bool {
    (query.labels.is_empty() || query.labels.contains(&record.pred_label))
        && (query.min_star..=query.max_star).contains(&record.star)
        && record.content.to_lowercase().contains(needle)
}

/// Reviews mentioning `query.keyword` that pass the label and star filters,
/// sorted stably and truncated to `query.limit`.
pub fn find_reviews<'r>(records: &'r [TextRecord], query: &ReviewQuery) -> Vec<&'r TextRecord> {
    let needle = query.keyword.to_lowercase();
    let mut matches: Vec<&TextRecord> = records
        .iter()
        .filter(|r| admits(query, &needle, r))
        .collect();
    matches.sort_by(|a, b| compare(query.sort, a, b));
    matches.truncate(query.limit);
    matches
}

/// Headline numbers for everything a query matches, ignoring `limit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub matched: usize,
    pub positive_rate: Option<f64>,
    pub avg_rating: Option<f64>,
    /// Platform with the most matches; the first seen wins a tie.
    pub top_platform: Option<String>,
}

pub fn summarize_reviews(records: &[TextRecord], query: &ReviewQuery) -> ReviewSummary {
    let needle = query.keyword.to_lowercase();
    let mut matched = 0usize;
    let mut positive = 0usize;
    let mut stars = 0u64;
    let mut platforms: IndexMap<&str, usize> = IndexMap::new();

    for record in records.iter().filter(|r| admits(query, &needle, r)) {
        matched += 1;
        if record.is_positive() {
            positive += 1;
        }
        stars += u64::from(record.star);
        if let Some(platform) = record.platform.as_deref() {
            *platforms.entry(platform).or_insert(0) += 1;
        }
    }

    let mut top_platform: Option<(&str, usize)> = None;
    for (platform, count) in platforms {
        if top_platform.map_or(true, |(_, best)| count > best) {
            top_platform = Some((platform, count));
        }
    }

    let n = matched as f64;
    ReviewSummary {
        matched,
        positive_rate: (matched > 0).then(|| positive as f64 / n * 100.0),
        avg_rating: (matched > 0).then(|| stars as f64 / n),
        top_platform: top_platform.map(|(p, _)| p.to_string()),
    }
}

/// One keyword's row in a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordComparison {
    pub keyword: String,
    pub review_count: u64,
    /// `None` when no review mentions the keyword.
    pub positive_rate: Option<f64>,
    pub avg_rating: Option<f64>,
    /// Matching reviews created at or after the cutoff; `None` without one.
    pub recent_reviews: Option<u64>,
}

/// Compare keywords over the same record set, one row per keyword in the
/// given order.
///
/// Matching is case-sensitive substring containment, the same rule the
/// aggregator uses, so counts line up with the keyword table. Undated
/// reviews never count as recent.
pub fn compare_keywords<S: AsRef<str>>(
    records: &[TextRecord],
    keywords: &[S],
    since: Option<DateTime<Utc>>,
) -> Vec<KeywordComparison> {
    keywords
        .iter()
        .map(|keyword| {
            let keyword = keyword.as_ref();
            let (mut count, mut positive, mut stars, mut recent) = (0u64, 0u64, 0u64, 0u64);
            for record in records.iter().filter(|r| r.content.contains(keyword)) {
                count += 1;
                if record.is_positive() {
                    positive += 1;
                }
                stars += u64::from(record.star);
                if let (Some(cutoff), Some(created)) = (since, record.created_at) {
                    if created >= cutoff {
                        recent += 1;
                    }
                }
            }
            let n = count as f64;
            KeywordComparison {
                keyword: keyword.to_string(),
                review_count: count,
                positive_rate: (count > 0).then(|| positive as f64 / n * 100.0),
                avg_rating: (count > 0).then(|| stars as f64 / n),
                recent_reviews: since.map(|_| recent),
            }
        })
        .collect()
}

/// Parse a cutoff given either as RFC 3339 or as a `YYYY-MM-DD` day, which
/// means midnight UTC.
pub fn parse_cutoff(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| format!("invalid date '{}': expected YYYY-MM-DD or RFC 3339", s))
}
