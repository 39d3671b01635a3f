//! Headline metrics over a keyword table and its record set.

use serde::Serialize;

use crate::types::{KeywordStats, SentimentLabel, TextRecord};

/// Dashboard-level numbers for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Rows in the (filtered) keyword table.
    pub keyword_count: usize,
    /// Unweighted mean of `positive_rate` across rows.
    pub mean_positive_rate: Option<f64>,
    /// Records analysed.
    pub total_reviews: usize,
    /// Mean star rating across all records.
    pub mean_rating: Option<f64>,
}

impl AnalysisSummary {
    pub fn compute(stats: &[KeywordStats], records: &[TextRecord]) -> Self {
        let mean_positive_rate = mean(stats.iter().map(|s| s.positive_rate));
        let mean_rating = mean(records.iter().map(|r| f64::from(r.star)));
        Self {
            keyword_count: stats.len(),
            mean_positive_rate,
            total_reviews: records.len(),
            mean_rating,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Record counts per predicted label, plus prediction accuracy where the
/// records carry an `is_correct` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Records with a usable `is_correct` value.
    pub judged: usize,
    /// Of those, records whose prediction was correct.
    pub correct: usize,
}

impl SentimentBreakdown {
    pub fn from_records(records: &[TextRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            match r.pred_label {
                SentimentLabel::Positive => acc.positive += 1,
                SentimentLabel::Negative => acc.negative += 1,
                SentimentLabel::Neutral => acc.neutral += 1,
            }
            if let Some(correct) = r.is_correct() {
                acc.judged += 1;
                if correct {
                    acc.correct += 1;
                }
            }
            acc
        })
    }

    /// Percentage of judged records predicted correctly; `None` when no
    /// record carries `is_correct`.
    pub fn accuracy(&self) -> Option<f64> {
        (self.judged > 0).then(|| self.correct as f64 / self.judged as f64 * 100.0)
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Percentage of records carrying `label`; 0 for an empty set.
    pub fn share(&self, label: SentimentLabel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(label) as f64 / total as f64 * 100.0,
        }
    }
}

/// Drop rows backed by fewer than `min_reviews` matching records.
pub fn filter_min_reviews(stats: Vec<KeywordStats>, min_reviews: usize) -> Vec<KeywordStats> {
    let min = min_reviews as u64;
    stats.into_iter().filter(|s| s.review_count >= min).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(keyword: &str, review_count: u64, positive_rate: f64) -> KeywordStats {
        KeywordStats {
            keyword: keyword.into(),
            frequency: review_count,
            review_count,
            positive_rate,
            avg_rating: 3.0,
        }
    }

    #[test]
    fn test_summary_means() {
        let stats = vec![row("a", 2, 50.0), row("b", 1, 100.0)];
        let records = vec![
            TextRecord::new("a", 5, SentimentLabel::Positive),
            TextRecord::new("a b", 2, SentimentLabel::Negative),
        ];
        let summary = AnalysisSummary::compute(&stats, &records);
        assert_eq!(summary.keyword_count, 2);
        assert_eq!(summary.mean_positive_rate, Some(75.0));
        assert_eq!(summary.total_reviews, 2);
        assert_eq!(summary.mean_rating, Some(3.5));
    }

    #[test]
    fn test_summary_empty() {
        let summary = AnalysisSummary::compute(&[], &[]);
        assert_eq!(summary.mean_positive_rate, None);
        assert_eq!(summary.mean_rating, None);
    }

    #[test]
    fn test_breakdown_shares() {
        let records = vec![
            TextRecord::new("x", 5, SentimentLabel::Positive),
            TextRecord::new("x", 4, SentimentLabel::Positive),
            TextRecord::new("x", 3, SentimentLabel::Neutral),
            TextRecord::new("x", 1, SentimentLabel::Negative),
        ];
        let b = SentimentBreakdown::from_records(&records);
        assert_eq!(b.total(), 4);
        assert_eq!(b.share(SentimentLabel::Positive), 50.0);
        assert_eq!(b.share(SentimentLabel::Neutral), 25.0);
        assert_eq!(SentimentBreakdown::default().share(SentimentLabel::Negative), 0.0);
        assert_eq!(b.accuracy(), None);
    }

    #[test]
    fn test_breakdown_accuracy_skips_unjudged_records() {
        let judged = |correct: bool| {
            let mut r = TextRecord::new("x", 4, SentimentLabel::Positive);
            r.extra
                .insert("is_correct".into(), serde_json::Value::Bool(correct));
            r
        };
        let records = vec![
            judged(true),
            judged(true),
            judged(true),
            judged(false),
            TextRecord::new("x", 2, SentimentLabel::Negative),
        ];
        let b = SentimentBreakdown::from_records(&records);
        assert_eq!(b.total(), 5);
        assert_eq!(b.judged, 4);
        assert_eq!(b.correct, 3);
        assert_eq!(b.accuracy(), Some(75.0));
    }

    #[test]
    fn test_filter_min_reviews() {
        let stats = vec![row("a", 5, 0.0), row("b", 4, 0.0), row("c", 6, 0.0)];
        let kept: Vec<String> = filter_min_reviews(stats, 5)
            .into_iter()
            .map(|s| s.keyword)
            .collect();
        assert_eq!(kept, vec!["a", "c"]);
    }
}
