//! Plain-text rendering of the keyword table.

use prettytable::{row, Table};

use crate::engine::KeywordComparison;
use crate::types::KeywordStats;

/// Keyword rows as a boxed text table, one row per keyword plus a header.
pub fn render_table(stats: &[KeywordStats]) -> String {
    let mut table = Table::new();
    table.set_titles(row![
        "keyword",
        "frequency",
        "review_count",
        "positive_rate",
        "avg_rating"
    ]);
    for s in stats {
        table.add_row(row![
            s.keyword,
            r->s.frequency,
            r->s.review_count,
            r->format!("{:.1}", s.positive_rate),
            r->format!("{:.2}", s.avg_rating)
        ]);
    }
    table.to_string()
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// Side-by-side keyword comparison. Missing values print as `-`.
pub fn render_comparison(rows: &[KeywordComparison]) -> String {
    let mut table = Table::new();
    table.set_titles(row![
        "keyword",
        "review_count",
        "positive_rate",
        "avg_rating",
        "recent_reviews"
    ]);
    for c in rows {
        table.add_row(row![
            c.keyword,
            r->c.review_count,
            r->or_dash(c.positive_rate.map(|v| format!("{:.1}", v))),
            r->or_dash(c.avg_rating.map(|v| format!("{:.2}", v))),
            r->or_dash(c.recent_reviews.map(|v| v.to_string()))
        ]);
    }
    table.to_string()
}
