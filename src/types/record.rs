//! Review records as loaded from the upstream data source.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{KwError, KwResult};

/// Lowest valid star rating.
pub const MIN_STAR: u8 = 1;
/// Highest valid star rating.
pub const MAX_STAR: u8 = 5;

/// Sentiment label predicted upstream. This crate never classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

/// A single review. Read-only once loaded; the engine only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub content: String,
    /// Star rating, 1..=5.
    pub star: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub pred_label: SentimentLabel,
    /// Any other upstream columns, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TextRecord {
    /// Build a record with only the fields the engine reads.
    pub fn new(content: impl Into<String>, star: u8, pred_label: SentimentLabel) -> Self {
        Self {
            review_id: None,
            product_id: None,
            content: content.into(),
            star,
            category: None,
            platform: None,
            created_at: None,
            pred_label,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn is_positive(&self) -> bool {
        self.pred_label == SentimentLabel::Positive
    }

    /// The upstream `is_correct` column: whether `pred_label` matched the
    /// human label. Booleans and 0/1 numbers are accepted; anything else,
    /// or a missing column, is `None`.
    pub fn is_correct(&self) -> Option<bool> {
        match self.extra.get("is_correct")? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            _ => None,
        }
    }

    /// Check the star rating domain. `line` is used for error reporting.
    pub fn validate(&self, line: usize) -> KwResult<()> {
        if !(MIN_STAR..=MAX_STAR).contains(&self.star) {
            return Err(KwError::InvalidRecord {
                line,
                reason: format!(
                    "star must be between {} and {} (got {})",
                    MIN_STAR, MAX_STAR, self.star
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_is_case_insensitive() {
        assert_eq!("Positive".parse::<SentimentLabel>(), Ok(SentimentLabel::Positive));
        assert_eq!(" neutral ".parse::<SentimentLabel>(), Ok(SentimentLabel::Neutral));
        assert!("mixed".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_record_roundtrips_extra_fields() {
        let json = r#"{"content":"좋아요","star":5,"pred_label":"positive","true_label":"positive","is_correct":true}"#;
        let record: TextRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.star, 5);
        assert!(record.is_positive());
        assert_eq!(record.extra.get("is_correct"), Some(&serde_json::Value::Bool(true)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["true_label"], "positive");
    }

    #[test]
    fn test_is_correct_column() {
        let parse = |json: &str| serde_json::from_str::<TextRecord>(json).unwrap();
        let base = r#""content":"x","star":3,"pred_label":"neutral""#;
        assert_eq!(parse(&format!("{{{},\"is_correct\":true}}", base)).is_correct(), Some(true));
        assert_eq!(parse(&format!("{{{},\"is_correct\":0}}", base)).is_correct(), Some(false));
        assert_eq!(parse(&format!("{{{},\"is_correct\":\"yes\"}}", base)).is_correct(), None);
        assert_eq!(parse(&format!("{{{}}}", base)).is_correct(), None);
    }

    #[test]
    fn test_validate_rejects_out_of_range_star() {
        assert!(TextRecord::new("ok", 1, SentimentLabel::Neutral).validate(1).is_ok());
        let err = TextRecord::new("bad", 0, SentimentLabel::Neutral)
            .validate(7)
            .unwrap_err();
        assert!(matches!(err, KwError::InvalidRecord { line: 7, .. }));
        assert!(TextRecord::new("bad", 6, SentimentLabel::Neutral).validate(1).is_err());
    }
}
