//! JSON Lines record input and JSON output.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;

use crate::types::{KwError, KwResult, TextRecord};

/// Parse one record per non-blank line, validating each.
///
/// Errors name the 1-based line they occurred on.
pub fn read_records<R: BufRead>(reader: R) -> KwResult<Vec<TextRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TextRecord =
            serde_json::from_str(&line).map_err(|e| KwError::InvalidRecord {
                line: line_no,
                reason: e.to_string(),
            })?;
        record.validate(line_no)?;
        records.push(record);
    }
    Ok(records)
}

/// Load a JSON Lines file of records.
pub fn load_records(path: impl AsRef<Path>) -> KwResult<Vec<TextRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file))?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> KwResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentLabel;

    #[test]
    fn test_reads_lines_and_skips_blanks() {
        let input = concat!(
            r#"{"content":"좋은 배터리","star":5,"pred_label":"positive","platform":"shop"}"#,
            "\n\n",
            r#"{"content":"bad","star":1,"pred_label":"negative","created_at":"2024-05-01T12:00:00Z"}"#,
            "\n"
        );
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].platform.as_deref(), Some("shop"));
        assert_eq!(records[1].pred_label, SentimentLabel::Negative);
        assert!(records[1].created_at.is_some());
    }

    #[test]
    fn test_bad_json_reports_line() {
        let input = "{\"content\":\"ok\",\"star\":3,\"pred_label\":\"neutral\"}\nnot json\n";
        match read_records(input.as_bytes()) {
            Err(KwError::InvalidRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_star_reports_line() {
        let input = "\n{\"content\":\"ok\",\"star\":9,\"pred_label\":\"neutral\"}\n";
        assert!(matches!(
            read_records(input.as_bytes()),
            Err(KwError::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_write_json_trailing_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &vec![1, 2]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("]\n"));
    }
}
