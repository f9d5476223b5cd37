//! Clipboard text and CSV download.

use std::fs;
use std::path::{Path, PathBuf};

use caprini_core::ExportRecord;

use crate::error::SinkResult;

/// Tab-separated header and value lines, ready for the clipboard.
pub fn clipboard_text(record: &ExportRecord) -> String {
    record.to_tsv()
}

/// Download file name, `Caprini_<name>.csv`.
///
/// Path separators and other characters file systems reject are replaced
/// with `_`.
pub fn csv_file_name(record: &ExportRecord) -> String {
    let name: String = record
        .name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Caprini_{}.csv", name)
}

/// Write the record as UTF-8 CSV into `dir`, returning the file path.
pub fn write_csv(record: &ExportRecord, dir: &Path) -> SinkResult<PathBuf> {
    let path = dir.join(csv_file_name(record));
    fs::write(&path, record.to_csv())?;
    tracing::info!(path = %path.display(), "CSV written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caprini_core::{ExportRiskGroup, OutcomeScore};

    fn make_record(name: &str) -> ExportRecord {
        ExportRecord {
            timestamp: "2026-03-01T09:30:00.000Z".into(),
            patient_id: "P-9".into(),
            name: name.into(),
            age: 61,
            op_date: "2026-03-04".into(),
            period: String::new(),
            risk_score: 7,
            risk_group: ExportRiskGroup::Low,
            outcome_score: OutcomeScore::Incomplete,
            pain: None,
        }
    }

    #[test]
    fn test_csv_file_name() {
        assert_eq!(csv_file_name(&make_record("Han")), "Caprini_Han.csv");
        assert_eq!(csv_file_name(&make_record("a/b")), "Caprini_a_b.csv");
        assert_eq!(csv_file_name(&make_record("")), "Caprini_.csv");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let record = make_record("Han");
        let path = write_csv(&record, dir.path()).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, record.to_csv());
    }

    #[test]
    fn test_clipboard_text_is_tsv() {
        let text = clipboard_text(&make_record("Han"));
        assert!(text.starts_with("timestamp\tpatientId\tname"));
        assert!(text.lines().nth(1).unwrap().contains("\tHan\t"));
    }
}
