//! Positional text serializations of an [`ExportRecord`].

use super::record::{ExportRecord, EXPORT_FIELDS};

impl ExportRecord {
    /// Header line plus value line, tab separated (clipboard format).
    pub fn to_tsv(&self) -> String {
        let header = EXPORT_FIELDS.join("\t");
        let values: Vec<String> = self.values().iter().map(|v| escape_tsv(v)).collect();
        format!("{}\n{}", header, values.join("\t"))
    }

    /// Header line plus value line, comma separated with RFC 4180 quoting.
    pub fn to_csv(&self) -> String {
        let header = EXPORT_FIELDS.join(",");
        let values: Vec<String> = self.values().iter().map(|v| escape_csv(v)).collect();
        format!("{}\n{}\n", header, values.join(","))
    }

    /// JSON object with the same keys, in the same order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Quote fields containing tabs, line breaks or quotes; spreadsheet paste
/// unquotes them back into a single cell.
fn escape_tsv(s: &str) -> String {
    if s.contains(['\t', '\r', '\n', '"']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
