//! SQLite schema definition.

/// Schema for the operator settings database.
///
/// Only user preferences live here; assessments are never persisted.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Operator settings (key-value, last value wins)
-- ============================================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
