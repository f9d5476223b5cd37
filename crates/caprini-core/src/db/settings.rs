//! Setting accessors.

use rusqlite::{params, OptionalExtension};

use super::{DbResult, SettingsStore};

/// Key under which the spreadsheet endpoint is remembered.
pub const ENDPOINT_KEY: &str = "sheet_url";

impl SettingsStore {
    /// Get a setting value.
    pub fn get_setting(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    /// Set a setting value, replacing any previous one.
    pub fn set_setting(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// The last endpoint the operator entered, if any non-blank one.
    pub fn remembered_endpoint(&self) -> DbResult<Option<String>> {
        let value = self.get_setting(ENDPOINT_KEY)?;
        Ok(value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// Remember the endpoint; an empty string clears it.
    pub fn remember_endpoint(&self, endpoint: &str) -> DbResult<()> {
        tracing::debug!("remembering sheet endpoint");
        self.set_setting(ENDPOINT_KEY, endpoint.trim())
    }
}
