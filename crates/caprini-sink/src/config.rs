//! Remote sink configuration.
//!
//! The endpoint is always passed in explicitly; nothing here reads the
//! settings database on its own.

use std::time::Duration;

/// Environment variable holding the spreadsheet web-app URL.
pub const ENDPOINT_ENV: &str = "CAPRINI_SHEET_URL";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "CAPRINI_SINK_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Spreadsheet web-app URL; `None` blocks transmission
    pub endpoint: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SinkConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: non_blank(endpoint.into()),
            ..Self::default()
        }
    }

    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_ENV).and_then(non_blank);
        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid {}", TIMEOUT_ENV);
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };
        Self { endpoint, timeout }
    }

    /// Pick the endpoint: an administrator-provided built-in URL wins over
    /// the operator's remembered one. Keeps `self.timeout`.
    pub fn resolve(mut self, builtin: Option<&str>, remembered: Option<&str>) -> Self {
        self.endpoint = builtin
            .map(str::to_string)
            .and_then(non_blank)
            .or_else(|| remembered.map(str::to_string).and_then(non_blank))
            .or(self.endpoint);
        self
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
