//! Runtime knobs for the explorer core.
//!
//! Everything has a default; `from_env` only overrides what is set and
//! parseable.

use std::time::Duration;

use tracing::warn;

use crate::client::DEFAULT_BASE_URL;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub base_url: String,
    /// Quiet period after the last keystroke before a search is committed.
    pub search_debounce: Duration,
    /// Whole-request timeout for the bundled transport. `None` leaves the
    /// transport default in place.
    pub request_timeout: Option<Duration>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            request_timeout: None,
        }
    }
}

impl ExplorerConfig {
    /// Read `EXPLORER_BASE_URL`, `EXPLORER_SEARCH_DEBOUNCE_MS` and
    /// `EXPLORER_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup("EXPLORER_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(ms) = parse_u64(&lookup, "EXPLORER_SEARCH_DEBOUNCE_MS") {
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&lookup, "EXPLORER_HTTP_TIMEOUT_SECS") {
            config.request_timeout = Some(Duration::from_secs(secs)).filter(|d| !d.is_zero());
        }
        config
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
