//! Dashboard configuration.
//!
//! Defaults, overridden by environment variables, overridden in turn by
//! CLI flags.

use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Label sent with the weekly report request.
pub const REPORT_SUITE: &str = "Weekly Report";
/// Trailing window covered by the weekly report.
pub const REPORT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Backend base path (default: "http://localhost:8080/api")
    pub api_base: String,
    /// Dashboard refresh period while it is visible (default: 5s)
    pub poll_interval: Duration,
    /// Delay before refreshing after a run command (default: 2s)
    pub refresh_delay: Duration,
    /// Rows in the recent-executions table (default: 10)
    pub recent_limit: usize,
    /// Per-request timeout (default: 30s)
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/api".to_string(),
            poll_interval: Duration::from_secs(5),
            refresh_delay: Duration::from_millis(2000),
            recent_limit: rtd_data::recent::RECENT_LIMIT,
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RTD_API_BASE`: backend base path
    /// - `RTD_POLL_INTERVAL_SECS`: dashboard refresh period
    /// - `RTD_REFRESH_DELAY_MS`: delay before refreshing after a run
    /// - `RTD_RECENT_LIMIT`: rows in the recent-executions table
    /// - `RTD_REQUEST_TIMEOUT_SECS`: per-request timeout
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(base) = lookup("RTD_API_BASE").filter(|b| !b.trim().is_empty()) {
            cfg.api_base = base.trim().to_string();
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "RTD_POLL_INTERVAL_SECS").filter(|s| *s > 0) {
            cfg.poll_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "RTD_REFRESH_DELAY_MS") {
            cfg.refresh_delay = Duration::from_millis(ms);
        }
        if let Some(limit) = parse_var::<usize>(&lookup, "RTD_RECENT_LIMIT") {
            cfg.recent_limit = limit;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "RTD_REQUEST_TIMEOUT_SECS").filter(|s| *s > 0) {
            cfg.request_timeout = Duration::from_secs(secs);
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.api_base, "http://localhost:8080/api");
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.refresh_delay, Duration::from_millis(2000));
        assert_eq!(cfg.recent_limit, 10);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("RTD_API_BASE", "http://bench-7:9000/api"),
            ("RTD_POLL_INTERVAL_SECS", "0"),
            ("RTD_REFRESH_DELAY_MS", "500"),
            ("RTD_RECENT_LIMIT", "many"),
        ]
        .into_iter()
        .collect();
        let cfg = DashboardConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api_base, "http://bench-7:9000/api");
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.refresh_delay, Duration::from_millis(500));
        assert_eq!(cfg.recent_limit, 10);
    }
}
