//! Process-wide view state.
//!
//! `ViewState` is created once at startup and mutated only by navigation
//! and command handlers. Polling is tied to the mode explicitly instead of
//! being inferred from what is on screen.

use log::debug;
use rtd_data::series::ChartSeries;
use serde::Serialize;
use std::fmt;

/// Which section is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewMode {
    #[default]
    Dashboard,
    TestCases,
    Executions,
    Reports,
    Predictions,
    Instruments,
}

impl ViewMode {
    pub const ALL: [ViewMode; 6] = [
        ViewMode::Dashboard,
        ViewMode::TestCases,
        ViewMode::Executions,
        ViewMode::Reports,
        ViewMode::Predictions,
        ViewMode::Instruments,
    ];

    /// Only the dashboard refreshes itself.
    pub fn polls(self) -> bool {
        self == ViewMode::Dashboard
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Dashboard => "dashboard",
            ViewMode::TestCases => "test-cases",
            ViewMode::Executions => "executions",
            ViewMode::Reports => "reports",
            ViewMode::Predictions => "predictions",
            ViewMode::Instruments => "instruments",
        }
    }

    pub fn parse(name: &str) -> Option<ViewMode> {
        let name = name.trim();
        ViewMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a navigation means for the polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingChange {
    Start,
    Stop,
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    mode: ViewMode,
    /// Status filter of the executions view; blank means all.
    pub status_filter: Option<String>,
    /// Test case chosen in the predictions view.
    pub selected_test_case: Option<String>,
    signal_chart: Option<ChartSeries>,
    spectrum_chart: Option<ChartSeries>,
}

impl ViewState {
    /// Startup state: the dashboard is visible and nothing is charted.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch sections and report how polling must change.
    pub fn navigate(&mut self, mode: ViewMode) -> PollingChange {
        let before = self.mode;
        self.mode = mode;
        debug!("View {} -> {}", before, mode);
        match (before.polls(), mode.polls()) {
            (false, true) => PollingChange::Start,
            (true, false) => PollingChange::Stop,
            _ => PollingChange::Unchanged,
        }
    }

    /// Replace the signal chart; `None` leaves it unchanged.
    /// Returns whether anything changed.
    pub fn update_signal_chart(&mut self, series: Option<ChartSeries>) -> bool {
        replace_if_some(&mut self.signal_chart, series)
    }

    /// Replace the spectrum chart; `None` leaves it unchanged.
    pub fn update_spectrum_chart(&mut self, series: Option<ChartSeries>) -> bool {
        replace_if_some(&mut self.spectrum_chart, series)
    }

    pub fn signal_chart(&self) -> Option<&ChartSeries> {
        self.signal_chart.as_ref()
    }

    pub fn spectrum_chart(&self) -> Option<&ChartSeries> {
        self.spectrum_chart.as_ref()
    }
}

fn replace_if_some(slot: &mut Option<ChartSeries>, series: Option<ChartSeries>) -> bool {
    match series {
        Some(s) => {
            *slot = Some(s);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtd_data::series::{build_frequency_series, build_time_series};

    #[test]
    fn test_starts_on_dashboard() {
        let state = ViewState::new();
        assert_eq!(state.mode(), ViewMode::Dashboard);
        assert!(state.signal_chart().is_none());
    }

    #[test]
    fn test_navigation_drives_polling() {
        let mut state = ViewState::new();
        assert_eq!(state.navigate(ViewMode::Dashboard), PollingChange::Unchanged);
        assert_eq!(state.navigate(ViewMode::Executions), PollingChange::Stop);
        assert_eq!(state.navigate(ViewMode::TestCases), PollingChange::Unchanged);
        assert_eq!(state.navigate(ViewMode::Dashboard), PollingChange::Start);
        assert_eq!(state.mode(), ViewMode::Dashboard);
    }

    #[test]
    fn test_empty_update_keeps_chart() {
        let mut state = ViewState::new();
        assert!(state.update_signal_chart(build_time_series(Some(&[-10.0]))));
        assert!(!state.update_signal_chart(build_time_series(Some(&[]))));
        assert_eq!(state.signal_chart().map(|s| s.points.len()), Some(1));

        assert!(!state.update_spectrum_chart(build_frequency_series(None, None)));
        assert!(state.spectrum_chart().is_none());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(ViewMode::parse("Test-Cases"), Some(ViewMode::TestCases));
        assert_eq!(ViewMode::parse("settings"), None);
        for mode in ViewMode::ALL {
            assert_eq!(ViewMode::parse(mode.name()), Some(mode));
        }
    }
}
