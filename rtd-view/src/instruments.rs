//! Instruments view: connectivity badges and the two live charts.
//!
//! Connectivity is simulated; the client never talks to instruments.

use crate::table::Badge;
use rtd_data::series::ChartSeries;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentStatus {
    pub name: &'static str,
    pub status: Badge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    /// `None` until the first non-empty update.
    pub series: Option<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentsView {
    pub instruments: Vec<InstrumentStatus>,
    pub charts: Vec<ChartPanel>,
}

pub fn simulated_instruments() -> Vec<InstrumentStatus> {
    ["Signal Generator", "Spectrum Analyzer"]
        .into_iter()
        .map(|name| InstrumentStatus {
            name,
            status: Badge::new("Connected", "passed"),
        })
        .collect()
}

pub fn instruments_view(signal: Option<&ChartSeries>, spectrum: Option<&ChartSeries>) -> InstrumentsView {
    InstrumentsView {
        instruments: simulated_instruments(),
        charts: vec![
            ChartPanel {
                title: "Signal Generator Output",
                x_axis: "Time (s)",
                y_axis: "Power (dBm)",
                series: signal.cloned(),
            },
            ChartPanel {
                title: "Spectrum Analyzer Measurement",
                x_axis: "Frequency Offset (MHz)",
                y_axis: "Power (dBm)",
                series: spectrum.cloned(),
            },
        ],
    }
}
