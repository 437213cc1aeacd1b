//! Chart-ready series for the two instrument charts.
//!
//! Series are rebuilt from scratch on every update. An empty or absent
//! measurement list yields `None`, which callers treat as "leave the chart
//! as it is".

use serde::Serialize;

/// Fixed spacing between signal generator samples (display convention).
pub const SAMPLE_SPACING_SECS: f64 = 0.1;
/// Spectrum center used when the caller has none: 3.5 GHz.
pub const DEFAULT_CENTER_FREQUENCY_HZ: f64 = 3_500_000_000.0;
/// Total spectrum span, evenly divided across the points.
pub const SPAN_MHZ: f64 = 20.0;

/// Which axis the labels describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    /// Seconds since the first sample.
    Time,
    /// Absolute frequency in MHz.
    Frequency,
}

/// A single (label, value) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    pub points: Vec<LabeledValue>,
}

impl ChartSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Placement of the spectrum labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyAxis {
    pub center_mhz: f64,
    pub step_mhz: f64,
    pub points: usize,
}

impl FrequencyAxis {
    /// `None` when there are no points to place.
    pub fn new(center_frequency_hz: Option<f64>, points: usize) -> Option<Self> {
        if points == 0 {
            return None;
        }
        let center_hz = center_frequency_hz.unwrap_or(DEFAULT_CENTER_FREQUENCY_HZ);
        Some(Self {
            center_mhz: center_hz / 1_000_000.0,
            step_mhz: SPAN_MHZ / points as f64,
            points,
        })
    }

    /// `center + (i - n/2) * step`, in MHz.
    pub fn frequency_mhz(&self, index: usize) -> f64 {
        let offset = index as f64 - self.points as f64 / 2.0;
        self.center_mhz + offset * self.step_mhz
    }
}

/// Signal generator series: label `i * 0.1` seconds, 1 decimal.
pub fn build_time_series(measurements: Option<&[f64]>) -> Option<ChartSeries> {
    let measurements = measurements.filter(|m| !m.is_empty())?;
    let points = measurements
        .iter()
        .enumerate()
        .map(|(i, &value)| LabeledValue {
            label: format!("{:.1}", i as f64 * SAMPLE_SPACING_SECS),
            value,
        })
        .collect();
    Some(ChartSeries {
        kind: SeriesKind::Time,
        points,
    })
}

/// Spectrum series over a fixed 20 MHz span centered on
/// `center_frequency_hz` (3.5 GHz when absent); labels in MHz, 2 decimals.
pub fn build_frequency_series(
    center_frequency_hz: Option<f64>,
    measurements: Option<&[f64]>,
) -> Option<ChartSeries> {
    let measurements = measurements.filter(|m| !m.is_empty())?;
    let axis = FrequencyAxis::new(center_frequency_hz, measurements.len())?;
    let points = measurements
        .iter()
        .enumerate()
        .map(|(i, &value)| LabeledValue {
            label: format!("{:.2}", axis.frequency_mhz(i)),
            value,
        })
        .collect();
    Some(ChartSeries {
        kind: SeriesKind::Frequency,
        points,
    })
}
