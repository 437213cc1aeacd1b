//! Prediction view and the test-case selector that feeds it.

use rtd_model::prediction::MetricPredictions;
use rtd_model::{Prediction, TestCase};
use rtd_utils::fmt;
use serde::Serialize;

/// First entry of the selector; selecting it sends no request.
pub const SELECT_PROMPT: &str = "Select a test case...";

/// Color tier of a failure probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    /// > 0.7
    Critical,
    /// > 0.4
    Warning,
    Nominal,
}

impl RiskTier {
    pub fn classify(failure_probability: f64) -> Self {
        if failure_probability > 0.7 {
            RiskTier::Critical
        } else if failure_probability > 0.4 {
            RiskTier::Warning
        } else {
            RiskTier::Nominal
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            RiskTier::Critical => "critical",
            RiskTier::Warning => "warning",
            RiskTier::Nominal => "nominal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub test_case_id: String,
    /// e.g. "73.0%"
    pub probability: String,
    pub tier: RiskTier,
    pub confidence: String,
    pub recommendation: String,
    /// Point predictions, when requested.
    pub metrics: Option<Vec<(&'static str, String)>>,
}

pub fn render_prediction(test_case_id: &str, prediction: &Prediction) -> PredictionView {
    PredictionView {
        test_case_id: test_case_id.to_string(),
        probability: fmt::percent1(prediction.failure_probability * 100.0),
        tier: RiskTier::classify(prediction.failure_probability),
        confidence: format!("Confidence: {}", prediction.confidence),
        recommendation: prediction.recommendation.clone(),
        metrics: None,
    }
}

impl PredictionView {
    pub fn with_metrics(mut self, metrics: &MetricPredictions) -> Self {
        self.metrics = Some(vec![
            (
                "Power Level",
                fmt::or_placeholder(metrics.power_level_dbm, |v| format!("{:.2} dBm", v)),
            ),
            (
                "EVM",
                fmt::or_placeholder(metrics.evm_percent, |v| format!("{:.2}%", v)),
            ),
            ("Duration", fmt::seconds(metrics.duration_ms)),
        ]);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Selector entries: the prompt, then `"{id} - {name}"` per test case.
///
/// Test cases without an identifier cannot be predicted and are left out.
pub fn test_case_options(test_cases: &[TestCase]) -> Vec<SelectOption> {
    std::iter::once(SelectOption {
        value: String::new(),
        label: SELECT_PROMPT.to_string(),
    })
    .chain(test_cases.iter().filter_map(|tc| {
        let id = tc.test_case_id.as_deref().filter(|id| !id.is_empty())?;
        Some(SelectOption {
            value: id.to_string(),
            label: format!("{} - {}", id, fmt::text(tc.name.as_deref())),
        })
    }))
    .collect()
}
