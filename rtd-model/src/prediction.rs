use serde::{Deserialize, Serialize};

/// Failure prediction for a test case, derived by the backend from its
/// recent history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// 0.0 ..= 1.0
    pub failure_probability: f64,
    /// HIGH, MEDIUM, LOW or INSUFFICIENT_DATA
    pub confidence: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PowerLevelPrediction {
    #[serde(rename = "predictedPowerLevel")]
    pub dbm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EvmPrediction {
    #[serde(rename = "predictedEVM")]
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DurationPrediction {
    #[serde(rename = "predictedDurationMs")]
    pub millis: u64,
}

/// Point predictions; each is absent when the backend has no history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricPredictions {
    pub power_level_dbm: Option<f64>,
    pub evm_percent: Option<f64>,
    pub duration_ms: Option<u64>,
}
