use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A registered test case.
///
/// Threshold fields are interpreted by the backend's anomaly detection
/// only; the client passes them through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Database key (distinct from the user-facing `test_case_id`).
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub test_case_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technology: Option<String>,
    /// Power, Frequency, Modulation, ...
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub expected_power_min: Option<f64>,
    #[serde(default)]
    pub expected_power_max: Option<f64>,
    #[serde(default)]
    pub expected_frequency_hz: Option<f64>,
    #[serde(default)]
    pub expected_evm_max: Option<f64>,
    #[serde(default)]
    pub expected_acpr_max: Option<f64>,
    #[serde(default = "enabled_default", deserialize_with = "null_as_enabled")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

fn null_as_enabled<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(enabled_default))
}

/// Body of `POST /test-cases`.
///
/// Blank thresholds serialize as `null`, never as `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestCase {
    pub test_case_id: String,
    pub name: String,
    pub description: String,
    pub technology: String,
    pub category: String,
    pub expected_power_min: Option<f64>,
    pub expected_power_max: Option<f64>,
    pub expected_frequency_hz: Option<f64>,
    pub expected_evm_max: Option<f64>,
    pub expected_acpr_max: Option<f64>,
    pub enabled: bool,
}

/// Raw text inputs of the creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCaseForm {
    pub test_case_id: String,
    pub name: String,
    pub description: String,
    pub technology: String,
    pub category: String,
    pub power_min: String,
    pub power_max: String,
    pub frequency_hz: String,
    pub evm_max: String,
    pub acpr_max: String,
}

/// A form field whose text is not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be a number, got {:?}", self.field, self.value)
    }
}

impl std::error::Error for FieldError {}

/// Blank text is absent; anything else must parse as a real.
fn coerce(field: &'static str, raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FieldError {
            field,
            value: raw.to_string(),
        }),
    }
}

impl TestCaseForm {
    /// Coerce the form into a creation payload. Nothing else is checked
    /// here; the backend owns validation.
    pub fn to_new_test_case(&self) -> Result<NewTestCase, FieldError> {
        Ok(NewTestCase {
            test_case_id: self.test_case_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            technology: self.technology.clone(),
            category: self.category.clone(),
            expected_power_min: coerce("expectedPowerMin", &self.power_min)?,
            expected_power_max: coerce("expectedPowerMax", &self.power_max)?,
            expected_frequency_hz: coerce("expectedFrequencyHz", &self.frequency_hz)?,
            expected_evm_max: coerce("expectedEvmMax", &self.evm_max)?,
            expected_acpr_max: coerce("expectedAcprMax", &self.acpr_max)?,
            enabled: true,
        })
    }
}
