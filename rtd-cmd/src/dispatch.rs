//! User commands: one request each, no intermediate state.
//!
//! Successful writes say what should be refreshed next; failures carry
//! the text to show the user.

use crate::config::{REPORT_SUITE, REPORT_WINDOW_DAYS};
use crate::error::CommandError;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rtd_model::client::Backend;
use rtd_model::{TestCase, TestCaseForm, TestReport};
use rtd_utils::dates::trailing_window;
use rtd_view::prediction::{render_prediction, PredictionView};
use rtd_view::report::{render_report, ReportView};
use std::time::Duration;

/// What the caller should reload after a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    /// Dashboard and executions, after a delay.
    RefreshViews(Duration),
    ReloadTestCases,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub message: String,
    pub followup: Followup,
}

/// Whose report to build.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportScope {
    /// Trailing week, all test cases.
    Weekly,
    TestCase(String),
    Technology(String),
}

pub struct Dispatcher<'a, B: Backend + ?Sized> {
    backend: &'a B,
    refresh_delay: Duration,
}

fn required<'s>(value: &'s str, prompt: &str) -> Result<&'s str, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::Validation(prompt.to_string()));
    }
    Ok(value)
}

impl<'a, B: Backend + ?Sized> Dispatcher<'a, B> {
    pub fn new(backend: &'a B, refresh_delay: Duration) -> Self {
        Self {
            backend,
            refresh_delay,
        }
    }

    fn started(&self, message: &str) -> Ack {
        Ack {
            message: message.to_string(),
            followup: Followup::RefreshViews(self.refresh_delay),
        }
    }

    pub async fn run_test(&self, test_case_id: &str) -> Result<Ack, CommandError> {
        let id = required(test_case_id, "Please enter a test case ID")?;
        info!("Starting test {}", id);
        self.backend
            .run_test(id)
            .await
            .map_err(|e| CommandError::rejected("Failed to start test", e))?;
        Ok(self.started("Test started successfully!"))
    }

    pub async fn run_all(&self) -> Result<Ack, CommandError> {
        info!("Starting all enabled tests");
        self.backend
            .run_all()
            .await
            .map_err(|e| CommandError::rejected("Failed to start tests", e))?;
        Ok(self.started("All tests started!"))
    }

    pub async fn run_technology(&self, technology: &str) -> Result<Ack, CommandError> {
        let technology = required(technology, "Please enter a technology")?;
        info!("Starting {} tests", technology);
        self.backend
            .run_technology(technology)
            .await
            .map_err(|e| CommandError::rejected("Failed to start tests", e))?;
        Ok(self.started(&format!("{} tests started!", technology)))
    }

    pub async fn run_category(&self, category: &str) -> Result<Ack, CommandError> {
        let category = required(category, "Please enter a category")?;
        info!("Starting {} tests", category);
        self.backend
            .run_category(category)
            .await
            .map_err(|e| CommandError::rejected("Failed to start tests", e))?;
        Ok(self.started(&format!("{} tests started!", category)))
    }

    /// Coerce the form and submit it. A malformed number stops here and
    /// nothing is sent.
    pub async fn create_test_case(
        &self,
        form: &TestCaseForm,
    ) -> Result<(TestCase, Ack), CommandError> {
        let payload = form
            .to_new_test_case()
            .map_err(|e| CommandError::Validation(e.to_string()))?;
        info!("Creating test case {}", payload.test_case_id);
        let created = self
            .backend
            .create_test_case(&payload)
            .await
            .map_err(|e| CommandError::rejected("Failed to create test case", e))?;
        Ok((
            created,
            Ack {
                message: "Test case created successfully!".to_string(),
                followup: Followup::ReloadTestCases,
            },
        ))
    }

    /// `id` is the database key shown by the test-case listing.
    pub async fn set_enabled(&self, id: i64, enabled: bool) -> Result<Ack, CommandError> {
        self.backend
            .set_test_case_enabled(id, enabled)
            .await
            .map_err(|e| CommandError::rejected("Failed to update test case", e))?;
        Ok(Ack {
            message: format!(
                "Test case {} {}",
                id,
                if enabled { "enabled" } else { "disabled" }
            ),
            followup: Followup::ReloadTestCases,
        })
    }

    /// Weekly report over `[now - 7d, now]`.
    pub async fn generate_report(&self, now: DateTime<Utc>) -> Result<ReportView, CommandError> {
        let (start, end) = trailing_window(now, REPORT_WINDOW_DAYS);
        info!("Generating report {} .. {}", start, end);
        let report = self
            .backend
            .generate_report(REPORT_SUITE, start, end)
            .await
            .map_err(|e| CommandError::rejected_raw("Failed to generate report", e))?;
        Ok(render_report(&report))
    }

    pub async fn report(&self, scope: &ReportScope) -> Result<ReportView, CommandError> {
        let report: TestReport = match scope {
            ReportScope::Weekly => return self.generate_report(Utc::now()).await,
            ReportScope::TestCase(id) => {
                let id = required(id, "Please select a test case")?;
                self.backend.report_for_test_case(id).await
            }
            ReportScope::Technology(t) => {
                let t = required(t, "Please enter a technology")?;
                self.backend.report_for_technology(t).await
            }
        }
        .map_err(|e| CommandError::rejected_raw("Failed to generate report", e))?;
        Ok(render_report(&report))
    }

    /// Prediction for the selected test case. An empty selection (the
    /// selector prompt) is rejected without a request. Point predictions
    /// are fetched only when `detail` is set and never fail the command.
    pub async fn load_prediction(
        &self,
        selection: Option<&str>,
        detail: bool,
    ) -> Result<PredictionView, CommandError> {
        let id = required(selection.unwrap_or_default(), "Please select a test case")?;
        let prediction = self
            .backend
            .predict_outcome(id)
            .await
            .map_err(|e| CommandError::rejected("Failed to load predictions", e))?;
        let view = render_prediction(id, &prediction);
        if !detail {
            return Ok(view);
        }
        match self.backend.predict_metrics(id).await {
            Ok(metrics) => Ok(view.with_metrics(&metrics)),
            Err(e) => {
                warn!("Point predictions for {} unavailable: {}", id, e);
                Ok(view)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{report, FakeBackend};
    use chrono::TimeZone;
    use rtd_model::prediction::MetricPredictions;
    use rtd_model::Prediction;
    use rtd_view::prediction::RiskTier;

    fn dispatcher(backend: &FakeBackend) -> Dispatcher<'_, FakeBackend> {
        Dispatcher::new(backend, Duration::from_secs(2))
    }

    fn rejecting(status: u16, body: &str) -> FakeBackend {
        FakeBackend {
            reject: Some((status, body.to_string())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_test_schedules_refresh() {
        let backend = FakeBackend::default();
        let ack = dispatcher(&backend).run_test(" TC-5G-001 ").await.unwrap();
        assert_eq!(ack.message, "Test started successfully!");
        assert_eq!(ack.followup, Followup::RefreshViews(Duration::from_secs(2)));
        assert_eq!(backend.calls(), vec!["run_test TC-5G-001"]);
    }

    #[tokio::test]
    async fn test_run_test_surfaces_backend_message() {
        let backend = rejecting(404, r#"{"status":"error","message":"Test case not found: TC-9"}"#);
        let err = dispatcher(&backend).run_test("TC-9").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: Test case not found: TC-9");
    }

    #[tokio::test]
    async fn test_run_all_fallback() {
        let backend = rejecting(500, "");
        let err = dispatcher(&backend).run_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Error: Failed to start tests");

        let ok = FakeBackend::default();
        let ack = dispatcher(&ok).run_all().await.unwrap();
        assert_eq!(ack.message, "All tests started!");
    }

    #[tokio::test]
    async fn test_blank_ids_send_nothing() {
        let backend = FakeBackend::default();
        let d = dispatcher(&backend);
        assert!(d.run_test("  ").await.unwrap_err().is_validation());
        assert!(d.run_technology("").await.unwrap_err().is_validation());
        assert!(d.run_category(" ").await.unwrap_err().is_validation());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_by_group() {
        let backend = FakeBackend::default();
        let d = dispatcher(&backend);
        assert_eq!(d.run_technology("LTE").await.unwrap().message, "LTE tests started!");
        d.run_category("Power").await.unwrap();
        assert_eq!(backend.calls(), vec!["run_technology LTE", "run_category Power"]);
    }

    #[tokio::test]
    async fn test_create_test_case_blank_thresholds() {
        let backend = FakeBackend::default();
        let form = TestCaseForm {
            test_case_id: "TC-GSM-002".to_string(),
            name: "GSM ACPR".to_string(),
            power_min: "  ".to_string(),
            ..Default::default()
        };
        let (created, ack) = dispatcher(&backend).create_test_case(&form).await.unwrap();
        assert_eq!(created.test_case_id.as_deref(), Some("TC-GSM-002"));
        assert_eq!(ack.followup, Followup::ReloadTestCases);
        assert_eq!(ack.message, "Test case created successfully!");
    }

    #[tokio::test]
    async fn test_create_test_case_bad_number_sends_nothing() {
        let backend = FakeBackend::default();
        let form = TestCaseForm {
            test_case_id: "TC-GSM-002".to_string(),
            evm_max: "low".to_string(),
            ..Default::default()
        };
        let err = dispatcher(&backend).create_test_case(&form).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("expectedEvmMax"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_test_case_rejected() {
        let backend = rejecting(400, r#"{"message":"Test case ID already exists"}"#);
        let form = TestCaseForm {
            test_case_id: "TC-1".to_string(),
            ..Default::default()
        };
        let err = dispatcher(&backend).create_test_case(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: Test case ID already exists");
    }

    #[tokio::test]
    async fn test_set_enabled() {
        let backend = FakeBackend::default();
        let ack = dispatcher(&backend).set_enabled(4, false).await.unwrap();
        assert_eq!(ack.message, "Test case 4 disabled");
        assert_eq!(backend.calls(), vec!["set_test_case_enabled 4 false"]);
    }

    #[tokio::test]
    async fn test_weekly_report_window() {
        let backend = FakeBackend {
            report: Some(report("Weekly Report")),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        let view = dispatcher(&backend).generate_report(now).await.unwrap();
        assert_eq!(view.title, "Weekly Report");
        assert_eq!(view.cards[3].value, "75.0%");
        assert!(view.anomalies.is_none());
        assert_eq!(backend.calls(), vec!["generate_report Weekly Report 7"]);
    }

    #[tokio::test]
    async fn test_report_failure_shows_raw_text() {
        let backend = rejecting(500, "Internal Server Error: no executions");
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        let err = dispatcher(&backend).generate_report(now).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate report: Internal Server Error: no executions"
        );
    }

    #[tokio::test]
    async fn test_scoped_reports() {
        let backend = FakeBackend {
            report: Some(report("LTE")),
            ..Default::default()
        };
        let d = dispatcher(&backend);
        d.report(&ReportScope::Technology("LTE".to_string())).await.unwrap();
        d.report(&ReportScope::TestCase("TC-1".to_string())).await.unwrap();
        assert_eq!(
            backend.calls(),
            vec!["report_for_technology LTE", "report_for_test_case TC-1"]
        );
    }

    #[tokio::test]
    async fn test_prediction_requires_selection() {
        let backend = FakeBackend::default();
        let d = dispatcher(&backend);
        for selection in [None, Some(""), Some("   ")] {
            let err = d.load_prediction(selection, false).await.unwrap_err();
            assert_eq!(err.to_string(), "Please select a test case");
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_prediction_tiers_and_detail() {
        let backend = FakeBackend {
            prediction: Some(Prediction {
                failure_probability: 0.73,
                confidence: "HIGH".to_string(),
                recommendation: "Inspect the PA".to_string(),
            }),
            metrics: MetricPredictions {
                power_level_dbm: Some(-10.5),
                evm_percent: None,
                duration_ms: Some(1500),
            },
            ..Default::default()
        };
        let d = dispatcher(&backend);
        let view = d.load_prediction(Some("TC-1"), false).await.unwrap();
        assert_eq!(view.probability, "73.0%");
        assert_eq!(view.tier, RiskTier::Critical);
        assert_eq!(view.confidence, "Confidence: HIGH");
        assert!(view.metrics.is_none());

        let view = d.load_prediction(Some("TC-1"), true).await.unwrap();
        let metrics = view.metrics.unwrap();
        assert_eq!(metrics[0].1, "-10.50 dBm");
        assert_eq!(metrics[1].1, "N/A");
        assert_eq!(metrics[2].1, "1.50s");
    }

    #[tokio::test]
    async fn test_prediction_failure() {
        let backend = FakeBackend::default();
        let err = dispatcher(&backend)
            .load_prediction(Some("TC-1"), false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: Failed to load predictions");
    }
}
