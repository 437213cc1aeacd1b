//! Report view: totals block plus an optional anomalies table.

use crate::dashboard::StatCard;
use crate::table::{Badge, Cell, Row, Table};
use rtd_model::{Anomaly, TestReport};
use rtd_utils::fmt;
use serde::Serialize;

pub const ANOMALY_COLUMNS: [&str; 5] = ["Test Case", "Metric", "Value", "Expected", "Severity"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalySection {
    pub heading: String,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub title: String,
    pub cards: Vec<StatCard>,
    /// Present only when the report carries at least one anomaly.
    pub anomalies: Option<AnomalySection>,
}

fn anomaly_row(anomaly: &Anomaly) -> Row {
    Row::Cells(vec![
        Cell::Text(anomaly.test_case_id.clone()),
        Cell::Text(anomaly.metric.clone()),
        Cell::Text(fmt::fixed2(Some(anomaly.value))),
        Cell::Text(fmt::fixed2(Some(anomaly.expected))),
        Cell::Badge(Badge::labeled(&anomaly.severity)),
    ])
}

pub fn render_report(report: &TestReport) -> ReportView {
    let anomalies = report.anomalies().map(|list| AnomalySection {
        heading: format!("Anomalies Detected: {}", list.len()),
        table: Table {
            columns: ANOMALY_COLUMNS.to_vec(),
            rows: list.iter().map(anomaly_row).collect(),
        },
    });
    ReportView {
        title: fmt::text(report.test_suite.as_deref()),
        cards: vec![
            StatCard::new("Total Tests", report.total_tests),
            StatCard::new("Passed", report.passed_tests),
            StatCard::new("Failed", report.failed_tests),
            StatCard::new("Pass Rate", fmt::percent1(report.pass_rate)),
        ],
        anomalies,
    }
}
