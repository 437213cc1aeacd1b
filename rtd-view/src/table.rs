//! Row view models for the record tables.
//!
//! Every optional field goes through `rtd_utils::fmt`, so the three
//! tables cannot drift apart on placeholder or decimal rules.

use chrono::{Local, TimeZone};
use rtd_model::{ExecutionRecord, ExecutionStatus, TestCase};
use rtd_utils::fmt;
use serde::Serialize;
use std::fmt::Display;

/// Status-style badge: visible text plus a lower-case style key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub text: String,
    pub class: String,
}

impl Badge {
    pub fn new(text: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: class.into(),
        }
    }

    /// Badge for an execution status: verbatim text, lower-cased class.
    pub fn status(status: &ExecutionStatus) -> Self {
        Self::new(status.as_str(), status.badge_class())
    }

    /// Badge whose class is the lower-cased text (severity, tiers, ...).
    pub fn labeled(text: &str) -> Self {
        Self::new(text, text.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Text(String),
    Badge(Badge),
}

impl Cell {
    /// Text shown for this cell.
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(t) => t,
            Cell::Badge(b) => &b.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Row {
    Cells(Vec<Cell>),
    /// A single cell spanning every column.
    Placeholder { message: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
}

impl Table {
    /// True when the table shows a placeholder instead of records.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.rows.as_slice(), [Row::Placeholder { .. }])
    }

    fn placeholder(columns: Vec<&'static str>, message: &str) -> Self {
        let colspan = columns.len();
        Self {
            columns,
            rows: vec![Row::Placeholder {
                message: message.to_string(),
                colspan,
            }],
        }
    }
}

/// The record tables, each with its own columns and empty-state text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableKind {
    /// Dashboard: the most recent executions.
    RecentExecutions,
    /// Executions view: every execution, optionally status-filtered.
    AllExecutions,
    TestCases,
}

impl TableKind {
    pub fn columns(self) -> Vec<&'static str> {
        match self {
            TableKind::RecentExecutions => vec![
                "Test Case", "Technology", "Status", "Power (dBm)", "EVM (%)", "Duration",
                "Start Time",
            ],
            TableKind::AllExecutions => vec![
                "ID", "Test Case", "Technology", "Status", "Power (dBm)", "EVM (%)",
                "ACPR (dB)", "Duration", "Start Time",
            ],
            TableKind::TestCases => vec!["Test Case ID", "Name", "Technology", "Category", "Status"],
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            TableKind::RecentExecutions => "No executions yet. Run a test to get started.",
            TableKind::AllExecutions => "No executions found.",
            TableKind::TestCases => "No test cases found. Create one to get started.",
        }
    }
}

/// Message shown in the test-case table when it could not be loaded.
pub const TEST_CASES_ERROR: &str = "Error loading test cases.";

/// Display-ready fields of one execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRow {
    pub id: String,
    pub test_case_id: String,
    pub technology: String,
    pub status: Badge,
    pub power_level: String,
    pub evm: String,
    pub acpr: String,
    pub duration: String,
    pub start_time: String,
}

/// Format one execution, rendering its start time in the local zone.
pub fn render_row(record: &ExecutionRecord) -> ExecutionRow {
    render_row_in(record, &Local)
}

/// Format one execution, rendering its start time in `zone`.
pub fn render_row_in<Tz: TimeZone>(record: &ExecutionRecord, zone: &Tz) -> ExecutionRow
where
    Tz::Offset: Display,
{
    ExecutionRow {
        id: record.id.to_string(),
        test_case_id: fmt::text(record.test_case_id.as_deref()),
        technology: fmt::text(record.technology.as_deref()),
        status: Badge::status(&record.status),
        power_level: fmt::fixed2(record.power_level),
        evm: fmt::fixed2(record.evm),
        acpr: fmt::fixed2(record.acpr),
        duration: fmt::seconds(record.duration_ms),
        start_time: fmt::or_placeholder(record.start_time, |t| t.format_in(zone)),
    }
}

impl ExecutionRow {
    /// Project the row onto the columns of `kind`.
    fn cells(self, kind: TableKind) -> Vec<Cell> {
        let ExecutionRow {
            id,
            test_case_id,
            technology,
            status,
            power_level,
            evm,
            acpr,
            duration,
            start_time,
        } = self;
        match kind {
            TableKind::AllExecutions => vec![
                Cell::Text(id),
                Cell::Text(test_case_id),
                Cell::Text(technology),
                Cell::Badge(status),
                Cell::Text(power_level),
                Cell::Text(evm),
                Cell::Text(acpr),
                Cell::Text(duration),
                Cell::Text(start_time),
            ],
            _ => vec![
                Cell::Text(test_case_id),
                Cell::Text(technology),
                Cell::Badge(status),
                Cell::Text(power_level),
                Cell::Text(evm),
                Cell::Text(duration),
                Cell::Text(start_time),
            ],
        }
    }
}

/// Render executions in the order given.
///
/// `kind` must be one of the execution tables; it picks the columns and
/// the empty-state message.
pub fn execution_table(kind: TableKind, records: &[ExecutionRecord]) -> Table {
    execution_table_in(kind, records, &Local)
}

pub fn execution_table_in<Tz: TimeZone>(
    kind: TableKind,
    records: &[ExecutionRecord],
    zone: &Tz,
) -> Table
where
    Tz::Offset: Display,
{
    if records.is_empty() {
        return Table::placeholder(kind.columns(), kind.empty_message());
    }
    Table {
        columns: kind.columns(),
        rows: records
            .iter()
            .map(|r| Row::Cells(render_row_in(r, zone).cells(kind)))
            .collect(),
    }
}

/// Enabled/Disabled badge styled like a pass/fail status.
pub fn enabled_badge(enabled: bool) -> Badge {
    if enabled {
        Badge::new("Enabled", "passed")
    } else {
        Badge::new("Disabled", "failed")
    }
}

pub fn test_case_table(test_cases: &[TestCase]) -> Table {
    let kind = TableKind::TestCases;
    if test_cases.is_empty() {
        return Table::placeholder(kind.columns(), kind.empty_message());
    }
    Table {
        columns: kind.columns(),
        rows: test_cases
            .iter()
            .map(|tc| {
                Row::Cells(vec![
                    Cell::Text(fmt::text(tc.test_case_id.as_deref())),
                    Cell::Text(fmt::text(tc.name.as_deref())),
                    Cell::Text(fmt::text(tc.technology.as_deref())),
                    Cell::Text(fmt::text(tc.category.as_deref())),
                    Cell::Badge(enabled_badge(tc.enabled)),
                ])
            })
            .collect(),
    }
}

/// Test-case table shown when the read failed.
pub fn test_case_error_table() -> Table {
    Table::placeholder(TableKind::TestCases.columns(), TEST_CASES_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};
    use rtd_utils::dates::WireTime;

    fn finished() -> ExecutionRecord {
        let mut r = ExecutionRecord::new(7, ExecutionStatus::Passed);
        r.test_case_id = Some("TC-5G-001".to_string());
        r.technology = Some("5G".to_string());
        r.power_level = Some(-10.004);
        r.evm = Some(1.5);
        r.acpr = Some(-45.126);
        r.duration_ms = Some(1500);
        r.start_time = Some(WireTime::from(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        ));
        r
    }

    #[test]
    fn test_render_row_formats_present_values() {
        let row = render_row_in(&finished(), &Utc);
        assert_eq!(row.test_case_id, "TC-5G-001");
        assert_eq!(row.status, Badge::new("PASSED", "passed"));
        assert_eq!(row.power_level, "-10.00");
        assert_eq!(row.evm, "1.50");
        assert_eq!(row.acpr, "-45.13");
        assert_eq!(row.duration, "1.50s");
        assert_eq!(row.start_time, "1/15/2024, 10:30:00 AM");
    }

    #[test]
    fn test_naive_start_time_is_wall_clock() {
        let record: ExecutionRecord = serde_json::from_str(
            r#"{"id":1,"status":"PASSED","startTime":"2024-01-15T10:30:00"}"#,
        )
        .unwrap();
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(
            render_row_in(&record, &pacific).start_time,
            "1/15/2024, 10:30:00 AM"
        );
        assert_eq!(render_row(&record).start_time, "1/15/2024, 10:30:00 AM");
    }

    #[test]
    fn test_offset_start_time_follows_zone() {
        let record: ExecutionRecord = serde_json::from_str(
            r#"{"id":1,"status":"PASSED","startTime":"2024-01-15T10:30:00Z"}"#,
        )
        .unwrap();
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(
            render_row_in(&record, &pacific).start_time,
            "1/15/2024, 2:30:00 AM"
        );
    }

    #[test]
    fn test_render_row_placeholders() {
        let record = ExecutionRecord::new(3, ExecutionStatus::Running);
        let row = render_row_in(&record, &Utc);
        assert_eq!(row.test_case_id, "N/A");
        assert_eq!(row.technology, "N/A");
        assert_eq!(row.power_level, "N/A");
        assert_eq!(row.evm, "N/A");
        assert_eq!(row.acpr, "N/A");
        assert_eq!(row.duration, "N/A");
        assert_eq!(row.start_time, "N/A");
    }

    #[test]
    fn test_unknown_status_renders_verbatim() {
        let record = ExecutionRecord::new(4, ExecutionStatus::Other("ERROR".to_string()));
        let row = render_row_in(&record, &Utc);
        assert_eq!(row.status, Badge::new("ERROR", "error"));
    }

    #[test]
    fn test_columns_per_table() {
        let recent = execution_table_in(TableKind::RecentExecutions, &[finished()], &Utc);
        let all = execution_table_in(TableKind::AllExecutions, &[finished()], &Utc);
        match (&recent.rows[0], &all.rows[0]) {
            (Row::Cells(r), Row::Cells(a)) => {
                assert_eq!(r.len(), recent.columns.len());
                assert_eq!(a.len(), all.columns.len());
                assert_eq!(r[0].text(), "TC-5G-001");
                assert_eq!(a[0].text(), "7");
                assert_eq!(a[6].text(), "-45.13");
            }
            other => panic!("unexpected rows {:?}", other),
        }
    }

    #[test]
    fn test_empty_messages_differ_per_table() {
        let recent = execution_table(TableKind::RecentExecutions, &[]);
        let all = execution_table(TableKind::AllExecutions, &[]);
        let cases = test_case_table(&[]);

        let message = |t: &Table| match t.rows.as_slice() {
            [Row::Placeholder { message, colspan }] => {
                assert_eq!(*colspan, t.columns.len());
                message.clone()
            }
            other => panic!("expected one placeholder row, got {:?}", other),
        };
        assert_eq!(message(&cases), "No test cases found. Create one to get started.");
        assert_eq!(message(&all), "No executions found.");
        assert_eq!(message(&recent), "No executions yet. Run a test to get started.");
        assert_ne!(message(&all), message(&cases));
        assert_ne!(message(&all), message(&recent));
    }

    #[test]
    fn test_test_case_rows() {
        let cases: Vec<TestCase> = serde_json::from_str(
            r#"[{"testCaseId":"TC-1","name":"GSM Power","technology":"GSM","category":"Power"},
                {"testCaseId":"TC-2","name":"LTE EVM","technology":null,"enabled":false}]"#,
        )
        .unwrap();
        let table = test_case_table(&cases);
        assert_eq!(table.rows.len(), 2);
        match &table.rows[1] {
            Row::Cells(cells) => {
                assert_eq!(cells[2].text(), "N/A");
                assert_eq!(cells[4], Cell::Badge(Badge::new("Disabled", "failed")));
            }
            other => panic!("unexpected row {:?}", other),
        }
        assert!(test_case_error_table().is_placeholder());
    }

    #[test]
    fn test_test_case_without_identifier() {
        let cases: Vec<TestCase> =
            serde_json::from_str(r#"[{"testCaseId":null,"name":"orphan"}]"#).unwrap();
        match &test_case_table(&cases).rows[0] {
            Row::Cells(cells) => {
                assert_eq!(cells[0].text(), "N/A");
                assert_eq!(cells[1].text(), "orphan");
            }
            other => panic!("unexpected row {:?}", other),
        }
    }
}
