//! Dashboard view: stat cards plus the recent-executions table.

use crate::table::{execution_table_in, Table, TableKind};
use chrono::{Local, TimeZone};
use rtd_data::recent::recent_executions;
use rtd_data::stats::{compute_stats, DashboardStats};
use rtd_model::{ExecutionRecord, TestCase};
use serde::Serialize;
use std::fmt::Display;

/// A labeled figure (dashboard and report totals).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl StatCard {
    pub fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub cards: Vec<StatCard>,
    pub recent: Table,
}

pub fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    vec![
        StatCard::new("Passed", stats.passed_count),
        StatCard::new("Failed", stats.failed_count),
        StatCard::new("Total Test Cases", stats.total_test_case_count),
        StatCard::new("Pass Rate", stats.pass_rate_label()),
    ]
}

/// Build the dashboard from one complete, already-fetched load.
pub fn dashboard_view(
    executions: &[ExecutionRecord],
    test_cases: &[TestCase],
    recent_limit: usize,
) -> DashboardView {
    dashboard_view_in(executions, test_cases, recent_limit, &Local)
}

pub fn dashboard_view_in<Tz: TimeZone>(
    executions: &[ExecutionRecord],
    test_cases: &[TestCase],
    recent_limit: usize,
    zone: &Tz,
) -> DashboardView
where
    Tz::Offset: Display,
{
    let stats = compute_stats(executions, test_cases);
    let recent = recent_executions(executions, recent_limit);
    DashboardView {
        cards: stat_cards(&stats),
        recent: execution_table_in(TableKind::RecentExecutions, &recent, zone),
        stats,
    }
}
