//! Plain-text rendering for the terminal.

use crate::dashboard::{DashboardView, StatCard};
use crate::instruments::{ChartPanel, InstrumentsView};
use crate::prediction::{PredictionView, SelectOption};
use crate::report::ReportView;
use crate::table::{Badge, Cell, Row, Table};
use std::fmt::Write;

/// Widest bar drawn for a chart point.
pub const BAR_WIDTH: usize = 40;

fn badge(b: &Badge) -> String {
    format!("[{}]", b.text)
}

fn cell(c: &Cell) -> String {
    match c {
        Cell::Text(t) => t.clone(),
        Cell::Badge(b) => badge(b),
    }
}

/// Column-aligned table with a header rule.
pub fn render_table(table: &Table) -> String {
    let rows: Vec<Option<Vec<String>>> = table
        .rows
        .iter()
        .map(|row| match row {
            Row::Cells(cells) => Some(cells.iter().map(cell).collect()),
            Row::Placeholder { .. } => None,
        })
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for cells in rows.iter().flatten() {
        for (i, text) in cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(text.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(text, w)| format!("{:<width$}", text, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = table.columns.iter().map(|c| c.to_string()).collect();
    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&header));
    let _ = writeln!(out, "{}", "-".repeat(rule_len));
    for (row, cells) in table.rows.iter().zip(rows.iter()) {
        match (row, cells) {
            (_, Some(cells)) => {
                let _ = writeln!(out, "{}", line(cells));
            }
            (Row::Placeholder { message, .. }, None) => {
                let _ = writeln!(out, "{}", message);
            }
            (Row::Cells(_), None) => {}
        }
    }
    out
}

pub fn render_cards(cards: &[StatCard]) -> String {
    cards
        .iter()
        .map(|c| format!("{}: {}", c.label, c.value))
        .collect::<Vec<_>>()
        .join("   ")
}

pub fn render_dashboard(view: &DashboardView) -> String {
    format!(
        "{}\n\nRecent Executions\n{}",
        render_cards(&view.cards),
        render_table(&view.recent)
    )
}

pub fn render_report(view: &ReportView) -> String {
    let mut out = format!("{}\n{}\n", view.title, render_cards(&view.cards));
    if let Some(section) = &view.anomalies {
        let _ = write!(out, "\n{}\n{}", section.heading, render_table(&section.table));
    }
    out
}

pub fn render_prediction(view: &PredictionView) -> String {
    let mut out = format!(
        "Failure Probability ({}): {} [{}]\n{}\nRecommendation: {}\n",
        view.test_case_id,
        view.probability,
        view.tier.class(),
        view.confidence,
        view.recommendation
    );
    if let Some(metrics) = &view.metrics {
        for (label, value) in metrics {
            let _ = writeln!(out, "Predicted {}: {}", label, value);
        }
    }
    out
}

pub fn render_options(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| o.label.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per point: label, value, and a bar scaled to the series range.
pub fn render_chart(panel: &ChartPanel) -> String {
    let mut out = format!("{} ({} vs {})\n", panel.title, panel.y_axis, panel.x_axis);
    let series = match &panel.series {
        Some(s) => s,
        None => {
            out.push_str("(no data)\n");
            return out;
        }
    };
    let values = series.values();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let label_width = series
        .points
        .iter()
        .map(|p| p.label.len())
        .max()
        .unwrap_or(0);
    for point in &series.points {
        let filled = if max > min {
            (((point.value - min) / (max - min)) * BAR_WIDTH as f64).round() as usize
        } else {
            BAR_WIDTH
        };
        let _ = writeln!(
            out,
            "{:>lw$}  {:>8.2}  {}",
            point.label,
            point.value,
            "#".repeat(filled.max(1)),
            lw = label_width
        );
    }
    out
}

pub fn render_instruments(view: &InstrumentsView) -> String {
    let mut out = String::new();
    for instrument in &view.instruments {
        let _ = writeln!(out, "{}: {}", instrument.name, badge(&instrument.status));
    }
    for panel in &view.charts {
        let _ = write!(out, "\n{}", render_chart(panel));
    }
    out
}
