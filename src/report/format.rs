//! Display formatting for projection tables
//!
//! Formatting is a read-only projection of a series for presentation.
//! Anything that does arithmetic should read the unformatted series.

use serde::Serialize;

use crate::projection::{
    Column, ColumnKind, CombinedSeries, PeriodSeries, COMBINED_HEADERS,
};

/// A table of display strings, header row first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FormattedTable {
    /// Right-aligned plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|cell| cell.len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        push_line(&mut out, &self.headers, &widths);
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(rule_len));
        out.push('\n');
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
        .collect();
    out.push_str(&line.join("  "));
    out.push('\n');
}

/// Renders series values as currency and share counts
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn new() -> Self {
        Self
    }

    /// `$1,234.56`; negatives as `-$1,234.56`
    pub fn currency(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let text = format!("{:.2}", value.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!("{}${}.{}", sign_of(value, &text), group_thousands(whole), cents)
    }

    /// Whole shares with thousands separators: `10,000`
    pub fn count(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let text = format!("{:.0}", value.abs());
        format!("{}{}", sign_of(value, &text), group_thousands(&text))
    }

    /// Format one cell by column kind
    pub fn cell(&self, kind: ColumnKind, value: f64) -> String {
        match kind {
            ColumnKind::Period => format!("{}", value as u32),
            ColumnKind::Money => self.currency(value),
            ColumnKind::ShareCount => self.count(value),
        }
    }

    /// Every column of the series in export order
    pub fn format_series(&self, series: &PeriodSeries) -> FormattedTable {
        self.format_columns(series, series.columns())
    }

    /// A chosen subset of columns, in the given order
    pub fn format_columns(&self, series: &PeriodSeries, columns: &[Column]) -> FormattedTable {
        let headers = columns.iter().map(|c| c.header().to_string()).collect();
        let rows = series
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|&c| self.cell(c.kind(), row.value(c)))
                    .collect()
            })
            .collect();
        FormattedTable { headers, rows }
    }

    pub fn format_combined(&self, combined: &CombinedSeries) -> FormattedTable {
        let headers = COMBINED_HEADERS.iter().map(|h| h.to_string()).collect();
        let rows = combined
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.period.to_string(),
                    self.currency(r.common_value),
                    self.currency(r.option_value),
                    self.currency(r.combined_value),
                ]
            })
            .collect();
        FormattedTable { headers, rows }
    }
}

/// Minus sign unless the rounded magnitude is zero
fn sign_of(value: f64, rounded: &str) -> &'static str {
    if value < 0.0 && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
