//! Rendering of command results as aligned tables or JSON.

use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Real value; `NaN` becomes `null` in JSON.
    Number(f64),
    /// Count.
    Integer(u64),
    /// Label.
    Text(String),
    /// Flag.
    Flag(bool),
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<u64> for Cell {
    fn from(v: u64) -> Self {
        Cell::Integer(v)
    }
}

impl From<usize> for Cell {
    fn from(v: usize) -> Self {
        Cell::Integer(v as u64)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Flag(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

/// Titled rows of cells under named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Heading printed above the table.
    pub title: String,
    /// Column names.
    pub columns: Vec<String>,
    /// Rows, each as long as `columns`.
    pub rows: Vec<Vec<Cell>>,
}

impl Report {
    /// Empty report with the given heading and columns.
    pub fn new<I, S>(title: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Renders in `format`, numbers to `precision` significant digits.
    pub fn render(&self, format: OutputFormat, precision: usize) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(self.to_table(precision)),
        }
    }

    fn to_table(&self, precision: usize) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| format_cell(c, precision)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(j))
                    .map(String::len)
                    .fold(name.len(), usize::max)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        push_line(&mut out, self.columns.iter().map(String::as_str), &widths);
        for row in &cells {
            push_line(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn format_cell(cell: &Cell, precision: usize) -> String {
    match cell {
        Cell::Number(v) => format_number(*v, precision),
        Cell::Integer(v) => v.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Flag(b) => b.to_string(),
    }
}

/// Formats `v` with `digits` significant digits, dropping trailing zeros.
///
/// Magnitudes outside `[1e-5, 1e15)` use scientific notation.
pub fn format_number(v: f64, digits: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    let exponent = v.abs().log10().floor() as i32;
    if (-5..15).contains(&exponent) {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{v:.decimals$}")).to_string()
    } else {
        let text = format!("{:.*e}", digits - 1, v);
        match text.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => text,
        }
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
