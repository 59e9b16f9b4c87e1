//! Plain-text tables with width-aware alignment.
//!
//! Cells may carry ANSI styling; widths are measured on the visible text.
//! The last column wraps to the terminal width.

use console::{Alignment, measure_text_width, pad_str, style};

/// Space between columns.
const GUTTER: &str = "  ";

/// Narrowest the wrapped last column is allowed to get.
const MIN_LAST_COLUMN: usize = 20;

/// Width used when the terminal size is unknown.
const FALLBACK_WIDTH: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: Option<usize>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            max_width: None,
        }
    }

    /// A table without a header row.
    pub fn headless(columns: usize) -> Self {
        Self {
            headers: vec![String::new(); columns],
            rows: Vec::new(),
            max_width: None,
        }
    }

    /// Wrap to this many columns instead of the terminal width.
    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn has_header(&self) -> bool {
        self.headers.iter().any(|h| !h.is_empty())
    }

    /// Render the table; every line ends with a newline.
    pub fn render(&self) -> String {
        let columns = self.headers.len();
        if columns == 0 {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let widest = cell.lines().map(measure_text_width).max().unwrap_or(0);
                widths[i] = widths[i].max(widest);
            }
        }

        let leading: usize = widths[..columns - 1]
            .iter()
            .map(|w| w + GUTTER.len())
            .sum();
        let total = self.max_width.unwrap_or_else(terminal_width);
        let last_width = total.saturating_sub(leading).max(MIN_LAST_COLUMN);

        let mut out = String::new();
        if self.has_header() {
            let header: Vec<String> = self
                .headers
                .iter()
                .map(|h| style(h).bold().to_string())
                .collect();
            self.push_line(&mut out, &header, &widths);
            let rule: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let w = if i == columns - 1 { (*w).min(last_width) } else { *w };
                    "─".repeat(w)
                })
                .collect();
            self.push_line(&mut out, &rule, &widths);
        }

        for row in &self.rows {
            let last = &row[columns - 1];
            let wrapped: Vec<String> = if last.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(last, last_width)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            };
            for (n, piece) in wrapped.iter().enumerate() {
                let mut cells: Vec<String> = if n == 0 {
                    row[..columns - 1].to_vec()
                } else {
                    vec![String::new(); columns - 1]
                };
                cells.push(piece.clone());
                self.push_line(&mut out, &cells, &widths);
            }
        }
        out
    }

    fn push_line(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        let last = cells.len() - 1;
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i == last {
                line.push_str(cell);
            } else {
                line.push_str(&pad_str(cell, widths[i], Alignment::Left, None));
                line.push_str(GUTTER);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(FALLBACK_WIDTH)
}
