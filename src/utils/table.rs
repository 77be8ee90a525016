//! Table rendering utilities for CLI outputs.
//!
//! Widths are measured in terminal columns, so wide and combining characters
//! line up. Cells may be decorated (colours, hyperlinks) after padding; the
//! padding is always computed on the raw text.

use ansi_term::Style;
use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub width: usize,
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

/// Width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}

impl Table {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let columns = headers
            .iter()
            .map(|h| Column {
                header: h.as_ref().to_string(),
                width: display_width(h.as_ref()),
            })
            .collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row; missing cells render blank, extra cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (col, cell) in self.columns.iter_mut().zip(&row) {
            col.width = col.width.max(display_width(cell));
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        self.render_with(Style::new(), |s| s.to_string())
    }

    /// Render with `header` applied to the header line and `decorate` applied
    /// to every padded body cell.
    pub fn render_with(&self, header: Style, decorate: impl Fn(&str) -> String) -> String {
        let mut out = String::new();

        let line: Vec<String> = self
            .columns
            .iter()
            .map(|c| pad_right(&c.header, c.width))
            .collect();
        out.push_str(&header.paint(line.join(" │ ")).to_string());
        out.push('\n');

        let rule: Vec<String> = self.columns.iter().map(|c| "─".repeat(c.width)).collect();
        out.push_str(&rule.join("─┼─"));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let raw = row.get(i).map(String::as_str).unwrap_or("");
                    decorate(&pad_right(raw, c.width))
                })
                .collect();
            out.push_str(cells.join(" │ ").trim_end());
            out.push('\n');
        }

        out
    }
}
