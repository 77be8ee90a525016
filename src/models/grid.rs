use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Header used by every new program block.
pub const DEFAULT_HEADER: [&str; 4] = ["Exercise/תרגיל", "Sets/סטים", "Reps/חזרות", "Weight/משקל"];

/// Label given to the header cell of an added column.
pub const NEW_COLUMN_LABEL: &str = "New column/עמודה חדשה";

/// The cell table of one program block.
///
/// Row 0 holds the column labels, later rows hold cell values. Every row has
/// the header's length; stored grids are padded on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Grid(Vec<Vec<String>>);

impl Default for Grid {
    fn default() -> Self {
        Self::with_header(&DEFAULT_HEADER)
    }
}

impl Grid {
    /// Header plus one blank row.
    pub fn with_header<S: AsRef<str>>(header: &[S]) -> Self {
        let header: Vec<String> = header.iter().map(|h| h.as_ref().to_string()).collect();
        let blank = vec![String::new(); header.len()];
        Self(vec![header, blank])
    }

    /// Build from arbitrary rows, padding ragged rows to the widest one.
    /// No rows at all gives a single blank header cell over a single blank cell.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self(vec![vec![String::new()], vec![String::new()]]);
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self(rows)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.0
    }

    pub fn header(&self) -> &[String] {
        self.0.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Data rows, without the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn width(&self) -> usize {
        self.header().len()
    }

    pub fn height(&self) -> usize {
        self.0.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.0.get(row)?.get(col).map(String::as_str)
    }

    /// Replace one cell. Returns `Ok(false)` when the stored value is already
    /// byte-equal, leaving the grid untouched.
    pub fn update_cell(&mut self, row: usize, col: usize, value: &str) -> AppResult<bool> {
        let cell = self
            .0
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(AppError::InvalidCell { row, col })?;

        if cell == value {
            return Ok(false);
        }
        *cell = value.to_string();
        Ok(true)
    }

    /// Append a row of empty cells sized to the header.
    pub fn add_row(&mut self) {
        let width = self.width();
        self.0.push(vec![String::new(); width]);
    }

    /// Remove a data row. Row 0 is the header and is refused.
    pub fn delete_row(&mut self, index: usize) -> AppResult<Vec<String>> {
        if index == 0 {
            return Err(AppError::HeaderRowProtected);
        }
        if index >= self.0.len() {
            return Err(AppError::InvalidRow(index));
        }
        Ok(self.0.remove(index))
    }

    /// Append one column: the header gets `label`, every other row an empty cell.
    pub fn add_column(&mut self, label: &str) {
        for (i, row) in self.0.iter_mut().enumerate() {
            row.push(if i == 0 {
                label.to_string()
            } else {
                String::new()
            });
        }
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.0.iter().all(|r| r.len() == width)
    }
}

impl From<Vec<Vec<String>>> for Grid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<String>> {
    fn from(grid: Grid) -> Self {
        grid.0
    }
}
