//! Raw cell grids read verbatim from spreadsheets and delimited text.

use serde::{Deserialize, Serialize};

/// A single scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Blank cell.
    Empty,
    /// Text value, trimmed.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Build a cell from raw text; blank text becomes `Empty`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// Check if this cell carries no value.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as text. Integral numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    format!("{}", *v as i64)
                } else {
                    v.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Interpret the cell as a finite number.
    ///
    /// Text is trimmed before parsing; `NA`, `NaN` and infinities are rejected.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Interpret the cell as a non-negative count, rounding fractional values.
    pub fn as_count(&self) -> Option<usize> {
        let value = self.as_f64()?;
        (value >= 0.0).then(|| value.round() as usize)
    }
}

/// One sheet or delimited file, row by row, exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    /// Create a grid from rows of cells.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a grid from rows of text, mostly useful for fixtures.
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| Cell::from_text(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// All rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Check if the grid has no non-empty cell at all.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(Cell::is_empty))
    }
}
