//! Row-object normalization of raw grids.

use super::fields::{CanonicalField, ColumnMap, FieldResolver};
use super::header::{locate_header, HeaderMatch};
use crate::data::{Cell, RawGrid};
use std::collections::BTreeMap;

/// Canonical field → raw value for one data row.
///
/// Only resolved fields with a non-empty cell are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRow {
    values: BTreeMap<CanonicalField, Cell>,
}

impl CanonicalRow {
    /// Raw value of a field.
    pub fn get(&self, field: CanonicalField) -> Option<&Cell> {
        self.values.get(&field)
    }

    /// Value of a field as a finite number.
    pub fn number(&self, field: CanonicalField) -> Option<f64> {
        self.get(field).and_then(Cell::as_f64)
    }

    /// Value of a field as a non-negative count.
    pub fn count(&self, field: CanonicalField) -> Option<usize> {
        self.get(field).and_then(Cell::as_count)
    }

    /// Value of a field as non-empty text.
    pub fn text(&self, field: CanonicalField) -> Option<String> {
        self.get(field)
            .map(Cell::as_text)
            .filter(|s| !s.trim().is_empty())
    }

    /// Check if the field is present.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.values.contains_key(&field)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no field is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A grid split into its discovered header and the data rows beneath it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: HeaderMatch,
    /// Data rows after the header, blank rows dropped, each padded with
    /// `Cell::Empty` to at least the header width.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Split a grid at its header row.
    pub fn from_grid(grid: &RawGrid, keywords: &[&str]) -> Self {
        let header = locate_header(grid, keywords);
        let width = header.headers.len();
        let rows = grid
            .rows()
            .iter()
            .skip(header.row_index + 1)
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .map(|row| {
                let mut row = row.clone();
                if row.len() < width {
                    row.resize(width, Cell::Empty);
                }
                row
            })
            .collect();
        Self { header, rows }
    }

    /// Header texts.
    pub fn headers(&self) -> &[String] {
        &self.header.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bind the headers to canonical fields.
    pub fn resolve(&self, resolver: &FieldResolver) -> ColumnMap {
        resolver.resolve(self.headers())
    }

    /// Project every data row onto the resolved canonical fields.
    pub fn canonical_rows(&self, columns: &ColumnMap) -> Vec<CanonicalRow> {
        self.rows
            .iter()
            .map(|row| {
                let values = columns
                    .iter()
                    .filter_map(|(field, idx)| {
                        row.get(idx)
                            .filter(|cell| !cell.is_empty())
                            .map(|cell| (field, cell.clone()))
                    })
                    .collect();
                CanonicalRow { values }
            })
            .collect()
    }
}

/// Normalize a grid into canonical rows in one step.
pub fn normalize_rows(
    grid: &RawGrid,
    keywords: &[&str],
    resolver: &FieldResolver,
) -> (ColumnMap, Vec<CanonicalRow>) {
    let table = Table::from_grid(grid, keywords);
    let columns = table.resolve(resolver);
    let rows = table.canonical_rows(&columns);
    (columns, rows)
}
