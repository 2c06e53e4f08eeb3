//! Header row discovery in messy tabular exports.

use crate::data::{Cell, RawGrid};
use serde::{Deserialize, Serialize};

/// Number of leading rows scanned for a header.
pub const HEADER_SCAN_ROWS: usize = 20;

/// The row chosen as header and its cell texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub row_index: usize,
    pub headers: Vec<String>,
}

/// Find the header row of a grid.
///
/// Scans the first [`HEADER_SCAN_ROWS`] rows and picks the first one whose
/// lower-cased cells contain at least one expected keyword as a substring.
/// Falls back to row 0 when no row qualifies. An empty grid yields no headers.
pub fn locate_header(grid: &RawGrid, keywords: &[&str]) -> HeaderMatch {
    let rows = grid.rows();
    if rows.is_empty() {
        return HeaderMatch::default();
    }

    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let row_index = rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| keyword_hits(row, &keywords) >= 1)
        .unwrap_or(0);

    let headers = rows[row_index].iter().map(Cell::as_text).collect();
    HeaderMatch { row_index, headers }
}

/// Number of distinct keywords found in a row.
fn keyword_hits(row: &[Cell], keywords: &[String]) -> usize {
    let joined = row
        .iter()
        .map(|c| c.as_text().to_lowercase())
        .collect::<Vec<_>>()
        .join("\t");
    keywords.iter().filter(|k| joined.contains(k.as_str())).count()
}
