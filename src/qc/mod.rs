//! Sequencing QC and read-alignment statistics tables.
//!
//! These sheets have no fixed schema; they are kept as text tables below the
//! located header so report assembly can render them verbatim.

use crate::data::{Cell, RawGrid, StatsTable};
use crate::schema::Table;

/// Header keywords of sequencing QC tables.
pub const QC_KEYWORDS: &[&str] = &[
    "sample",
    "raw reads",
    "clean reads",
    "raw_reads",
    "clean_reads",
    "raw bases",
    "clean bases",
    "q20",
    "q30",
    "gc",
    "error",
];

/// Header keywords of alignment statistics tables.
pub const MAPPING_KEYWORDS: &[&str] = &[
    "sample",
    "total reads",
    "total_reads",
    "mapped",
    "uniquely",
    "multiple",
    "mapping rate",
    "aligned",
];

/// Minimum number of columns for a stats table to be meaningful.
const MIN_COLUMNS: usize = 2;

/// Parse a free-form statistics sheet.
///
/// Trailing blank header columns are dropped and every row is cut or padded
/// to the header width. Returns `None` when fewer than two columns or no
/// data rows remain.
pub fn parse_stats_table(grid: &RawGrid, keywords: &[&str]) -> Option<StatsTable> {
    let table = Table::from_grid(grid, keywords);
    let width = table
        .headers()
        .iter()
        .rposition(|h| !h.trim().is_empty())
        .map(|idx| idx + 1)
        .unwrap_or(0);
    if width < MIN_COLUMNS || table.is_empty() {
        return None;
    }

    let headers = table.headers()[..width].to_vec();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut texts: Vec<String> = row.iter().take(width).map(Cell::as_text).collect();
            texts.resize(width, String::new());
            texts
        })
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return None;
    }
    Some(StatsTable { headers, rows })
}
