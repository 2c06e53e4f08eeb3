//! Data structures: raw input grids, canonical records and the merged dataset.

mod dataset;
mod grid;
mod input;
mod records;

pub use dataset::{Contribution, Dataset};
pub use grid::{Cell, RawGrid};
pub use input::{parse_delimited, InputFile};
pub use records::{
    ComparisonRecord, ComparisonStats, DgeSummaryRow, EnrichmentTerm, ScatterPoint, StatsTable,
    TranscriptSummary,
};
