//! Sequencing Deliverables Ingestion Library
//!
//! Turns loosely-structured bioinformatics deliverables (spreadsheets,
//! delimited text, gene annotations) into a canonical dataset for report
//! assembly, without a user-supplied schema.
//!
//! # Overview
//!
//! The library is organized into modules, leaf first:
//!
//! - **data**: Raw grids, input files, canonical records and the merged dataset
//! - **schema**: Header row discovery, ranked column resolution, row normalization
//! - **classify**: Filename classification and comparison group ids
//! - **dge**: Differential-expression statistics, significance and downsampling
//! - **qc**: Sequencing QC and alignment statistics tables
//! - **annotation**: Transcript length statistics from GTF/GFF
//! - **enrichment**: GO/KEGG term extraction
//! - **pipeline**: Configuration, per-file processing and the ingestion session
//!
//! # Example
//!
//! ```no_run
//! use seqreport::prelude::*;
//!
//! let session = Session::new();
//! let reports = session.ingest(vec![
//!     InputFile::from_path("deliverables/DGE_summary.xlsx").unwrap(),
//!     InputFile::from_path("deliverables/C1_DEG_results.xlsx").unwrap(),
//!     InputFile::from_path("deliverables/Comparison1_GO_Enrichment.xlsx").unwrap(),
//! ]);
//! for report in &reports {
//!     println!("{}", report);
//! }
//! let dataset = session.dataset();
//! println!("{}", dataset.to_json().unwrap());
//! ```

pub mod annotation;
pub mod classify;
pub mod data;
pub mod dge;
pub mod enrichment;
pub mod error;
pub mod pipeline;
pub mod qc;
pub mod schema;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::annotation::aggregate_transcripts;
    pub use crate::classify::{classify, extract_group_id, FileClassification, FileKind};
    pub use crate::data::{
        Cell, ComparisonRecord, ComparisonStats, Contribution, Dataset, DgeSummaryRow,
        EnrichmentTerm, InputFile, RawGrid, ScatterPoint, StatsTable, TranscriptSummary,
    };
    pub use crate::dge::{
        downsample, is_significant, parse_dge_summary, summarize_grid, DeSummary, SIG_LIMIT,
        TOTAL_LIMIT,
    };
    pub use crate::enrichment::{extract_terms, top_terms, ENRICHMENT_TERM_CAP};
    pub use crate::error::{IngestError, Result};
    pub use crate::pipeline::{
        process_file, FileReport, FileStatus, IngestConfig, OutputFormat, Session,
    };
    pub use crate::qc::parse_stats_table;
    pub use crate::schema::{locate_header, normalize_rows, CanonicalField, FieldResolver};
}
