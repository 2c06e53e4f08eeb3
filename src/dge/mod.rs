//! Differential-expression results: per-comparison statistics, significance
//! classification, plot downsampling and summary tables.
//!
//! Thresholds are fixed:
//! - significant: FDR < 0.05 and |log-fold-change| > 1
//! - -log10(FDR) capped at 50
//! - at most 3000 significant and 5000 total points per plot

mod downsample;
mod summarize;
mod summary_table;

pub use downsample::{downsample, SIG_LIMIT, TOTAL_LIMIT};
pub use summarize::{
    detail_resolver, is_significant, neg_log10_fdr, summarize_grid, summarize_rows, DeRow,
    DeSummary, ExpressionScale, DETAIL_KEYWORDS,
};
pub use summary_table::{parse_dge_summary, summary_resolver, SUMMARY_KEYWORDS};

/// FDR must be strictly below this to be significant.
pub const FDR_THRESHOLD: f64 = 0.05;

/// |log-fold-change| must be strictly above this to be significant.
pub const LOG_FC_THRESHOLD: f64 = 1.0;

/// Upper bound on -log10(FDR); FDR == 0 maps here.
pub const MAX_NEG_LOG10_FDR: f64 = 50.0;
