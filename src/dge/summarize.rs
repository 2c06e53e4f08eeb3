//! Per-comparison statistics and significance classification.

use super::{downsample, FDR_THRESHOLD, LOG_FC_THRESHOLD, MAX_NEG_LOG10_FDR};
use crate::data::{ComparisonStats, RawGrid, ScatterPoint};
use crate::schema::{CanonicalField, CanonicalRow, FieldResolver, FieldSpec, Table};
use once_cell::sync::Lazy;

/// Header keywords of per-gene differential-expression tables.
pub const DETAIL_KEYWORDS: &[&str] = &[
    "log2foldchange",
    "log2fc",
    "log2_fc",
    "logfc",
    "foldchange",
    "fold_change",
    "padj",
    "fdr",
    "pvalue",
    "p_value",
    "p.value",
    "qvalue",
    "q_value",
    "basemean",
    "aveexpr",
    "logcpm",
    "gene_id",
    "geneid",
    "symbol",
];

static DETAIL_RESOLVER: Lazy<FieldResolver> = Lazy::new(|| {
    FieldResolver::new(vec![
        FieldSpec::new(
            CanonicalField::Fdr,
            &[
                r"^(fdr|padj|p[ _.-]?adj(usted)?|adj[ _.-]?p[ _.-]?val(ue)?|q[ _.-]?val(ue)?|p\.adjust)$",
                r"fdr|padj|adj[ _.-]?p|q[ _.-]?val",
            ],
        )
        .unwrap(),
        FieldSpec::new(
            CanonicalField::LogFoldChange,
            &[
                r"^(log2[ _.-]?(fold[ _.-]?change|fc)|logfc|lfc|log2\(fc\))$",
                r"log.*(fc|fold)",
                r"fold[ _.-]?change|^fc$",
            ],
        )
        .unwrap(),
        FieldSpec::new(
            CanonicalField::Expression,
            &[
                r"^(base[ _.-]?mean|aveexpr|logcpm|mean[ _.-]?expr(ession)?)$",
                r"basemean|aveexpr|logcpm|mean",
            ],
        )
        .unwrap(),
        FieldSpec::new(
            CanonicalField::GeneName,
            &[r"^(gene[ _.-]?name|gene[ _.-]?symbol|symbol|name)$"],
        )
        .unwrap(),
        FieldSpec::new(
            CanonicalField::GeneId,
            &[
                r"^(gene[ _.-]?id|ensembl([ _.-]?gene)?[ _.-]?id|feature[ _.-]?id|id|gene)$",
                r"^gene|id$",
            ],
        )
        .unwrap()
        .or_first_column(),
    ])
});

/// Field table for differential-expression detail files.
pub fn detail_resolver() -> &'static FieldResolver {
    &DETAIL_RESOLVER
}

/// Scale of the expression column, which decides the MA x projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionScale {
    /// Already log-scaled (logCPM, AveExpr); used as is.
    Log,
    /// Linear mean counts (baseMean); projected as log10(value + 1).
    Linear,
}

impl ExpressionScale {
    /// Infer the scale from the expression column header.
    pub fn from_header(header: &str) -> Self {
        let lower = header.to_lowercase();
        if lower.contains("log") || lower.contains("aveexpr") {
            Self::Log
        } else {
            Self::Linear
        }
    }

    fn project(&self, value: f64) -> Option<f64> {
        match self {
            Self::Log => Some(value),
            Self::Linear if value >= 0.0 => Some((value + 1.0).log10()),
            Self::Linear => None,
        }
    }
}

/// Significance predicate: FDR < 0.05 and |log-fold-change| > 1.
pub fn is_significant(log_fc: f64, fdr: f64) -> bool {
    fdr < FDR_THRESHOLD && log_fc.abs() > LOG_FC_THRESHOLD
}

/// -log10(FDR), capped at 50. Zero (or negative) FDR maps to the cap.
pub fn neg_log10_fdr(fdr: f64) -> f64 {
    if fdr <= 0.0 {
        MAX_NEG_LOG10_FDR
    } else {
        (-fdr.log10()).min(MAX_NEG_LOG10_FDR)
    }
}

/// One parsed result row; the shared source of its volcano and MA points.
#[derive(Debug, Clone, PartialEq)]
pub struct DeRow {
    pub label: String,
    pub log_fc: f64,
    pub fdr: f64,
    pub neg_log10_fdr: f64,
    /// Mean-expression proxy on the MA x axis, when available.
    pub mean_expression: Option<f64>,
    pub significant: bool,
}

impl DeRow {
    /// Volcano projection: x = log-fold-change, y = -log10(FDR).
    pub fn volcano_point(&self) -> ScatterPoint {
        ScatterPoint {
            x: self.log_fc,
            y: self.neg_log10_fdr,
            significant: self.significant,
            label: self.label.clone(),
        }
    }

    /// MA projection: x = mean expression, y = log-fold-change.
    pub fn ma_point(&self) -> Option<ScatterPoint> {
        self.mean_expression.map(|x| ScatterPoint {
            x,
            y: self.log_fc,
            significant: self.significant,
            label: self.label.clone(),
        })
    }
}

/// Counts plus every parsed row, split by significance, before downsampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeSummary {
    pub stats: ComparisonStats,
    pub significant: Vec<DeRow>,
    pub background: Vec<DeRow>,
}

impl DeSummary {
    /// Downsample and project into (volcano, MA) point sets.
    pub fn into_points(self) -> (Vec<ScatterPoint>, Vec<ScatterPoint>) {
        let kept = downsample(self.significant, self.background, |r| r.neg_log10_fdr);
        let volcano = kept.iter().map(DeRow::volcano_point).collect();
        let ma = kept.iter().filter_map(DeRow::ma_point).collect();
        (volcano, ma)
    }
}

/// Summarize normalized detail rows.
///
/// Rows whose fold change or FDR is not a finite number are skipped and never
/// counted. Zero fold change counts toward neither `up` nor `down`.
pub fn summarize_rows(rows: &[CanonicalRow], scale: ExpressionScale) -> DeSummary {
    let mut summary = DeSummary::default();

    for row in rows {
        let (Some(log_fc), Some(fdr)) = (
            row.number(CanonicalField::LogFoldChange),
            row.number(CanonicalField::Fdr),
        ) else {
            continue;
        };

        let significant = is_significant(log_fc, fdr);
        let stats = &mut summary.stats;
        stats.total += 1;
        if log_fc > 0.0 {
            stats.up += 1;
        } else if log_fc < 0.0 {
            stats.down += 1;
        }
        if significant {
            stats.sig_total += 1;
            if log_fc > 0.0 {
                stats.sig_up += 1;
            } else {
                stats.sig_down += 1;
            }
        }

        let label = row
            .text(CanonicalField::GeneName)
            .or_else(|| row.text(CanonicalField::GeneId))
            .unwrap_or_default();
        let mean_expression = row
            .number(CanonicalField::Expression)
            .and_then(|v| scale.project(v));

        let parsed = DeRow {
            label,
            log_fc,
            fdr,
            neg_log10_fdr: neg_log10_fdr(fdr),
            mean_expression,
            significant,
        };
        if significant {
            summary.significant.push(parsed);
        } else {
            summary.background.push(parsed);
        }
    }

    summary
}

/// Locate the header, resolve columns and summarize a detail grid.
pub fn summarize_grid(grid: &RawGrid) -> DeSummary {
    let table = Table::from_grid(grid, DETAIL_KEYWORDS);
    let columns = table.resolve(detail_resolver());
    let scale = columns
        .header(CanonicalField::Expression)
        .map(ExpressionScale::from_header)
        .unwrap_or(ExpressionScale::Linear);
    tracing::debug!(
        header_row = table.header.row_index,
        rows = table.len(),
        fields = columns.len(),
        "resolved differential expression columns"
    );
    summarize_rows(&table.canonical_rows(&columns), scale)
}
