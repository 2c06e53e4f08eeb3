//! Canonical record types produced from deliverable files.

use serde::{Deserialize, Serialize};

/// Differential-expression counts for one comparison.
///
/// Invariants: `up + down <= total` and `sig_up + sig_down == sig_total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStats {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub sig_up: usize,
    pub sig_down: usize,
    pub sig_total: usize,
}

impl std::fmt::Display for ComparisonStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} genes ({} up, {} down); {} significant ({} up, {} down)",
            self.total, self.up, self.down, self.sig_total, self.sig_up, self.sig_down
        )
    }
}

/// One point of a volcano or MA plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub significant: bool,
    pub label: String,
}

/// Transcript length statistics for one annotation file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSummary {
    pub name: String,
    pub count: usize,
    pub total_length: u64,
    pub mean_length: u64,
    pub max_length: u64,
}

/// A GO or KEGG enrichment term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentTerm {
    pub term: String,
    pub count: usize,
    pub adjusted_p_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One row of a differential-expression summary table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgeSummaryRow {
    pub group_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub total: Option<usize>,
    pub up: Option<usize>,
    pub down: Option<usize>,
    pub sig_up: Option<usize>,
    pub sig_down: Option<usize>,
    pub sig_total: Option<usize>,
}

impl DgeSummaryRow {
    /// Significant gene count reported by this row.
    ///
    /// Uses the explicit total when present, otherwise `sig_up + sig_down`.
    pub fn significant_count(&self) -> Option<usize> {
        self.sig_total.or(match (self.sig_up, self.sig_down) {
            (None, None) => None,
            (up, down) => Some(up.unwrap_or(0) + down.unwrap_or(0)),
        })
    }

    /// Stats implied by this row, available only when both significant
    /// directions are reported.
    pub fn stats(&self) -> Option<ComparisonStats> {
        let sig_up = self.sig_up?;
        let sig_down = self.sig_down?;
        let up = self.up.unwrap_or(0);
        let down = self.down.unwrap_or(0);
        Some(ComparisonStats {
            total: self.total.unwrap_or(0).max(up + down),
            up,
            down,
            sig_up,
            sig_down,
            sig_total: sig_up + sig_down,
        })
    }
}

/// Free-form QC or mapping statistics table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StatsTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append another table, aligning columns by header name.
    ///
    /// Headers are the union of both in first-appearance order; cells missing
    /// from either side are blank.
    pub fn merge(&mut self, other: &StatsTable) {
        let mut mapping = Vec::with_capacity(other.headers.len());
        for header in &other.headers {
            let idx = match self.headers.iter().position(|h| h == header) {
                Some(idx) => idx,
                None => {
                    self.headers.push(header.clone());
                    self.headers.len() - 1
                }
            };
            mapping.push(idx);
        }

        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        for row in &other.rows {
            let mut aligned = vec![String::new(); width];
            for (value, &idx) in row.iter().zip(&mapping) {
                aligned[idx] = value.clone();
            }
            self.rows.push(aligned);
        }
    }
}

/// Where a comparison's stats came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum StatsSource {
    #[default]
    None,
    Summary,
    Detail,
}

/// Everything known about one comparison group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub significant_count: usize,
    pub stats: Option<ComparisonStats>,
    pub volcano: Vec<ScatterPoint>,
    pub ma: Vec<ScatterPoint>,
    pub go_terms: Vec<EnrichmentTerm>,
    pub kegg_terms: Vec<EnrichmentTerm>,
    #[serde(skip)]
    pub(crate) stats_source: StatsSource,
    #[serde(skip)]
    pub(crate) named: bool,
}

impl ComparisonRecord {
    /// Create an empty record; the display name defaults to the group id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            significant_count: 0,
            stats: None,
            volcano: Vec::new(),
            ma: Vec::new(),
            go_terms: Vec::new(),
            kegg_terms: Vec::new(),
            stats_source: StatsSource::None,
            named: false,
        }
    }

    /// Check if a detail file has contributed to this record.
    pub fn has_detail(&self) -> bool {
        self.stats_source == StatsSource::Detail
    }

    /// Number of significant points retained for plotting.
    pub fn significant_points(&self) -> usize {
        self.volcano.iter().filter(|p| p.significant).count()
    }

    /// Reconcile a summary-table row into this record.
    ///
    /// Name and description only fill blanks; summary stats never replace
    /// detail stats.
    pub(crate) fn merge_summary(&mut self, row: &DgeSummaryRow) {
        if let Some(name) = row.name.as_deref().filter(|n| !n.is_empty()) {
            if !self.named {
                self.name = name.to_string();
                self.named = true;
            }
        }
        if self.description.is_empty() {
            if let Some(desc) = row.description.as_deref() {
                self.description = desc.to_string();
            }
        }
        if self.stats_source == StatsSource::None {
            match row.stats() {
                Some(stats) => {
                    self.significant_count = stats.sig_total;
                    self.stats = Some(stats);
                }
                None => {
                    if let Some(count) = row.significant_count() {
                        self.significant_count = count;
                    }
                }
            }
            self.stats_source = StatsSource::Summary;
        }
    }

    /// Install detail-file stats and points. Returns `false` when another
    /// detail file already supplied them.
    pub(crate) fn merge_detail(
        &mut self,
        stats: ComparisonStats,
        volcano: &[ScatterPoint],
        ma: &[ScatterPoint],
    ) -> bool {
        if self.stats_source == StatsSource::Detail {
            return false;
        }
        self.stats = Some(stats);
        self.significant_count = stats.sig_total;
        self.volcano = volcano.to_vec();
        self.ma = ma.to_vec();
        self.stats_source = StatsSource::Detail;
        true
    }
}
