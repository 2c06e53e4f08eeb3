//! The project-wide dataset and the per-file contributions merged into it.

use crate::data::{
    ComparisonRecord, ComparisonStats, DgeSummaryRow, EnrichmentTerm, ScatterPoint, StatsTable,
    TranscriptSummary,
};
use crate::enrichment::ENRICHMENT_TERM_CAP;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// What one processed file adds to the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Contribution {
    /// The file carries nothing the dataset records (deliverables, templates).
    Empty,
    /// Sequencing QC statistics.
    DataStats(StatsTable),
    /// Read alignment statistics.
    MappingStats(StatsTable),
    /// Transcript length summary from an annotation file.
    Transcripts(TranscriptSummary),
    /// Rows of a differential-expression summary table.
    DgeSummary(Vec<DgeSummaryRow>),
    /// Per-gene differential-expression results for one comparison.
    Detail {
        group_id: String,
        stats: ComparisonStats,
        volcano: Vec<ScatterPoint>,
        ma: Vec<ScatterPoint>,
    },
    /// GO enrichment terms for one comparison.
    GoTerms {
        group_id: String,
        terms: Vec<EnrichmentTerm>,
    },
    /// KEGG pathway terms for one comparison.
    KeggTerms {
        group_id: String,
        terms: Vec<EnrichmentTerm>,
    },
}

impl Contribution {
    /// Comparison group ids this contribution touches.
    pub fn group_ids(&self) -> Vec<&str> {
        match self {
            Contribution::DgeSummary(rows) => rows.iter().map(|r| r.group_id.as_str()).collect(),
            Contribution::Detail { group_id, .. }
            | Contribution::GoTerms { group_id, .. }
            | Contribution::KeggTerms { group_id, .. } => vec![group_id.as_str()],
            _ => Vec::new(),
        }
    }

    /// Check if this contribution adds nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Contribution::Empty)
    }
}

/// The merged, report-ready dataset for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub data_stats_table: Option<StatsTable>,
    pub mapping_stats_table: Option<StatsTable>,
    pub transcript_stats: Vec<TranscriptSummary>,
    pub dge_summary_table: Vec<DgeSummaryRow>,
    pub comparisons: BTreeMap<String, ComparisonRecord>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset by merging contributions in the given order.
    pub fn from_contributions<'a, I>(contributions: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Contribution)>,
    {
        let mut dataset = Self::new();
        for (source, contribution) in contributions {
            dataset.merge(source, contribution);
        }
        dataset
    }

    /// Get the record for a group id, creating it on first reference.
    pub fn comparison_mut(&mut self, group_id: &str) -> &mut ComparisonRecord {
        self.comparisons
            .entry(group_id.to_string())
            .or_insert_with(|| ComparisonRecord::new(group_id))
    }

    /// Merge one file's contribution into the dataset.
    pub fn merge(&mut self, source: &str, contribution: &Contribution) {
        match contribution {
            Contribution::Empty => {}
            Contribution::DataStats(table) => merge_table(&mut self.data_stats_table, table),
            Contribution::MappingStats(table) => merge_table(&mut self.mapping_stats_table, table),
            Contribution::Transcripts(summary) => self.transcript_stats.push(summary.clone()),
            Contribution::DgeSummary(rows) => {
                for row in rows {
                    self.comparison_mut(&row.group_id).merge_summary(row);
                }
                self.dge_summary_table.extend(rows.iter().cloned());
            }
            Contribution::Detail {
                group_id,
                stats,
                volcano,
                ma,
            } => {
                let record = self.comparison_mut(group_id);
                if !record.merge_detail(*stats, volcano, ma) {
                    tracing::warn!(
                        file = source,
                        group = %group_id,
                        "comparison already has detail results, ignoring"
                    );
                }
            }
            Contribution::GoTerms { group_id, terms } => {
                extend_terms(&mut self.comparison_mut(group_id).go_terms, terms)
            }
            Contribution::KeggTerms { group_id, terms } => {
                extend_terms(&mut self.comparison_mut(group_id).kegg_terms, terms)
            }
        }
    }

    /// Number of comparison groups.
    pub fn n_comparisons(&self) -> usize {
        self.comparisons.len()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write one row per comparison with its stats to a TSV file.
    pub fn write_comparisons_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "group_id\tname\tsignificant\ttotal\tup\tdown\tsig_up\tsig_down\tvolcano_points\tgo_terms\tkegg_terms"
        )?;

        for record in self.comparisons.values() {
            let stats = record.stats.unwrap_or_default();
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                record.id,
                record.name,
                record.significant_count,
                stats.total,
                stats.up,
                stats.down,
                stats.sig_up,
                stats.sig_down,
                record.volcano.len(),
                record.go_terms.len(),
                record.kegg_terms.len()
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn merge_table(slot: &mut Option<StatsTable>, table: &StatsTable) {
    match slot {
        Some(existing) => existing.merge(table),
        None => *slot = Some(table.clone()),
    }
}

fn extend_terms(target: &mut Vec<EnrichmentTerm>, terms: &[EnrichmentTerm]) {
    let room = ENRICHMENT_TERM_CAP.saturating_sub(target.len());
    target.extend(terms.iter().take(room).cloned());
}
