//! Per-file processing: classify, parse and derive a contribution.

use crate::annotation::aggregate_transcripts;
use crate::classify::{classify, FileClassification, FileKind};
use crate::data::{Contribution, InputFile, RawGrid};
use crate::dge::{parse_dge_summary, summarize_grid};
use crate::enrichment::extract_terms;
use crate::error::{IngestError, Result};
use crate::qc::{parse_stats_table, MAPPING_KEYWORDS, QC_KEYWORDS};

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub classification: FileClassification,
    pub contribution: Contribution,
    /// Soft failure: the file was read but contributed less than expected.
    pub warning: Option<String>,
}

impl FileOutcome {
    fn new(classification: FileClassification, contribution: Contribution) -> Self {
        Self {
            classification,
            contribution,
            warning: None,
        }
    }

    fn warn(mut self, message: impl Into<String>) -> Self {
        self.warning = Some(message.into());
        self
    }
}

/// Classify one file and derive what it contributes to the dataset.
///
/// Errors are scoped to this file: unreadable content, or a comparison-scoped
/// file without a group id. Empty or unrecognized sheets are not errors; they
/// yield an empty contribution with a warning.
pub fn process_file(file: &InputFile) -> Result<FileOutcome> {
    let classification = classify(&file.name);
    let kind = classification.kind;
    tracing::debug!(
        file = %file.name,
        kind = %kind,
        group = classification.group_id.as_deref().unwrap_or("-"),
        "classified"
    );

    let group_id = match (&classification.group_id, kind.requires_group()) {
        (Some(id), _) => id.clone(),
        (None, true) => {
            return Err(IngestError::MissingGroupIdentifier {
                filename: file.name.clone(),
                kind: kind.to_string(),
            })
        }
        (None, false) => String::new(),
    };

    let outcome = FileOutcome::new(classification, Contribution::Empty);
    let outcome = match kind {
        FileKind::GlobalStats | FileKind::Mapping => {
            let keywords = if kind == FileKind::Mapping {
                MAPPING_KEYWORDS
            } else {
                QC_KEYWORDS
            };
            match parse_stats_table(&load_grid(file)?, keywords) {
                Some(table) if kind == FileKind::Mapping => FileOutcome {
                    contribution: Contribution::MappingStats(table),
                    ..outcome
                },
                Some(table) => FileOutcome {
                    contribution: Contribution::DataStats(table),
                    ..outcome
                },
                None => outcome.warn("no statistics table found"),
            }
        }
        FileKind::DgeSummary => {
            let rows = parse_dge_summary(&load_grid(file)?);
            if rows.is_empty() {
                outcome.warn("no comparison rows found")
            } else {
                FileOutcome {
                    contribution: Contribution::DgeSummary(rows),
                    ..outcome
                }
            }
        }
        FileKind::ComparisonDge => {
            let summary = summarize_grid(&load_grid(file)?);
            if summary.stats.total == 0 {
                outcome.warn("no rows with numeric fold change and FDR")
            } else {
                let stats = summary.stats;
                let (volcano, ma) = summary.into_points();
                FileOutcome {
                    contribution: Contribution::Detail {
                        group_id,
                        stats,
                        volcano,
                        ma,
                    },
                    ..outcome
                }
            }
        }
        FileKind::ComparisonGo | FileKind::ComparisonKegg => {
            let terms = extract_terms(&load_grid(file)?);
            if terms.is_empty() {
                outcome.warn("no enrichment terms found")
            } else if kind == FileKind::ComparisonGo {
                FileOutcome {
                    contribution: Contribution::GoTerms { group_id, terms },
                    ..outcome
                }
            } else {
                FileOutcome {
                    contribution: Contribution::KeggTerms { group_id, terms },
                    ..outcome
                }
            }
        }
        FileKind::AnnotationNovel | FileKind::AnnotationMerged => {
            let summary = aggregate_transcripts(&file.name, &file.text());
            let outcome = if summary.count == 0 {
                outcome.warn("no exon records with a transcript_id")
            } else {
                outcome
            };
            FileOutcome {
                contribution: Contribution::Transcripts(summary),
                ..outcome
            }
        }
        FileKind::Template | FileKind::DeliverableOnly => outcome,
        FileKind::Unknown => outcome.warn("no classification rule matched"),
    };

    if let Some(warning) = &outcome.warning {
        tracing::warn!(file = %file.name, kind = %kind, "{}", warning);
    }
    Ok(outcome)
}

fn load_grid(file: &InputFile) -> Result<RawGrid> {
    let grid = file.load_grid()?;
    if grid.is_empty() {
        tracing::debug!(file = %file.name, "empty sheet");
    }
    Ok(grid)
}
