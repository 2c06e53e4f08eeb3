//! Ingestion session: the evolving dataset of one project.
//!
//! Files are parsed in parallel. Their contributions are then stored per
//! filename under a single lock, and the dataset is rebuilt from all stored
//! contributions in filename order. The result therefore depends only on the
//! set of files, never on the order in which they were uploaded or finished.

use super::config::IngestConfig;
use super::runner::process_file;
use crate::classify::{classify, FileClassification};
use crate::data::{Contribution, Dataset, InputFile};
use crate::error::{IngestError, Result};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Processing status of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processed,
    Warning(String),
    Failed(String),
}

impl FileStatus {
    /// Short tag for listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Processed => "ok",
            Self::Warning(_) => "warning",
            Self::Failed(_) => "failed",
        }
    }

    /// Check if the file failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Flag a file that replaced an equally named file of the same batch.
    fn with_duplicate_name(self) -> Self {
        match self {
            Self::Processed => Self::Warning(DUPLICATE_NAME.to_string()),
            Self::Warning(msg) => Self::Warning(format!("{}; {}", DUPLICATE_NAME, msg)),
            failed @ Self::Failed(_) => failed,
        }
    }
}

const DUPLICATE_NAME: &str = "duplicate filename, replaced an earlier file of this batch";

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processed => f.write_str("ok"),
            Self::Warning(msg) => write!(f, "warning: {}", msg),
            Self::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Per-file outcome reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub filename: String,
    pub classification: FileClassification,
    pub status: FileStatus,
}

impl std::fmt::Display for FileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.filename, self.classification.kind)?;
        if let Some(group) = &self.classification.group_id {
            write!(f, "\t{}", group)?;
        }
        write!(f, "\t{}", self.status)
    }
}

#[derive(Debug)]
struct Entry {
    report: FileReport,
    contribution: Contribution,
}

#[derive(Debug, Default)]
struct SessionState {
    entries: BTreeMap<String, Entry>,
    dataset: Dataset,
}

impl SessionState {
    fn rebuild(&mut self) {
        self.dataset = Dataset::from_contributions(
            self.entries
                .iter()
                .map(|(name, entry)| (name.as_str(), &entry.contribution)),
        );
    }
}

/// A project's uploaded files and the dataset merged from them.
#[derive(Debug)]
pub struct Session {
    config: IngestConfig,
    exclude: Vec<Regex>,
    pool: Option<rayon::ThreadPool>,
    state: Mutex<SessionState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self {
            config: IngestConfig::default(),
            exclude: Vec::new(),
            pool: None,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Create a session from a configuration.
    pub fn with_config(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        let exclude = config.exclude_patterns()?;
        let pool = match config.threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| IngestError::Pipeline(format!("thread pool: {}", e)))?,
            ),
            None => None,
        };
        Ok(Self {
            config,
            exclude,
            pool,
            state: Mutex::new(SessionState::default()),
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Check if a filename matches an exclude pattern.
    pub fn is_excluded(&self, filename: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(filename))
    }

    /// Process a batch of files and merge them into the dataset.
    ///
    /// A file whose name is already present replaces the earlier upload. A
    /// name repeated within one batch is also replaced, and the later file
    /// reports a warning. Failures are reported per file and never abort the batch. Excluded
    /// files are skipped without a report. Reports are in input order.
    pub fn ingest(&self, files: Vec<InputFile>) -> Vec<FileReport> {
        let files: Vec<InputFile> = files
            .into_iter()
            .filter(|f| {
                let excluded = self.is_excluded(&f.name);
                if excluded {
                    tracing::debug!(file = %f.name, "excluded by config");
                }
                !excluded
            })
            .collect();

        let run = || {
            files
                .par_iter()
                .map(|file| (file.name.clone(), process_file(file)))
                .collect::<Vec<_>>()
        };
        let results = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut reports = Vec::with_capacity(results.len());
        let mut seen = HashSet::with_capacity(results.len());
        let mut state = self.lock();
        for (filename, result) in results {
            let (classification, contribution, mut status) = match result {
                Ok(outcome) => {
                    let status = match outcome.warning {
                        Some(msg) => FileStatus::Warning(msg),
                        None => FileStatus::Processed,
                    };
                    (outcome.classification, outcome.contribution, status)
                }
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "file failed");
                    (
                        classify(&filename),
                        Contribution::Empty,
                        FileStatus::Failed(e.to_string()),
                    )
                }
            };
            if !seen.insert(filename.clone()) {
                tracing::warn!(file = %filename, "duplicate filename in batch");
                status = status.with_duplicate_name();
            }
            let report = FileReport {
                filename: filename.clone(),
                classification,
                status,
            };
            reports.push(report.clone());
            state.entries.insert(
                filename,
                Entry {
                    report,
                    contribution,
                },
            );
        }
        state.rebuild();

        let failed = reports.iter().filter(|r| r.status.is_failed()).count();
        tracing::info!(
            files = reports.len(),
            failed,
            comparisons = state.dataset.n_comparisons(),
            "ingested batch"
        );
        reports
    }

    /// Forget a previously ingested file. Returns `false` if it was unknown.
    ///
    /// Comparison records referenced only by this file disappear with it.
    pub fn remove_file(&self, filename: &str) -> bool {
        let mut state = self.lock();
        if state.entries.remove(filename).is_none() {
            return false;
        }
        state.rebuild();
        tracing::debug!(file = filename, "removed");
        true
    }

    /// Snapshot of the merged dataset.
    pub fn dataset(&self) -> Dataset {
        self.lock().dataset.clone()
    }

    /// Reports of every file currently in the session, in filename order.
    pub fn reports(&self) -> Vec<FileReport> {
        self.lock()
            .entries
            .values()
            .map(|e| e.report.clone())
            .collect()
    }

    /// Number of files in the session.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if no file has been ingested.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, text: &str) -> InputFile {
        InputFile::new(name, text.as_bytes().to_vec())
    }

    fn detail(fc: &str) -> String {
        format!("gene,logFC,FDR\nA,{},0.001\nB,0.5,0.9\n", fc)
    }

    #[test]
    fn test_partial_failure() {
        let session = Session::new();
        let reports = session.ingest(vec![
            file("C1_DGE.csv", &detail("2.0")),
            file("volcano_table.csv", &detail("2.0")),
            file("notes.docx", "whatever"),
        ]);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].status, FileStatus::Processed);
        assert!(reports[1].status.is_failed());
        assert!(matches!(reports[2].status, FileStatus::Warning(_)));
        assert_eq!(session.dataset().n_comparisons(), 1);
    }

    #[test]
    fn test_reingest_replaces() {
        let session = Session::new();
        session.ingest(vec![file("C1_DGE.csv", &detail("2.0"))]);
        session.ingest(vec![file("C1_DGE.csv", &detail("-2.0"))]);
        assert_eq!(session.len(), 1);
        let stats = session.dataset().comparisons["C1"].stats.unwrap();
        assert_eq!(stats.sig_down, 1);
        assert_eq!(stats.sig_up, 0);
    }

    #[test]
    fn test_upload_order_irrelevant() {
        let a = Session::new();
        a.ingest(vec![file("C1_DGE.csv", &detail("2.0"))]);
        a.ingest(vec![file("C1_DGE_rerun.csv", &detail("-3.0"))]);

        let b = Session::new();
        b.ingest(vec![
            file("C1_DGE_rerun.csv", &detail("-3.0")),
            file("C1_DGE.csv", &detail("2.0")),
        ]);

        assert_eq!(a.dataset(), b.dataset());
        // The filename-first detail file supplies the stats.
        assert_eq!(a.dataset().comparisons["C1"].stats.unwrap().sig_up, 1);
    }

    #[test]
    fn test_remove_file_drops_orphaned_records() {
        let session = Session::new();
        session.ingest(vec![
            file("C1_DGE.csv", &detail("2.0")),
            file("C2_DGE.csv", &detail("2.0")),
        ]);
        assert!(session.remove_file("C2_DGE.csv"));
        assert!(!session.remove_file("C2_DGE.csv"));
        let dataset = session.dataset();
        assert!(dataset.comparisons.contains_key("C1"));
        assert!(!dataset.comparisons.contains_key("C2"));
    }

    #[test]
    fn test_duplicate_name_in_batch_is_flagged() {
        let session = Session::new();
        let reports = session.ingest(vec![
            file("C1_DGE.csv", &detail("2.0")),
            file("C1_DGE.csv", &detail("-2.0")),
        ]);
        assert_eq!(reports[0].status, FileStatus::Processed);
        assert!(matches!(&reports[1].status, FileStatus::Warning(msg) if msg.contains("duplicate")));
        assert_eq!(session.len(), 1);
        assert_eq!(session.dataset().comparisons["C1"].stats.unwrap().sig_down, 1);
    }

    #[test]
    fn test_exclude_patterns() {
        let config = IngestConfig {
            exclude: vec![r"^~\$".to_string()],
            threads: Some(2),
            ..Default::default()
        };
        let session = Session::with_config(config).unwrap();
        let reports = session.ingest(vec![
            file("~$C1_DGE.csv", &detail("2.0")),
            file("C1_DGE.csv", &detail("2.0")),
        ]);
        assert_eq!(reports.len(), 1);
        assert_eq!(session.reports()[0].filename, "C1_DGE.csv");
    }
}
