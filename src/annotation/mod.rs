//! Transcript length statistics from GTF/GFF annotation text.
//!
//! Only exon records contribute. Each line has 9 tab-delimited columns:
//! seqname, source, feature, start, end, score, strand, frame, attributes.
//! Coordinates are 1-based and inclusive, so an exon spans `end - start + 1`
//! bases. Exons are grouped by the `transcript_id "<id>";` attribute.

use crate::data::TranscriptSummary;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static TRANSCRIPT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"transcript_id "([^"]+)";"#).unwrap());

const EXON_FEATURE: &str = "exon";

/// One exon record reduced to what the length statistics need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonRecord<'a> {
    pub transcript_id: &'a str,
    pub start: u64,
    pub end: u64,
}

impl<'a> ExonRecord<'a> {
    /// Parse an annotation line; `None` for comments, other features and
    /// malformed records.
    pub fn from_line(line: &'a str) -> Option<Self> {
        if line.starts_with('#') {
            return None;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 || fields[2] != EXON_FEATURE {
            return None;
        }
        let start = fields[3].trim().parse::<u64>().ok()?;
        let end = fields[4].trim().parse::<u64>().ok()?;
        if end < start {
            return None;
        }
        let transcript_id = TRANSCRIPT_ID_RE
            .captures(fields[8])?
            .get(1)
            .map(|m| m.as_str())?;
        Some(Self {
            transcript_id,
            start,
            end,
        })
    }

    /// Inclusive length in bases.
    #[inline]
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Summarize transcript lengths of one annotation file.
///
/// A file without any usable exon record yields an all-zero summary.
pub fn aggregate_transcripts(name: &str, text: &str) -> TranscriptSummary {
    let mut lengths: HashMap<&str, u64> = HashMap::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match ExonRecord::from_line(line) {
            Some(exon) => *lengths.entry(exon.transcript_id).or_insert(0) += exon.length(),
            None => skipped += 1,
        }
    }

    let count = lengths.len();
    let total_length: u64 = lengths.values().sum();
    let max_length = lengths.values().copied().max().unwrap_or(0);
    let mean_length = if count > 0 {
        (total_length as f64 / count as f64).round() as u64
    } else {
        0
    };
    tracing::debug!(file = name, transcripts = count, skipped, "aggregated annotation");

    TranscriptSummary {
        name: name.to_string(),
        count,
        total_length,
        mean_length,
        max_length,
    }
}
