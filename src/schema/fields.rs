//! Ranked resolution of observed column headers to canonical fields.
//!
//! Each consumer declares a table of [`FieldSpec`]s. A spec lists candidate
//! patterns from most to least specific. Resolution walks the table in
//! declared order; for every field the first pattern that matches any still
//! unclaimed header decides, and that header is then claimed so a looser
//! pattern of a later field cannot select it again.

use crate::error::{IngestError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic column roles known to the ingestion core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    // Differential-expression detail tables
    GeneId,
    GeneName,
    LogFoldChange,
    Fdr,
    Expression,
    // Differential-expression summary tables
    Comparison,
    Name,
    Description,
    Total,
    Up,
    Down,
    SigUp,
    SigDown,
    SigTotal,
    // Enrichment tables
    Term,
    Count,
    AdjustedPValue,
    Category,
}

impl CanonicalField {
    /// Get the field name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GeneId => "gene_id",
            Self::GeneName => "gene_name",
            Self::LogFoldChange => "log_fold_change",
            Self::Fdr => "fdr",
            Self::Expression => "expression",
            Self::Comparison => "comparison",
            Self::Name => "name",
            Self::Description => "description",
            Self::Total => "total",
            Self::Up => "up",
            Self::Down => "down",
            Self::SigUp => "sig_up",
            Self::SigDown => "sig_down",
            Self::SigTotal => "sig_total",
            Self::Term => "term",
            Self::Count => "count",
            Self::AdjustedPValue => "adjusted_p_value",
            Self::Category => "category",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Candidate patterns for one canonical field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: CanonicalField,
    patterns: Vec<Regex>,
    first_column_fallback: bool,
}

impl FieldSpec {
    /// Compile a spec. Patterns match case-insensitively against trimmed headers.
    pub fn new(field: CanonicalField, patterns: &[&str]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        IngestError::InvalidParameter(format!(
                            "Invalid pattern '{}' for field {}: {}",
                            p, field, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            field,
            patterns,
            first_column_fallback: false,
        })
    }

    /// Fall back to the first column when no pattern matches.
    pub fn or_first_column(mut self) -> Self {
        self.first_column_fallback = true;
        self
    }

    /// Index of the selected header, skipping claimed ones.
    fn select(&self, headers: &[String], claimed: &[bool]) -> Option<usize> {
        let open = |idx: usize| !claimed[idx] && !headers[idx].trim().is_empty();
        self.patterns
            .iter()
            .find_map(|re| {
                (0..headers.len()).find(|&idx| open(idx) && re.is_match(headers[idx].trim()))
            })
            .or_else(|| {
                (self.first_column_fallback && !headers.is_empty() && !claimed[0]).then_some(0)
            })
    }
}

/// Resolved field → column index bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<CanonicalField, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Column index bound to a field.
    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Header text bound to a field.
    pub fn header(&self, field: CanonicalField) -> Option<&str> {
        self.get(field).map(|idx| self.headers[idx].as_str())
    }

    /// Check if a field was resolved.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Iterate over bindings in field order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, usize)> + '_ {
        self.columns.iter().map(|(f, i)| (*f, *i))
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An ordered table of field specs.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    specs: Vec<FieldSpec>,
}

impl FieldResolver {
    /// Create a resolver; specs are tried in the given order.
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        Self { specs }
    }

    /// Fields this resolver knows about, in resolution order.
    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.specs.iter().map(|s| s.field)
    }

    /// Bind headers to canonical fields.
    pub fn resolve(&self, headers: &[String]) -> ColumnMap {
        let mut claimed = vec![false; headers.len()];
        let mut columns = BTreeMap::new();
        for spec in &self.specs {
            if let Some(idx) = spec.select(headers, &claimed) {
                claimed[idx] = true;
                columns.insert(spec.field, idx);
            }
        }
        ColumnMap {
            columns,
            headers: headers.to_vec(),
        }
    }

    /// Resolve a single field in isolation (no claims from other fields).
    pub fn resolve_field<'h>(&self, field: CanonicalField, headers: &'h [String]) -> Option<&'h str> {
        let spec = self.specs.iter().find(|s| s.field == field)?;
        let claimed = vec![false; headers.len()];
        spec.select(headers, &claimed).map(|idx| headers[idx].as_str())
    }
}
