//! GO and KEGG enrichment term extraction.

use crate::data::{EnrichmentTerm, RawGrid};
use crate::schema::{normalize_rows, CanonicalField, FieldResolver, FieldSpec};
use once_cell::sync::Lazy;

/// Maximum number of terms kept per comparison and namespace.
pub const ENRICHMENT_TERM_CAP: usize = 50;

/// Adjusted p-value assumed when a row reports none.
pub const DEFAULT_ADJUSTED_P_VALUE: f64 = 1.0;

/// Header keywords of enrichment result tables.
pub const ENRICHMENT_KEYWORDS: &[&str] = &[
    "term",
    "description",
    "pathway",
    "count",
    "p.adjust",
    "padj",
    "fdr",
    "qvalue",
    "pvalue",
    "ontology",
    "category",
];

static ENRICHMENT_RESOLVER: Lazy<FieldResolver> = Lazy::new(|| {
    FieldResolver::new(vec![
        FieldSpec::new(
            CanonicalField::Term,
            &[r"^description$", r"desc", r"^term$", r"term", r"pathway", r"id"],
        )
        .unwrap()
        .or_first_column(),
        FieldSpec::new(
            CanonicalField::Count,
            &[r"^count$", r"significant", r"^n$", r"gene[ _.-]?count"],
        )
        .unwrap(),
        FieldSpec::new(
            CanonicalField::AdjustedPValue,
            &[
                r"^(p\.adjust|padj|p[ _.-]?adj(usted)?|fdr|q[ _.-]?val(ue)?)$",
                r"adj|fdr|q[ _.-]?val",
                r"p[ _.-]?val",
            ],
        )
        .unwrap(),
        FieldSpec::new(
            CanonicalField::Category,
            &[r"^(ontology|category|class)$", r"ontology|category|class"],
        )
        .unwrap(),
    ])
});

/// Field table for enrichment tables.
pub fn enrichment_resolver() -> &'static FieldResolver {
    &ENRICHMENT_RESOLVER
}

/// Extract at most [`ENRICHMENT_TERM_CAP`] terms in file order.
///
/// Rows without a term are skipped. Missing counts default to 0 and missing
/// adjusted p-values to 1.0.
pub fn extract_terms(grid: &RawGrid) -> Vec<EnrichmentTerm> {
    let (columns, rows) = normalize_rows(grid, ENRICHMENT_KEYWORDS, enrichment_resolver());
    tracing::debug!(
        rows = rows.len(),
        term_column = columns.header(CanonicalField::Term).unwrap_or(""),
        "parsed enrichment table"
    );

    rows.iter()
        .filter_map(|row| {
            let term = row.text(CanonicalField::Term)?;
            Some(EnrichmentTerm {
                term,
                count: row.count(CanonicalField::Count).unwrap_or(0),
                adjusted_p_value: row
                    .number(CanonicalField::AdjustedPValue)
                    .unwrap_or(DEFAULT_ADJUSTED_P_VALUE),
                category: row.text(CanonicalField::Category),
            })
        })
        .take(ENRICHMENT_TERM_CAP)
        .collect()
}

/// The `n` terms with the highest count; ties keep their original order.
pub fn top_terms(terms: &[EnrichmentTerm], n: usize) -> Vec<EnrichmentTerm> {
    let mut sorted = terms.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(n);
    sorted
}
