//! Cross-comparison DGE summary tables.

use crate::classify::extract_group_id;
use crate::data::{DgeSummaryRow, RawGrid};
use crate::schema::{normalize_rows, CanonicalField, FieldResolver, FieldSpec};
use once_cell::sync::Lazy;

/// Header keywords of DGE summary tables.
pub const SUMMARY_KEYWORDS: &[&str] = &[
    "comparison",
    "contrast",
    "group",
    "sig",
    "deg",
    "up",
    "down",
    "description",
];

static SUMMARY_RESOLVER: Lazy<FieldResolver> = Lazy::new(|| {
    use CanonicalField::*;
    let spec = |field, patterns: &[&str]| FieldSpec::new(field, patterns).unwrap();
    FieldResolver::new(vec![
        spec(
            Comparison,
            &[
                r"^(comparison|contrast|group|comp)([ _.-]?id)?$",
                r"comparison|contrast|group",
            ],
        )
        .or_first_column(),
        spec(Name, &[r"^((comparison|display)[ _.-]?)?name$|^label$", r"name"]),
        spec(Description, &[r"^desc(ription)?$", r"desc"]),
        spec(
            SigUp,
            &[r"^sig(nificant)?[ _.-]?up([ _.-]?regulated)?$", r"sig.*up", r"deg.*up"],
        ),
        spec(
            SigDown,
            &[
                r"^sig(nificant)?[ _.-]?down([ _.-]?regulated)?$",
                r"sig.*down",
                r"deg.*down",
            ],
        ),
        spec(
            SigTotal,
            &[
                r"^(sig(nificant)?|degs?)([ _.-]?(total|count|genes|number))?$",
                r"sig|deg",
            ],
        ),
        spec(Up, &[r"^up([ _.-]?regulated)?$", r"(^|[^a-z])up([^a-z]|$)"]),
        spec(
            Down,
            &[r"^down([ _.-]?regulated)?$", r"(^|[^a-z])down([^a-z]|$)"],
        ),
        spec(Total, &[r"^(total|all|genes|total[ _.-]?genes)$", r"total"]),
    ])
});

/// Field table for DGE summary tables.
pub fn summary_resolver() -> &'static FieldResolver {
    &SUMMARY_RESOLVER
}

/// Parse every data row of a summary grid.
///
/// The group id comes from the comparison cell, else the name cell, else
/// the row position (`C1` for the first kept data row).
pub fn parse_dge_summary(grid: &RawGrid) -> Vec<DgeSummaryRow> {
    let (columns, rows) = normalize_rows(grid, SUMMARY_KEYWORDS, summary_resolver());
    tracing::debug!(rows = rows.len(), fields = columns.len(), "parsed DGE summary");

    rows.iter()
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(idx, row)| {
            let name = row.text(CanonicalField::Name);
            let group_id = row
                .text(CanonicalField::Comparison)
                .as_deref()
                .and_then(extract_group_id)
                .or_else(|| name.as_deref().and_then(extract_group_id))
                .unwrap_or_else(|| format!("C{}", idx + 1));
            DgeSummaryRow {
                group_id,
                name,
                description: row.text(CanonicalField::Description),
                total: row.count(CanonicalField::Total),
                up: row.count(CanonicalField::Up),
                down: row.count(CanonicalField::Down),
                sig_up: row.count(CanonicalField::SigUp),
                sig_down: row.count(CanonicalField::SigDown),
                sig_total: row.count(CanonicalField::SigTotal),
            }
        })
        .collect()
}
