//! Ordered filename classification rules.
//!
//! The rules form a decision table evaluated top to bottom; the first rule
//! that yields a kind wins. Precedence is part of the behaviour: for example a
//! `*_DGE_summary_seq.xlsx` file is global stats because rule 5 fires before
//! rule 6 gets a chance.

use super::kind::{FileClassification, FileKind};
use super::group::extract_group_id;

const OPAQUE_EXTENSIONS: &[&str] = &[
    ".bam", ".sam", ".cram", ".bai", ".crai", ".fastq", ".fq", ".fasta", ".fa", ".fna", ".2bit",
    ".bw", ".bigwig", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".tif", ".tiff", ".pdf", ".zip",
    ".tar", ".gz", ".bz2",
];
const MARKUP_EXTENSIONS: &[&str] = &[".html", ".htm", ".xhtml"];
const ANNOTATION_EXTENSIONS: &[&str] = &[".gtf", ".gff", ".gff3"];
const TABULAR_EXTENSIONS: &[&str] = &[".csv", ".tsv", ".txt", ".xls", ".xlsx"];

const NOVEL_WORDS: &[&str] = &["novel", "isoform"];
const ALIGNER_WORDS: &[&str] = &[
    "hisat", "star", "bowtie", "bwa", "tophat", "subread", "mapping", "align",
];
const MAPPING_REPORT_WORDS: &[&str] = &["stat", "summary", "report", "log"];
const REPORT_WORDS: &[&str] = &["stat", "report", "summary"];
const RAW_DATA_WORDS: &[&str] = &["data", "raw", "seq", "trim", "qc", "quality"];
const OVERVIEW_WORDS: &[&str] = &["summary", "overview"];
const DGE_CORE_WORDS: &[&str] = &["dge", "diff", "deg"];
const GO_DETAIL_WORDS: &[&str] = &["enrich", "term", "result"];
const KEGG_WORDS: &[&str] = &["kegg", "pathway"];
const DGE_WORDS: &[&str] = &[
    "dge", "diff", "deg", "result", "comp", "contrast", "vs", "change", "fc", "volcano",
    "ma_plot", "table", "output",
];

/// Facts about a filename that the rules inspect.
#[derive(Debug, Clone)]
pub struct FilenameFacts {
    /// Lower-cased base name (directories stripped).
    pub name: String,
    /// Whether a comparison group id could be extracted.
    pub has_group: bool,
}

impl FilenameFacts {
    /// Gather facts from a raw filename.
    pub fn new(filename: &str) -> Self {
        let base = filename.rsplit(is_path_separator).next().unwrap_or(filename);
        Self {
            name: base.to_lowercase(),
            has_group: extract_group_id(base).is_some(),
        }
    }

    fn contains_any(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.name.contains(w))
    }

    fn ends_with_any(&self, extensions: &[&str]) -> bool {
        extensions.iter().any(|ext| self.name.ends_with(ext))
    }

    fn is_tabular(&self) -> bool {
        self.ends_with_any(TABULAR_EXTENSIONS)
    }
}

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// A rule inspects the facts and either claims the file or passes.
pub type Rule = fn(&FilenameFacts) -> Option<FileKind>;

/// The decision table, in precedence order.
pub const RULES: &[(&str, Rule)] = &[
    ("opaque_extension", opaque_extension),
    ("markup_extension", markup_extension),
    ("annotation_extension", annotation_extension),
    ("alignment_report", alignment_report),
    ("qc_report", qc_report),
    ("dge_overview", dge_overview),
    ("go_enrichment", go_enrichment),
    ("kegg_pathway", kegg_pathway),
    ("dge_keyword", dge_keyword),
    ("grouped_table", grouped_table),
    ("plain_table", plain_table),
    ("fallback", fallback),
];

fn opaque_extension(f: &FilenameFacts) -> Option<FileKind> {
    f.ends_with_any(OPAQUE_EXTENSIONS)
        .then_some(FileKind::DeliverableOnly)
}

fn markup_extension(f: &FilenameFacts) -> Option<FileKind> {
    f.ends_with_any(MARKUP_EXTENSIONS).then_some(FileKind::Template)
}

fn annotation_extension(f: &FilenameFacts) -> Option<FileKind> {
    if !f.ends_with_any(ANNOTATION_EXTENSIONS) {
        return None;
    }
    if f.contains_any(NOVEL_WORDS) {
        Some(FileKind::AnnotationNovel)
    } else {
        Some(FileKind::AnnotationMerged)
    }
}

fn alignment_report(f: &FilenameFacts) -> Option<FileKind> {
    (f.contains_any(ALIGNER_WORDS) && (f.contains_any(MAPPING_REPORT_WORDS) || f.is_tabular()))
        .then_some(FileKind::Mapping)
}

fn qc_report(f: &FilenameFacts) -> Option<FileKind> {
    (f.name.contains("multiqc") || (f.contains_any(REPORT_WORDS) && f.contains_any(RAW_DATA_WORDS)))
        .then_some(FileKind::GlobalStats)
}

fn dge_overview(f: &FilenameFacts) -> Option<FileKind> {
    (f.contains_any(OVERVIEW_WORDS) && f.contains_any(DGE_CORE_WORDS))
        .then_some(FileKind::DgeSummary)
}

fn go_enrichment(f: &FilenameFacts) -> Option<FileKind> {
    ((f.name.contains("go") && f.contains_any(GO_DETAIL_WORDS)) || f.name.contains("gene_ontology"))
        .then_some(FileKind::ComparisonGo)
}

fn kegg_pathway(f: &FilenameFacts) -> Option<FileKind> {
    f.contains_any(KEGG_WORDS).then_some(FileKind::ComparisonKegg)
}

fn dge_keyword(f: &FilenameFacts) -> Option<FileKind> {
    (f.contains_any(DGE_WORDS) && !f.contains_any(OVERVIEW_WORDS))
        .then_some(FileKind::ComparisonDge)
}

fn grouped_table(f: &FilenameFacts) -> Option<FileKind> {
    (f.has_group && f.is_tabular()).then_some(FileKind::ComparisonDge)
}

fn plain_table(f: &FilenameFacts) -> Option<FileKind> {
    f.is_tabular().then_some(FileKind::DeliverableOnly)
}

fn fallback(_: &FilenameFacts) -> Option<FileKind> {
    Some(FileKind::Unknown)
}

/// Classify a filename into a file kind and optional group id.
///
/// Pure and total: every name resolves, ambiguous names by rule order.
pub fn classify(filename: &str) -> FileClassification {
    let facts = FilenameFacts::new(filename);
    let kind = RULES
        .iter()
        .find_map(|(_, rule)| rule(&facts))
        .unwrap_or(FileKind::Unknown);
    let base = filename.rsplit(is_path_separator).next().unwrap_or(filename);
    FileClassification {
        kind,
        group_id: extract_group_id(base),
    }
}

/// Name of the rule that decides a filename, for diagnostics.
pub fn deciding_rule(filename: &str) -> &'static str {
    let facts = FilenameFacts::new(filename);
    RULES
        .iter()
        .find(|(_, rule)| rule(&facts).is_some())
        .map(|(name, _)| *name)
        .unwrap_or("fallback")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str) -> FileKind {
        classify(name).kind
    }

    #[test]
    fn test_binary_extensions_always_deliverable() {
        for name in [
            "C1_DGE_results.bam",
            "sample1_R1.fastq.gz",
            "Comparison2_GO_Enrichment.pdf",
            "kegg_pathway_map.png",
            "genome.fa",
            "novel_isoforms.gtf.gz",
        ] {
            assert_eq!(kind(name), FileKind::DeliverableOnly, "{}", name);
        }
    }

    #[test]
    fn test_markup_and_annotation() {
        assert_eq!(kind("report_template.html"), FileKind::Template);
        assert_eq!(kind("novel_transcripts.gtf"), FileKind::AnnotationNovel);
        assert_eq!(kind("Isoform_annotation.gff3"), FileKind::AnnotationNovel);
        assert_eq!(kind("merged.gtf"), FileKind::AnnotationMerged);
    }

    #[test]
    fn test_mapping_and_qc() {
        assert_eq!(kind("hisat2_mapping_stats.xlsx"), FileKind::Mapping);
        assert_eq!(kind("STAR_Log.final.out"), FileKind::Mapping);
        assert_eq!(kind("alignment.tsv"), FileKind::Mapping);
        assert_eq!(kind("multiqc_general_stats.txt"), FileKind::GlobalStats);
        assert_eq!(kind("raw_data_stats.xlsx"), FileKind::GlobalStats);
        assert_eq!(kind("QC_report.csv"), FileKind::GlobalStats);
    }

    #[test]
    fn test_dge_summary_before_dge_detail() {
        assert_eq!(kind("DGE_summary.xlsx"), FileKind::DgeSummary);
        assert_eq!(kind("diff_overview.csv"), FileKind::DgeSummary);
        // Summary words suppress the detail keyword rule.
        assert_eq!(kind("comparison_summary.xlsx"), FileKind::DeliverableOnly);
    }

    #[test]
    fn test_order_dependent_precedence() {
        // "summary" + "seq" fires the QC rule before the DGE overview rule.
        assert_eq!(kind("RNAseq_DGE_summary.xlsx"), FileKind::GlobalStats);
        assert_eq!(deciding_rule("RNAseq_DGE_summary.xlsx"), "qc_report");
    }

    #[test]
    fn test_enrichment() {
        let c = classify("Comparison2_GO_Enrichment.xlsx");
        assert_eq!(c.kind, FileKind::ComparisonGo);
        assert_eq!(c.group_id.as_deref(), Some("C2"));
        assert_eq!(kind("C1_gene_ontology.csv"), FileKind::ComparisonGo);
        assert_eq!(kind("C1_KEGG.xlsx"), FileKind::ComparisonKegg);
        assert_eq!(kind("C3_pathway_table.tsv"), FileKind::ComparisonKegg);
    }

    #[test]
    fn test_dge_detail() {
        let c = classify("C1_vs_C2_DEG.xlsx");
        assert_eq!(c.kind, FileKind::ComparisonDge);
        assert_eq!(c.group_id.as_deref(), Some("C1"));
        assert_eq!(kind("treated_volcano.csv"), FileKind::ComparisonDge);
    }

    #[test]
    fn test_group_fallback_and_tabular_fallback() {
        assert_eq!(deciding_rule("G4.xlsx"), "grouped_table");
        assert_eq!(kind("G4.xlsx"), FileKind::ComparisonDge);
        assert_eq!(kind("samples.xlsx"), FileKind::DeliverableOnly);
        assert_eq!(kind("README"), FileKind::Unknown);
    }

    #[test]
    fn test_directories_ignored() {
        let c = classify("deliverables/Comparison5/C5_KEGG.xlsx");
        assert_eq!(c.kind, FileKind::ComparisonKegg);
        assert_eq!(c.group_id.as_deref(), Some("C5"));
    }

    #[test]
    fn test_deliverable_keeps_group() {
        let c = classify("C9_heatmap.png");
        assert_eq!(c.kind, FileKind::DeliverableOnly);
        assert_eq!(c.group_id.as_deref(), Some("C9"));
    }
}
