//! Semantic file kinds.

use serde::{Deserialize, Serialize};

/// The role a deliverable file plays in a project. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Sequencing QC statistics (raw/clean data, MultiQC).
    GlobalStats,
    /// Read alignment statistics.
    Mapping,
    /// Per-comparison differential-expression overview.
    DgeSummary,
    /// Per-gene differential-expression results for one comparison.
    ComparisonDge,
    /// GO enrichment results for one comparison.
    ComparisonGo,
    /// KEGG pathway enrichment results for one comparison.
    ComparisonKegg,
    /// Report markup template.
    Template,
    /// Annotation of novel transcripts / isoforms.
    AnnotationNovel,
    /// Merged reference annotation.
    AnnotationMerged,
    /// Delivered as-is; nothing to extract.
    DeliverableOnly,
    /// No rule matched.
    Unknown,
}

impl FileKind {
    /// All kinds, in declaration order.
    pub const ALL: [FileKind; 11] = [
        FileKind::GlobalStats,
        FileKind::Mapping,
        FileKind::DgeSummary,
        FileKind::ComparisonDge,
        FileKind::ComparisonGo,
        FileKind::ComparisonKegg,
        FileKind::Template,
        FileKind::AnnotationNovel,
        FileKind::AnnotationMerged,
        FileKind::DeliverableOnly,
        FileKind::Unknown,
    ];

    /// Get the tag name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GlobalStats => "global_stats",
            Self::Mapping => "mapping",
            Self::DgeSummary => "dge_summary",
            Self::ComparisonDge => "comparison_dge",
            Self::ComparisonGo => "comparison_go",
            Self::ComparisonKegg => "comparison_kegg",
            Self::Template => "template",
            Self::AnnotationNovel => "annotation_novel",
            Self::AnnotationMerged => "annotation_merged",
            Self::DeliverableOnly => "deliverable_only",
            Self::Unknown => "unknown",
        }
    }

    /// Check if files of this kind must carry a comparison group id.
    pub fn requires_group(&self) -> bool {
        matches!(
            self,
            Self::ComparisonDge | Self::ComparisonGo | Self::ComparisonKegg
        )
    }

    /// Check if this kind is a gene annotation.
    pub fn is_annotation(&self) -> bool {
        matches!(self, Self::AnnotationNovel | Self::AnnotationMerged)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of one filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileClassification {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub group_id: Option<String>,
}
