//! Integration tests for batch ingestion of a deliverables folder.

use approx::assert_relative_eq;
use seqreport::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DGE_SUMMARY: &str = "\
Differential expression overview
Comparison\tName\tDescription\tSig_Up\tSig_Down\tUp\tDown\tTotal
C1\tKO vs WT\tKnockout against wild type\t40\t35\t900\t850\t20000
C2\tLate vs Early\tTime course\t3\t4\t100\t120\t20000
";

const QC_STATS: &str = "\
Sample,Raw reads,Clean reads,Q30(%)
S1,45000000,44000000,93.1
S2,41000000,40000000,92.8
";

const MAPPING_STATS: &str = "\
Sample\tTotal reads\tUniquely mapped\tMapping rate
S1\t44000000\t40000000\t90.9%
";

const GTF: &str = "\
#!genome-build GRCh38
chr1\tStringTie\texon\t1\t100\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";
chr1\tStringTie\texon\t201\t300\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";
chr1\tStringTie\texon\t501\t550\t.\t-\t.\tgene_id \"G2\"; transcript_id \"T2\";
";

const GO_TERMS: &str = "\
ONTOLOGY\tID\tDescription\tpvalue\tp.adjust\tCount
BP\tGO:0006955\timmune response\t1e-8\t1e-6\t25
BP\tGO:0006915\tapoptotic process\t1e-5\t0.001\t12
";

/// Detail table for C1 with a deterministic mix of significant and
/// background genes.
fn c1_detail() -> String {
    let mut text = String::from("gene_id\tsymbol\tbaseMean\tlog2FoldChange\tpvalue\tpadj\n");
    for i in 0..200 {
        let (lfc, padj) = match i % 4 {
            0 => (2.5, 0.001),
            1 => (-1.8, 0.01),
            2 => (0.4, 0.6),
            _ => (0.0, 0.9),
        };
        text.push_str(&format!(
            "ENSG{:05}\tGENE{}\t{}\t{}\t{}\t{}\n",
            i,
            i,
            10 * (i + 1),
            lfc,
            padj / 10.0,
            padj
        ));
    }
    text.push_str("ENSG99999\tBROKEN\t5\tNA\tNA\tNA\n");
    text
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn deliverables() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "DGE_summary.tsv", DGE_SUMMARY);
    write(root, "raw_data_stats.csv", QC_STATS);
    write(root, "hisat2_mapping_stats.tsv", MAPPING_STATS);
    write(root, "novel_transcripts.gtf", GTF);
    write(root, "C1_DEG_results.tsv", &c1_detail());
    write(root, "Comparison1_GO_Enrichment.tsv", GO_TERMS);
    write(root, "volcano_table.csv", "gene,logFC,FDR\nA,2,0.01\n");
    write(root, "report_template.html", "<html></html>");
    fs::write(root.join("C1_heatmap.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();
    dir
}

fn load_all(dir: &Path) -> Vec<InputFile> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths.into_iter().map(|p| InputFile::from_path(p).unwrap()).collect()
}

#[test]
fn test_full_folder() {
    let dir = deliverables();
    let session = Session::new();
    let reports = session.ingest(load_all(dir.path()));
    assert_eq!(reports.len(), 9);

    let status = |name: &str| {
        reports
            .iter()
            .find(|r| r.filename == name)
            .map(|r| r.status.clone())
            .unwrap()
    };
    assert_eq!(status("C1_DEG_results.tsv"), FileStatus::Processed);
    assert_eq!(status("C1_heatmap.png"), FileStatus::Processed);
    assert!(status("volcano_table.csv").is_failed());

    let dataset = session.dataset();
    assert_eq!(dataset.n_comparisons(), 2);

    let qc = dataset.data_stats_table.as_ref().unwrap();
    assert_eq!(qc.len(), 2);
    assert_eq!(qc.headers[0], "Sample");
    assert_eq!(dataset.mapping_stats_table.as_ref().unwrap().len(), 1);

    assert_eq!(dataset.transcript_stats.len(), 1);
    let transcripts = &dataset.transcript_stats[0];
    assert_eq!(transcripts.count, 2);
    assert_eq!(transcripts.total_length, 250);
    assert_eq!(transcripts.max_length, 200);

    assert_eq!(dataset.dge_summary_table.len(), 2);

    let c1 = &dataset.comparisons["C1"];
    assert_eq!(c1.name, "KO vs WT");
    assert_eq!(c1.description, "Knockout against wild type");
    let stats = c1.stats.unwrap();
    assert_eq!(stats.total, 200);
    assert_eq!(stats.up, 100);
    assert_eq!(stats.down, 50);
    assert_eq!(stats.sig_up, 50);
    assert_eq!(stats.sig_down, 50);
    assert_eq!(stats.sig_total, stats.sig_up + stats.sig_down);
    // Detail stats supersede the summary's 40 + 35.
    assert_eq!(c1.significant_count, 100);
    assert_eq!(c1.volcano.len(), 200);
    assert_eq!(c1.ma.len(), 200);
    assert_eq!(c1.significant_points(), 100);
    assert_eq!(c1.go_terms.len(), 2);
    assert_eq!(c1.go_terms[0].term, "immune response");

    let first = &c1.volcano[0];
    assert_eq!(first.label, "GENE0");
    assert_relative_eq!(first.y, 3.0, epsilon = 1e-9);
    assert_relative_eq!(c1.ma[0].x, (11.0f64).log10(), epsilon = 1e-9);

    let c2 = &dataset.comparisons["C2"];
    assert_eq!(c2.name, "Late vs Early");
    assert_eq!(c2.significant_count, 7);
    assert!(c2.volcano.is_empty());
}

#[test]
fn test_rerun_is_identical() {
    let dir = deliverables();

    let first = Session::new();
    first.ingest(load_all(dir.path()));

    let second = Session::new();
    let mut files = load_all(dir.path());
    files.reverse();
    second.ingest(files);

    assert_eq!(
        first.dataset().to_json().unwrap(),
        second.dataset().to_json().unwrap()
    );
}

#[test]
fn test_incremental_uploads_match_batch() {
    let dir = deliverables();

    let batch = Session::new();
    batch.ingest(load_all(dir.path()));

    let incremental = Session::new();
    for file in load_all(dir.path()) {
        incremental.ingest(vec![file]);
    }

    assert_eq!(batch.dataset(), incremental.dataset());
    assert_eq!(batch.reports(), incremental.reports());
}

#[test]
fn test_outputs_written() {
    let dir = deliverables();
    let session = Session::new();
    session.ingest(load_all(dir.path()));
    let dataset = session.dataset();

    let out = TempDir::new().unwrap();
    let tsv = out.path().join("comparisons.tsv");
    dataset.write_comparisons_tsv(&tsv).unwrap();
    let text = fs::read_to_string(&tsv).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("C1\tKO vs WT\t100\t200"));

    let json = dataset.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["comparisons"]["C1"]["stats"]["sigUp"].is_number());
    assert!(value["transcriptStats"][0]["meanLength"].is_number());

    let yaml = dataset.to_yaml().unwrap();
    assert!(yaml.contains("dgeSummaryTable"));
}

#[test]
fn test_removing_summary_keeps_detail() {
    let dir = deliverables();
    let session = Session::new();
    session.ingest(load_all(dir.path()));

    assert!(session.remove_file("DGE_summary.tsv"));
    let dataset = session.dataset();
    assert!(dataset.dge_summary_table.is_empty());
    assert!(!dataset.comparisons.contains_key("C2"));
    let c1 = &dataset.comparisons["C1"];
    assert_eq!(c1.name, "C1");
    assert_eq!(c1.stats.unwrap().sig_total, 100);
}

#[test]
fn test_same_name_in_different_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for (sub, sample, reads) in [("s1", "S1", 100), ("s2", "S2", 200)] {
        fs::create_dir(root.join(sub)).unwrap();
        write(
            &root.join(sub),
            "multiqc_general_stats.txt",
            &format!("Sample\tReads\n{}\t{}\n", sample, reads),
        );
    }
    let paths = [
        root.join("s1").join("multiqc_general_stats.txt"),
        root.join("s2").join("multiqc_general_stats.txt"),
    ];

    let session = Session::new();
    let files = paths
        .iter()
        .map(|p| InputFile::from_path_under(root, p).unwrap())
        .collect();
    let reports = session.ingest(files);
    assert_eq!(reports[0].filename, "s1/multiqc_general_stats.txt");
    assert_eq!(reports[1].filename, "s2/multiqc_general_stats.txt");
    assert!(reports.iter().all(|r| r.status == FileStatus::Processed));
    assert_eq!(reports[0].classification.kind, FileKind::GlobalStats);

    let table = session.dataset().data_stats_table.unwrap();
    assert_eq!(table.rows, vec![vec!["S1", "100"], vec!["S2", "200"]]);

    // Base names alone collide; the later file says so.
    let flat = Session::new();
    let files = paths.iter().map(|p| InputFile::from_path(p).unwrap()).collect();
    let reports = flat.ingest(files);
    assert_eq!(reports[0].status, FileStatus::Processed);
    assert!(matches!(reports[1].status, FileStatus::Warning(_)));
    assert_eq!(flat.dataset().data_stats_table.unwrap().len(), 1);
}
