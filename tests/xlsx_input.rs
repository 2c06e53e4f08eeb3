//! Spreadsheet deliverables written with rust_xlsxwriter and read back
//! through calamine.

use rust_xlsxwriter::Workbook;
use seqreport::prelude::*;

fn enrichment_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("GO").unwrap();
    sheet.write_string(0, 0, "GO enrichment, comparison 2").unwrap();
    let headers = ["ID", "Description", "GeneRatio", "p.adjust", "Count", "ONTOLOGY"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(2, col as u16, *header).unwrap();
    }
    let rows = [
        ("GO:0006955", "immune response", "25/300", 1e-6, 25.0, "BP"),
        ("GO:0005634", "nucleus", "40/300", 0.004, 40.0, "CC"),
        ("GO:0003677", "DNA binding", "9/300", 0.03, 9.0, "MF"),
    ];
    for (i, (id, desc, ratio, padj, count, ontology)) in rows.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, *id).unwrap();
        sheet.write_string(row, 1, *desc).unwrap();
        sheet.write_string(row, 2, *ratio).unwrap();
        sheet.write_number(row, 3, *padj).unwrap();
        sheet.write_number(row, 4, *count).unwrap();
        sheet.write_string(row, 5, *ontology).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

fn detail_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["", "logFC", "AveExpr", "t", "P.Value", "adj.P.Val"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [("TP53", 3.2, 7.5, 0.0001), ("MYC", -0.4, 5.1, 0.7)];
    for (i, (gene, lfc, ave, fdr)) in rows.iter().enumerate() {
        let row = 1 + i as u32;
        sheet.write_string(row, 0, *gene).unwrap();
        sheet.write_number(row, 1, *lfc).unwrap();
        sheet.write_number(row, 2, *ave).unwrap();
        sheet.write_number(row, 3, 4.2).unwrap();
        sheet.write_number(row, 4, fdr / 10.0).unwrap();
        sheet.write_number(row, 5, *fdr).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_first_non_empty_sheet_is_used() {
    let file = InputFile::new("Comparison2_GO_Enrichment.xlsx", enrichment_workbook());
    let sheets = file.load_sheets().unwrap();
    assert_eq!(sheets.len(), 2);
    assert!(sheets[0].1.is_empty());

    let grid = file.load_grid().unwrap();
    let header = locate_header(&grid, &["description", "count"]);
    assert_eq!(header.row_index, 2);
}

#[test]
fn test_go_workbook_end_to_end() {
    let file = InputFile::new("Comparison2_GO_Enrichment.xlsx", enrichment_workbook());
    let outcome = process_file(&file).unwrap();
    assert_eq!(outcome.classification.kind, FileKind::ComparisonGo);
    assert_eq!(outcome.classification.group_id.as_deref(), Some("C2"));

    let terms = match outcome.contribution {
        Contribution::GoTerms { group_id, terms } => {
            assert_eq!(group_id, "C2");
            terms
        }
        other => panic!("unexpected contribution {:?}", other),
    };
    assert_eq!(terms.len(), 3);
    assert_eq!(terms[0].term, "immune response");
    assert_eq!(terms[0].count, 25);
    assert_eq!(terms[0].category.as_deref(), Some("BP"));

    let top = top_terms(&terms, 2);
    assert_eq!(top[0].term, "nucleus");
    assert_eq!(top[1].term, "immune response");
}

#[test]
fn test_limma_workbook() {
    let session = Session::new();
    let reports = session.ingest(vec![InputFile::new("C3_DEG.xlsx", detail_workbook())]);
    assert_eq!(reports[0].status, FileStatus::Processed);

    let dataset = session.dataset();
    let record = &dataset.comparisons["C3"];
    let stats = record.stats.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.sig_up, 1);
    assert_eq!(stats.down, 1);

    // AveExpr is already log scale and is used as is.
    assert_eq!(record.ma[0].x, 7.5);
    assert_eq!(record.volcano[0].label, "TP53");
}

#[test]
fn test_corrupt_workbook_fails_only_itself() {
    let session = Session::new();
    let reports = session.ingest(vec![
        InputFile::new("C4_DEG.xlsx", b"not a zip archive".to_vec()),
        InputFile::new("C3_DEG.xlsx", detail_workbook()),
    ]);
    assert!(reports[0].status.is_failed());
    assert_eq!(reports[1].status, FileStatus::Processed);
    assert_eq!(session.dataset().n_comparisons(), 1);
}
