//! Uploaded files and their conversion into raw grids.

use crate::data::{Cell, RawGrid};
use crate::error::{IngestError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::{Component, Path};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A named byte buffer, as uploaded.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Original filename (may include directories).
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl InputFile {
    /// Create an input file from a name and its contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                IngestError::InvalidParameter(format!("Path {:?} has no file name", path))
            })?;
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }

    /// Read a file found under `root`, naming it by its path relative to
    /// `root` with `/` separators, so equally named files in different
    /// directories stay distinct.
    pub fn from_path_under<R: AsRef<Path>, P: AsRef<Path>>(root: R, path: P) -> Result<Self> {
        let path = path.as_ref();
        let relative = path.strip_prefix(root.as_ref()).unwrap_or(path);
        let name = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        if name.is_empty() {
            return Self::from_path(path);
        }
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// Contents decoded as UTF-8 text, lossily, with any byte-order mark removed.
    pub fn text(&self) -> String {
        let text = String::from_utf8_lossy(&self.bytes);
        text.trim_start_matches('\u{feff}').to_string()
    }

    /// Check whether the file is a spreadsheet workbook.
    pub fn is_spreadsheet(&self) -> bool {
        self.extension()
            .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Load every sheet of the file as a raw grid.
    ///
    /// Delimited text yields a single sheet named after the file.
    pub fn load_sheets(&self) -> Result<Vec<(String, RawGrid)>> {
        if self.is_spreadsheet() {
            let mut workbook = open_workbook_auto_from_rs(Cursor::new(self.bytes.as_slice()))?;
            let mut sheets = Vec::new();
            for sheet_name in workbook.sheet_names() {
                let range = workbook.worksheet_range(&sheet_name)?;
                sheets.push((sheet_name, range_to_grid(&range)));
            }
            tracing::debug!(file = %self.name, sheets = sheets.len(), "loaded workbook");
            Ok(sheets)
        } else {
            let delimiter = self.delimiter();
            let grid = parse_delimited(&self.text(), delimiter)?;
            Ok(vec![(self.name.clone(), grid)])
        }
    }

    /// Load the first non-empty sheet (or the delimited content) as a raw grid.
    ///
    /// A workbook with only empty sheets yields an empty grid.
    pub fn load_grid(&self) -> Result<RawGrid> {
        let sheets = self.load_sheets()?;
        Ok(sheets
            .into_iter()
            .map(|(_, grid)| grid)
            .find(|grid| !grid.is_empty())
            .unwrap_or_default())
    }

    /// Field delimiter for delimited text: comma for `.csv`, tab for `.tsv`/`.txt`,
    /// otherwise whichever of the two appears more in the first line.
    fn delimiter(&self) -> u8 {
        match self.extension().as_deref() {
            Some("csv") => b',',
            Some("tsv") | Some("txt") | Some("tab") => b'\t',
            _ => {
                let text = self.text();
                let first_line = text.lines().next().unwrap_or("");
                let tabs = first_line.matches('\t').count();
                let commas = first_line.matches(',').count();
                if commas > tabs {
                    b','
                } else {
                    b'\t'
                }
            }
        }
    }
}

/// Lower-cased extension of a file name.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Parse delimited text into a grid. Rows may have differing lengths.
pub fn parse_delimited(text: &str, delimiter: u8) -> Result<RawGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quoting(delimiter != b'\t')
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }
    Ok(RawGrid::new(rows))
}

/// Convert a calamine range into a raw grid.
fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => Cell::from_text(s),
                    Data::Float(f) => Cell::Number(*f),
                    Data::Int(i) => Cell::Number(*i as f64),
                    Data::Bool(b) => Cell::Bool(*b),
                    Data::DateTime(dt) => Cell::Number(dt.as_f64()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
                    _ => Cell::Empty,
                })
                .collect()
        })
        .collect();
    RawGrid::new(rows)
}
