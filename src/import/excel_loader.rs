//! Excel loader

use calamine::{Data, Reader, open_workbook_auto};
use serde_json::Value;
use std::path::Path;
use tracing::info;

use super::{InputFormat, LoadError, Loader};
use crate::models::{DataRow, Dataset};

/// Loads the first worksheet of a spreadsheet (xlsx, xlsm, xlsb, xls, ods)
///
/// The first row is the header; at least one data row is required. Cells
/// become string values, and cells under a blank header are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelLoader;

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

impl Loader for ExcelLoader {
    fn format(&self) -> InputFormat {
        InputFormat::Excel
    }

    fn parse(&self, _text: &str) -> Result<Dataset, LoadError> {
        Err(LoadError::parse(
            InputFormat::Excel,
            "spreadsheets are binary and must be read from a file",
        ))
    }

    fn load(&self, path: &Path) -> Result<Dataset, LoadError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| match e {
            calamine::Error::Io(source) => LoadError::Io {
                path: path.display().to_string(),
                source,
            },
            other => LoadError::parse(InputFormat::Excel, format!("failed to open workbook: {}", other)),
        })?;

        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::parse(InputFormat::Excel, "no sheets found in workbook"))?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| LoadError::parse(InputFormat::Excel, format!("failed to read sheet {}: {}", sheet, e)))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|c| cell_text(c).trim().to_string()).collect(),
            None => Vec::new(),
        };

        let mut data_rows = Vec::new();
        for cells in rows {
            // Trailing blank cells are not part of the row.
            let used = cells
                .iter()
                .rposition(|c| !matches!(c, Data::Empty))
                .map_or(0, |last| last + 1);
            let row: DataRow = headers
                .iter()
                .zip(&cells[..used])
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), Value::String(cell_text(cell))))
                .collect();
            data_rows.push(row);
        }

        if headers.is_empty() || data_rows.is_empty() {
            return Err(LoadError::parse(
                InputFormat::Excel,
                "workbook must contain a header row and at least one data row",
            ));
        }

        let columns = headers.into_iter().filter(|h| !h.is_empty()).collect();
        let dataset = Dataset::new(columns, data_rows);
        info!(
            path = %path.display(),
            sheet = %sheet,
            rows = dataset.len(),
            columns = dataset.columns.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use serde_json::json;

    fn write_workbook(path: &Path, cells: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in cells.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    sheet.write_string(r as u32, c as u16, *text).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_first_sheet_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " name ").unwrap();
        sheet.write_string(0, 1, "age").unwrap();
        sheet.write_string(1, 0, "Alice").unwrap();
        sheet.write_number(1, 1, 30).unwrap();
        sheet.write_string(2, 0, "Bob").unwrap();
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let dataset = ExcelLoader.load(&path).unwrap();
        assert_eq!(dataset.columns, vec!["name", "age"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[0]["age"], json!("30"));
        assert_eq!(dataset.rows[1]["name"], json!("Bob"));
        assert!(!dataset.rows[1].contains_key("age"));
    }

    #[test]
    fn test_blank_header_cells_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        write_workbook(&path, &[&["a", "", "c"], &["1", "2", "3"]]);

        let dataset = ExcelLoader.load(&path).unwrap();
        let keys: Vec<&str> = dataset.rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(dataset.columns, vec!["a", "c"]);
    }

    #[test]
    fn test_header_only_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_workbook(&path, &[&["a", "b"]]);

        assert!(matches!(ExcelLoader.load(&path), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_and_text_input() {
        assert!(matches!(
            ExcelLoader.load(Path::new("/no/such/book.xlsx")),
            Err(LoadError::Io { .. })
        ));
        assert!(ExcelLoader.parse("a,b").is_err());
    }
}
