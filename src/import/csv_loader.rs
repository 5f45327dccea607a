//! CSV loader

use csv::ReaderBuilder;
use serde_json::Value;

use super::{InputFormat, LoadError, Loader};
use crate::models::{DataRow, Dataset};

/// Loads CSV files; the first record is the header and every cell is a string
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLoader;

impl Loader for CsvLoader {
    fn format(&self) -> InputFormat {
        InputFormat::Csv
    }

    fn parse(&self, text: &str) -> Result<Dataset, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::parse(InputFormat::Csv, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(LoadError::parse(InputFormat::Csv, "missing header row"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| LoadError::parse(InputFormat::Csv, e))?;
            // Cells beyond the header are dropped.
            let row: DataRow = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
                .collect();
            rows.push(row);
        }

        Ok(Dataset::new(headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_with_header() {
        let dataset = CsvLoader
            .parse(" name , age\nAlice,30\n\"Smith, Bob\",41\n")
            .unwrap();
        assert_eq!(dataset.columns, vec!["name", "age"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[1]["name"], json!("Smith, Bob"));
        assert_eq!(dataset.rows[0]["age"], json!("30"));
    }

    #[test]
    fn test_short_and_long_records() {
        let dataset = CsvLoader.parse("a,b\n1\n2,3,4\n").unwrap();
        assert_eq!(dataset.rows[0].len(), 1);
        assert_eq!(dataset.rows[1]["b"], json!("3"));
        assert_eq!(dataset.rows[1].len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(CsvLoader.parse(""), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "city,population").unwrap();
        writeln!(file, "Maputo,1100000").unwrap();

        let dataset = CsvLoader.load(file.path()).unwrap();
        assert_eq!(dataset.rows[0]["city"], json!("Maputo"));
    }
}
