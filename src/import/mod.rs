//! Dataset loaders
//!
//! Reads input files into a [`Dataset`]:
//! - CSV (first record is the header)
//! - JSON (array of objects, or a single object)
//! - XML (repeated elements become rows; requires the `xml` feature)
//! - Spreadsheets (first worksheet; requires the `excel` feature)

pub mod csv_loader;
#[cfg(feature = "excel")]
pub mod excel_loader;
pub mod json_loader;
#[cfg(feature = "xml")]
pub mod xml_loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::models::Dataset;

/// Error while loading input data
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {format} input: {message}")]
    Parse { format: InputFormat, message: String },
}

impl LoadError {
    pub(crate) fn parse(format: InputFormat, message: impl fmt::Display) -> Self {
        LoadError::Parse {
            format,
            message: message.to_string(),
        }
    }
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    Json,
    Xml,
    Excel,
}

impl InputFormat {
    /// Format implied by a file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;
        extension.parse()
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "CSV"),
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::Xml => write!(f, "XML"),
            InputFormat::Excel => write!(f, "Excel"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            "xml" => Ok(InputFormat::Xml),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" | "excel" => Ok(InputFormat::Excel),
            _ => Err(LoadError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Reads one input format into a dataset
pub trait Loader {
    fn format(&self) -> InputFormat;

    /// Parse already-read input text
    fn parse(&self, text: &str) -> Result<Dataset, LoadError>;

    /// Read and parse a file
    fn load(&self, path: &Path) -> Result<Dataset, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = self.parse(&text)?;
        info!(
            path = %path.display(),
            format = %self.format(),
            rows = dataset.len(),
            columns = dataset.columns.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

/// Loader for an explicit format
pub fn loader_for_format(format: InputFormat) -> Result<Box<dyn Loader>, LoadError> {
    match format {
        InputFormat::Csv => Ok(Box::new(csv_loader::CsvLoader)),
        InputFormat::Json => Ok(Box::new(json_loader::JsonLoader)),
        #[cfg(feature = "xml")]
        InputFormat::Xml => Ok(Box::new(xml_loader::XmlLoader)),
        #[cfg(not(feature = "xml"))]
        InputFormat::Xml => Err(LoadError::UnsupportedFormat(
            "xml (built without the xml feature)".to_string(),
        )),
        #[cfg(feature = "excel")]
        InputFormat::Excel => Ok(Box::new(excel_loader::ExcelLoader)),
        #[cfg(not(feature = "excel"))]
        InputFormat::Excel => Err(LoadError::UnsupportedFormat(
            "Excel (built without the excel feature)".to_string(),
        )),
    }
}

/// Loader chosen by the file extension of `path`
pub fn loader_for_path(path: impl AsRef<Path>) -> Result<Box<dyn Loader>, LoadError> {
    loader_for_format(InputFormat::from_path(path)?)
}

/// Load `path`, using `format` when given and the file extension otherwise
pub fn load_file(path: impl AsRef<Path>, format: Option<InputFormat>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let loader = match format {
        Some(format) => loader_for_format(format)?,
        None => loader_for_path(path)?,
    };
    loader.load(path)
}

pub use csv_loader::CsvLoader;
#[cfg(feature = "excel")]
pub use excel_loader::ExcelLoader;
pub use json_loader::{JsonLoader, parse_json_dataset};
#[cfg(feature = "xml")]
pub use xml_loader::XmlLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path("data/users.CSV").unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path("a.json").unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::from_path("book.xlsx").unwrap(), InputFormat::Excel);
        assert!(matches!(
            InputFormat::from_path("notes.txt"),
            Err(LoadError::UnsupportedFormat(_))
        ));
        assert!(InputFormat::from_path("no_extension").is_err());
    }

    #[test]
    fn test_spreadsheet_extensions_pick_excel_loader() {
        assert_eq!(InputFormat::from_path("book.ods").unwrap(), InputFormat::Excel);
        let loader = loader_for_path("book.xlsx").unwrap();
        assert_eq!(loader.format(), InputFormat::Excel);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file("/definitely/not/here.csv", None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
