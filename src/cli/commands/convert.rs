//! Convert command: load or fetch, transform, generate, write

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use tabular_sql::import::{InputFormat, Loader, load_file, loader_for_format};
use tabular_sql::{Dataset, Fetcher, GeneratorOptions, SqlGenerator, TransformEngine};

use crate::error::CliError;

/// Where the dataset comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Local file, or `-` for stdin
    File {
        path: PathBuf,
        format: Option<InputFormat>,
    },
    /// Remote source fetched by a [`tabular_sql::Fetcher`]
    Remote { url: String, source_type: String },
}

/// Arguments for the convert command
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub source: Source,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
    /// JSON rule file applied before generation
    pub transform: Option<PathBuf>,
    pub options: GeneratorOptions,
}

/// Handle the convert command
pub fn handle_convert(args: &ConvertArgs) -> Result<(), CliError> {
    let mut dataset = read_source(&args.source)?;
    info!(
        rows = dataset.len(),
        columns = dataset.columns.len(),
        "Dataset ready"
    );

    if let Some(path) = &args.transform {
        let engine = TransformEngine::from_file(path)?;
        engine.apply(&mut dataset)?;
    }

    info!(dialect = %args.options.dialect, table = %args.options.table_name, "Generating SQL");
    let mut generator = SqlGenerator::new(args.options.clone())?;
    let sql = generator.generate(&dataset)?;

    write_output(args.output.as_deref(), &sql)?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), bytes = sql.len(), "SQL written");
    }
    Ok(())
}

fn read_source(source: &Source) -> Result<Dataset, CliError> {
    match source {
        Source::File { path, format } if path.as_os_str() == "-" => {
            let format = format.ok_or_else(|| {
                CliError::InvalidArgument("--format is required when reading stdin".to_string())
            })?;
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
            Ok(loader_for_format(format)?.parse(&text)?)
        }
        Source::File { path, format } => Ok(load_file(path, *format)?),
        Source::Remote { url, source_type } => fetch(url, source_type),
    }
}

fn fetch(url: &str, source_type: &str) -> Result<Dataset, CliError> {
    info!(url, source_type, "Fetching dataset");
    let fetcher = tabular_sql::fetch::fetcher_for(source_type)?;
    Ok(fetcher.fetch(url)?)
}

fn write_output(path: Option<&Path>, sql: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, sql)
            .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(sql.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::FileWriteError(PathBuf::from("-"), e.to_string()))
        }
    }
}
