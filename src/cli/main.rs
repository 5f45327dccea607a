//! tabular-sql CLI
//!
//! Converts a CSV, JSON or XML file (or a JSON REST endpoint) into a SQL
//! script for the selected dialect.

mod commands;
mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tabular_sql::import::InputFormat;
use tabular_sql::{DialectKind, GeneratorOptions, NamingConvention};

use commands::convert::{ConvertArgs, Source, handle_convert};

/// Convert tabular and nested data into SQL INSERT scripts.
#[derive(Parser, Debug)]
#[command(name = "tabular-sql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file path, or `-` for stdin (required unless using --fetch)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output SQL file path (stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Table name for SQL statements [default: data]
    #[arg(short, long)]
    table: Option<String>,

    /// Input format (csv, json, xml); inferred from the file extension if omitted
    #[arg(short, long)]
    format: Option<InputFormat>,

    /// SQL dialect (generic, postgres, mysql, sqlite, sqlserver, oracle) [default: generic]
    #[arg(short, long)]
    dialect: Option<DialectKind>,

    /// Number of rows per INSERT statement; 0 or less for one statement [default: 100]
    #[arg(short, long, allow_negative_numbers = true)]
    batch_size: Option<i64>,

    /// Generate CREATE TABLE statements
    #[arg(short, long)]
    create_table: bool,

    /// JSON file with transformation rules
    #[arg(short = 'r', long)]
    transform: Option<PathBuf>,

    /// Normalize column names for SQL compatibility [default: true]
    #[arg(short, long, action = ArgAction::Set)]
    normalize: Option<bool>,

    /// Naming convention for generated tables (snake, camel, pascal)
    #[arg(long)]
    naming: Option<NamingConvention>,

    /// Prefix added to generated table names
    #[arg(long)]
    table_prefix: Option<String>,

    /// Singularize generated table names instead of pluralizing
    #[arg(long)]
    singular_tables: bool,

    /// Fraction of values that must agree on a column type (0.0-1.0)
    #[arg(long)]
    threshold: Option<f64>,

    /// Retrieve the dataset from a remote source instead of a file
    #[arg(long)]
    fetch: bool,

    /// Source URL for fetch mode
    #[arg(long, requires = "fetch")]
    source: Option<String>,

    /// Source type for fetch mode
    #[arg(long, default_value = "rest")]
    source_type: String,

    /// TOML file with generator options; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Options from the config file (or defaults) overridden by explicit flags
    fn generator_options(&self) -> anyhow::Result<GeneratorOptions> {
        let mut options = match &self.config {
            Some(path) => GeneratorOptions::from_toml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GeneratorOptions::default(),
        };

        if let Some(table) = &self.table {
            options.table_name = table.clone();
        }
        if let Some(dialect) = self.dialect {
            options.dialect = dialect;
        }
        if let Some(batch_size) = self.batch_size {
            options.batch_size = usize::try_from(batch_size).unwrap_or(0);
        }
        if self.create_table {
            options.create_table = true;
        }
        if let Some(normalize) = self.normalize {
            options.normalize_columns = normalize;
        }
        if let Some(naming) = self.naming {
            options.naming.convention = naming;
        }
        if let Some(prefix) = &self.table_prefix {
            options.naming.table_prefix = prefix.clone();
        }
        if self.singular_tables {
            options.naming.pluralize_tables = false;
        }
        if let Some(threshold) = self.threshold {
            options.inference.type_threshold = threshold;
        }

        options.validate().context("Invalid generator options")?;
        Ok(options)
    }

    fn source(&self) -> anyhow::Result<Source> {
        if self.fetch {
            let url = self
                .source
                .clone()
                .context("--source is required when using --fetch")?;
            return Ok(Source::Remote {
                url,
                source_type: self.source_type.clone(),
            });
        }
        let path = self
            .input
            .clone()
            .context("--input is required when not using --fetch")?;
        Ok(Source::File {
            path,
            format: self.format,
        })
    }
}

/// Map the level names accepted on the command line onto filter directives
fn log_directive(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(log_directive(&cli.log_level)))
                .context("Invalid log level")?,
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = ConvertArgs {
        source: cli.source()?,
        output: cli.output.clone(),
        transform: cli.transform.clone(),
        options: cli.generator_options()?,
    };

    handle_convert(&args).context("Conversion failed")?;
    Ok(())
}
