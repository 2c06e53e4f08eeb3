//! seqreport - sequencing deliverables ingestion CLI
//!
//! Command-line interface for classifying deliverable files and merging them
//! into a report-ready dataset.

use clap::{Parser, Subcommand, ValueEnum};
use seqreport::classify::classify;
use seqreport::data::InputFile;
use seqreport::error::Result;
use seqreport::pipeline::{FileStatus, IngestConfig, OutputFormat, Session};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// CLI-friendly output format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Yaml => OutputFormat::Yaml,
        }
    }
}

/// Sequencing deliverables ingestion
#[derive(Parser)]
#[command(name = "seqreport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest files and directories into a dataset
    Ingest {
        /// Files or directories (walked recursively)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Path to ingestion configuration YAML
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path for the dataset (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; overrides the config
        #[arg(short, long, value_enum)]
        format: Option<CliFormat>,

        /// Also write per-comparison stats as TSV
        #[arg(long)]
        tsv: Option<PathBuf>,
    },

    /// Classify filenames without reading them
    Classify {
        /// Filenames to classify
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Write an example configuration file
    Example {
        /// Output path
        #[arg(short, long, default_value = "ingest.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Ingest {
            input,
            config,
            output,
            format,
            tsv,
        } => cmd_ingest(
            &input,
            config.as_ref(),
            output.as_ref(),
            format.map(OutputFormat::from),
            tsv.as_ref(),
        ),
        Commands::Classify { names } => {
            cmd_classify(&names);
            Ok(())
        }
        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level.as_deref().unwrap_or("info").to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("seqreport={}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Expand inputs into file paths; directories are walked recursively and
/// their files are paired with the walked root.
fn collect_paths(inputs: &[PathBuf]) -> Vec<(Option<&Path>, PathBuf)> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        paths.push((Some(input.as_path()), entry.into_path()));
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
                }
            }
        } else {
            paths.push((None, input.clone()));
        }
    }
    paths
}

/// Ingest files and write the merged dataset
fn cmd_ingest(
    inputs: &[PathBuf],
    config_path: Option<&PathBuf>,
    output_path: Option<&PathBuf>,
    format: Option<OutputFormat>,
    tsv_path: Option<&PathBuf>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading configuration from {:?}...", path);
            IngestConfig::from_file(path)?
        }
        None => IngestConfig::default(),
    };
    let format = format.unwrap_or(config.output);
    let session = Session::with_config(config)?;

    let paths = collect_paths(inputs);
    eprintln!("Reading {} files...", paths.len());
    let mut files = Vec::with_capacity(paths.len());
    for (root, path) in &paths {
        let file = match root {
            Some(root) => InputFile::from_path_under(root, path),
            None => InputFile::from_path(path),
        };
        match file {
            Ok(file) => files.push(file),
            Err(e) => eprintln!("{}\tfailed: {}", path.display(), e),
        }
    }

    let reports = session.ingest(files);
    for report in &reports {
        eprintln!("{}", report);
    }
    let failed = reports.iter().filter(|r| r.status.is_failed()).count();
    let warned = reports
        .iter()
        .filter(|r| matches!(r.status, FileStatus::Warning(_)))
        .count();

    let dataset = session.dataset();
    eprintln!(
        "Ingested {} files ({} warnings, {} failed): {} comparisons",
        reports.len(),
        warned,
        failed,
        dataset.n_comparisons()
    );

    let rendered = match format {
        OutputFormat::Json => dataset.to_json()?,
        OutputFormat::Yaml => dataset.to_yaml()?,
    };
    match output_path {
        Some(path) => {
            std::fs::write(path, rendered)?;
            eprintln!("Dataset ({}) written to {:?}", format.name(), path);
        }
        None => println!("{}", rendered),
    }

    if let Some(path) = tsv_path {
        dataset.write_comparisons_tsv(path)?;
        eprintln!("Comparison stats written to {:?}", path);
    }

    Ok(())
}

/// Print the classification of each filename
fn cmd_classify(names: &[String]) {
    for name in names {
        let c = classify(name);
        println!(
            "{}\t{}\t{}",
            name,
            c.kind,
            c.group_id.as_deref().unwrap_or("-")
        );
    }
}

/// Write an example configuration
fn cmd_example(output: &Path) -> Result<()> {
    let yaml = IngestConfig::example().to_yaml()?;
    std::fs::write(output, yaml)?;
    eprintln!("Example configuration written to {:?}", output);
    Ok(())
}
