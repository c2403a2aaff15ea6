//! vcdslog - decode VCDS diagnostic CSV logs from the command line
//!
//! Files are decoded in parallel; each file is independent and a failure in
//! one does not stop the others.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use vcdslog::parsers::{is_csv_path, ParsedLog, Parseable, Vcds};
use vcdslog::settings::Settings;
use vcdslog::store::{LogStore, MemoryStore, Page, DEFAULT_PAGE_LIMIT};

#[derive(Parser)]
#[command(name = "vcdslog", version, about = "Decode VCDS diagnostic CSV logs")]
struct Cli {
    /// Settings file to use instead of the one in the config directory
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode files and print a summary or the full decoded logs
    Decode {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print decoded logs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode files into a fresh store and print one page of log records
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
        /// Include each log's groups in the output
        #[arg(long)]
        groups: bool,
    },
    /// Print the active settings, optionally writing them to the config directory
    Settings {
        #[arg(long)]
        save: bool,
    },
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_from(path).context("Failed to load settings"),
        None => Ok(Settings::load()),
    }
}

/// Keep only files with the export extension
fn csv_files(files: Vec<PathBuf>) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter(|path| {
            let keep = is_csv_path(path);
            if !keep {
                tracing::warn!("Skipping {}: not a .csv file", path.display());
            }
            keep
        })
        .collect()
}

fn decode_file(decoder: &Vcds, path: &Path) -> Result<ParsedLog> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decoder
        .parse(&data)
        .with_context(|| format!("Failed to decode {}", path.display()))
}

/// Decode all files in parallel, preserving input order
fn decode_all(decoder: &Vcds, files: &[PathBuf]) -> Vec<(PathBuf, Result<ParsedLog>)> {
    files
        .par_iter()
        .map(|path| (path.clone(), decode_file(decoder, path)))
        .collect()
}

/// Split results into successes, logging each failure
fn successes(results: Vec<(PathBuf, Result<ParsedLog>)>) -> (Vec<(PathBuf, ParsedLog)>, usize) {
    let mut decoded = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(log) => decoded.push((path, log)),
            Err(e) => {
                tracing::error!("{:#}", e);
                failed += 1;
            }
        }
    }
    (decoded, failed)
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn run_decode(decoder: &Vcds, files: Vec<PathBuf>, json: bool) -> Result<usize> {
    let files = csv_files(files);
    let (decoded, failed) = successes(decode_all(decoder, &files));

    if json {
        let logs: Vec<&ParsedLog> = decoded.iter().map(|(_, log)| log).collect();
        println!("{}", serde_json::to_string_pretty(&logs)?);
    } else {
        for (path, log) in &decoded {
            println!(
                "{}: VIN {}, motor {}, captured {}, {} groups, {} sensors, {} readings",
                path.display(),
                log.vin,
                log.motor_type,
                log.captured_at.date(),
                log.groups.len(),
                log.sensor_count(),
                log.reading_count()
            );
        }
    }
    Ok(failed)
}

fn run_ingest(decoder: &Vcds, files: Vec<PathBuf>, page: Page, groups: bool) -> Result<usize> {
    let files = csv_files(files);
    let (decoded, failed) = successes(decode_all(decoder, &files));

    let store = MemoryStore::new();
    for (path, log) in &decoded {
        store.insert(&display_name(path), log)?;
    }

    let records = store.list(page)?;
    if groups {
        let full = records
            .iter()
            .map(|r| store.get(r.id))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", serde_json::to_string_pretty(&full)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(failed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;

    let failed = match cli.command {
        Command::Decode { files, json } => {
            let decoder = Vcds::new(settings.schema).context("Invalid header schema")?;
            run_decode(&decoder, files, json)?
        }
        Command::Ingest {
            files,
            offset,
            limit,
            groups,
        } => {
            let decoder = Vcds::new(settings.schema).context("Invalid header schema")?;
            run_ingest(&decoder, files, Page::new(offset, limit), groups)?
        }
        Command::Settings { save } => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            if save {
                let path = settings.save()?;
                tracing::info!("Settings written to {}", path.display());
            }
            0
        }
    };

    if failed > 0 {
        bail!("{} file(s) failed to decode", failed);
    }
    Ok(())
}
