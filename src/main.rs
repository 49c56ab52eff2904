//! Kufedit CLI - Command-line tool for inspecting Kingdom Under Fire data files.
//!
//! This is the main entry point for the kufedit command-line application.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use kufedit::prelude::*;
use kufedit::sox::hex;

/// Kufedit - Kingdom Under Fire: The Crusaders data file tool
#[derive(Parser)]
#[command(name = "kufedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the format of a data file
    Detect {
        /// Path to the data file
        file: PathBuf,
    },

    /// Show a summary of a data file
    Info {
        /// Path to the data file
        file: PathBuf,

        /// Emit the parsed model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a data file and report issues
    Validate {
        /// Path to the data file
        file: PathBuf,
    },

    /// Parse, re-save and byte-compare a data file
    Verify {
        /// Path to the data file
        file: PathBuf,
    },

    /// Detect every file under a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { file } => cmd_detect(&file)?,
        Commands::Info { file, json } => cmd_info(&file, json)?,
        Commands::Validate { file } => cmd_validate(&file)?,
        Commands::Verify { file } => cmd_verify(&file)?,
        Commands::Scan { dir } => cmd_scan(&dir)?,
    }

    Ok(())
}

fn load_detected(path: &PathBuf) -> Result<(Vec<u8>, DetectedFormat)> {
    let data = fs::read(path).context("Failed to read input file")?;
    let format = detect(&data)
        .with_context(|| format!("Unrecognized file format: {}", path.display()))?;
    Ok((data, format))
}

fn cmd_detect(file: &PathBuf) -> Result<()> {
    let (_, format) = load_detected(file)?;
    println!("{}: {}", file.display(), format.name());
    Ok(())
}

fn cmd_info(file: &PathBuf, json: bool) -> Result<()> {
    let (_, format) = load_detected(file)?;

    if json {
        let out = match &format {
            DetectedFormat::SoxBinary(sox) => serde_json::to_string_pretty(sox.troops())?,
            DetectedFormat::SoxText(sox) => serde_json::to_string_pretty(sox.entries())?,
            DetectedFormat::SoxSkillInfo(sox) => serde_json::to_string_pretty(sox.skills())?,
            DetectedFormat::Stg(stg) => serde_json::to_string_pretty(stg)?,
        };
        println!("{out}");
        return Ok(());
    }

    println!("{}: {}", file.display(), format.name());
    match &format {
        DetectedFormat::SoxBinary(sox) => {
            println!("  {} troop records", sox.record_count());
        }
        DetectedFormat::SoxText(sox) => {
            let populated = sox.entries().iter().filter(|e| e.is_some()).count();
            println!(
                "  {} text slots ({} populated)",
                sox.entry_count(),
                populated
            );
        }
        DetectedFormat::SoxSkillInfo(sox) => {
            println!("  {} skill records", sox.record_count());
        }
        DetectedFormat::Stg(stg) => {
            println!("  mission id: {}", stg.header().mission_id);
            println!("  map: {}", stg.header().map_file);
            println!("  ai script: {}", stg.header().ai_script_file);
            println!("  {} units", stg.unit_count());
            match stg.tail().as_parsed() {
                Some(tail) => println!(
                    "  tail: {} areas, {} variables, {} events, {} footer entries",
                    tail.areas.len(),
                    tail.variables.len(),
                    tail.event_count(),
                    tail.footer.len()
                ),
                None => println!("  tail: unparsed (kept raw)"),
            }
        }
    }

    Ok(())
}

fn cmd_validate(file: &PathBuf) -> Result<()> {
    let (_, format) = load_detected(file)?;

    let issues = format.validate();
    if issues.is_empty() {
        println!("{}: no issues", file.display());
        return Ok(());
    }

    for issue in &issues {
        println!("{issue}");
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("{errors} error(s) in {}", file.display());
    }

    println!("{} warning(s), no errors", issues.len());
    Ok(())
}

fn cmd_verify(file: &PathBuf) -> Result<()> {
    let (data, format) = load_detected(file)?;

    // Hex-wrapped files are compared against their decoded form.
    let baseline = if hex::is_hex_encoded(&data) {
        hex::hex_decode(&data).unwrap_or(data)
    } else {
        data
    };

    let saved = format.to_bytes();
    if saved == baseline {
        println!(
            "{}: round-trip OK ({} bytes, {})",
            file.display(),
            baseline.len(),
            format.name()
        );
        Ok(())
    } else {
        let at = saved
            .iter()
            .zip(baseline.iter())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| saved.len().min(baseline.len()));
        anyhow::bail!(
            "{}: round-trip mismatch at byte {} (saved {} bytes, original {})",
            file.display(),
            at,
            saved.len(),
            baseline.len()
        );
    }
}

fn cmd_scan(dir: &PathBuf) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    println!("Scanning {} files under {}", files.len(), dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut unrecognized = 0usize;

    for path in &files {
        match fs::read(path).ok().and_then(|data| detect(&data)) {
            Some(format) => *counts.entry(format.name()).or_default() += 1,
            None => unrecognized += 1,
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("Scan completed in {:?}", start.elapsed());
    for (name, count) in &counts {
        println!("{count:>8}  {name}");
    }
    println!("{unrecognized:>8}  unrecognized");

    Ok(())
}
