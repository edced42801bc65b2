//! Glyph Exporter - Entry Point
//!
//! Parses the command line, loads configuration and runs one export.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use glyph_exporter::{export, DirectorySource, ExportConfig, ExportReport, PlaceholderSource};

/// Export icon catalogs as individual PNGs and stacked sprite sheets
#[derive(Parser, Debug)]
#[command(name = "glyph-export", version, about, long_about = None)]
struct Cli {
    /// Existing folder to export into
    #[arg(required_unless_present = "write_config")]
    root: Option<PathBuf>,

    /// Read catalogs from this folder instead of the built-in placeholders
    #[arg(long)]
    source: Option<PathBuf>,

    /// Config file (RON); defaults to the user config folder
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config to this file
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::info!("Starting glyph-export v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::load_or_default(&ExportConfig::default_path()),
    };

    if let Some(path) = &cli.write_config {
        config.save(path)?;
    }

    let Some(root) = cli.root else {
        return Ok(());
    };

    let result = match &cli.source {
        Some(dir) => {
            let source = DirectorySource::open(dir)?;
            export(&root, &source, &config)
        }
        None => export(&root, &PlaceholderSource::new(config.tile_width), &config),
    };

    match result {
        Ok(report) => print_report(&report, cli.json),
        Err(failure) => Err(failure.into()),
    }
}

fn print_report(report: &ExportReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
        return Ok(());
    }

    println!(
        "Wrote {} files: {} images, {} glyphs, {} sprite sheets",
        report.files_written, report.images_written, report.glyphs_written, report.sheets_written
    );
    if !report.skipped.is_empty() {
        println!("Skipped {}:", report.skipped.len());
        for problem in &report.skipped {
            println!("  {}", problem);
        }
    }
    Ok(())
}
