// src/bin/scrape_homology.rs
//
// Scrapes homology quartiles out of run logs and prints them as CSV.
// Given a directory, reads every log<run>.txt in it; given a file, reads
// just that file and leaves out the Run column.

use anyhow::{Context, Result};
use clap::Parser;
use std::{io, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use lexiscrape::scrape::{write_records, DirectoryScraper, Layout, LogScraper};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape homology quartiles from run logs into CSV")]
struct Args {
    /// Directory of log*.txt files, or a single log file
    path: PathBuf,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let stdout = io::stdout().lock();

    let written = if args.path.is_dir() {
        let scraper = DirectoryScraper::new(&args.path)
            .with_context(|| format!("listing logs in {}", args.path.display()))?;
        write_records(stdout, scraper.records(), Layout::Runs)
    } else {
        let scraper = LogScraper::new(&args.path);
        let records = scraper
            .records()
            .with_context(|| format!("opening {}", args.path.display()))?;
        write_records(stdout, records, Layout::SingleFile)
    };
    let rows = written.with_context(|| format!("scraping {}", args.path.display()))?;

    info!(rows, "done");
    Ok(())
}
