// src/bin/add_success_generation.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use lexiscrape::{augment, config::Settings, selection::Selection};

/// Append a success.generation column to clustering CSVs, once per selection method.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    /// YAML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    namespace: Option<String>,

    /// Only files whose name contains this are touched
    #[arg(long)]
    filter: Option<String>,

    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Restrict to these selection methods (repeatable)
    #[arg(long, value_enum)]
    selection: Vec<Selection>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings =
        Settings::load_or_default(args.config.as_deref()).context("loading settings")?;
    let cfg = &mut settings.augment;
    if let Some(ns) = args.namespace {
        cfg.namespace = ns;
    }
    if let Some(filter) = args.filter {
        cfg.filename_filter = filter;
    }
    if let Some(root) = args.data_root {
        cfg.data_root = root;
    }
    if !args.selection.is_empty() {
        cfg.selections = args.selection;
    }
    settings.validate().context("invalid settings")?;

    let outcomes = augment::augment_selections(&settings.augment);
    // failures were already logged by augment_selections
    for outcome in &outcomes {
        if let Ok(files) = &outcome.result {
            info!(
                selection = %outcome.selection,
                dir = %outcome.dir.display(),
                files = files.len(),
                "selection finished"
            );
        }
    }
    Ok(())
}
