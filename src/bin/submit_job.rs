// src/bin/submit_job.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use lexiscrape::{
    config::Settings,
    dispatch::{DryRun, JobDescriptor, JobDispatcher, JobKind, TractorSpool},
    selection::Selection,
};

/// Build a per-run job for the render farm and spool it.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    #[arg(long, value_enum)]
    kind: JobKind,

    #[arg(long, value_enum)]
    selection: Selection,

    /// YAML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    namespace: Option<String>,

    /// Number of runs, one task each
    #[arg(long)]
    runs: Option<u32>,

    /// Write the job file but do not spool it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut settings =
        Settings::load_or_default(args.config.as_deref()).context("loading settings")?;
    if let Some(ns) = args.namespace {
        settings.dispatch.namespace = ns;
    }
    if let Some(runs) = args.runs {
        settings.dispatch.number_runs = runs;
    }
    settings.validate().context("invalid settings")?;

    let job = JobDescriptor::build(args.kind, args.selection, &settings.dispatch);
    info!(title = %job.title, tasks = job.tasks.len(), "built job");

    let dispatcher: Box<dyn JobDispatcher> = if args.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(TractorSpool::new(settings.dispatch.clone()))
    };
    let handle = dispatcher
        .submit_job(&job)
        .with_context(|| format!("submitting {}", job.title))?;

    info!(
        job_file = %handle.job_file.display(),
        engine = ?handle.engine,
        tasks = handle.tasks,
        at = %handle.submitted_at,
        "job handed off"
    );
    Ok(())
}
