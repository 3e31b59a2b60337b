// src/dispatch/mod.rs
//
// Job files for the render farm and the hand-off to its spool tool. The
// farm does all scheduling; this side only describes work and submits it.

pub mod job;
pub mod tractor;

pub use job::{JobDescriptor, JobKind, Task};
pub use tractor::TractorSpool;

use chrono::{DateTime, Utc};
use std::{fs, path::PathBuf};
use tracing::info;

use crate::error::{IoContext, Result};

/// Receipt for a submitted job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub job_file: PathBuf,
    /// `None` when nothing was actually sent.
    pub engine: Option<String>,
    pub tasks: usize,
    pub submitted_at: DateTime<Utc>,
}

/// The single seam to whatever executes jobs.
pub trait JobDispatcher {
    fn submit_job(&self, job: &JobDescriptor) -> Result<JobHandle>;
}

/// Create the job's directories and write its job file.
pub(crate) fn write_job_file(job: &JobDescriptor) -> Result<PathBuf> {
    fs::create_dir_all(&job.working_dir).at(&job.working_dir)?;
    if job.kind.needs_clustering_dir() {
        let clustering = job.working_dir.join("clustering");
        fs::create_dir_all(&clustering).at(&clustering)?;
    }
    let path = job.job_file_path();
    fs::write(&path, job.render()).at(&path)?;
    info!(path = %path.display(), tasks = job.tasks.len(), "wrote job file");
    Ok(path)
}

/// Writes the job file and stops there.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

impl JobDispatcher for DryRun {
    fn submit_job(&self, job: &JobDescriptor) -> Result<JobHandle> {
        let job_file = write_job_file(job)?;
        Ok(JobHandle {
            job_file,
            engine: None,
            tasks: job.tasks.len(),
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use crate::selection::Selection;
    use tempfile::tempdir;

    #[test]
    fn test_dry_run_writes_job_and_clustering_dir() {
        let tmp = tempdir().unwrap();
        let cfg = DispatchConfig {
            results_root: tmp.path().to_path_buf(),
            number_runs: 3,
            ..Default::default()
        };
        let job = JobDescriptor::build(JobKind::PreprocessAndCluster, Selection::Tourney, &cfg);

        let handle = DryRun.submit_job(&job).unwrap();
        assert_eq!(handle.tasks, 3);
        assert!(handle.engine.is_none());
        assert_eq!(fs::read_to_string(&handle.job_file).unwrap(), job.render());
        assert!(job.working_dir.join("clustering").is_dir());
    }

    #[test]
    fn test_preprocess_has_no_clustering_dir() {
        let tmp = tempdir().unwrap();
        let cfg = DispatchConfig {
            results_root: tmp.path().to_path_buf(),
            number_runs: 1,
            ..Default::default()
        };
        let job = JobDescriptor::build(JobKind::Preprocess, Selection::Lexicase, &cfg);
        DryRun.submit_job(&job).unwrap();
        assert!(!job.working_dir.join("clustering").exists());
        assert!(job.working_dir.join("fly_data_preprocessor.alf").is_file());
    }
}
