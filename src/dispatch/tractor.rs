// src/dispatch/tractor.rs

use chrono::Utc;
use std::process::Command;
use tracing::{debug, error, info};

use super::{write_job_file, JobDescriptor, JobDispatcher, JobHandle};
use crate::config::DispatchConfig;
use crate::error::{Error, IoContext, Result};

const SHELL: &str = "/bin/sh";

/// Submits through the farm's `tractor-spool` script.
#[derive(Debug, Clone)]
pub struct TractorSpool {
    cfg: DispatchConfig,
}

impl TractorSpool {
    pub fn new(cfg: DispatchConfig) -> Self {
        Self { cfg }
    }

    /// Shell line that sources the farm environment and spools `job_file`.
    pub fn spool_command(&self, job_file: &std::path::Path) -> String {
        let spool = format!(
            "{} {} --engine={} {}",
            self.cfg.spool_python,
            self.cfg.spool_script,
            self.cfg.engine,
            job_file.display()
        );
        if self.cfg.env_source.is_empty() {
            spool
        } else {
            format!("source {};{}", self.cfg.env_source, spool)
        }
    }
}

impl JobDispatcher for TractorSpool {
    fn submit_job(&self, job: &JobDescriptor) -> Result<JobHandle> {
        let job_file = write_job_file(job)?;
        let line = self.spool_command(&job_file);
        debug!(command = %line, "spooling");

        let output = Command::new(SHELL).arg("-c").arg(&line).output().at(SHELL)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(status = %output.status, stderr = %stderr.trim(), "spool failed");
            return Err(Error::Dispatch(format!(
                "{} exited with {}: {}",
                self.cfg.spool_script,
                output.status,
                stderr.trim()
            )));
        }

        info!(
            job = %job.title,
            engine = %self.cfg.engine,
            tasks = job.tasks.len(),
            "submitted"
        );
        Ok(JobHandle {
            job_file,
            engine: Some(self.cfg.engine.clone()),
            tasks: job.tasks.len(),
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::dispatch::JobKind;
    use crate::selection::Selection;
    use std::path::Path;
    use tempfile::tempdir;

    fn cfg(root: &Path, python: &str) -> DispatchConfig {
        DispatchConfig {
            results_root: root.to_path_buf(),
            number_runs: 2,
            env_source: String::new(),
            spool_python: python.into(),
            spool_script: "tractor-spool.py".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_spool_command_line() {
        let mut c = cfg(Path::new("/res"), "python2.6");
        c.env_source = "/etc/sysconfig/pixar".into();
        let spool = TractorSpool::new(c);
        assert_eq!(
            spool.spool_command(Path::new("/res/job.alf")),
            "source /etc/sysconfig/pixar;python2.6 tractor-spool.py --engine=fly:8000 /res/job.alf"
        );
    }

    #[test]
    fn test_successful_spool() {
        let tmp = tempdir().unwrap();
        let c = cfg(tmp.path(), "true");
        let job = JobDescriptor::build(JobKind::Cluster, Selection::Ifs, &c);
        let handle = TractorSpool::new(c).submit_job(&job).unwrap();
        assert_eq!(handle.engine.as_deref(), Some("fly:8000"));
        assert_eq!(handle.tasks, 2);
        assert!(handle.job_file.is_file());
    }

    #[test]
    fn test_failed_spool_is_dispatch_error() {
        let tmp = tempdir().unwrap();
        let c = cfg(tmp.path(), "false");
        let job = JobDescriptor::build(JobKind::Cluster, Selection::Ifs, &c);
        let err = TractorSpool::new(c).submit_job(&job).unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
    }
}
