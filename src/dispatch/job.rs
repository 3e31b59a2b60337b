// src/dispatch/job.rs

use std::path::{Path, PathBuf};

use crate::config::DispatchConfig;
use crate::selection::Selection;

/// What a submitted job runs on each experiment run's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum JobKind {
    /// Unpack `data<i>.csv` and turn it into `errors_data<i>.csv`.
    Preprocess,
    /// Cluster already-preprocessed error data.
    Cluster,
    PreprocessAndCluster,
}

impl JobKind {
    pub fn title(self) -> &'static str {
        match self {
            JobKind::Preprocess => "Preprocess Error Data",
            JobKind::Cluster => "Find Numbers of Clusters",
            JobKind::PreprocessAndCluster => "Preprocess; Find Clusters",
        }
    }

    /// Subdirectory of the selection directory the tasks `cd` into.
    pub fn working_subdir(self) -> &'static str {
        match self {
            JobKind::Cluster => "zips",
            JobKind::Preprocess | JobKind::PreprocessAndCluster => "csv",
        }
    }

    pub fn job_file_name(self) -> &'static str {
        match self {
            JobKind::Preprocess => "fly_data_preprocessor.alf",
            JobKind::Cluster | JobKind::PreprocessAndCluster => "fly_error_clusterer.alf",
        }
    }

    /// Clustering scripts write into `<working dir>/clustering/`.
    pub fn needs_clustering_dir(self) -> bool {
        !matches!(self, JobKind::Preprocess)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub command: String,
    pub service: String,
}

/// A complete job, ready to be rendered and handed to a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub kind: JobKind,
    pub selection: Selection,
    pub title: String,
    pub working_dir: PathBuf,
    pub tasks: Vec<Task>,
}

fn dir_arg(path: &Path) -> String {
    let s = path.display().to_string();
    if s.ends_with('/') {
        s
    } else {
        s + "/"
    }
}

impl JobDescriptor {
    pub fn build(kind: JobKind, selection: Selection, cfg: &DispatchConfig) -> Self {
        let title = format!("{} | {} | {}", kind.title(), cfg.namespace, selection.title());
        let working_dir = cfg.selection_dir(selection).join(kind.working_subdir());
        let out = dir_arg(&working_dir);
        let r = dir_arg(&cfg.r_scripts_dir);

        let preprocess = |run: u32, verbose_rm: bool| {
            let rm = if verbose_rm {
                format!("echo Removing data{run}.csv; rm data{run}.csv;")
            } else {
                format!("rm data{run}.csv; echo Done")
            };
            format!(
                "echo Unzipping; cd {out}; tar zxf data{run}.csv.tar.gz; echo Running R transformation; \
                 Rscript {r}transform_data_file.R {r} data{run}.csv; {rm}"
            )
        };
        let cluster = |run: u32, trailing: &str| {
            format!(
                "echo Beginning clustering R script; cd {out}; Rscript {r}cluster_based_on_errors.R {r} \
                 errors_data{run}.csv {ns} {sel} {run} {height}; echo Done{trailing}",
                ns = cfg.namespace,
                sel = selection.name(),
                height = cfg.height,
            )
        };

        let tasks = (0..cfg.number_runs)
            .map(|run| {
                let command = match kind {
                    JobKind::Preprocess => preprocess(run, false),
                    JobKind::Cluster => cluster(run, ""),
                    JobKind::PreprocessAndCluster => preprocess(run, true) + &cluster(run, ";"),
                };
                Task {
                    title: format!("{} - run {}", title, run),
                    command,
                    service: cfg.service_tag.clone(),
                }
            })
            .collect();

        Self {
            kind,
            selection,
            title,
            working_dir,
            tasks,
        }
    }

    pub fn job_file_path(&self) -> PathBuf {
        self.working_dir.join(self.kind.job_file_name())
    }

    /// AlfredToDo 3.0 job script.
    pub fn render(&self) -> String {
        let mut out = format!("##AlfredToDo 3.0\nJob -title {{{}}} -subtasks {{\n", self.title);
        for task in &self.tasks {
            out.push_str(&format!(
                "    Task -title {{{}}} -cmds {{\n        RemoteCmd {{/bin/sh -c {{{}}}}} -service {{{}}}\n    }}\n",
                task.title, task.command, task.service
            ));
        }
        out.push_str("}\n");
        out
    }
}
