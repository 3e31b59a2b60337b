// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{Error, IoContext, Result};
use crate::selection::Selection;

/// Top-level settings file. Every field is optional; missing ones fall back
/// to the values the lab's scripts have always used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub augment: AugmentConfig,
    pub dispatch: DispatchConfig,
}

/// Where clustering CSVs live and which of them get a success column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AugmentConfig {
    pub data_root: PathBuf,
    pub namespace: String,
    pub filename_filter: String,
    pub selections: Vec<Selection>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("../data"),
            namespace: "count-odds".into(),
            filename_filter: "error_clustering_and_div".into(),
            selections: Selection::ALL.to_vec(),
        }
    }
}

impl AugmentConfig {
    /// `<data_root>/<namespace>/<selection>/clustering`
    pub fn clustering_dir(&self, selection: Selection) -> PathBuf {
        self.data_root
            .join(&self.namespace)
            .join(selection.name())
            .join("clustering")
    }
}

/// Render-farm layout and the spool command used to hand jobs over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    pub results_root: PathBuf,
    pub r_scripts_dir: PathBuf,
    pub namespace: String,
    pub number_runs: u32,
    /// Dendrogram cut height passed to the clustering script.
    pub height: u32,
    pub service_tag: String,
    pub env_source: String,
    pub spool_python: String,
    pub spool_script: String,
    pub engine: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            results_root: PathBuf::from("/home/thelmuth/Results/clustering-bench"),
            r_scripts_dir: PathBuf::from("/home/thelmuth/lexicase-clusturing-analysis/fly_scripts"),
            namespace: "replace-space-with-newline".into(),
            number_runs: 100,
            height: 20,
            service_tag: "tom".into(),
            env_source: "/etc/sysconfig/pixar".into(),
            spool_python: "/opt/pixar/tractor-blade-1.7.2/python/bin/python2.6".into(),
            spool_script: "/opt/pixar/tractor-blade-1.7.2/tractor-spool.py".into(),
            engine: "fly:8000".into(),
        }
    }
}

impl DispatchConfig {
    /// `<results_root>/<namespace>/<selection results dir>`
    pub fn selection_dir(&self, selection: Selection) -> PathBuf {
        self.results_root
            .join(&self.namespace)
            .join(selection.results_dir())
    }
}

impl Settings {
    /// Read settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).at(path)?;
        let settings: Settings = serde_yaml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.augment.filename_filter.is_empty() {
            return Err(Error::Config(
                "augment.filename_filter must not be empty".into(),
            ));
        }
        if self.augment.selections.is_empty() {
            return Err(Error::Config("augment.selections must not be empty".into()));
        }
        if self.dispatch.namespace.is_empty() || self.augment.namespace.is_empty() {
            return Err(Error::Config("namespace must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            "augment:\n  namespace: replace-space-with-newline\n  selections: [ifs]\ndispatch:\n  number_runs: 3"
        )
        .unwrap();

        let s = Settings::load(f.path()).unwrap();
        assert_eq!(s.augment.namespace, "replace-space-with-newline");
        assert_eq!(s.augment.selections, vec![Selection::Ifs]);
        assert_eq!(s.augment.filename_filter, "error_clustering_and_div");
        assert_eq!(s.dispatch.number_runs, 3);
        assert_eq!(s.dispatch.service_tag, "tom");
    }

    #[test]
    fn test_empty_filter_rejected() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "augment:\n  filename_filter: \"\"").unwrap();
        assert!(matches!(Settings::load(f.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_clustering_dir_layout() {
        let cfg = AugmentConfig {
            data_root: PathBuf::from("/data"),
            namespace: "count-odds".into(),
            ..Default::default()
        };
        assert_eq!(
            cfg.clustering_dir(Selection::Tourney),
            PathBuf::from("/data/count-odds/tourney/clustering")
        );
    }
}
