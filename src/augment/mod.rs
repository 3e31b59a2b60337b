// src/augment/mod.rs
//
// Adds a `success.generation` column to clustering CSVs.

pub mod table;

pub use table::CsvTable;

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, instrument};

use crate::config::AugmentConfig;
use crate::error::{Error, IoContext, Result};
use crate::selection::Selection;

pub const SUCCESS_COLUMN: &str = "success.generation";
/// Written when the run never succeeded.
pub const NOT_SUCCESSFUL: &str = "NA";

/// The first data row's `success` flag decides whether the run succeeded.
const STATUS_ROW: usize = 1;
const STATUS_COLUMN: usize = 4;
/// The last row's generation is the one that succeeded.
const GENERATION_COLUMN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedFile {
    pub path: PathBuf,
    pub data_rows: usize,
    pub success_generation: String,
}

/// The value every data row receives: the last row's generation if the
/// run succeeded, `NA` otherwise.
pub fn success_generation(table: &CsvTable) -> Result<String> {
    if table.field(STATUS_ROW, STATUS_COLUMN)? == "TRUE" {
        let last = table.rows().len() - 1;
        Ok(table.field(last, GENERATION_COLUMN)?.to_string())
    } else {
        Ok(NOT_SUCCESSFUL.to_string())
    }
}

/// Append the column in memory. Nothing is modified on error.
pub fn augment_table(table: &mut CsvTable) -> Result<String> {
    if table.header().and_then(<[String]>::last).map(String::as_str) == Some(SUCCESS_COLUMN) {
        return Err(Error::AlreadyProcessed(table.path().to_path_buf()));
    }
    let value = success_generation(table)?;
    table.append_column(SUCCESS_COLUMN, &value)?;
    Ok(value)
}

/// Read, augment and rewrite one file in place.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn augment_file(path: impl AsRef<Path>) -> Result<AugmentedFile> {
    let mut table = CsvTable::read(path.as_ref())?;
    let success_generation = augment_table(&mut table)?;
    table.write()?;
    Ok(AugmentedFile {
        path: table.path().to_path_buf(),
        data_rows: table.data_rows().len(),
        success_generation,
    })
}

/// Augment every file in `dir` whose name contains `filter`, in name
/// order. The first failure stops the directory.
pub fn augment_directory(dir: impl AsRef<Path>, filter: &str) -> Result<Vec<AugmentedFile>> {
    let dir = dir.as_ref();
    info!(dir = %dir.display(), "adding success generations");

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).at(dir)? {
        let entry = entry.at(dir)?;
        if !entry.file_name().to_string_lossy().contains(filter) {
            continue;
        }
        // follows symlinks, unlike DirEntry::file_type
        let path = entry.path();
        if fs::metadata(&path).at(&path)?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut done = Vec::with_capacity(paths.len());
    for path in paths {
        let file = augment_file(&path)?;
        info!(
            path = %file.path.display(),
            rows = file.data_rows,
            success_generation = %file.success_generation,
            "augmented"
        );
        done.push(file);
    }
    Ok(done)
}

/// Result of one selection directory.
#[derive(Debug)]
pub struct SelectionOutcome {
    pub selection: Selection,
    pub dir: PathBuf,
    pub result: Result<Vec<AugmentedFile>>,
}

/// Run every configured selection independently. A failing selection is
/// logged and does not stop the others.
pub fn augment_selections(cfg: &AugmentConfig) -> Vec<SelectionOutcome> {
    cfg.selections
        .iter()
        .map(|&selection| {
            let dir = cfg.clustering_dir(selection);
            let result = augment_directory(&dir, &cfg.filename_filter);
            if let Err(e) = &result {
                error!(%selection, "-- {}", e);
            }
            SelectionOutcome {
                selection,
                dir,
                result,
            }
        })
        .collect()
}
