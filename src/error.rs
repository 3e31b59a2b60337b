// src/error.rs

use std::path::PathBuf;

/// Everything the library can fail with. Binaries wrap these in `anyhow`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `log*.txt` file whose name carries no run number.
    #[error("cannot derive a run id from file name {0:?} (expected log<digits>.txt)")]
    InvalidRunFilename(PathBuf),

    #[error("already added success generations to {0:?}")]
    AlreadyProcessed(PathBuf),

    #[error("{path:?}: no field at row {row}, column {column}")]
    MissingField {
        path: PathBuf,
        row: usize,
        column: usize,
    },

    #[error("{path:?}: row {row} has {found} fields, header has {expected}")]
    RaggedTable {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Glob(#[from] glob::PatternError),

    /// A directory entry that could not be read while listing logs.
    #[error(transparent)]
    GlobEntry(#[from] glob::GlobError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("job submission failed: {0}")]
    Dispatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a path to a raw `io::Error`, in the spirit of `anyhow::Context`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}

impl<T> IoContext<T> for std::result::Result<T, csv::Error> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Csv {
            path: path.into(),
            source,
        })
    }
}
