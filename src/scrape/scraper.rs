// src/scrape/scraper.rs

use glob::{glob, Pattern};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    slice,
};
use tracing::{debug, info};

use super::line::{scan_line, ScanState};
use super::LogRecord;
use crate::error::{Error, IoContext, Result};

static RUN_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"log(\d+)\.txt$").expect("run id pattern"));

/// `log17.txt` → `"17"`. Any other file name is an input-format error.
pub fn run_id_from_path(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| RUN_ID_RE.captures(n))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| Error::InvalidRunFilename(path.to_path_buf()))
}

/// A single log file. Each call to [`LogScraper::records`] reopens the file
/// and scans from the top with a fresh generation.
#[derive(Debug, Clone)]
pub struct LogScraper {
    path: PathBuf,
    run_id: Option<String>,
}

impl LogScraper {
    /// Single-file mode: records carry no run id.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            run_id: None,
        }
    }

    /// Directory mode: the run id is taken from the file name.
    pub fn with_run_id(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let run_id = run_id_from_path(&path)?;
        Ok(Self {
            path,
            run_id: Some(run_id),
        })
    }

    pub fn records(&self) -> Result<Records> {
        let file = File::open(&self.path).at(&self.path)?;
        debug!(path = %self.path.display(), run = ?self.run_id, "scanning log");
        Ok(Records {
            reader: BufReader::new(file),
            buf: Vec::new(),
            state: ScanState::default(),
            path: self.path.clone(),
            run_id: self.run_id.clone(),
        })
    }
}

/// Lazy record stream over one file. Lines are decoded lossily: bytes that
/// are not UTF-8 can only appear in lines no pattern matches.
pub struct Records {
    reader: BufReader<File>,
    buf: Vec<u8>,
    state: ScanState,
    path: PathBuf,
    run_id: Option<String>,
}

impl Iterator for Records {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf).at(&self.path) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            let line = String::from_utf8_lossy(&self.buf);
            let (state, sample) = scan_line(self.state, &line);
            self.state = state;
            if let Some(sample) = sample {
                return Some(Ok(LogRecord::from_sample(self.run_id.as_deref(), sample)));
            }
        }
    }
}

/// Every `log*.txt` in a directory, in path order.
#[derive(Debug, Clone)]
pub struct DirectoryScraper {
    logs: Vec<LogScraper>,
}

impl DirectoryScraper {
    /// Finds the logs and resolves all run ids up front, so a badly named
    /// file aborts the run before any output is produced.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let pattern = format!("{}/log*.txt", Pattern::escape(&dir.to_string_lossy()));
        let mut paths: Vec<PathBuf> = glob(&pattern)?.collect::<std::result::Result<_, _>>()?;
        paths.sort();

        let logs = paths
            .into_iter()
            .map(LogScraper::with_run_id)
            .collect::<Result<Vec<_>>>()?;
        info!(dir = %dir.display(), files = logs.len(), "found logs");
        Ok(Self { logs })
    }

    /// All records from all files, file by file.
    pub fn records(&self) -> DirectoryRecords<'_> {
        DirectoryRecords {
            remaining: self.logs.iter(),
            current: None,
        }
    }
}

pub struct DirectoryRecords<'a> {
    remaining: slice::Iter<'a, LogScraper>,
    current: Option<Records>,
}

impl Iterator for DirectoryRecords<'_> {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(records) = self.current.as_mut() {
                if let Some(item) = records.next() {
                    return Some(item);
                }
                self.current = None;
            }
            let log = self.remaining.next()?;
            match log.records() {
                Ok(records) => self.current = Some(records),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
