// src/augment/table.rs

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::{Error, IoContext, Result};

/// A whole CSV file held in memory. Row 0 is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).at(path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.at(path)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        trace!(path = %path.display(), rows = rows.len(), "read table");
        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn from_rows(path: impl Into<PathBuf>, rows: Vec<Vec<String>>) -> Self {
        Self {
            path: path.into(),
            rows,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn field(&self, row: usize, column: usize) -> Result<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .ok_or_else(|| Error::MissingField {
                path: self.path.clone(),
                row,
                column,
            })
    }

    /// Fails unless every row is as wide as the header.
    pub fn check_rectangular(&self) -> Result<usize> {
        let width = self.header().map_or(0, <[String]>::len);
        for (row, fields) in self.rows.iter().enumerate() {
            if fields.len() != width {
                return Err(Error::RaggedTable {
                    path: self.path.clone(),
                    row,
                    expected: width,
                    found: fields.len(),
                });
            }
        }
        Ok(width)
    }

    /// Add `label` to the header and `value` to every other row.
    pub fn append_column(&mut self, label: &str, value: &str) -> Result<()> {
        self.check_rectangular()?;
        let mut rows = self.rows.iter_mut();
        let header = rows.next().ok_or_else(|| Error::MissingField {
            path: self.path.clone(),
            row: 0,
            column: 0,
        })?;
        header.push(label.to_string());
        for row in rows {
            row.push(value.to_string());
        }
        Ok(())
    }

    /// Replace the file on disk. The table is written to a sibling temp
    /// file first and moved into place, so readers never see half a file.
    /// Symlinks are followed and the existing permissions are kept.
    pub fn write(&self) -> Result<()> {
        let target = match fs::canonicalize(&self.path) {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => self.path.clone(),
            Err(e) => return Err(e).at(&self.path),
        };
        let permissions = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e).at(&target),
        };
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).at(dir)?;
        if let Some(permissions) = permissions {
            tmp.as_file().set_permissions(permissions).at(&target)?;
        }
        {
            let mut wtr = WriterBuilder::new()
                .terminator(Terminator::CRLF)
                .from_writer(tmp.as_file());
            for row in &self.rows {
                wtr.write_record(row).at(&self.path)?;
            }
            wtr.flush().at(&self.path)?;
        }
        tmp.as_file().sync_all().at(&self.path)?;
        tmp.persist(&target).map_err(|e| e.error).at(&target)?;
        trace!(path = %self.path.display(), rows = self.rows.len(), "wrote table");
        Ok(())
    }
}
