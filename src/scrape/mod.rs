// src/scrape/mod.rs
//
// Homology quartiles out of evolutionary-run logs.

pub mod line;
pub mod output;
pub mod scraper;

pub use line::{scan_line, QuartileSample, ScanState};
pub use output::{write_records, Layout};
pub use scraper::{run_id_from_path, DirectoryScraper, LogScraper};

use std::fmt;

/// Which quartile a log line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quartile {
    First,
    Median,
    Third,
}

impl Quartile {
    /// Rendered form in the `Quartile` column.
    pub fn label(self) -> &'static str {
        match self {
            Quartile::First => "0.25",
            Quartile::Median => "0.5",
            Quartile::Third => "0.75",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scraped quartile, tagged with its run (directory mode only).
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub run_id: Option<String>,
    /// `None` when the quartile appeared before any generation marker.
    pub generation: Option<u64>,
    pub quartile: Quartile,
    pub value: f64,
    /// The value exactly as written in the log, so output round-trips byte for byte.
    pub raw_value: String,
}

impl LogRecord {
    pub(crate) fn from_sample(run_id: Option<&str>, sample: QuartileSample) -> Self {
        Self {
            run_id: run_id.map(str::to_string),
            generation: sample.generation,
            quartile: sample.quartile,
            value: sample.value,
            raw_value: sample.raw_value,
        }
    }
}
