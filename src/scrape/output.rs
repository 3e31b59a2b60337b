// src/scrape/output.rs

use csv::{Terminator, WriterBuilder};
use std::io::Write;

use super::LogRecord;
use crate::error::{IoContext, Result};

const OUTPUT: &str = "<output>";

/// Column set of the scraped CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `Run,Generation,Quartile,Homology`, one file per run.
    Runs,
    /// `Generation,Quartile,Homology`, a single log.
    SingleFile,
}

impl Layout {
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Layout::Runs => &["Run", "Generation", "Quartile", "Homology"],
            Layout::SingleFile => &["Generation", "Quartile", "Homology"],
        }
    }
}

/// Write the header then one row per record. Stops at the first record
/// error. Returns the number of rows written.
pub fn write_records<W, I>(out: W, records: I, layout: Layout) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<LogRecord>>,
{
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    wtr.write_record(layout.header()).at(OUTPUT)?;

    let mut rows = 0;
    for record in records {
        let record = record?;
        let generation = record
            .generation
            .map(|g| g.to_string())
            .unwrap_or_else(|| "NA".to_string());
        let written = match layout {
            Layout::Runs => wtr.write_record([
                record.run_id.as_deref().unwrap_or("NA"),
                generation.as_str(),
                record.quartile.label(),
                record.raw_value.as_str(),
            ]),
            Layout::SingleFile => wtr.write_record([
                generation.as_str(),
                record.quartile.label(),
                record.raw_value.as_str(),
            ]),
        };
        written.at(OUTPUT)?;
        rows += 1;
    }
    wtr.flush().at(OUTPUT)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::Quartile;

    fn record(run: Option<&str>, generation: Option<u64>, q: Quartile, v: &str) -> LogRecord {
        LogRecord {
            run_id: run.map(str::to_string),
            generation,
            quartile: q,
            value: v.parse().unwrap(),
            raw_value: v.to_string(),
        }
    }

    #[test]
    fn test_single_file_layout() {
        let mut buf = Vec::new();
        let n = write_records(
            &mut buf,
            vec![
                Ok(record(None, Some(3), Quartile::First, "0.50")),
                Ok(record(None, Some(3), Quartile::Median, "0.75")),
            ],
            Layout::SingleFile,
        )
        .unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Generation,Quartile,Homology\n3,0.25,0.50\n3,0.5,0.75\n"
        );
    }

    #[test]
    fn test_runs_layout_with_missing_generation() {
        let mut buf = Vec::new();
        write_records(
            &mut buf,
            vec![Ok(record(Some("4"), None, Quartile::Third, "1.0"))],
            Layout::Runs,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Run,Generation,Quartile,Homology\n4,NA,0.75,1.0\n"
        );
    }
}
