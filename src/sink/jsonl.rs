//! JSON-lines file sink

use crate::listing::ListingRecord;
use crate::sink::RecordSink;
use crate::SinkResult;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one JSON object per line
///
/// The file is opened in append mode, so successive runs accumulate into
/// the same file. Each record is flushed as soon as it is written.
pub struct JsonLinesSink {
    writer: BufWriter<File>,
    appended: u64,
}

impl JsonLinesSink {
    /// Opens (or creates) the file at `path` for appending
    pub fn create(path: &Path) -> SinkResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            appended: 0,
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn append(&mut self, record: &ListingRecord) -> SinkResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.appended += 1;
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn appended(&self) -> u64 {
        self.appended
    }
}
