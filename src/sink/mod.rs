//! Output sinks for extracted listing records
//!
//! This module handles:
//! - Appending records to a JSON-lines file, flushed after every record
//! - Inserting records into a SQLite `listings` table
//! - Collecting records in memory for tests and dry runs

mod jsonl;
mod memory;
mod schema;
mod sqlite;

pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;
pub use schema::{get_schema_version, initialize_schema};
pub use sqlite::SqliteSink;

use crate::config::{OutputConfig, OutputFormat};
use crate::listing::ListingRecord;
use crate::SinkResult;
use std::path::Path;

/// Destination for extracted records
///
/// Records are appended one at a time, in extraction order. A record that
/// has been appended is durable once `flush` returns.
pub trait RecordSink: Send {
    /// Appends one record
    fn append(&mut self, record: &ListingRecord) -> SinkResult<()>;

    /// Flushes buffered output
    fn flush(&mut self) -> SinkResult<()>;

    /// Number of records appended through this sink
    fn appended(&self) -> u64;
}

impl<K: RecordSink + ?Sized> RecordSink for Box<K> {
    fn append(&mut self, record: &ListingRecord) -> SinkResult<()> {
        (**self).append(record)
    }

    fn flush(&mut self) -> SinkResult<()> {
        (**self).flush()
    }

    fn appended(&self) -> u64 {
        (**self).appended()
    }
}

/// Opens the sink described by the output configuration
///
/// # Arguments
///
/// * `config` - The output section of the run configuration
///
/// # Returns
///
/// * `Ok(Box<dyn RecordSink>)` - The opened sink
/// * `Err(SinkError)` - The file or database could not be opened
pub fn open_sink(config: &OutputConfig) -> SinkResult<Box<dyn RecordSink>> {
    let path = Path::new(&config.path);

    let sink: Box<dyn RecordSink> = match config.format {
        OutputFormat::Jsonl => Box::new(JsonLinesSink::create(path)?),
        OutputFormat::Sqlite => Box::new(SqliteSink::open(path)?),
    };

    tracing::info!("Writing {} output to {}", config.format, path.display());
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_sink_jsonl() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            format: OutputFormat::Jsonl,
            path: dir.path().join("out.jsonl").to_string_lossy().into_owned(),
        };

        let mut sink = open_sink(&config).unwrap();
        sink.append(&ListingRecord::empty("https://x.test/1", "now"))
            .unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.appended(), 1);
        let contents = std::fs::read_to_string(dir.path().join("out.jsonl")).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_open_sink_sqlite() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            format: OutputFormat::Sqlite,
            path: dir.path().join("out.db").to_string_lossy().into_owned(),
        };

        let mut sink = open_sink(&config).unwrap();
        sink.append(&ListingRecord::empty("https://x.test/1", "now"))
            .unwrap();
        assert_eq!(sink.appended(), 1);
    }

    #[test]
    fn test_open_sink_bad_directory() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            format: OutputFormat::Jsonl,
            path: dir
                .path()
                .join("missing")
                .join("out.jsonl")
                .to_string_lossy()
                .into_owned(),
        };

        assert!(open_sink(&config).is_err());
    }
}
