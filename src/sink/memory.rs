//! In-memory sink

use crate::listing::ListingRecord;
use crate::sink::RecordSink;
use crate::SinkResult;
use std::collections::HashSet;

/// Keeps every appended record in a `Vec`
///
/// URLs registered with [`MemorySink::rejecting`] fail on append, which
/// lets tests exercise emission failures.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ListingRecord>,
    rejected: HashSet<String>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes appends of the record for `url` fail
    pub fn rejecting(mut self, url: impl Into<String>) -> Self {
        self.rejected.insert(url.into());
        self
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }

    /// Number of times `flush` was called
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &ListingRecord) -> SinkResult<()> {
        if self.rejected.contains(&record.listing_url) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("rejected {}", record.listing_url),
            )
            .into());
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.flushes += 1;
        Ok(())
    }

    fn appended(&self) -> u64 {
        self.records.len() as u64
    }
}
