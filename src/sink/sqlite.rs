//! SQLite listings sink

use crate::listing::ListingRecord;
use crate::sink::schema::initialize_schema;
use crate::sink::RecordSink;
use crate::SinkResult;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// Inserts each record as a row of the `listings` table
pub struct SqliteSink {
    conn: Connection,
    appended: u64,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn open(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn, appended: 0 })
    }

    /// Creates an in-memory database (for testing)
    pub fn open_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn, appended: 0 })
    }

    /// Number of rows in the `listings` table
    pub fn count(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Listing URLs in insertion order
    pub fn listing_urls(&self) -> SinkResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT listing_url FROM listings ORDER BY id")?;

        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }
}

impl RecordSink for SqliteSink {
    fn append(&mut self, record: &ListingRecord) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO listings (
                extract_date, listing_url, agent_names, agency_name, primary_image_url,
                property_address, sales_method, property_type, bedrooms, bathrooms,
                parking_space, floor_area, land_area, listing_date, capital_value, inserted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                record.extract_date,
                record.listing_url,
                record.agent_names,
                record.agency_name,
                record.primary_image_url,
                record.property_address,
                record.sales_method,
                record.property_type,
                record.bedrooms,
                record.bathrooms,
                record.parking_space,
                record.floor_area,
                record.land_area,
                record.listing_date,
                record.capital_value,
                now,
            ],
        )?;

        self.appended += 1;
        Ok(())
    }

    // Every insert autocommits
    fn flush(&mut self) -> SinkResult<()> {
        Ok(())
    }

    fn appended(&self) -> u64 {
        self.appended
    }
}
