//! SQLite schema for the listings sink

/// SQL schema for the listings database
pub const SCHEMA_SQL: &str = r#"
-- One row per extracted listing
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    extract_date TEXT NOT NULL,
    listing_url TEXT NOT NULL,
    agent_names TEXT NOT NULL,
    agency_name TEXT NOT NULL,
    primary_image_url TEXT NOT NULL,
    property_address TEXT NOT NULL,
    sales_method TEXT NOT NULL,
    property_type TEXT NOT NULL,
    bedrooms TEXT NOT NULL,
    bathrooms TEXT NOT NULL,
    parking_space TEXT NOT NULL,
    floor_area TEXT NOT NULL,
    land_area TEXT NOT NULL,
    listing_date TEXT NOT NULL,
    capital_value TEXT NOT NULL,
    inserted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_url ON listings(listing_url);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", get_schema_version())?;
    Ok(())
}

/// Gets the current schema version
pub fn get_schema_version() -> u32 {
    1
}
