//! Listing record and feature map types

use serde::{Deserialize, Serialize};

/// Timestamp format of [`ListingRecord::extract_date`]
pub const EXTRACT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One extracted listing
///
/// Every field is a string and falls back to `""` when the page does not
/// carry it. Only `listing_url` is always populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Local wall-clock time of extraction
    pub extract_date: String,
    pub listing_url: String,
    /// Agent names joined as "A, B & C"
    pub agent_names: String,
    pub agency_name: String,
    pub primary_image_url: String,
    pub property_address: String,
    pub sales_method: String,
    pub property_type: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub parking_space: String,
    pub floor_area: String,
    pub land_area: String,
    pub listing_date: String,
    pub capital_value: String,
}

impl ListingRecord {
    /// Creates a record for `listing_url` with every other field empty
    pub fn empty(listing_url: impl Into<String>, extract_date: impl Into<String>) -> Self {
        Self {
            extract_date: extract_date.into(),
            listing_url: listing_url.into(),
            ..Self::default()
        }
    }
}

/// Feature keys looked up on a [`FeatureMap`]
pub mod feature_keys {
    pub const BEDROOM: &str = "bedroom";
    pub const BATHROOM: &str = "bathroom";
    pub const GARAGE: &str = "garage";
    pub const FLOOR_AREA: &str = "floor_area";
    pub const LAND_AREA: &str = "land_area";
    /// Label given to a feature block without an icon title
    pub const UNKNOWN: &str = "unknown";
}

/// Ordered (label, text) pairs from a listing's feature icons
///
/// The first pair is always the property type, whatever its icon says.
/// The remaining pairs are looked up by their normalized icon title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    entries: Vec<(String, String)>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature block, normalizing its icon title
    pub fn push(&mut self, title: Option<&str>, text: impl Into<String>) {
        let label = match title {
            Some(title) => normalize_label(title),
            None => feature_keys::UNKNOWN.to_string(),
        };
        self.entries.push((label, text.into()));
    }

    /// The property type: the text of the first block
    pub fn property_type(&self) -> &str {
        self.entries
            .first()
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }

    /// Text of the last block after the first whose label is `key`,
    /// or `""` when absent
    pub fn get(&self, key: &str) -> &str {
        self.entries
            .iter()
            .skip(1)
            .rev()
            .find(|(label, _)| label == key)
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Lowercases an icon title and replaces spaces with underscores
pub fn normalize_label(title: &str) -> String {
    title.trim().to_lowercase().replace(' ', "_")
}
