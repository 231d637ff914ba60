//! Element patterns for the listing site

use super::Pattern;
use crate::MarkupError;

/// Every pattern the crawler queries, compiled once per run
#[derive(Debug, Clone)]
pub struct SitePatterns {
    /// One listing summary on a results page
    pub tile: Pattern,
    /// Candidate links inside a tile
    pub tile_anchor: Pattern,
    /// Page-number links in the pagination control
    pub page_number: Pattern,

    pub agent_name: Pattern,
    pub agency_name: Pattern,
    pub address: Pattern,
    pub photo_block: Pattern,
    pub image: Pattern,
    pub sale_method: Pattern,
    pub features_block: Pattern,
    /// Feature blocks match on the exact class attribute; extra classes
    /// mark other widgets
    pub feature_item: Pattern,
    pub feature_title: Pattern,
    pub feature_text: Pattern,
    pub listed_date: Pattern,
    pub capital_value: Pattern,
}

/// Class of the element that opens the primary listing link in a tile
pub const LISTED_DATE_CLASS: &str = "listed-date";

impl SitePatterns {
    /// Compiles the site's patterns
    pub fn compile() -> Result<Self, MarkupError> {
        Ok(Self {
            tile: Pattern::parse(r#"div[data-test="tile"]"#)?,
            tile_anchor: Pattern::parse("a")?,
            page_number: Pattern::parse(
                r#"div[data-test="paginated-items"] > div > a.paginated-items__page-number"#,
            )?,
            agent_name: Pattern::parse("div.property-agents h3")?,
            agency_name: Pattern::parse(r#"div[data-test="agent-info__listing-agent-office"]"#)?,
            address: Pattern::parse(r#"h1[data-test="listing-title"]"#)?,
            photo_block: Pattern::parse(r#"div[data-test="photo-block"]"#)?,
            image: Pattern::parse("img")?,
            sale_method: Pattern::parse(r#"h3[data-test="pricing-method__price"]"#)?,
            features_block: Pattern::parse(r#"div[data-test="features-icons"]"#)?,
            feature_item: Pattern::parse(r#"div[class="flex items-center"]"#)?,
            feature_title: Pattern::parse("title")?,
            feature_text: Pattern::parse("span")?,
            listed_date: Pattern::parse(r#"span[data-test="description__listed-date"]"#)?,
            capital_value: Pattern::parse(r#"div[data-test="capital-valuation"] h4"#)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_patterns_compile() {
        let patterns = SitePatterns::compile().unwrap();
        assert_eq!(patterns.tile.as_str(), r#"div[data-test="tile"]"#);
    }
}
