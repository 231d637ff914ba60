//! Listing discovery on results pages
//!
//! This module reads a stabilized results-page snapshot and extracts:
//! - the absolute URL of every listing tile (deduplicated)
//! - the highest page number advertised by the pagination control

use crate::markup::{MarkupQuery, Node, SitePatterns, Snapshot, LISTED_DATE_CLASS};
use crate::site::SiteLayout;
use std::collections::BTreeSet;

/// Extracts the listing URLs from a results-page snapshot
///
/// # Link Selection Rules
///
/// Each tile holds several links (listing, agent profile, agency). The
/// listing link is the anchor whose first element child is the
/// `div.listed-date` badge. Tiles without such an anchor are skipped, as are
/// anchors without a usable `href`.
///
/// Path-only hrefs are resolved against the site origin. The result holds no
/// duplicates and is sorted.
///
/// # Example
///
/// ```
/// use realty_sweep::config::SiteConfig;
/// use realty_sweep::crawler::extract_listing_urls;
/// use realty_sweep::markup::SitePatterns;
/// use realty_sweep::site::SiteLayout;
///
/// let html = r#"<div data-test="tile">
///     <a href="/agent/9"><img></a>
///     <a href="/123/residential/sale/1-main-street"><div class="listed-date">Listed today</div></a>
/// </div>"#;
/// let layout = SiteLayout::new(&SiteConfig::default(), "queenstown").unwrap();
/// let patterns = SitePatterns::compile().unwrap();
///
/// let urls = extract_listing_urls(html, &patterns, &layout);
/// assert_eq!(urls, vec!["https://www.realestate.co.nz/123/residential/sale/1-main-street"]);
/// ```
pub fn extract_listing_urls(
    markup: &str,
    patterns: &SitePatterns,
    layout: &SiteLayout,
) -> Vec<String> {
    let snapshot = Snapshot::parse(markup);
    let mut urls = BTreeSet::new();

    for tile in snapshot.select_all(&patterns.tile) {
        let href = tile
            .select_all(&patterns.tile_anchor)
            .into_iter()
            .find(is_listing_anchor)
            .and_then(|anchor| anchor.attribute("href"));

        match href.and_then(|href| layout.resolve(href)) {
            Some(url) => {
                urls.insert(url);
            }
            None => tracing::debug!("Skipping tile without a listing link"),
        }
    }

    urls.into_iter().collect()
}

/// Whether an anchor opens with the listed-date badge
fn is_listing_anchor(anchor: &Node<'_>) -> bool {
    anchor
        .first_element_child()
        .map(|child| child.name() == "div" && child.has_class(LISTED_DATE_CLASS))
        .unwrap_or(false)
}

/// Reads the highest page number from the pagination control
///
/// Only links whose trimmed text is all digits count. Returns 1 when none
/// parse.
pub fn discover_total_pages(markup: &str, patterns: &SitePatterns) -> u32 {
    let snapshot = Snapshot::parse(markup);

    snapshot
        .select_all(&patterns.page_number)
        .iter()
        .filter_map(|link| parse_page_number(&link.raw_text()))
        .max()
        .unwrap_or(1)
}

/// Parses a pagination label such as " 12 "
fn parse_page_number(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Clamps the advertised page count to the configured cap
pub fn clamp_total_pages(discovered: u32, max_pages: u32) -> u32 {
    discovered.min(max_pages)
}
