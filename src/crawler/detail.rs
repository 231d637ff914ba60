//! Listing detail extraction
//!
//! Every field is read by its own query with its own fallback, so a page
//! missing any element still produces a record. Only navigation and load
//! failures are errors.

use crate::listing::{feature_keys, FeatureMap, ListingRecord, EXTRACT_DATE_FORMAT};
use crate::markup::{MarkupQuery, SitePatterns, Snapshot};
use crate::render::RenderSession;
use crate::ListingError;
use chrono::Local;

/// Navigates to a listing and extracts its record
///
/// The record is stamped with the local time at which the page finished
/// loading.
pub async fn scrape_listing<S>(
    session: &mut S,
    url: &str,
    patterns: &SitePatterns,
) -> Result<ListingRecord, ListingError>
where
    S: RenderSession + ?Sized,
{
    let render_error = |source| ListingError::Render {
        url: url.to_string(),
        source,
    };

    session.load_url(url).await.map_err(render_error)?;
    session.wait_for_load().await.map_err(render_error)?;
    let extract_date = Local::now().format(EXTRACT_DATE_FORMAT).to_string();

    let markup = session.read_markup().await.map_err(render_error)?;

    Ok(extract_record(&markup, url, &extract_date, patterns))
}

/// Extracts a listing record from detail-page markup
pub fn extract_record(
    markup: &str,
    url: &str,
    extract_date: &str,
    patterns: &SitePatterns,
) -> ListingRecord {
    let snapshot = Snapshot::parse(markup);

    let agent_names: Vec<String> = snapshot
        .select_all(&patterns.agent_name)
        .iter()
        .map(|node| node.text())
        .collect();

    let features = extract_features(&snapshot, patterns);

    ListingRecord {
        extract_date: extract_date.to_string(),
        listing_url: url.to_string(),
        agent_names: join_agent_names(&agent_names),
        agency_name: snapshot.text_of_first(&patterns.agency_name),
        primary_image_url: primary_image_url(&snapshot, patterns),
        property_address: snapshot.text_of_first(&patterns.address),
        sales_method: snapshot.text_of_first(&patterns.sale_method),
        property_type: features.property_type().to_string(),
        bedrooms: features.get(feature_keys::BEDROOM).to_string(),
        bathrooms: features.get(feature_keys::BATHROOM).to_string(),
        parking_space: features.get(feature_keys::GARAGE).to_string(),
        floor_area: features.get(feature_keys::FLOOR_AREA).to_string(),
        land_area: features.get(feature_keys::LAND_AREA).to_string(),
        listing_date: snapshot.text_of_first(&patterns.listed_date),
        capital_value: snapshot.text_of_first(&patterns.capital_value),
    }
}

/// Joins agent names as "A", "A & B", "A, B & C"
pub fn join_agent_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} & {}", head.join(", "), last.as_ref())
        }
    }
}

/// Reads the icon feature blocks into a [`FeatureMap`]
///
/// A block without an icon title is labelled "unknown"; a block without a
/// text span contributes an empty value.
pub fn extract_features<Q: MarkupQuery>(page: &Q, patterns: &SitePatterns) -> FeatureMap {
    let mut features = FeatureMap::new();

    let Some(container) = page.select_first(&patterns.features_block) else {
        return features;
    };

    for block in container.select_all(&patterns.feature_item) {
        let title = block.select_first(&patterns.feature_title).map(|t| t.text());
        let text = block.text_of_first(&patterns.feature_text);
        features.push(title.as_deref(), text);
    }

    features
}

/// `src` of the first image inside the photo block, or `""`
fn primary_image_url(snapshot: &Snapshot, patterns: &SitePatterns) -> String {
    snapshot
        .select_first(&patterns.photo_block)
        .and_then(|block| {
            block
                .select_first(&patterns.image)
                .and_then(|img| img.attribute("src").map(str::to_string))
        })
        .unwrap_or_default()
}
