//! `<loc>` entries of the genre and country sitemaps.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::field::{selector, text_of};

static LOC: LazyLock<Selector> = LazyLock::new(|| selector("loc"));

/// Trimmed `<loc>` texts in document order; blank entries are dropped.
pub fn extract_sitemap_locs(xml: &str) -> Vec<String> {
    let document = Html::parse_document(xml);
    document
        .select(&LOC)
        .map(text_of)
        .filter(|loc| !loc.is_empty())
        .collect()
}
