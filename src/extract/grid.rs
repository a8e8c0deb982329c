//! Listing cards (`.flw-item`) from grids, search results and the home page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::field::{leading_number, selector, slug_id, text_of, Chain, Field};
use crate::model::{CatalogItem, HomePage, MediaType};

static ITEM: LazyLock<Selector> = LazyLock::new(|| selector(".flw-item"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector(".film-name a"));
static TYPE_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".fdi-type"));

// Lazy-load attribute first: `src` holds a placeholder until JS swaps it.
static POSTER: LazyLock<Chain> =
    LazyLock::new(|| Chain::new().attr("img", "data-src").attr("img", "src"));
static YEAR: LazyLock<Chain> = LazyLock::new(|| Chain::new().text(".fdi-item"));
static DURATION: LazyLock<Chain> =
    LazyLock::new(|| Chain::new().text(".fdi-duration").nth_text(".fdi-item", 2));
static QUALITY: LazyLock<Chain> = LazyLock::new(|| Chain::new().text(".film-poster-quality"));

static TRENDING_MOVIES: LazyLock<Selector> =
    LazyLock::new(|| selector("#trending-movies .flw-item"));
static TRENDING_TV: LazyLock<Selector> = LazyLock::new(|| selector("#trending-tv .flw-item"));
static BLOCK_AREA: LazyLock<Selector> = LazyLock::new(|| selector(".block_area"));
static CAT_HEADING: LazyLock<Selector> = LazyLock::new(|| selector(".cat-heading"));

/// Every well-formed card in `document`, in page order.
pub fn extract_grid(document: &Html) -> Vec<CatalogItem> {
    cards(document.root_element(), None)
}

fn cards(scope: ElementRef<'_>, forced: Option<MediaType>) -> Vec<CatalogItem> {
    scope
        .select(&ITEM)
        .filter_map(|block| extract_single(block, forced))
        .collect()
}

/// Extract one card. `forced` skips type inference.
///
/// Returns `None` for blocks without a title or link (ads, placeholders).
pub fn extract_single(block: ElementRef<'_>, forced: Option<MediaType>) -> Option<CatalogItem> {
    let link = block.select(&LINK).next();
    let title = link.map(text_of).unwrap_or_default();
    let href = link
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .trim();
    let slug = href.strip_prefix('/').unwrap_or(href).trim().to_string();

    if title.is_empty() || slug.is_empty() {
        return None;
    }

    let year = Field::parse_with(YEAR.first_match(block).as_deref(), leading_number::<i32>)
        .ok()
        .filter(|y| *y != 0);

    Some(CatalogItem {
        id: slug_id(&slug),
        kind: forced.unwrap_or_else(|| infer_type(block, href)),
        poster: POSTER.first_match(block),
        duration: DURATION.first_match(block),
        quality: QUALITY.first_match(block),
        year,
        title,
        slug,
    })
}

/// `tv` when either the link path or the card label says so.
fn infer_type(block: ElementRef<'_>, href: &str) -> MediaType {
    let labelled_tv = block
        .select(&TYPE_LABEL)
        .next()
        .is_some_and(|label| text_of(label) == "TV");

    if href.contains("/tv/") || labelled_tv {
        MediaType::Tv
    } else {
        MediaType::Movie
    }
}

/// Trending and latest sections of the landing page.
pub fn extract_home(document: &Html) -> HomePage {
    let root = document.root_element();
    let mut home = HomePage {
        trending_movies: collect(root, &TRENDING_MOVIES, MediaType::Movie),
        trending_tv: collect(root, &TRENDING_TV, MediaType::Tv),
        ..HomePage::default()
    };

    for block in root.select(&BLOCK_AREA) {
        let heading = block.select(&CAT_HEADING).next().map(text_of);
        match heading.as_deref() {
            Some("Latest Movies") => home
                .latest_movies
                .extend(cards(block, Some(MediaType::Movie))),
            Some("Latest TV Shows") => home.latest_tv.extend(cards(block, Some(MediaType::Tv))),
            _ => {}
        }
    }

    home
}

fn collect(root: ElementRef<'_>, section: &Selector, kind: MediaType) -> Vec<CatalogItem> {
    root.select(section)
        .filter_map(|block| extract_single(block, Some(kind)))
        .collect()
}
