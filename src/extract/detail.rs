//! Title detail page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::field::{leading_number, selector, slug_id, text_of, Chain, Field};
use crate::model::DetailRecord;

static ROW: LazyLock<Selector> = LazyLock::new(|| selector(".row-line"));
static ROW_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".type"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static TITLE: LazyLock<Chain> = LazyLock::new(|| Chain::new().text(".heading-name a"));
static DESCRIPTION: LazyLock<Chain> = LazyLock::new(|| Chain::new().text(".description"));
static POSTER: LazyLock<Chain> = LazyLock::new(|| Chain::new().attr(".film-poster img", "src"));

const RELEASED: &str = "Released:";
const COUNTRY: &str = "Country:";

pub fn extract_detail(document: &Html, slug: &str) -> DetailRecord {
    let root = document.root_element();
    let released = labeled_row(root, RELEASED);

    DetailRecord {
        id: slug_id(slug),
        title: TITLE.first_match(root).unwrap_or_default(),
        year: release_year(&released),
        description: DESCRIPTION.first_match(root).unwrap_or_default(),
        country: labeled_row(root, COUNTRY),
        genres: genres(root),
        poster: POSTER.first_match(root),
        released,
    }
}

fn row_label(row: ElementRef<'_>) -> String {
    row.select(&ROW_LABEL).map(text_of).collect()
}

/// Text of the rows labelled exactly `label`, with the label removed.
fn labeled_row(root: ElementRef<'_>, label: &str) -> String {
    let text: String = root
        .select(&ROW)
        .filter(|row| row_label(*row) == label)
        .map(|row| row.text().collect::<String>())
        .collect();
    text.replacen(label, "", 1).trim().to_string()
}

/// Link texts of every row whose label mentions "Genre".
///
/// Genres render as one anchor each, so the row's flat text would glue them
/// together with separators.
fn genres(root: ElementRef<'_>) -> Vec<String> {
    root.select(&ROW)
        .filter(|row| row_label(*row).contains("Genre"))
        .flat_map(|row| row.select(&ANCHOR).map(text_of))
        .filter(|genre| !genre.is_empty())
        .collect()
}

fn release_year(released: &str) -> Option<i32> {
    let prefix: String = released.chars().take(4).collect();
    Field::parse_with(Some(prefix.as_str()), leading_number).ok()
}
