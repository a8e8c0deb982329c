//! Filter vocabulary: fixed year/quality tables and sitemap-derived options.

use crate::model::FilterOption;

/// Year buckets accepted by the `/year/{bucket}` listing.
pub const YEARS: [&str; 6] = ["2026", "2025", "2024", "2023", "2022", "older-2022"];

pub const QUALITIES: [&str; 3] = ["HD", "SD", "CAM"];

/// ISO codes used by the country sitemap.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AR", "Argentina"),
    ("AU", "Australia"),
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CN", "China"),
    ("CZ", "Czech Republic"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("HK", "Hong Kong"),
    ("HU", "Hungary"),
    ("IN", "India"),
    ("IE", "Ireland"),
    ("IL", "Israel"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("LU", "Luxembourg"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("NZ", "New Zealand"),
    ("NO", "Norway"),
    ("PL", "Poland"),
    ("RO", "Romania"),
    ("RU", "Russia"),
    ("ZA", "South Africa"),
    ("KR", "South Korea"),
    ("ES", "Spain"),
    ("SE", "Sweden"),
    ("CH", "Switzerland"),
    ("TW", "Taiwan"),
    ("TH", "Thailand"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
];

pub fn years() -> Vec<String> {
    YEARS.iter().map(ToString::to_string).collect()
}

pub fn qualities() -> Vec<String> {
    QUALITIES.iter().map(ToString::to_string).collect()
}

/// Display name for an ISO country code, if known.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Last path segment of a sitemap URL.
fn loc_id(loc: &str) -> &str {
    loc.trim_end().rsplit('/').next().unwrap_or_default()
}

/// `science-fiction` → `Science Fiction`.
pub fn title_case(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut at_word_start = true;
    for c in id.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_alphanumeric() || c == '_';
        if at_word_start && is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word;
    }
    out
}

pub fn genre_options(locs: &[String]) -> Vec<FilterOption> {
    locs.iter()
        .map(|loc| loc_id(loc))
        .filter(|id| !id.is_empty())
        .map(|id| FilterOption {
            id: id.to_string(),
            name: title_case(id),
        })
        .collect()
}

pub fn country_options(locs: &[String]) -> Vec<FilterOption> {
    locs.iter()
        .map(|loc| loc_id(loc))
        .filter(|id| !id.is_empty())
        .map(|id| FilterOption {
            id: id.to_string(),
            name: country_name(id).unwrap_or(id).to_string(),
        })
        .collect()
}
