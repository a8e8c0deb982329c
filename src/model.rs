//! Catalog entities produced by the extractors and the stream resolver.
//!
//! All values are built fresh per call and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Whether a title is a film or a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "tv" | "tv-show" | "series" => Ok(Self::Tv),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// One card from a listing grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Trailing hyphen segment of `slug`.
    pub id: String,
    pub title: String,
    /// Path without the leading slash, e.g. `movie/watch-dune-12345`.
    pub slug: String,
    pub poster: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<String>,
    pub quality: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaType,
}

/// Title page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: String,
    pub title: String,
    /// First four digits of `released`.
    pub year: Option<i32>,
    pub description: String,
    pub country: String,
    /// Raw release date text as shown on the page.
    pub released: String,
    pub genres: Vec<String>,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// 0 when the name carries no number.
    pub season_number: u32,
    pub season_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    /// 0 when the title attribute has no `Eps N:` prefix.
    pub number: u32,
    pub title: String,
}

/// A hosting backend offering an episode or movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub server_id: String,
    pub name: String,
}

/// Decode `T`, or `None` when the value is null or has another type.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text: Option<String> = lenient(deserializer)?;
    Ok(text.unwrap_or_default())
}

/// Subtitle or thumbnail track attached to a source.
///
/// Upstream tracks are loosely typed; a field of the wrong type reads as
/// absent instead of rejecting the track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "lenient_text")]
    pub file: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

/// A playable stream resolved from a server id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Manifest URL.
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tracks: Vec<Track>,
    pub encrypted: bool,
}

/// A genre or country a listing can be filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

/// Filter vocabulary: scraped genres and countries plus the fixed tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub genres: Vec<FilterOption>,
    pub countries: Vec<FilterOption>,
    pub years: Vec<String>,
    pub qualities: Vec<String>,
}

/// Sections of the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePage {
    pub trending_movies: Vec<CatalogItem>,
    pub trending_tv: Vec<CatalogItem>,
    pub latest_movies: Vec<CatalogItem>,
    pub latest_tv: Vec<CatalogItem>,
}
