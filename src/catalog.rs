//! Catalog client: one method per upstream endpoint.
//!
//! Transport failures never escape: listing methods log a warning and
//! return an empty `Vec`, single-record methods return `None`. Stream
//! resolution keeps that contract in [`Catalog::fetch_source`] and exposes
//! the detailed [`ResolveError`] through [`Catalog::resolver`].
//!
//! # Example
//!
//! ```rust,no_run
//! use flixscrape::{Catalog, MediaType};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let catalog = Catalog::new()?;
//! let results = catalog.search("the office").await;
//! if let Some(show) = results.iter().find(|i| i.kind == MediaType::Tv) {
//!     let seasons = catalog.get_seasons(&show.slug).await;
//!     println!("{} has {} seasons", show.title, seasons.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, LazyLock};

use anyhow::Result;
use futures::future::join_all;
use regex::Regex;
use scraper::Html;
use tracing::{error, instrument, warn};

use crate::config::Config;
use crate::error::{FetchError, ResolveError};
use crate::extract::{
    extract_detail, extract_episodes, extract_grid, extract_home, extract_seasons,
    extract_servers, extract_sitemap_locs,
};
use crate::extract::field::slug_id;
use crate::filters;
use crate::http_client::{HttpClient, Transport, XHR_HEADER};
use crate::model::{
    CatalogItem, DetailRecord, Episode, FilterOption, Filters, HomePage, MediaType, Season,
    ServerEntry, SourceDescriptor,
};
use crate::resolver::StreamResolver;

static NON_WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// `"Spider-Man: No Way Home"` → `"Spider-Man-No-Way-Home"`.
pub fn search_slug(query: &str) -> String {
    NON_WORD_RUN.replace_all(query.trim(), "-").into_owned()
}

/// Run independent fetches concurrently and keep each outcome separately.
///
/// A failure is logged and becomes `None` in its slot; the other slots are
/// unaffected.
pub async fn settle_all<F, T>(futures: Vec<F>) -> Vec<Option<T>>
where
    F: std::future::Future<Output = Result<T, FetchError>>,
{
    join_all(futures)
        .await
        .into_iter()
        .map(|outcome| match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Concurrent fetch failed");
                None
            }
        })
        .collect()
}

/// Scraping client for one catalog site.
pub struct Catalog<T = HttpClient> {
    transport: Arc<T>,
    base_url: String,
    resolver: StreamResolver<T>,
}

impl Catalog<HttpClient> {
    /// Client with configuration from the default config file.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::load()?)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpClient::with_config(config)?;
        Ok(Self::with_transport(transport, config.base_url.as_str()))
    }
}

impl<T: Transport> Catalog<T> {
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        let transport = Arc::new(transport);
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let resolver = StreamResolver::new(Arc::clone(&transport), base_url.clone());
        Self {
            transport,
            base_url,
            resolver,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying resolver, for callers that want the failure reason.
    pub fn resolver(&self) -> &StreamResolver<T> {
        &self.resolver
    }

    /// Fetch `url` and run `parse` on the document; `None` on transport failure.
    async fn fetch_with<R>(&self, url: &str, parse: impl FnOnce(&Html) -> R) -> Option<R> {
        match self.transport.get(url, &[XHR_HEADER]).await {
            Ok(body) => Some(parse(&Html::parse_document(&body))),
            Err(e) => {
                warn!(url, error = %e, "Catalog fetch failed");
                None
            }
        }
    }

    async fn listing(&self, url: &str) -> Vec<CatalogItem> {
        self.fetch_with(url, extract_grid).await.unwrap_or_default()
    }

    #[instrument(skip(self))]
    pub async fn fetch_home(&self) -> Option<HomePage> {
        self.fetch_with(&format!("{}/home", self.base_url), extract_home)
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_movies(&self, page: u32) -> Vec<CatalogItem> {
        self.listing(&format!("{}/movie?page={page}", self.base_url))
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_tv_shows(&self, page: u32) -> Vec<CatalogItem> {
        self.listing(&format!("{}/tv-show?page={page}", self.base_url))
            .await
    }

    /// `kind` is `all`, `movie` or `tv`.
    #[instrument(skip(self))]
    pub async fn fetch_top_imdb(&self, kind: &str, page: u32) -> Vec<CatalogItem> {
        self.listing(&format!(
            "{}/top-imdb?type={}&page={page}",
            self.base_url,
            urlencoding::encode(kind)
        ))
        .await
    }

    /// Listing filtered by `kind` (`genre`, `country`, `year`, `quality`, ...).
    #[instrument(skip(self))]
    pub async fn filter(&self, kind: &str, value: &str, page: u32) -> Vec<CatalogItem> {
        self.listing(&format!(
            "{}/{}/{}?page={page}",
            self.base_url,
            urlencoding::encode(kind),
            urlencoding::encode(value)
        ))
        .await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<CatalogItem> {
        let slug = search_slug(query);
        if slug.is_empty() {
            return Vec::new();
        }
        self.listing(&format!("{}/search/{slug}", self.base_url))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_details(&self, slug: &str) -> Option<DetailRecord> {
        let slug = slug.trim_start_matches('/');
        self.fetch_with(&format!("{}/{slug}", self.base_url), |doc| {
            extract_detail(doc, slug)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_seasons(&self, slug: &str) -> Vec<Season> {
        let id = slug_id(slug);
        self.fetch_with(
            &format!("{}/ajax/season/list/{id}", self.base_url),
            extract_seasons,
        )
        .await
        .unwrap_or_default()
    }

    #[instrument(skip(self))]
    pub async fn get_episodes(&self, season_id: &str) -> Vec<Episode> {
        self.fetch_with(
            &format!("{}/ajax/season/episodes/{season_id}", self.base_url),
            extract_episodes,
        )
        .await
        .unwrap_or_default()
    }

    /// Servers for a movie id or a tv episode id.
    #[instrument(skip(self))]
    pub async fn get_servers(&self, content_id: &str, kind: MediaType) -> Vec<ServerEntry> {
        let url = match kind {
            MediaType::Movie => format!("{}/ajax/episode/list/{content_id}", self.base_url),
            MediaType::Tv => format!("{}/ajax/episode/servers/{content_id}", self.base_url),
        };
        self.fetch_with(&url, extract_servers)
            .await
            .unwrap_or_default()
    }

    async fn sitemap_locs(&self, name: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/sitemap-{name}.xml", self.base_url);
        let body = self.transport.get(&url, &[XHR_HEADER]).await?;
        Ok(extract_sitemap_locs(&body))
    }

    /// Genres and countries from the sitemaps plus the fixed tables.
    ///
    /// The two sitemaps are fetched concurrently; either may fail without
    /// emptying the other.
    #[instrument(skip(self))]
    pub async fn fetch_filters(&self) -> Filters {
        let mut settled = settle_all(vec![self.sitemap_locs("genre"), self.sitemap_locs("country")])
            .await
            .into_iter();
        let genres = settled.next().flatten().unwrap_or_default();
        let countries = settled.next().flatten().unwrap_or_default();

        Filters {
            genres: filters::genre_options(&genres),
            countries: filters::country_options(&countries),
            years: filters::years(),
            qualities: filters::qualities(),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_genres(&self) -> Vec<FilterOption> {
        match self.sitemap_locs("genre").await {
            Ok(locs) => filters::genre_options(&locs),
            Err(e) => {
                warn!(error = %e, "Genre sitemap fetch failed");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_countries(&self) -> Vec<FilterOption> {
        match self.sitemap_locs("country").await {
            Ok(locs) => filters::country_options(&locs),
            Err(e) => {
                warn!(error = %e, "Country sitemap fetch failed");
                Vec::new()
            }
        }
    }

    /// Resolve a server to a playable source; `None` on any failure.
    ///
    /// Protocol failures are logged at error level since they usually mean
    /// the upstream format changed.
    #[instrument(skip(self))]
    pub async fn fetch_source(&self, server_id: &str) -> Option<SourceDescriptor> {
        match self.resolver.resolve(server_id).await {
            Ok(source) => Some(source),
            Err(e) => {
                log_resolve_failure(server_id, &e);
                None
            }
        }
    }
}

fn log_resolve_failure(server_id: &str, e: &ResolveError) {
    if e.is_protocol_failure() {
        error!(server_id, error = %e, "Stream resolution failed");
    } else {
        warn!(server_id, error = %e, "Stream resolution failed in transport");
    }
}
