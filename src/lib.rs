//! `flixscrape` - catalog scraper and stream resolver for FlixHQ-style sites
//!
//! # Features
//!
//! - **Entity extraction**: listing grids, detail pages, seasons, episodes and
//!   server lists turned into typed records with per-field fallback chains
//! - **Stream resolution**: server id → embed player → token-authenticated
//!   `getSources` call → playable HLS source
//! - **Filter vocabulary**: genre/country sitemaps plus fixed year and quality tables
//!
//! # Example
//!
//! ```rust,no_run
//! use flixscrape::{Catalog, MediaType};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Catalog::new()?;
//!     let movies = catalog.fetch_movies(1).await;
//!     if let Some(movie) = movies.first() {
//!         let servers = catalog.get_servers(&movie.id, MediaType::Movie).await;
//!         if let Some(server) = servers.first() {
//!             let source = catalog.fetch_source(&server.server_id).await;
//!             println!("{source:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod filters;
pub mod http_client;
pub mod model;
pub mod resolver;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{FetchError, ResolveError};
pub use http_client::{HttpClient, Transport};
pub use model::{
    CatalogItem, DetailRecord, Episode, FilterOption, Filters, HomePage, MediaType, Season,
    ServerEntry, SourceDescriptor, Track,
};
pub use resolver::{discover_token, StreamResolver, TokenFinder, TokenStrategy};

/// Version of flixscrape
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
