//! Markup-to-entity extraction.
//!
//! Every function here is a pure transformation of one parsed document.
//! Malformed markup never fails: missing fields fall back to defaults and
//! malformed blocks are skipped without affecting their siblings.
//!
//! # Example
//!
//! ```rust
//! use flixscrape::extract::extract_grid;
//! use scraper::Html;
//!
//! let html = r#"<div class="flw-item">
//!     <h2 class="film-name"><a href="/tv/watch-dark-15230">Dark</a></h2>
//! </div>"#;
//! let items = extract_grid(&Html::parse_document(html));
//! assert_eq!(items[0].id, "15230");
//! ```

pub mod detail;
pub mod field;
pub mod grid;
pub mod season;
pub mod server;
pub mod sitemap;

pub use detail::extract_detail;
pub use field::{Chain, Field};
pub use grid::{extract_grid, extract_home, extract_single};
pub use season::{extract_episodes, extract_seasons};
pub use server::extract_servers;
pub use sitemap::extract_sitemap_locs;
