//! Error types for transport and stream resolution.
//!
//! Two tiers are kept apart on purpose: [`FetchError`] covers the network
//! and body decoding, [`ResolveError`] adds the embed-protocol failures that
//! signal an upstream format change.

use thiserror::Error;

/// Transport-level failures (network, HTTP status, body decoding).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a server id could not be turned into a playable source.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The source-link endpoint answered without an embed URL.
    #[error("no embed link returned for server {0}")]
    NoEmbedLink(String),

    /// Neither token strategy matched the embed markup.
    #[error("access token not found in embed markup")]
    TokenNotFound,

    /// The provider's `getSources` response had no usable source.
    #[error("provider returned no sources")]
    NoSourcesReturned,

    #[error("invalid embed URL {url}: {source}")]
    InvalidEmbedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ResolveError {
    /// `true` for failures caused by the upstream embed protocol rather than
    /// by the network. These usually mean the scraping heuristics are stale.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(
            self,
            Self::NoEmbedLink(_)
                | Self::TokenNotFound
                | Self::NoSourcesReturned
                | Self::InvalidEmbedUrl { .. }
        )
    }
}
