//! Server id → playable source resolution.
//!
//! Two hops per call, nothing shared between calls:
//!
//! 1. `/ajax/episode/sources/{server_id}` yields the embed player URL.
//! 2. The embed page is scraped for an access token (see [`token`]), which
//!    authorizes the embed host's `getSources` call.
//!
//! Any failure aborts the whole resolution; there are no partial results
//! and no retries.

pub mod token;

use std::sync::Arc;

use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::ResolveError;
use crate::http_client::{get_json, Transport, XHR_HEADER};
use crate::model::{lenient, SourceDescriptor, Track};

pub use token::{discover_token, TokenFinder, TokenStrategy};

/// Path of the embed host's source-listing endpoint.
const GET_SOURCES_PATH: &str = "/embed-1/v3/e-1/getSources";

/// Default stream type when the provider omits it.
const DEFAULT_SOURCE_TYPE: &str = "hls";

/// Resolves server ids against one catalog site.
pub struct StreamResolver<T> {
    transport: Arc<T>,
    base_url: String,
    finder: TokenFinder,
}

impl<T: Transport> StreamResolver<T> {
    pub fn new(transport: Arc<T>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            finder: TokenFinder::new(),
        }
    }

    /// Replace the token strategies.
    #[must_use]
    pub fn with_finder(mut self, finder: TokenFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Resolve `server_id` to a playable source.
    #[instrument(skip(self))]
    pub async fn resolve(&self, server_id: &str) -> Result<SourceDescriptor, ResolveError> {
        let embed_url = self.embed_link(server_id).await?;
        debug!(embed_url = %embed_url, "Embed link found");
        self.extract_from_embed(&embed_url).await
    }

    /// First hop: the embed player URL for `server_id`.
    pub async fn embed_link(&self, server_id: &str) -> Result<String, ResolveError> {
        let url = format!(
            "{}/ajax/episode/sources/{}",
            self.base_url,
            urlencoding::encode(server_id)
        );
        let response: SourceLinkResponse = get_json(&*self.transport, &url, &[XHR_HEADER]).await?;

        response
            .link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty())
            .ok_or_else(|| ResolveError::NoEmbedLink(server_id.to_string()))
    }

    /// Second hop: scrape the embed page and call its `getSources` endpoint.
    #[instrument(skip(self))]
    pub async fn extract_from_embed(&self, embed_url: &str) -> Result<SourceDescriptor, ResolveError> {
        let origin = embed_origin(embed_url)?;

        // Embed host rejects requests without the catalog as referrer.
        let markup = self
            .transport
            .get(embed_url, &[("Referer", self.base_url.as_str())])
            .await?;

        let token = self.finder.discover(&markup)?;
        let file_id = file_id(embed_url);

        let api_url = format!(
            "{origin}{GET_SOURCES_PATH}?id={}&_k={}",
            urlencoding::encode(file_id),
            urlencoding::encode(&token)
        );
        let referer = format!("{origin}/");
        let response: SourcesResponse = get_json(
            &*self.transport,
            &api_url,
            &[("Referer", referer.as_str()), XHR_HEADER],
        )
        .await?;

        decode_sources(response)
    }
}

/// `scheme://host[:port]` of the embed URL.
fn embed_origin(embed_url: &str) -> Result<String, ResolveError> {
    let parsed = Url::parse(embed_url).map_err(|source| ResolveError::InvalidEmbedUrl {
        url: embed_url.to_string(),
        source,
    })?;
    Ok(parsed.origin().ascii_serialization())
}

/// Final path segment of the embed URL without its query string.
pub fn file_id(embed_url: &str) -> &str {
    let last = embed_url.rsplit('/').next().unwrap_or(embed_url);
    last.split('?').next().unwrap_or(last)
}

#[derive(Debug, Deserialize)]
struct SourceLinkResponse {
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourcesResponse {
    sources: Option<RawSources>,
    tracks: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    encrypted: Option<bool>,
}

/// `sources` is a list in the clear and an opaque string when encrypted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSources {
    List(Vec<RawSource>),
    Opaque(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default, deserialize_with = "lenient")]
    file: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    kind: Option<String>,
}

/// Tracks that decode; anything else in the list is dropped.
fn decode_tracks(raw: Option<serde_json::Value>) -> Vec<Track> {
    match raw {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_sources(response: SourcesResponse) -> Result<SourceDescriptor, ResolveError> {
    let first = match response.sources {
        Some(RawSources::List(list)) => list.into_iter().next(),
        Some(RawSources::Opaque(_)) => {
            warn!("Provider returned opaque sources; decryption is not supported");
            None
        }
        None => None,
    };

    let first = first.ok_or(ResolveError::NoSourcesReturned)?;
    let source = first
        .file
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or(ResolveError::NoSourcesReturned)?;

    Ok(SourceDescriptor {
        source,
        kind: first
            .kind
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_TYPE.to_string()),
        tracks: decode_tracks(response.tracks),
        encrypted: response.encrypted.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::http_client::mock::MockTransport;

    const BASE: &str = "https://flixhq.test";
    const LINK_URL: &str = "https://flixhq.test/ajax/episode/sources/10446";
    const EMBED: &str = "https://rabbit.test/embed-1/v3/e-1/Xk2Lw9Pq?z=";
    const T48: &str = "aB3dE5gH7jK9mN1pQ3sT5vW7yZ9bC1dF3hJ5kL7nP9rS1tV3";

    fn sources_url() -> String {
        format!("https://rabbit.test/embed-1/v3/e-1/getSources?id=Xk2Lw9Pq&_k={T48}")
    }

    fn embed_markup() -> String {
        format!(r#"<html><body><script nonce="{T48}"></script></body></html>"#)
    }

    fn resolver(transport: MockTransport) -> (Arc<MockTransport>, StreamResolver<MockTransport>) {
        let transport = Arc::new(transport);
        let resolver = StreamResolver::new(Arc::clone(&transport), BASE);
        (transport, resolver)
    }

    #[test]
    fn file_id_strips_query() {
        assert_eq!(file_id(EMBED), "Xk2Lw9Pq");
        assert_eq!(file_id("https://h.test/e/abc"), "abc");
    }

    #[test]
    fn embed_origin_keeps_port() {
        assert_eq!(embed_origin("https://h.test:8443/e/1").unwrap(), "https://h.test:8443");
        assert!(matches!(
            embed_origin("not a url"),
            Err(ResolveError::InvalidEmbedUrl { .. })
        ));
    }

    #[tokio::test]
    async fn resolves_full_pipeline() {
        let body = r#"{
            "sources": [{"file": "https://cdn.test/master.m3u8", "type": "hls"}],
            "tracks": [{"file": "https://cc.test/en.vtt", "label": "English", "kind": "captions", "default": true}],
            "encrypted": false,
            "server": 4
        }"#;
        let (transport, resolver) = resolver(
            MockTransport::new()
                .route(LINK_URL, &format!(r#"{{"type":"iframe","link":"{EMBED}"}}"#))
                .route(EMBED, &embed_markup())
                .route(&sources_url(), body),
        );

        let source = resolver.resolve("10446").await.unwrap();
        assert_eq!(source.source, "https://cdn.test/master.m3u8");
        assert_eq!(source.kind, "hls");
        assert_eq!(source.tracks.len(), 1);
        assert!(!source.encrypted);

        let embed = transport.request_to(EMBED).unwrap();
        assert_eq!(embed.header("Referer"), Some(BASE));
        let api = transport.request_to(&sources_url()).unwrap();
        assert_eq!(api.header("Referer"), Some("https://rabbit.test/"));
        assert_eq!(api.header("X-Requested-With"), Some("XMLHttpRequest"));
    }

    #[tokio::test]
    async fn defaults_apply_to_sparse_response() {
        let (_, resolver) = resolver(
            MockTransport::new()
                .route(EMBED, &embed_markup())
                .route(&sources_url(), r#"{"sources":[{"file":"https://cdn.test/a.m3u8"}]}"#),
        );
        let source = resolver.extract_from_embed(EMBED).await.unwrap();
        assert_eq!(source.kind, "hls");
        assert!(source.tracks.is_empty());
        assert!(!source.encrypted);
    }

    #[tokio::test]
    async fn odd_tracks_do_not_block_a_playable_source() {
        let body = r#"{
            "sources": [{"file": "https://cdn.test/m.m3u8"}],
            "tracks": [
                {"file": null, "kind": "thumbnails"},
                "not-a-track",
                {"file": "https://cc.test/en.vtt", "label": "English", "default": "true"}
            ]
        }"#;
        let (_, resolver) = resolver(
            MockTransport::new()
                .route(EMBED, &embed_markup())
                .route(&sources_url(), body),
        );
        let source = resolver.extract_from_embed(EMBED).await.unwrap();
        assert_eq!(source.source, "https://cdn.test/m.m3u8");
        assert_eq!(source.tracks.len(), 2);
        assert_eq!(source.tracks[0].file, "");
        assert_eq!(source.tracks[0].kind.as_deref(), Some("thumbnails"));
        assert_eq!(source.tracks[1].label.as_deref(), Some("English"));
        assert_eq!(source.tracks[1].default, None);
    }

    #[tokio::test]
    async fn non_list_tracks_read_as_empty() {
        let (_, resolver) = resolver(
            MockTransport::new().route(EMBED, &embed_markup()).route(
                &sources_url(),
                r#"{"sources":[{"file":"https://cdn.test/m.m3u8"}],"tracks":"none","encrypted":null}"#,
            ),
        );
        let source = resolver.extract_from_embed(EMBED).await.unwrap();
        assert!(source.tracks.is_empty());
        assert!(!source.encrypted);
    }

    #[tokio::test]
    async fn missing_link_is_no_embed_link() {
        let (transport, resolver) =
            resolver(MockTransport::new().route(LINK_URL, r#"{"type":"iframe","link":""}"#));
        let err = resolver.resolve("10446").await.unwrap_err();
        assert!(matches!(err, ResolveError::NoEmbedLink(ref id) if id == "10446"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn empty_sources_is_no_sources_returned() {
        let (_, resolver) = resolver(
            MockTransport::new()
                .route(EMBED, &embed_markup())
                .route(&sources_url(), r#"{"sources":[],"tracks":[],"encrypted":false}"#),
        );
        let err = resolver.extract_from_embed(EMBED).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoSourcesReturned));
        assert!(err.is_protocol_failure());
    }

    #[tokio::test]
    async fn encrypted_sources_are_not_decoded() {
        let (_, resolver) = resolver(
            MockTransport::new()
                .route(EMBED, &embed_markup())
                .route(&sources_url(), r#"{"sources":"U2FsdGVkX1+abc","encrypted":true}"#),
        );
        let err = resolver.extract_from_embed(EMBED).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoSourcesReturned));
    }

    #[tokio::test]
    async fn tokenless_embed_is_token_not_found() {
        let (transport, resolver) = resolver(
            MockTransport::new().route(EMBED, "<html><body>File was deleted</body></html>"),
        );
        let err = resolver.extract_from_embed(EMBED).await.unwrap_err();
        assert!(matches!(err, ResolveError::TokenNotFound));
        // No getSources call without a token.
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_not_a_protocol_failure() {
        let (_, resolver) = resolver(MockTransport::new().fail(LINK_URL, 502));
        let err = resolver.resolve("10446").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Fetch(FetchError::Status { status: 502, .. })
        ));
        assert!(!err.is_protocol_failure());
    }
}
