//! HTTP transport for catalog and embed requests.
//!
//! [`Transport`] is the seam between the scraping logic and the network:
//! the catalog and resolver only ever issue GETs through it, so tests can
//! swap in canned responses. [`HttpClient`] is the reqwest-backed default.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::{Config, DEFAULT_ACCEPT};
use crate::error::FetchError;

/// Marker header the site's AJAX endpoints check for.
pub const XHR_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Outbound GET capability.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` with extra `headers` and return the body as text.
    ///
    /// Non-2xx responses are errors.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError>;
}

/// GET `url` and decode the body as JSON.
pub async fn get_json<T, C>(
    transport: &C,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    C: Transport + ?Sized,
{
    let body = transport.get(url, headers).await?;
    serde_json::from_str(&body).map_err(|source| FetchError::Json {
        url: url.to_string(),
        source,
    })
}

/// Pooled reqwest client with browser-like default headers.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            // Keep connections alive for reuse
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(default_headers(&config.user_agent)?)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

fn default_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    Ok(headers)
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, headers), fields(url = %url))]
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        debug!(status = %status, version = ?response.version(), "Response received");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}


#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::mock::MockTransport;
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Link {
        link: Option<String>,
    }

    #[test]
    fn default_headers_carry_user_agent_and_accept() {
        let headers = default_headers("flixscrape-test/1.0").unwrap();
        assert_eq!(headers[USER_AGENT], "flixscrape-test/1.0");
        assert_eq!(headers[ACCEPT], DEFAULT_ACCEPT);
    }

    #[test]
    fn invalid_user_agent_is_rejected() {
        assert!(default_headers("bad\nagent").is_err());
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(HttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn get_json_decodes_body() {
        let transport = MockTransport::new().route("https://a.test/x", r#"{"link":"https://e.test/1"}"#);
        let link: Link = get_json(&transport, "https://a.test/x", &[XHR_HEADER])
            .await
            .unwrap();
        assert_eq!(link.link.as_deref(), Some("https://e.test/1"));
        let seen = transport.request_to("https://a.test/x").unwrap();
        assert_eq!(seen.header("x-requested-with"), Some("XMLHttpRequest"));
    }

    #[tokio::test]
    async fn get_json_reports_malformed_body() {
        let transport = MockTransport::new().route("https://a.test/x", "<html>blocked</html>");
        let err = get_json::<Link, _>(&transport, "https://a.test/x", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Json { .. }));
    }
}
