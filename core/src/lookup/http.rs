//! HTTP fund lookup implementation using reqwest

use crate::config::EndpointConfig;
use crate::error::{ConfigError, Result, SearchError};
use crate::fund::FundSummary;
use crate::lookup::FundLookup;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Body returned by the fund-search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Whether the service considers the query answered
    pub success: bool,

    /// Matching funds, in ranking order
    #[serde(default)]
    pub data: Vec<FundSummary>,

    /// Failure description when `success` is false
    #[serde(default)]
    pub message: Option<String>,
}

impl SearchResponse {
    /// Convert the envelope into the lookup result
    pub fn into_funds(self) -> std::result::Result<Vec<FundSummary>, SearchError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(SearchError::rejected(
                None,
                self.message
                    .unwrap_or_else(|| "Fund search failed".to_string()),
            ))
        }
    }
}

/// Fund lookup against a remote HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpFundLookup {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpFundLookup {
    /// Create a new HTTP lookup from a resolved endpoint config
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        config.validate()?;

        let mut base = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: format!("{} ({})", config.base_url, e),
        })?;

        // Url::join replaces the last segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let endpoint = base
            .join(config.search_path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidValue {
                field: "search_path".to_string(),
                value: format!("{} ({})", config.search_path, e),
            })?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| ConfigError::InvalidValue {
                    field: "headers".to_string(),
                    value: key.clone(),
                })?;
            let value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidValue {
                field: format!("headers.{}", key),
                value: "<invalid header value>".to_string(),
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// URL requested for `query`
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);
        url
    }
}

#[async_trait]
impl FundLookup for HttpFundLookup {
    async fn search(&self, query: &str) -> std::result::Result<Vec<FundSummary>, SearchError> {
        let url = self.search_url(query);
        debug!(%url, "Requesting fund search");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::rejected(
                Some(status.as_u16()),
                format!("Fund search returned {}", status),
            ));
        }

        let body = response.text().await?;
        let envelope: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            SearchError::network(format!("Invalid fund search response: {}", e))
        })?;

        envelope.into_funds()
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio_test::{assert_err, assert_ok};

    /// Serve a single canned HTTP response.
    ///
    /// Returns the base URL and a receiver for the raw request the server read.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        serve_after(Duration::ZERO, status_line, body).await
    }

    /// Like [`serve_once`], but wait `delay` before answering
    async fn serve_after(
        delay: Duration,
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let read = socket.read(&mut buf).await.unwrap_or(0);
            let _ = request_tx.send(String::from_utf8_lossy(&buf[..read]).into_owned());

            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{}", addr), request_rx)
    }

    #[test]
    fn test_search_url_keeps_base_path() {
        let config = EndpointConfig::new("https://funds.example.com/api/v1");
        let lookup = HttpFundLookup::new(&config).unwrap();

        assert_eq!(
            lookup.search_url("hdfc flexi").as_str(),
            "https://funds.example.com/api/v1/search?query=hdfc+flexi"
        );
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let config = EndpointConfig::new("https://funds.example.com")
            .with_header("bad header".to_string(), "x".to_string());
        assert!(HttpFundLookup::new(&config).is_err());
    }

    #[test]
    fn test_unsuccessful_envelope_is_rejected() {
        let envelope: SearchResponse =
            serde_json::from_str(r#"{"success": false, "message": "query too short"}"#).unwrap();

        assert_eq!(
            envelope.into_funds(),
            Err(SearchError::rejected(None, "query too short"))
        );
    }

    #[tokio::test]
    async fn test_search_decodes_success_response() {
        let (base_url, _request) = serve_once(
            "200 OK",
            r#"{"success": true, "data": [{"id": "f1", "displayName": "HDFC Top 100", "minSipAmount": 100}]}"#,
        )
        .await;

        let lookup = HttpFundLookup::new(&EndpointConfig::new(base_url)).unwrap();
        let funds = assert_ok!(lookup.search("hdfc").await);

        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].id, "f1");
        assert_eq!(funds[0].min_sip_amount, Some(100.0));
    }

    #[tokio::test]
    async fn test_search_maps_server_error_to_rejected() {
        let (base_url, _request) = serve_once("503 Service Unavailable", "{}").await;

        let lookup = HttpFundLookup::new(&EndpointConfig::new(base_url)).unwrap();
        let err = assert_err!(lookup.search("hdfc").await);

        assert!(matches!(err, SearchError::Rejected { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_search_maps_garbage_body_to_network() {
        let (base_url, _request) = serve_once("200 OK", "not json").await;

        let lookup = HttpFundLookup::new(&EndpointConfig::new(base_url)).unwrap();
        let err = assert_err!(lookup.search("hdfc").await);

        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn test_search_sends_configured_headers() {
        let (base_url, request) = serve_once("200 OK", r#"{"success": true, "data": []}"#).await;

        let config = EndpointConfig::new(base_url)
            .with_header("X-Client".to_string(), "cli".to_string());
        let lookup = HttpFundLookup::new(&config).unwrap();
        assert_ok!(lookup.search("axis").await);

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /search?query=axis "));
        assert!(request.contains("x-client: cli"), "headers missing: {}", request);
    }

    #[tokio::test]
    async fn test_search_timeout_is_network_error() {
        let (base_url, _request) = serve_after(
            Duration::from_millis(500),
            "200 OK",
            r#"{"success": true, "data": []}"#,
        )
        .await;

        let mut config = EndpointConfig::new(base_url);
        config.timeout_ms = 100;
        let lookup = HttpFundLookup::new(&config).unwrap();
        let err = assert_err!(lookup.search("kotak").await);

        assert_eq!(err.kind(), "network");
    }
}
