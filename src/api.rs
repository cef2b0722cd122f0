//! The single network call behind the widget.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::ACCEPT;

use crate::error::FetchError;

/// Third-party tracker the delivery id is handed to.
pub const TRACKING_URL_PREFIX: &str = "https://t.17track.net/en#nums=";

/// `GET {api_url}/{order_id}`. The order id is used as given (already
/// trimmed by the caller), without escaping.
pub fn order_url(api_url: &str, order_id: &str) -> String {
    format!("{api_url}/{order_id}")
}

pub fn tracking_url(delivery_id: &str) -> String {
    format!("{TRACKING_URL_PREFIX}{delivery_id}")
}

/// HTTP status plus the decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiReply {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// 2xx.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub type FetchFuture = Pin<Box<dyn Future<Output = Result<ApiReply, FetchError>> + Send>>;

/// Transport for the order lookup. The returned future owns everything it
/// needs so hosts can run it on their own executor.
pub trait TrackingApi: Send + Sync {
    fn fetch(&self, url: &str) -> FetchFuture;
}

/// Default transport over `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTrackingApi {
    client: reqwest::Client,
}

impl HttpTrackingApi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackingApi for HttpTrackingApi {
    fn fetch(&self, url: &str) -> FetchFuture {
        let client = self.client.clone();
        let url = url.to_string();
        Box::pin(async move {
            tracing::debug!("GET {}", url);
            let response = client
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            tracing::debug!("GET {} -> {} ({} bytes)", url, status, text.len());

            let body = parse_body(&text)?;
            Ok(ApiReply { status, body })
        })
    }
}

/// Decode a response body. Empty and non-JSON bodies are errors, whatever
/// the status code.
pub fn parse_body(text: &str) -> Result<serde_json::Value, FetchError> {
    serde_json::from_str(text).map_err(|e| FetchError::InvalidJson {
        reason: e.to_string(),
        body: text.to_string(),
    })
}
