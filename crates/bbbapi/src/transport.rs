//! HTTP transport.
//!
//! The façade talks to the network only through the [`Transport`] trait.
//! [`HttpTransport`] is the reqwest-backed implementation; it buffers the
//! whole response and never follows redirects, because the server uses a
//! `302` to report some failures.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, Response, redirect};
use tracing::trace;

use crate::config::ClientConfig;
use crate::error::{BbbError, BbbResult};

/// A boxed future for transport methods.
///
/// Boxed futures keep the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A fully received HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers with lowercase names, in received order.
    pub headers: Vec<(String, String)>,
    /// The complete response body.
    pub body: String,
}

impl RawResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Builder method to add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    /// Returns the first value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of a header, matched case-insensitively.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Executes GET and POST requests against the server.
pub trait Transport: Send + Sync {
    /// Issues a GET without a body.
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, BbbResult<RawResponse>>;

    /// Issues a POST with an XML body.
    fn post<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, BbbResult<RawResponse>>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Content type sent with POST bodies.
    pub const XML_CONTENT_TYPE: &'static str = "text/xml";

    /// Creates a transport for the given configuration.
    pub fn new(config: &ClientConfig) -> BbbResult<Self> {
        let mut builder = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(&config.user_agent);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| BbbError::transport_with("failed to create HTTP client", e))?;

        Ok(Self { client })
    }

    async fn collect(response: Response) -> BbbResult<RawResponse> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| BbbError::transport_with("failed to read response body", e))?;

        trace!(status, body_len = body.len(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, BbbResult<RawResponse>> {
        Box::pin(async move {
            trace!(method = "GET", "Sending request");
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| BbbError::transport_with(format!("GET request failed: {}", e), e))?;
            Self::collect(response).await
        })
    }

    fn post<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, BbbResult<RawResponse>> {
        Box::pin(async move {
            trace!(method = "POST", body_len = body.len(), "Sending request");
            let response = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, Self::XML_CONTENT_TYPE)
                .body(body)
                .send()
                .await
                .map_err(|e| BbbError::transport_with(format!("POST request failed: {}", e), e))?;
            Self::collect(response).await
        })
    }
}
