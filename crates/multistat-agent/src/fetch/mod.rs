//! Status page fetching.
//!
//! `StatusSource` is the seam between the poll pipeline and the network:
//! the worker and orchestrator only see this trait, so tests can plug in
//! deterministic sources while production uses `HttpFetcher`.

pub mod endpoint;
pub mod http;

use async_trait::async_trait;
use bytes::Bytes;

use multistat_core::error::FetchError;

pub use endpoint::{Endpoint, HeaderLine};
pub use http::HttpFetcher;

/// Body of one fetched status page. Only assumed to be newline-delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatusDocument(String);

impl RawStatusDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Decode a response body. Invalid UTF-8 is replaced rather than rejected.
    pub fn from_bytes(body: Bytes) -> Self {
        Self(String::from_utf8_lossy(&body).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Anything that can produce the status document of one endpoint.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<RawStatusDocument, FetchError>;
}
