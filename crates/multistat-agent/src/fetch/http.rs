//! `StatusSource` over plain HTTP.

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HOST};
use reqwest::{Client, StatusCode};

use multistat_core::error::{FetchError, MultistatError, Result};

use super::{Endpoint, HeaderLine, RawStatusDocument, StatusSource};

/// GETs status pages with one shared client. Client defaults apply, so there
/// is no per-request deadline.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| MultistatError::Internal(format!("http client init failed: {e}")))?;
        Ok(Self { client })
    }
}

/// Headers in listed order. Repeated keys are appended, except `Host`, which
/// replaces the virtual host.
fn build_headers(raw: &[String]) -> std::result::Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    for line in raw {
        match HeaderLine::parse(line)? {
            HeaderLine::Host(value) => {
                headers.insert(HOST, value);
            }
            HeaderLine::Other(name, value) => {
                headers.append(name, value);
            }
        }
    }
    Ok(headers)
}

#[async_trait]
impl StatusSource for HttpFetcher {
    async fn fetch(
        &self,
        endpoint: &Endpoint,
    ) -> std::result::Result<RawStatusDocument, FetchError> {
        let headers = build_headers(&endpoint.headers)?;

        let resp = self
            .client
            .get(endpoint.url())
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut body = BytesMut::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Body(e.to_string()))?;
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(port = endpoint.port, bytes = body.len(), "status page fetched");
        Ok(RawStatusDocument::from_bytes(body.freeze()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_headers_are_kept() {
        let raw = vec!["X-A: 1".to_string(), "X-A: 2".to_string()];
        let headers = build_headers(&raw).unwrap();
        let values: Vec<_> = headers.get_all("x-a").iter().collect();
        assert_eq!(values, vec!["1", "2"]);
    }

    #[test]
    fn last_host_wins() {
        let raw = vec!["Host: a.example".to_string(), "HOST: b.example".to_string()];
        let headers = build_headers(&raw).unwrap();
        assert_eq!(headers.get_all(HOST).iter().count(), 1);
        assert_eq!(headers.get(HOST).unwrap(), "b.example");
    }
}
