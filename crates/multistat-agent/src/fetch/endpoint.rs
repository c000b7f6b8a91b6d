use reqwest::header::{HeaderName, HeaderValue, HOST};

use multistat_core::error::FetchError;

/// One polled instance: same host, distinct port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
    /// Raw `Key: Value` strings, applied in order.
    pub headers: Vec<String>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            path: path.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

/// A configured header, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine {
    /// Overrides the request's virtual host.
    Host(HeaderValue),
    Other(HeaderName, HeaderValue),
}

impl HeaderLine {
    /// Split on the first colon and trim both sides. A line without a colon
    /// is a key with an empty value.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let (key, value) = match raw.split_once(':') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (raw.trim(), ""),
        };

        let value = HeaderValue::from_str(value)
            .map_err(|_| FetchError::InvalidHeader(format!("bad value in {raw:?}")))?;
        if key.eq_ignore_ascii_case(HOST.as_str()) {
            return Ok(HeaderLine::Host(value));
        }
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(format!("bad name in {raw:?}")))?;
        Ok(HeaderLine::Other(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_host_port_path() {
        let ep = Endpoint::new("127.0.0.1", 8080, "/server-status?auto");
        assert_eq!(ep.url(), "http://127.0.0.1:8080/server-status?auto");
    }

    #[test]
    fn host_key_is_case_insensitive() {
        let line = HeaderLine::parse(" host :  status.example ").unwrap();
        assert_eq!(line, HeaderLine::Host(HeaderValue::from_static("status.example")));
    }

    #[test]
    fn splits_on_first_colon_only() {
        let line = HeaderLine::parse("X-Forwarded-For: a:b").unwrap();
        assert_eq!(
            line,
            HeaderLine::Other(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("a:b")
            )
        );
    }

    #[test]
    fn missing_colon_means_empty_value() {
        let line = HeaderLine::parse("X-Probe").unwrap();
        assert_eq!(
            line,
            HeaderLine::Other(HeaderName::from_static("x-probe"), HeaderValue::from_static(""))
        );
    }

    #[test]
    fn invalid_name_rejected() {
        assert!(matches!(
            HeaderLine::parse("bad name: x"),
            Err(FetchError::InvalidHeader(_))
        ));
    }
}
