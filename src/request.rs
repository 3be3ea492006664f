//! The request side of the data model (spec §3, §4.3).

use std::fmt;

use crate::body::BodyCommunicator;
use crate::headers::RequestHeaders;

/// The HTTP version named on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
    Http2,
    Other,
}

impl HttpVersion {
    pub fn parse(version: &str) -> Self {
        match version.trim() {
            "HTTP/1.0" => HttpVersion::Http10,
            "HTTP/1.1" => HttpVersion::Http11,
            "HTTP/2" | "HTTP/2.0" => HttpVersion::Http2,
            _ => HttpVersion::Other,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
            HttpVersion::Http2 => "HTTP/2",
            HttpVersion::Other => "HTTP/1.1",
        };
        f.write_str(s)
    }
}

/// A request as handed to the application by a transport. Transports build
/// this by pushing the method, URI, version and headers they parsed off the
/// wire, then priming `body` with whatever bytes they already buffered.
pub struct Request {
    pub method: String,
    pub uri: String,
    pub version: HttpVersion,
    pub headers: RequestHeaders,
    pub body: BodyCommunicator,
}

impl Request {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, version: HttpVersion) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            version,
            headers: RequestHeaders::new(),
            body: BodyCommunicator::new(),
        }
    }

    pub fn with_body(mut self, body: BodyCommunicator) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.headers.set(name, value);
        self
    }

    /// The path component of `uri`, with any `?query` stripped.
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }

    /// The raw query string, without the leading `?`, if any.
    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, q)| q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        let req = Request::new("GET", "/a/b?x=1", HttpVersion::Http11);
        assert_eq!(req.path(), "/a/b");
        assert_eq!(req.query(), Some("x=1"));
    }

    #[test]
    fn query_absent_is_none() {
        let req = Request::new("GET", "/a/b", HttpVersion::Http11);
        assert_eq!(req.query(), None);
    }

    #[test]
    fn version_parses_known_strings() {
        assert_eq!(HttpVersion::parse("HTTP/1.1"), HttpVersion::Http11);
        assert_eq!(HttpVersion::parse("HTTP/1.0"), HttpVersion::Http10);
        assert_eq!(HttpVersion::parse("gibberish"), HttpVersion::Other);
    }
}
