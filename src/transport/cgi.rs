//! Mapping CGI-style environment variables onto a [`Request`] (spec's
//! supplemented CGI transport). Contract only: reading `stdin`/writing
//! `stdout` and the process environment itself is left to the embedder,
//! mirroring how the source's transport layer never owns the I/O
//! primitives it's handed.

use std::collections::HashMap;
use std::io::Read;

use crate::body::BodyCommunicator;
use crate::error::TransportError;
use crate::headers::RequestHeaders;
use crate::request::{HttpVersion, Request};

/// Builds a [`Request`] from a CGI environment map and the request body
/// already read from `stdin`.
///
/// Required variables: `REQUEST_METHOD`, `SERVER_PROTOCOL`. `REQUEST_URI`
/// supplies the request URI verbatim when present, the same field the
/// source reads (`cgi_request.hpp`'s `request_uri()`); only when it's
/// absent do we fall back to synthesizing one from `PATH_INFO` (or
/// `SCRIPT_NAME`) plus `QUERY_STRING`, since some CGI hosts omit
/// `REQUEST_URI` entirely. Every `HTTP_*` variable becomes a header, with
/// underscores turned back into hyphens (`HTTP_CONTENT_TYPE` ->
/// `content-type`). `CONTENT_LENGTH`/`CONTENT_TYPE` are mapped without the
/// `HTTP_` prefix, since CGI carries those separately from the `HTTP_*` set.
pub fn request_from_cgi_env<R: Read>(
    env: &HashMap<String, String>,
    body: &mut R,
) -> Result<Request, TransportError> {
    let method = env
        .get("REQUEST_METHOD")
        .ok_or(TransportError::NotHttpConform)?
        .clone();
    let version = env
        .get("SERVER_PROTOCOL")
        .map(|s| HttpVersion::parse(s))
        .unwrap_or(HttpVersion::Http11);

    let uri = match env.get("REQUEST_URI") {
        Some(uri) => uri.clone(),
        None => {
            let path = env
                .get("PATH_INFO")
                .or_else(|| env.get("SCRIPT_NAME"))
                .cloned()
                .unwrap_or_else(|| "/".to_string());
            match env.get("QUERY_STRING").filter(|q| !q.is_empty()) {
                Some(query) => format!("{path}?{query}"),
                None => path,
            }
        }
    };

    let mut headers = RequestHeaders::new();
    if let Some(len) = env.get("CONTENT_LENGTH") {
        let _ = headers.set("content-length", len.clone());
    }
    if let Some(ct) = env.get("CONTENT_TYPE") {
        let _ = headers.set("content-type", ct.clone());
    }
    for (key, value) in env {
        if let Some(name) = key.strip_prefix("HTTP_") {
            let header_name = name.to_ascii_lowercase().replace('_', "-");
            let _ = headers.set(header_name, value.clone());
        }
    }

    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes).map_err(TransportError::from)?;

    Ok(Request {
        method,
        uri,
        version,
        headers,
        body: BodyCommunicator::from_bytes(bytes),
    })
}
